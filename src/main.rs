//! Estate Chat CLI
//!
//! Terminal client for the real-estate analysis backend:
//! - Ask a single question and print the analysis
//! - Chat interactively, paging through result tables
//! - Export result tables as CSV

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estate_chat::terminal::{render_message, render_table_page, render_view};
use estate_chat::{
    generate_default_config, shape, Attachment, ChatState, Config, LoggingConfig, Pager,
    QueryClient, ResultView,
};

#[derive(Parser)]
#[command(name = "estate-chat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask questions about real estate data")]
#[command(long_about = "Estate Chat sends natural-language questions to a real-estate analysis backend.\nTry \"Give me analysis of Wakad\" or \"Compare Ambegaon Budruk and Aundh demand trends\".")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question
    Ask {
        /// The question
        #[arg(required = true)]
        query: Vec<String>,
        /// Spreadsheet to upload with the question (.csv, .xlsx, .xls)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Table page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Write the full result table to this CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Start an interactive chat session
    Chat,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = estate_chat::config::normalize_base_url(url);
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Ask {
            query,
            file,
            page,
            export,
        } => {
            let query = query.join(" ");
            let ok = ask(&config, &query, file.as_deref(), page, export.as_deref()).await?;
            if !ok {
                std::process::exit(1);
            }
        }

        Commands::Chat => chat(&config).await?,

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("estate_chat={}", logging.level))
        });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// One-shot question. Returns false when the query ended in an error reply.
async fn ask(
    config: &Config,
    query: &str,
    file: Option<&Path>,
    page: usize,
    export: Option<&Path>,
) -> anyhow::Result<bool> {
    let client = QueryClient::new(&config.api.base_url)?;
    tracing::debug!("Using backend {}", client.endpoint());

    let attachment = match file {
        Some(path) => Some(
            Attachment::from_path(path)
                .await
                .with_context(|| format!("Failed to read {:?}", path))?,
        ),
        None => None,
    };

    let mut chat = ChatState::new();
    let Some(ticket) = chat.submit(query) else {
        anyhow::bail!("Query must not be empty");
    };

    let outcome = client.send_query(query, attachment).await;
    chat.settle(ticket, outcome);

    for message in chat.messages() {
        println!("{}", render_message(message));
    }

    if chat.error().is_some() {
        return Ok(false);
    }

    if let Some(result) = chat.visible_result() {
        let view = shape(result);
        let pager = view.table.as_ref().map(|table| {
            Pager::new(table.len(), config.table.page_size).with_page(page.saturating_sub(1))
        });

        println!();
        print!("{}", render_view(&view, pager.as_ref()));

        if let Some(path) = export {
            match &view.table {
                Some(table) => {
                    table.write_csv(path)?;
                    println!("Exported {} rows to {:?}", table.len(), path);
                }
                None => eprintln!("No table data to export"),
            }
        }
    }

    Ok(true)
}

/// The currently displayed result and its table cursor
struct Shown {
    view: ResultView,
    pager: Option<Pager>,
}

async fn chat(config: &Config) -> anyhow::Result<()> {
    let client = QueryClient::new(&config.api.base_url)?;
    tracing::info!("Connected to {}", client.endpoint());

    println!("Welcome to Real Estate Analysis Chatbot!");
    println!("Ask me questions about real estate data. For example:");
    println!("  \"Give me analysis of Wakad\"");
    println!("  \"Compare Ambegaon Budruk and Aundh demand trends\"");
    println!("  \"Show price growth for Akurdi over last 3 years\"");
    println!("Type :help for commands.");

    let mut chat = ChatState::new();
    let mut display: Option<Shown> = None;
    let mut attachment: Option<Attachment> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if let Some(command) = input.strip_prefix(':') {
            let (name, arg) = match command.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (command, ""),
            };

            match name {
                "q" | "quit" | "exit" => break,
                "help" => print_help(),
                "next" | "prev" | "page" => page_command(&mut display, name, arg),
                "file" => {
                    if arg.is_empty() {
                        attachment = None;
                        println!("Attachment cleared");
                    } else {
                        match Attachment::from_path(Path::new(arg)).await {
                            Ok(file) => {
                                let size = file.bytes.len();
                                println!("Attached {} ({} bytes)", file.file_name, size);
                                attachment = Some(file);
                            }
                            Err(e) => eprintln!("Failed to read {}: {}", arg, e),
                        }
                    }
                }
                "export" => {
                    let path = if arg.is_empty() {
                        PathBuf::from(&config.table.csv_filename)
                    } else {
                        PathBuf::from(arg)
                    };
                    match display.as_ref().and_then(|d| d.view.table.as_ref()) {
                        Some(table) => match table.write_csv(&path) {
                            Ok(()) => println!("Exported {} rows to {:?}", table.len(), path),
                            Err(e) => eprintln!("{}", e),
                        },
                        None => eprintln!("No table data to export"),
                    }
                }
                other => eprintln!("Unknown command :{} (try :help)", other),
            }
            continue;
        }

        let Some(ticket) = chat.submit(input) else {
            continue;
        };

        let outcome = client.send_query(input, attachment.take()).await;
        chat.settle(ticket, outcome);

        if let Some(reply) = chat.messages().last() {
            println!("{}", render_message(reply));
        }

        if chat.error().is_some() {
            continue;
        }

        if let Some(result) = chat.visible_result() {
            let view = shape(result);
            let pager = view
                .table
                .as_ref()
                .map(|table| Pager::new(table.len(), config.table.page_size));
            println!();
            print!("{}", render_view(&view, pager.as_ref()));
            display = Some(Shown { view, pager });
        }
    }

    Ok(())
}

fn page_command(display: &mut Option<Shown>, name: &str, arg: &str) {
    let Some(Shown {
        view,
        pager: Some(pager),
    }) = display.as_mut()
    else {
        eprintln!("No table to page through");
        return;
    };
    let Some(table) = view.table.as_ref() else {
        return;
    };

    match name {
        "next" if !pager.has_next() => eprintln!("Already on the last page"),
        "next" => pager.next(),
        "prev" if !pager.has_previous() => eprintln!("Already on the first page"),
        "prev" => pager.previous(),
        _ => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => pager.set_page(n - 1),
            _ => {
                eprintln!("Usage: :page N");
                return;
            }
        },
    }

    print!("{}", render_table_page(table, pager));
}

fn print_help() {
    println!("Commands:");
    println!("  :next           Next table page");
    println!("  :prev           Previous table page");
    println!("  :page N         Jump to table page N");
    println!("  :file [PATH]    Attach a spreadsheet to the next question (no path clears it)");
    println!("  :export [PATH]  Save the full result table as CSV");
    println!("  :help           Show this help");
    println!("  :quit           Leave the chat");
}
