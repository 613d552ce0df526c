//! # Estate Chat
//!
//! Chat client for a real-estate data-analysis backend. A natural-language
//! query (optionally with a spreadsheet) is posted to the backend, and the
//! structured answer is rendered as a chat reply plus an optional chart and
//! paginated data table.
//!
//! ## Modules
//!
//! - [`result`]: Typed backend responses
//! - [`shaping`]: Chart and table derivation from a result
//! - [`table`]: Pagination and CSV export
//! - [`chat`]: Message history and request lifecycle
//! - [`config`]: TOML configuration with environment overrides
//! - `client`: Multipart HTTP client (feature `cli`)
//! - [`terminal`]: Plain-text rendering for the command-line client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use estate_chat::{ChatState, Config, QueryClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = QueryClient::new(&config.api.base_url)?;
//!
//!     let mut chat = ChatState::new();
//!     let query = "Give me analysis of Wakad";
//!     if let Some(ticket) = chat.submit(query) {
//!         let outcome = client.send_query(query, None).await;
//!         chat.settle(ticket, outcome);
//!     }
//!
//!     for message in chat.messages() {
//!         println!("{}: {}", message.author(), message.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
#[cfg(feature = "cli")]
pub mod client;
pub mod config;
pub mod result;
pub mod shaping;
pub mod table;
pub mod terminal;

pub use chat::{ChatMessage, ChatState, Phase, Settled, Ticket, TRANSPORT_ERROR_MESSAGE};

#[cfg(feature = "cli")]
pub use client::{Attachment, ClientError, QueryClient};

pub use config::{
    default_api_base, generate_default_config, query_endpoint, ApiConfig, Config, ConfigError,
    LoggingConfig, TableConfig,
};

pub use result::{
    AreaAnalysis, AreaSeries, Comparison, ComparisonChart, ComparisonPoint, PriceGrowth,
    PriceTrendPoint, PriceTrends, QueryResult, ResultError, ResultKind, Row,
};

pub use shaping::{
    chart_for, comparison_color, merge_comparison, shape, ChartRow, ChartSpec, ResultView,
    SeriesLine,
};

pub use table::{ExportError, Pager, TableData, CSV_FILENAME, DEFAULT_PAGE_SIZE};
