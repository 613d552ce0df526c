//! Real Estate Analysis Chatbot
//!
//! Single-page chat front end built with Leptos (WASM).
//!
//! # Features
//!
//! - Natural-language questions with optional spreadsheet upload
//! - Price trend and area comparison charts
//! - Paginated result tables with CSV download
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It posts queries to the analysis backend over HTTP and shares
//! result shaping and chat state with the `estate-chat` library.

use leptos::*;

mod api;
mod app;
mod components;
mod export;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
