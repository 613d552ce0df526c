//! UI Components
//!
//! Leptos components for the chat page.

pub mod chart;
pub mod chat_input;
pub mod data_table;
pub mod loading;
pub mod message;
pub mod query_result;
pub mod welcome;

pub use chart::Chart;
pub use chat_input::ChatInput;
pub use data_table::DataTable;
pub use loading::TypingIndicator;
pub use message::Message;
pub use query_result::QueryResultPanel;
pub use welcome::Welcome;
