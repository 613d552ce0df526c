//! Global Application State
//!
//! Reactive wrapper around the shared chat state machine.

use leptos::*;
use web_sys::File;

use estate_chat::{ChatState, Settled, DEFAULT_PAGE_SIZE};

use crate::api;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Messages, loading flag, error banner and last result
    pub chat: RwSignal<ChatState>,
    /// Rows per result table page
    pub page_size: usize,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState::new());
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            chat: create_rw_signal(ChatState::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Submit a query and settle it once the backend answers.
    ///
    /// Blank queries are ignored. The reply is appended whenever the request
    /// completes, so overlapping requests each get their own bot message.
    pub fn send_query(&self, query: String, file: Option<File>) {
        let mut ticket = None;
        self.chat.update(|chat| ticket = chat.submit(&query));
        let Some(ticket) = ticket else {
            return;
        };

        let chat = self.chat;
        spawn_local(async move {
            let outcome = api::send_query(&query, file).await;
            if let Err(e) = &outcome {
                web_sys::console::error_1(&format!("Error processing query: {}", e).into());
            }

            chat.update(|state| {
                if state.settle(ticket, outcome) == Settled::Superseded {
                    web_sys::console::log_1(
                        &format!("Reply to query #{} arrived after a newer query", ticket.id()).into(),
                    );
                }
            });
        });
    }

    pub fn is_loading(&self) -> Signal<bool> {
        let chat = self.chat;
        Signal::derive(move || chat.with(ChatState::is_loading))
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}
