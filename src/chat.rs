//! Chat State
//!
//! The message list and the request lifecycle behind it.
//!
//! A submission appends the user's message and returns a [`Ticket`]; settling
//! that ticket with the transport outcome appends exactly one bot message.
//! Requests may overlap. Each one still gets its reply, but only the most
//! recent submission may replace the displayed result, set the error banner
//! or end the loading state.

use std::fmt::Display;

use crate::result::QueryResult;

/// Reply shown when the backend could not be reached or answered badly
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "An error occurred while processing your query. Please try again.";

/// One chat bubble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }

    /// Bubble heading
    pub fn author(&self) -> &'static str {
        if self.is_user {
            "You"
        } else {
            "Real Estate Bot"
        }
    }
}

/// Handle for one submitted query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResponse,
}

/// How a settled request affected the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The newest request settled; result, error and loading were updated
    Current,
    /// An older request settled after a newer submission; only its reply was appended
    Superseded,
}

/// Chat history plus loading, error and last-result state
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    loading: bool,
    error: Option<String>,
    last_result: Option<QueryResult>,
    issued: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::AwaitingResponse
        } else {
            Phase::Idle
        }
    }

    /// Error banner text
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    /// The result panel is hidden while a request is outstanding
    pub fn visible_result(&self) -> Option<&QueryResult> {
        if self.loading {
            None
        } else {
            self.last_result.as_ref()
        }
    }

    /// Start a query. Blank queries are ignored and return `None`.
    pub fn submit(&mut self, query: &str) -> Option<Ticket> {
        if query.trim().is_empty() {
            return None;
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);

        self.messages.push(ChatMessage::user(query));
        self.loading = true;
        self.error = None;

        tracing::debug!(ticket = ticket.id(), "Query submitted");
        Some(ticket)
    }

    /// Finish a query with the transport outcome
    pub fn settle<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<QueryResult, E>,
    ) -> Settled {
        let current = ticket.0 == self.issued;

        match outcome {
            Ok(QueryResult::Error(error)) => {
                tracing::warn!(ticket = ticket.id(), "Backend reported error: {}", error);
                self.messages.push(ChatMessage::bot(format!("Error: {}", error)));
                if current {
                    self.error = Some(error);
                }
            }
            Ok(result) => {
                tracing::debug!(
                    ticket = ticket.id(),
                    kind = result.kind().as_str(),
                    "Query answered"
                );
                self.messages.push(ChatMessage::bot(result.summary_line()));
                if current {
                    self.last_result = Some(result);
                }
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.id(), "Query failed: {}", e);
                self.messages.push(ChatMessage::bot(TRANSPORT_ERROR_MESSAGE));
                if current {
                    self.error = Some(TRANSPORT_ERROR_MESSAGE.to_string());
                }
            }
        }

        if current {
            self.loading = false;
            Settled::Current
        } else {
            tracing::debug!(ticket = ticket.id(), latest = self.issued, "Superseded query settled");
            Settled::Superseded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn area(name: &str) -> QueryResult {
        QueryResult::from_value(json!({"type": "area_analysis", "area": name})).unwrap()
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let mut chat = ChatState::new();
        assert!(chat.submit("   ").is_none());
        assert!(chat.submit("").is_none());
        assert!(chat.is_empty());
        assert_eq!(chat.phase(), Phase::Idle);
    }

    #[test]
    fn test_submit_then_success() {
        let mut chat = ChatState::new();
        let ticket = chat.submit("Give me analysis of Wakad").unwrap();

        assert_eq!(chat.messages(), &[ChatMessage::user("Give me analysis of Wakad")]);
        assert_eq!(chat.phase(), Phase::AwaitingResponse);
        assert!(chat.visible_result().is_none());

        let settled = chat.settle(ticket, Ok::<_, String>(area("Wakad")));
        assert_eq!(settled, Settled::Current);
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1], ChatMessage::bot("Here's the analysis for Wakad:"));
        assert_eq!(chat.phase(), Phase::Idle);
        assert!(chat.error().is_none());
        assert_eq!(chat.visible_result(), Some(&area("Wakad")));
    }

    #[test]
    fn test_backend_error_result() {
        let mut chat = ChatState::new();
        let ticket = chat.submit("Analyze Atlantis").unwrap();
        chat.settle(ticket, Ok::<_, String>(QueryResult::Error("no data".to_string())));

        let reply = &chat.messages()[1];
        assert!(!reply.is_user);
        assert!(reply.text.contains("no data"));
        assert_eq!(chat.error(), Some("no data"));
        assert!(chat.last_result().is_none());
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_transport_failure() {
        let mut chat = ChatState::new();
        let ticket = chat.submit("Analyze Wakad").unwrap();
        chat.settle(ticket, Err::<QueryResult, _>("connection refused"));

        assert_eq!(chat.messages()[1], ChatMessage::bot(TRANSPORT_ERROR_MESSAGE));
        assert_eq!(chat.error(), Some(TRANSPORT_ERROR_MESSAGE));
        assert_eq!(chat.phase(), Phase::Idle);

        // The next submission clears the banner
        chat.submit("Analyze Wakad").unwrap();
        assert!(chat.error().is_none());
    }

    #[test]
    fn test_error_keeps_previous_result() {
        let mut chat = ChatState::new();
        let first = chat.submit("Analyze Wakad").unwrap();
        chat.settle(first, Ok::<_, String>(area("Wakad")));

        let second = chat.submit("Analyze Atlantis").unwrap();
        chat.settle(second, Ok::<_, String>(QueryResult::Error("Area not found".into())));

        assert_eq!(chat.visible_result(), Some(&area("Wakad")));
    }

    #[test]
    fn test_overlapping_requests() {
        let mut chat = ChatState::new();
        let first = chat.submit("Analyze Wakad").unwrap();
        let second = chat.submit("Analyze Aundh").unwrap();
        assert_eq!(chat.messages().len(), 2);

        // Newest answers first
        assert_eq!(chat.settle(second, Ok::<_, String>(area("Aundh"))), Settled::Current);
        assert!(!chat.is_loading());

        // The stale reply is still shown but does not replace the result
        assert_eq!(chat.settle(first, Ok::<_, String>(area("Wakad"))), Settled::Superseded);
        assert_eq!(chat.messages().len(), 4);
        assert_eq!(chat.messages()[3].text, "Here's the analysis for Wakad:");
        assert_eq!(chat.visible_result(), Some(&area("Aundh")));
    }

    #[test]
    fn test_stale_settle_keeps_loading() {
        let mut chat = ChatState::new();
        let first = chat.submit("Analyze Wakad").unwrap();
        let second = chat.submit("Analyze Aundh").unwrap();

        chat.settle(first, Err::<QueryResult, _>("timeout"));
        assert!(chat.is_loading());
        assert!(chat.error().is_none());

        chat.settle(second, Ok::<_, String>(area("Aundh")));
        assert!(!chat.is_loading());
        assert_eq!(chat.messages().len(), 4);
    }

    #[test]
    fn test_one_reply_per_query() {
        let mut chat = ChatState::new();
        for i in 0..5 {
            let ticket = chat.submit(&format!("query {}", i)).unwrap();
            assert_eq!(chat.messages().len(), i * 2 + 1);
            if i % 2 == 0 {
                chat.settle(ticket, Ok::<_, String>(area("Wakad")));
            } else {
                chat.settle(ticket, Err::<QueryResult, _>("down"));
            }
            assert_eq!(chat.messages().len(), i * 2 + 2);
        }

        let users = chat.messages().iter().filter(|m| m.is_user).count();
        assert_eq!(users, 5);
    }

    #[test]
    fn test_author_labels() {
        assert_eq!(ChatMessage::user("hi").author(), "You");
        assert_eq!(ChatMessage::bot("hi").author(), "Real Estate Bot");
    }
}
