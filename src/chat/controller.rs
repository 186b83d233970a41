//! Chat exchange
//!
//! [`ChatSession`] holds the log, loading flag and session, and exposes the
//! two halves of an exchange as plain transitions. [`ChatSurface`] runs the
//! request in between on the tokio runtime and feeds the outcome back.

use crate::backend::{Backend, ChatReply, ChatRequest};
use crate::messages::{Message, MessageLog};
use crate::session::{Session, Ticket};
use crate::utils::CompletionChannel;
use crate::{ParleyError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// A validated message waiting to be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    pub ticket: Ticket,
    pub request: ChatRequest,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: MessageLog,
    loading: bool,
    session: Session,
    max_message_chars: usize,
}

impl ChatSession {
    pub fn new(max_message_chars: usize) -> Self {
        Self {
            messages: MessageLog::new(),
            loading: false,
            session: Session::new(),
            max_message_chars,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.as_slice()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.id()
    }

    pub fn max_message_chars(&self) -> usize {
        self.max_message_chars
    }

    /// Validate `text`, append it as a user message and mark a request in flight
    pub fn begin_send(&mut self, text: &str) -> Result<PendingChat> {
        if self.loading {
            return Err(ParleyError::RequestInFlight);
        }

        let content = text.trim();
        if content.is_empty() {
            return Err(ParleyError::EmptyMessage);
        }
        if content.chars().count() > self.max_message_chars {
            return Err(ParleyError::MessageTooLong {
                max: self.max_message_chars,
            });
        }

        self.messages.push(Message::user(content));
        self.loading = true;

        Ok(PendingChat {
            ticket: self.session.issue(),
            request: ChatRequest {
                message: content.to_string(),
                session_id: self.session.wire_id().to_string(),
            },
        })
    }

    /// Apply the outcome of a dispatched request.
    ///
    /// Returns `false` when the request predates the last reset and was dropped.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<ChatReply>) -> bool {
        if !self.session.is_current(ticket) {
            debug!("Discarding chat reply issued before reset");
            return false;
        }

        match outcome {
            Ok(reply) => {
                self.session.adopt(reply.session_id.clone());
                self.messages.push(Message::assistant(reply.text()));
            }
            Err(e) => {
                warn!("Chat request failed: {} (retryable: {})", e, e.is_recoverable());
                self.messages.push(Message::assistant(format!(
                    "Sorry, I encountered an error: {}. Please try again.",
                    e
                )));
            }
        }

        self.loading = false;
        true
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.loading = false;
        self.session.reset();
    }
}

/// Chat session wired to a backend
pub struct ChatSurface {
    session: ChatSession,
    backend: Arc<dyn Backend>,
    runtime: Handle,
    completions: CompletionChannel<Result<ChatReply>>,
}

impl ChatSurface {
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle, max_message_chars: usize) -> Self {
        Self {
            session: ChatSession::new(max_message_chars),
            backend,
            runtime,
            completions: CompletionChannel::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id()
    }

    /// Append `text` and dispatch it; the reply lands on a later poll
    pub fn send(&mut self, text: &str) -> Result<()> {
        let pending = self.session.begin_send(text)?;
        info!("Sending chat message ({} chars)", pending.request.message.chars().count());

        let backend = Arc::clone(&self.backend);
        let tx = self.completions.sender();
        self.runtime.spawn(async move {
            let outcome = backend.chat(pending.request).await;
            let _ = tx.send(pending.ticket, outcome);
        });

        Ok(())
    }

    /// Apply every completion that has arrived; returns how many were applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some((ticket, outcome)) = self.completions.try_recv() {
            if self.session.complete(ticket, outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until one completion arrives; `false` on timeout or if it was stale
    pub fn wait_for_completion(&mut self, timeout: Duration) -> bool {
        match self.completions.recv_timeout(timeout) {
            Some((ticket, outcome)) => self.session.complete(ticket, outcome),
            None => false,
        }
    }

    /// Clear log, loading flag and session; an in-flight reply is dropped on arrival
    pub fn reset(&mut self) {
        info!("Chat reset");
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Role, NO_RESPONSE_PLACEHOLDER};

    fn reply(message: &str, session_id: Option<&str>) -> ChatReply {
        ChatReply {
            message: Some(message.to_string()),
            response: None,
            session_id: session_id.map(str::to_string),
        }
    }

    #[test]
    fn test_begin_send_appends_user_message_and_sets_loading() {
        let mut chat = ChatSession::new(4000);
        let pending = chat.begin_send("  Show top 5 lead sources  ").unwrap();

        assert_eq!(pending.request.message, "Show top 5 lead sources");
        assert_eq!(pending.request.session_id, "");
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::User);
        assert!(chat.is_loading());
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        let mut chat = ChatSession::new(4000);
        assert_eq!(chat.begin_send(""), Err(ParleyError::EmptyMessage));
        assert_eq!(chat.begin_send(" \n\t "), Err(ParleyError::EmptyMessage));
        assert!(chat.messages().is_empty());
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_length_boundary() {
        let mut chat = ChatSession::new(4000);
        let too_long = "a".repeat(4001);
        assert_eq!(
            chat.begin_send(&too_long),
            Err(ParleyError::MessageTooLong { max: 4000 })
        );
        assert!(chat.messages().is_empty());

        let exact = "a".repeat(4000);
        assert!(chat.begin_send(&exact).is_ok());
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut chat = ChatSession::new(3);
        assert!(chat.begin_send("äöü").is_ok());
    }

    #[test]
    fn test_second_send_while_loading_rejected() {
        let mut chat = ChatSession::new(4000);
        chat.begin_send("first").unwrap();
        assert_eq!(chat.begin_send("second"), Err(ParleyError::RequestInFlight));
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_complete_success_stores_session_and_reply() {
        let mut chat = ChatSession::new(4000);
        let pending = chat.begin_send("Show top 5 leads by score this week").unwrap();

        assert!(chat.complete(pending.ticket, Ok(reply("Here are the top 5...", Some("abc123")))));

        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].role, Role::Assistant);
        assert_eq!(chat.messages()[1].content, "Here are the top 5...");
        assert_eq!(chat.session_id(), Some("abc123"));
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_session_id_echoed_on_following_requests() {
        let mut chat = ChatSession::new(4000);
        let first = chat.begin_send("one").unwrap();
        chat.complete(first.ticket, Ok(reply("ok", Some("abc123"))));

        let second = chat.begin_send("two").unwrap();
        assert_eq!(second.request.session_id, "abc123");
        chat.complete(second.ticket, Ok(reply("ok", None)));

        let third = chat.begin_send("three").unwrap();
        assert_eq!(third.request.session_id, "abc123");
    }

    #[test]
    fn test_complete_failure_appends_error_text() {
        let mut chat = ChatSession::new(4000);
        let first = chat.begin_send("one").unwrap();
        chat.complete(first.ticket, Ok(reply("ok", Some("abc123"))));

        let second = chat.begin_send("two").unwrap();
        chat.complete(
            second.ticket,
            Err(ParleyError::HttpError("connection refused".to_string())),
        );

        let last = chat.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(
            last.content,
            "Sorry, I encountered an error: connection refused. Please try again."
        );
        assert_eq!(chat.session_id(), Some("abc123"));
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_reply_without_text_uses_placeholder() {
        let mut chat = ChatSession::new(4000);
        let pending = chat.begin_send("hi").unwrap();
        chat.complete(pending.ticket, Ok(ChatReply::default()));
        assert_eq!(chat.messages()[1].content, NO_RESPONSE_PLACEHOLDER);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut chat = ChatSession::new(4000);
        let pending = chat.begin_send("one").unwrap();
        chat.complete(pending.ticket, Ok(reply("ok", Some("abc123"))));
        chat.begin_send("two").unwrap();

        chat.reset();

        assert!(chat.messages().is_empty());
        assert!(!chat.is_loading());
        assert_eq!(chat.session_id(), None);
    }

    #[test]
    fn test_late_reply_after_reset_is_discarded() {
        let mut chat = ChatSession::new(4000);
        let pending = chat.begin_send("one").unwrap();
        chat.reset();

        assert!(!chat.complete(pending.ticket, Ok(reply("late", Some("zzz")))));
        assert!(chat.messages().is_empty());
        assert_eq!(chat.session_id(), None);
    }
}
