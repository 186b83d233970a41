//! Session continuity shared by the chat and voice surfaces
//!
//! The backend hands out an opaque session identifier on its first reply; the
//! client echoes it on every later request until the surface is reset.
//! Each reset also advances an epoch so that replies to requests issued
//! before the reset can be recognised and dropped.

use tracing::debug;

/// Marks a request with the session epoch it was issued in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn epoch(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    id: Option<String>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session identifier, if the backend has issued one
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Identifier as sent on the wire: empty when absent
    pub fn wire_id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Store an identifier supplied by the backend.
    ///
    /// Absent or empty identifiers leave the current one untouched.
    pub fn adopt(&mut self, id: Option<String>) {
        match id {
            Some(id) if !id.is_empty() => {
                if self.id.as_deref() != Some(id.as_str()) {
                    debug!("Session id set to {}", id);
                }
                self.id = Some(id);
            }
            _ => {}
        }
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.epoch)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.epoch
    }

    pub fn reset(&mut self) {
        self.id = None;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
