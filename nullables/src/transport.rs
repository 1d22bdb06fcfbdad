//! Nullable transport: record messages without sending them.

use att_messages::{Transport, TransportError};
use att_types::{Contact, Jid};
use std::collections::HashSet;
use std::sync::Mutex;

/// A message "sent" through the nullable transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: Jid,
    pub body: String,
}

/// A test transport that records messages instead of sending them.
pub struct NullTransport {
    sent_messages: Mutex<Vec<SentMessage>>,
    unreachable: Mutex<HashSet<Jid>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self {
            sent_messages: Mutex::new(Vec::new()),
            unreachable: Mutex::new(HashSet::new()),
        }
    }

    /// Make every send to `recipient` fail.
    pub fn fail_for(&self, recipient: &Jid) {
        self.unreachable.lock().unwrap().insert(recipient.clone());
    }

    /// Get all sent messages (for assertions).
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent_messages.lock().unwrap().clone()
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for NullTransport {
    fn send(&self, recipient: &Contact, body: &str) -> Result<(), TransportError> {
        if self.unreachable.lock().unwrap().contains(&recipient.jid) {
            return Err(TransportError::Unreachable(recipient.jid.to_string()));
        }
        self.sent_messages.lock().unwrap().push(SentMessage {
            recipient: recipient.jid.clone(),
            body: body.to_string(),
        });
        Ok(())
    }
}
