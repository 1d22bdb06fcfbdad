//! Outgoing trust messages and the transport that delivers them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use att_types::{Contact, Fingerprint, Jid};

use crate::uri;

/// A trust message composed for one recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingTrustMessage {
    pub recipient: Contact,
    /// Owner of the keys listed in the body.
    pub keys_owner: Jid,
    pub fingerprints: Vec<Fingerprint>,
    pub trust: bool,
}

impl OutgoingTrustMessage {
    /// The wire body of this message.
    pub fn body(&self) -> String {
        uri::encode(&self.keys_owner, &self.fingerprints, self.trust)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("recipient {0} is unreachable")]
    Unreachable(String),
}

/// Delivers message bodies to a contact, OMEMO-encrypted for the contact's
/// trusted devices. Delivery retries are the transport's business.
pub trait Transport: Send + Sync {
    fn send(&self, recipient: &Contact, body: &str) -> Result<(), TransportError>;
}
