//! Inbound messages as seen by the trust engine.

use serde::{Deserialize, Serialize};

use att_types::{Encryption, Jid, VersionedFingerprint};

/// A received chat message that may be a trust message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Local account that received the message.
    pub account: Jid,
    /// Bare JID of the author. Equal to `account` for messages from the
    /// account's other devices.
    pub sender: Jid,
    pub encryption: Encryption,
    pub body: String,
    /// Key that encrypted the message. Only OMEMO messages have one.
    pub carrier_fingerprint: Option<VersionedFingerprint>,
}

impl IncomingMessage {
    /// An OMEMO message carried by `carrier_fingerprint`.
    pub fn omemo(
        account: Jid,
        sender: Jid,
        body: impl Into<String>,
        carrier_fingerprint: VersionedFingerprint,
    ) -> Self {
        Self {
            account,
            sender,
            encryption: Encryption::Omemo,
            body: body.into(),
            carrier_fingerprint: Some(carrier_fingerprint),
        }
    }

    pub fn sender_is_self(&self) -> bool {
        self.sender == self.account
    }
}
