//! State enums for device keys and messages.

use serde::{Deserialize, Serialize};

/// The trust state of one device key as seen by the local account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustStatus {
    /// The key has never been judged.
    #[default]
    Unset,
    /// The key is known but not authenticated (or its trust was revoked).
    Unverified,
    /// The key has been authenticated, manually or by a trust message.
    Verified,
}

impl TrustStatus {
    /// Whether a key in this state may author trust decisions.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Declared end-to-end encryption of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encryption {
    None,
    Pgp,
    /// OMEMO (Axolotl). Only these messages can carry trust decisions.
    Omemo,
}

impl Encryption {
    pub fn is_omemo(&self) -> bool {
        matches!(self, Self::Omemo)
    }
}
