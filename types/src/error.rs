//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing the fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid JID: {0:?}")]
    InvalidJid(String),

    #[error("invalid fingerprint: {0:?}")]
    InvalidFingerprint(String),
}
