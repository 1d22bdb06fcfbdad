//! Fundamental types for Automatic Trust Transfer.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! JIDs, device fingerprints, trust state, contacts, trust messages and the
//! pending-trust entries that are cached until a sender's own key is authenticated.

pub mod contact;
pub mod error;
pub mod fingerprint;
pub mod jid;
pub mod message;
pub mod pending;
pub mod state;

pub use contact::{Contact, Device};
pub use error::TypesError;
pub use fingerprint::{Fingerprint, VersionedFingerprint};
pub use jid::Jid;
pub use message::TrustMessage;
pub use pending::PendingTrustEntry;
pub use state::{Encryption, TrustStatus};
