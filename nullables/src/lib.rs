//! Nullable infrastructure for deterministic testing.
//!
//! All collaborators of the trust engine (fingerprint trust store, roster,
//! transport, pending-trust cache) are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Keep all state in memory and never touch the filesystem or network
//! - Can be configured programmatically
//! - Record every mutation for assertions
//!
//! Usage: swap real implementations for nullables in tests.

pub mod roster;
pub mod store;
pub mod transport;
pub mod trust;

pub use roster::NullRoster;
pub use store::NullPendingTrustStore;
pub use transport::{NullTransport, SentMessage};
pub use trust::{NullTrustStore, TrustCall};
