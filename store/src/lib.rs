//! Abstract storage traits for Automatic Trust Transfer.
//!
//! Every backend (LMDB, in-memory for testing) implements these traits. The
//! trust engine depends only on the traits.

pub mod error;
pub mod pending;
pub mod roster;
pub mod trust;

pub use error::StoreError;
pub use pending::{PendingByOwner, PendingTrustStore};
pub use roster::Roster;
pub use trust::FingerprintTrustStore;
