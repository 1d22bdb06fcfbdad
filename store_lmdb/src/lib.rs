//! LMDB storage backend for Automatic Trust Transfer.
//!
//! Implements the storage traits from `att-store` using the `heed` LMDB bindings.
//! Each logical store maps to one LMDB database within a single environment.

pub mod environment;
pub mod error;
pub mod pending_trust;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use pending_trust::LmdbPendingTrustStore;
