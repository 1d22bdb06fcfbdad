//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbPendingTrustStore};

/// Name of the database holding deferred trust decisions.
pub const PENDING_TRUST_DB: &str = "pending_trust";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pending_trust_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(max_dbs);
        // SAFETY: the environment is opened once per path by this process and
        // the memory map is never modified outside of heed transactions.
        let env = unsafe { options.open(path)? };

        let mut wtxn = env.write_txn()?;
        let pending_trust_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(PENDING_TRUST_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, max_dbs, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            pending_trust_db,
        })
    }

    /// Handle to the persistent pending-trust cache.
    pub fn pending_trust_store(&self) -> LmdbPendingTrustStore {
        LmdbPendingTrustStore {
            env: Arc::clone(&self.env),
            pending_trust_db: self.pending_trust_db,
        }
    }
}
