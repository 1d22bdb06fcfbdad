use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use att_types::{Jid, VersionedFingerprint};

type SenderKey = (Jid, VersionedFingerprint);

/// Per-sender-fingerprint lock.
/// Work for different sender keys runs concurrently.
/// Work for the same sender key (caching its decisions, replaying them) is serialized.
pub struct SenderLocks {
    locks: Mutex<HashMap<SenderKey, Arc<Mutex<()>>>>,
}

impl SenderLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the lock for a sender key.
    fn sender_lock(&self, account: &Jid, sender: &VersionedFingerprint) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry((account.clone(), sender.clone()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the lock of `(account, sender)`.
    pub fn with_sender<R>(
        &self,
        account: &Jid,
        sender: &VersionedFingerprint,
        f: impl FnOnce() -> R,
    ) -> R {
        let lock = self.sender_lock(account, sender);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);
        self.cleanup();
        result
    }

    /// Number of sender keys with a lock entry.
    pub fn active_senders(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Remove locks nobody holds.
    pub fn cleanup(&self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

impl Default for SenderLocks {
    fn default() -> Self {
        Self::new()
    }
}
