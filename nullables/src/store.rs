//! Nullable store: thread-safe in-memory pending-trust cache for testing.

use att_store::{PendingByOwner, PendingTrustStore, StoreError};
use att_types::{Jid, PendingTrustEntry, VersionedFingerprint};
use std::sync::Mutex;

/// An in-memory pending-trust cache.
///
/// A single mutex guards all entries, so every operation is atomic with
/// respect to every other one. Entries keep insertion order.
pub struct NullPendingTrustStore {
    entries: Mutex<Vec<PendingTrustEntry>>,
}

impl NullPendingTrustStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all stored entries.
    pub fn entries(&self) -> Vec<PendingTrustEntry> {
        self.entries.lock().unwrap().clone()
    }

    fn drain_matching(&self, keep: impl Fn(&PendingTrustEntry) -> bool) -> Vec<PendingTrustEntry> {
        let mut entries = self.entries.lock().unwrap();
        let (kept, taken): (Vec<_>, Vec<_>) = entries.drain(..).partition(|e| keep(e));
        *entries = kept;
        taken
    }
}

impl Default for NullPendingTrustStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingTrustStore for NullPendingTrustStore {
    fn put(&self, entry: &PendingTrustEntry) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains(entry) {
            return Ok(false);
        }
        entries.push(entry.clone());
        Ok(true)
    }

    fn put_all(&self, batch: &[PendingTrustEntry]) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let mut inserted = 0;
        for entry in batch {
            if !entries.contains(entry) {
                entries.push(entry.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn take_all_for_sender(
        &self,
        account: &Jid,
        sender_fingerprint: &VersionedFingerprint,
        trust: bool,
    ) -> Result<PendingByOwner, StoreError> {
        let taken = self.drain_matching(|e| {
            !(&e.account == account
                && &e.sender_fingerprint == sender_fingerprint
                && e.trust == trust)
        });
        let mut grouped = PendingByOwner::new();
        for entry in taken {
            grouped
                .entry(entry.keys_owner)
                .or_default()
                .push(entry.fingerprint);
        }
        Ok(grouped)
    }

    fn entries_for_account(&self, account: &Jid) -> Result<Vec<PendingTrustEntry>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.account == account)
            .cloned()
            .collect())
    }

    fn pending_count(&self) -> Result<u64, StoreError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }

    fn purge_account(&self, account: &Jid) -> Result<usize, StoreError> {
        Ok(self.drain_matching(|e| &e.account != account).len())
    }
}
