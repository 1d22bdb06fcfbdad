//! Pending trust storage trait.

use std::collections::BTreeMap;

use att_types::{Jid, PendingTrustEntry, VersionedFingerprint};

use crate::StoreError;

/// Fingerprints taken from the store, grouped by their keys owner.
pub type PendingByOwner = BTreeMap<Jid, Vec<VersionedFingerprint>>;

/// Trait for trust decisions deferred until their sender's key is verified.
///
/// Entries are looked up by `(account, sender_fingerprint, trust)`. An entry
/// is identified by all of its fields, so storing it twice is a no-op.
///
/// For a given sender fingerprint `put` and `take_all_for_sender` must not
/// interleave: a take either sees a concurrent put completely or not at all.
pub trait PendingTrustStore: Send + Sync {
    /// Store an entry. Returns `false` if an identical entry already existed.
    fn put(&self, entry: &PendingTrustEntry) -> Result<bool, StoreError>;

    /// Store several entries atomically: either all new ones are stored or,
    /// on error, none. Returns how many were new.
    fn put_all(&self, entries: &[PendingTrustEntry]) -> Result<usize, StoreError>;

    /// Remove and return every entry of `account` matching the sender
    /// fingerprint and trust flag.
    fn take_all_for_sender(
        &self,
        account: &Jid,
        sender_fingerprint: &VersionedFingerprint,
        trust: bool,
    ) -> Result<PendingByOwner, StoreError>;

    /// All entries of an account, without removing them.
    fn entries_for_account(&self, account: &Jid) -> Result<Vec<PendingTrustEntry>, StoreError>;

    /// Total number of entries across all accounts.
    fn pending_count(&self) -> Result<u64, StoreError>;

    /// Drop every entry of an account. Returns how many were removed.
    fn purge_account(&self, account: &Jid) -> Result<usize, StoreError>;
}
