//! LMDB implementation of PendingTrustStore.
//!
//! Every key has the same fixed length, well below LMDB's key size limit:
//!
//! ```text
//! blake2b(account) ‖ sender_fingerprint ‖ trust ‖ blake2b(keys_owner) ‖ fingerprint
//!       32                  66               1           32                 66
//! ```
//!
//! JIDs are unbounded, so only their 256-bit digests go into the key. The
//! value holds the full bincode-encoded entry. Taking all entries of a sender
//! is a prefix range-scan over the first three parts, and listing an account is
//! a scan over its digest. Every mutation runs in a single write transaction;
//! LMDB serializes writers, so a take never observes half of a concurrent put.

use std::ops::Bound;
use std::sync::Arc;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use heed::types::Bytes;
use heed::{Database, Env, RoTxn, RwTxn};

use att_store::{PendingByOwner, PendingTrustStore, StoreError};
use att_types::{Jid, PendingTrustEntry, VersionedFingerprint};

use crate::LmdbError;

type Blake2b256 = Blake2b<U32>;

pub struct LmdbPendingTrustStore {
    pub(crate) env: Arc<Env>,
    pub(crate) pending_trust_db: Database<Bytes, Bytes>,
}

fn jid_digest(jid: &Jid) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(jid.as_str().as_bytes());
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

fn trust_byte(trust: bool) -> u8 {
    if trust {
        b'1'
    } else {
        b'0'
    }
}

fn account_prefix(account: &Jid) -> Vec<u8> {
    jid_digest(account).to_vec()
}

/// Build the prefix `blake2b(account) ‖ sender ‖ trust`.
fn sender_prefix(account: &Jid, sender: &VersionedFingerprint, trust: bool) -> Vec<u8> {
    let mut key = account_prefix(account);
    key.extend_from_slice(sender.as_str().as_bytes());
    key.push(trust_byte(trust));
    key
}

fn entry_key(entry: &PendingTrustEntry) -> Vec<u8> {
    let mut key = sender_prefix(&entry.account, &entry.sender_fingerprint, entry.trust);
    key.extend_from_slice(&jid_digest(&entry.keys_owner));
    key.extend_from_slice(entry.fingerprint.as_str().as_bytes());
    key
}

/// Turn a prefix into the smallest key greater than every key it prefixes.
/// An all-`0xFF` prefix has no such key and becomes empty.
fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.pop() {
        if last < u8::MAX {
            prefix.push(last + 1);
            return;
        }
    }
}

/// Prefix range-scan: collect all `(key, entry)` pairs whose key starts with `prefix`.
fn scan_prefix(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn<'_>,
    prefix: &[u8],
) -> Result<Vec<(Vec<u8>, PendingTrustEntry)>, LmdbError> {
    let mut upper = prefix.to_vec();
    increment_prefix(&mut upper);
    let end = if upper.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(upper.as_slice())
    };
    let bounds = (Bound::Included(prefix), end);
    let mut results = Vec::new();
    for result in db.range(txn, &bounds)? {
        let (key, val) = result?;
        let entry: PendingTrustEntry = bincode::deserialize(val)?;
        results.push((key.to_vec(), entry));
    }
    Ok(results)
}

impl LmdbPendingTrustStore {
    /// Insert one entry unless an identical one exists.
    fn insert(&self, wtxn: &mut RwTxn<'_>, entry: &PendingTrustEntry) -> Result<bool, LmdbError> {
        let key = entry_key(entry);
        if self.pending_trust_db.get(wtxn, &key)?.is_some() {
            return Ok(false);
        }
        let bytes = bincode::serialize(entry)?;
        self.pending_trust_db.put(wtxn, &key, &bytes)?;
        Ok(true)
    }

    /// Insert a batch in one transaction. Nothing is written if any insert fails.
    fn insert_batch(&self, entries: &[PendingTrustEntry]) -> Result<usize, LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        let mut inserted = 0;
        for entry in entries {
            if self.insert(&mut wtxn, entry)? {
                inserted += 1;
            }
        }
        wtxn.commit()?;
        Ok(inserted)
    }

    /// Delete every entry of `account` under `prefix` in one transaction and
    /// return them. Entries of other accounts sharing the digest are kept.
    fn take_prefix(&self, account: &Jid, prefix: &[u8]) -> Result<Vec<PendingTrustEntry>, LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        let matched: Vec<_> = scan_prefix(&self.pending_trust_db, &wtxn, prefix)?
            .into_iter()
            .filter(|(_, entry)| &entry.account == account)
            .collect();
        for (key, _) in &matched {
            self.pending_trust_db.delete(&mut wtxn, key)?;
        }
        wtxn.commit()?;
        Ok(matched.into_iter().map(|(_, entry)| entry).collect())
    }
}

impl PendingTrustStore for LmdbPendingTrustStore {
    fn put(&self, entry: &PendingTrustEntry) -> Result<bool, StoreError> {
        Ok(self.insert_batch(std::slice::from_ref(entry))? == 1)
    }

    fn put_all(&self, entries: &[PendingTrustEntry]) -> Result<usize, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }
        Ok(self.insert_batch(entries)?)
    }

    fn take_all_for_sender(
        &self,
        account: &Jid,
        sender_fingerprint: &VersionedFingerprint,
        trust: bool,
    ) -> Result<PendingByOwner, StoreError> {
        let prefix = sender_prefix(account, sender_fingerprint, trust);
        let taken = self.take_prefix(account, &prefix)?;
        if !taken.is_empty() {
            tracing::debug!(
                %account,
                sender = %sender_fingerprint,
                trust,
                count = taken.len(),
                "took pending trust entries"
            );
        }
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
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let entries = scan_prefix(&self.pending_trust_db, &rtxn, &account_prefix(account))?;
        Ok(entries
            .into_iter()
            .map(|(_, entry)| entry)
            .filter(|entry| &entry.account == account)
            .collect())
    }

    fn pending_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.pending_trust_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn purge_account(&self, account: &Jid) -> Result<usize, StoreError> {
        let removed = self.take_prefix(account, &account_prefix(account))?.len();
        tracing::info!(%account, removed, "purged pending trust entries");
        Ok(removed)
    }
}
