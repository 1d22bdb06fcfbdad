//! Nullable fingerprint trust store: records every trust mutation.

use att_store::{FingerprintTrustStore, StoreError};
use att_types::{Contact, Fingerprint, Jid, TrustStatus, VersionedFingerprint};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A mutation requested from the trust store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrustCall {
    Authenticate {
        keys_owner: Jid,
        fingerprints: Vec<Fingerprint>,
    },
    Distrust {
        keys_owner: Jid,
        fingerprints: Vec<Fingerprint>,
    },
}

/// An in-memory trust store keyed by `(account, versioned fingerprint)`.
///
/// Keys that were never registered with [`NullTrustStore::set_status`] count
/// as not yet fetched: authenticating them with `schedule_if_unfetched`
/// schedules them instead of verifying them.
pub struct NullTrustStore {
    statuses: Mutex<HashMap<(Jid, VersionedFingerprint), TrustStatus>>,
    scheduled: Mutex<HashSet<(Jid, VersionedFingerprint)>>,
    calls: Mutex<Vec<TrustCall>>,
}

impl NullTrustStore {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(HashMap::new()),
            scheduled: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register a fetched key with the given status.
    pub fn set_status(&self, account: &Jid, fingerprint: &Fingerprint, status: TrustStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert((account.clone(), fingerprint.with_version()), status);
    }

    /// Current status of a key (`Unset` if unknown).
    pub fn status_of(&self, account: &Jid, fingerprint: &Fingerprint) -> TrustStatus {
        self.statuses
            .lock()
            .unwrap()
            .get(&(account.clone(), fingerprint.with_version()))
            .copied()
            .unwrap_or_default()
    }

    /// Whether a key will be verified once its bundle is fetched.
    pub fn is_scheduled(&self, account: &Jid, fingerprint: &Fingerprint) -> bool {
        self.scheduled
            .lock()
            .unwrap()
            .contains(&(account.clone(), fingerprint.with_version()))
    }

    /// Every mutation requested so far, in order.
    pub fn calls(&self) -> Vec<TrustCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for NullTrustStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintTrustStore for NullTrustStore {
    fn status(
        &self,
        account: &Jid,
        fingerprint: &VersionedFingerprint,
    ) -> Result<TrustStatus, StoreError> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(&(account.clone(), fingerprint.clone()))
            .copied()
            .unwrap_or_default())
    }

    fn authenticate(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
        schedule_if_unfetched: bool,
    ) -> Result<bool, StoreError> {
        self.calls.lock().unwrap().push(TrustCall::Authenticate {
            keys_owner: keys_owner.jid.clone(),
            fingerprints: fingerprints.to_vec(),
        });

        let mut statuses = self.statuses.lock().unwrap();
        let mut scheduled = self.scheduled.lock().unwrap();
        let mut changed = false;
        for fingerprint in fingerprints {
            let key = (keys_owner.account.clone(), fingerprint.with_version());
            match statuses.get_mut(&key) {
                Some(status) if status.is_verified() => {}
                Some(status) => {
                    *status = TrustStatus::Verified;
                    changed = true;
                }
                None => {
                    if schedule_if_unfetched && scheduled.insert(key) {
                        changed = true;
                    }
                }
            }
        }
        Ok(changed)
    }

    fn distrust(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> Result<bool, StoreError> {
        self.calls.lock().unwrap().push(TrustCall::Distrust {
            keys_owner: keys_owner.jid.clone(),
            fingerprints: fingerprints.to_vec(),
        });

        let mut statuses = self.statuses.lock().unwrap();
        let mut scheduled = self.scheduled.lock().unwrap();
        let mut changed = false;
        for fingerprint in fingerprints {
            let key = (keys_owner.account.clone(), fingerprint.with_version());
            scheduled.remove(&key);
            if let Some(status) = statuses.get_mut(&key) {
                if status.is_verified() {
                    *status = TrustStatus::Unverified;
                    changed = true;
                }
            }
        }
        Ok(changed)
    }
}
