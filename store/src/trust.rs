//! Fingerprint trust store trait.

use att_types::{Contact, Fingerprint, Jid, TrustStatus, VersionedFingerprint};

use crate::StoreError;

/// The OMEMO layer's record of which device keys are trusted.
pub trait FingerprintTrustStore: Send + Sync {
    /// Trust status of a key as seen by `account`.
    fn status(
        &self,
        account: &Jid,
        fingerprint: &VersionedFingerprint,
    ) -> Result<TrustStatus, StoreError>;

    /// Mark keys of `keys_owner` as verified.
    ///
    /// With `schedule_if_unfetched`, keys whose device bundle has not been
    /// fetched yet are remembered and verified once they arrive. Returns
    /// `true` if at least one key was verified or scheduled.
    fn authenticate(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
        schedule_if_unfetched: bool,
    ) -> Result<bool, StoreError>;

    /// Revoke trust in keys of `keys_owner`. Returns `true` if at least one
    /// key was verified before; keys already untrusted do not count.
    fn distrust(&self, keys_owner: &Contact, fingerprints: &[Fingerprint])
        -> Result<bool, StoreError>;
}
