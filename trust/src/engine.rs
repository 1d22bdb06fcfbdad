//! Evaluation of incoming trust messages.
//!
//! A trust message is applied at once when the key that carried it is
//! verified. Otherwise its decisions are cached per sender key and replayed by
//! [`crate::ReplayCoordinator`] once that key is verified.

use std::sync::Arc;

use att_messages::uri;
use att_store::{FingerprintTrustStore, PendingTrustStore, Roster};
use att_types::{Contact, Fingerprint, PendingTrustEntry, TrustMessage, VersionedFingerprint};

use crate::{
    IncomingMessage, ProcessingOutcome, SenderLocks, TrustEffects, TrustError, TrustReport,
};

pub struct TrustDecisionEngine {
    trust_store: Arc<dyn FingerprintTrustStore>,
    pending: Arc<dyn PendingTrustStore>,
    roster: Arc<dyn Roster>,
    locks: SenderLocks,
}

impl TrustDecisionEngine {
    pub fn new(
        trust_store: Arc<dyn FingerprintTrustStore>,
        pending: Arc<dyn PendingTrustStore>,
        roster: Arc<dyn Roster>,
    ) -> Self {
        Self {
            trust_store,
            pending,
            roster,
            locks: SenderLocks::new(),
        }
    }

    /// Locks shared with replay, keyed by `(account, sender fingerprint)`.
    pub fn sender_locks(&self) -> &SenderLocks {
        &self.locks
    }

    /// Evaluate one received message.
    ///
    /// Only OMEMO messages whose body is a trust URI with at least one
    /// fingerprint are considered. The sender may make assertions about its
    /// own keys; the account's other devices may make assertions about any
    /// contact.
    pub fn process(&self, message: &IncomingMessage) -> Result<ProcessingOutcome, TrustError> {
        if !message.encryption.is_omemo() {
            return Ok(ProcessingOutcome::NotATrustMessage);
        }
        let Some(carrier) = &message.carrier_fingerprint else {
            return Ok(ProcessingOutcome::NotATrustMessage);
        };
        let Some(trust_message) = uri::decode(&message.body) else {
            return Ok(ProcessingOutcome::NotATrustMessage);
        };

        let Some(keys_owner) = self
            .roster
            .resolve_contact(&message.account, &trust_message.keys_owner)
        else {
            tracing::debug!(
                account = %message.account,
                keys_owner = %trust_message.keys_owner,
                "trust message about a contact not on the roster"
            );
            return Ok(ProcessingOutcome::UnknownKeysOwner);
        };

        if !message.sender_is_self() && keys_owner.jid != message.sender {
            tracing::warn!(
                account = %message.account,
                sender = %message.sender,
                keys_owner = %keys_owner.jid,
                "ignoring trust message about another contact's keys"
            );
            return Ok(ProcessingOutcome::Unauthorized);
        }

        let effects = self.locks.with_sender(&message.account, carrier, || {
            self.decide(&keys_owner, &trust_message, carrier)
        })?;

        tracing::info!(
            account = %message.account,
            sender = %message.sender,
            carrier = %carrier,
            keys_owner = %keys_owner.jid,
            authenticated = effects.authenticated,
            will_authenticate = effects.will_authenticate,
            revoked = effects.revoked,
            will_revoke = effects.will_revoke,
            "processed trust message"
        );
        Ok(ProcessingOutcome::Handled(TrustReport::new(
            keys_owner.jid,
            effects,
        )))
    }

    /// Apply or cache the decisions of an authorized trust message.
    fn decide(
        &self,
        keys_owner: &Contact,
        message: &TrustMessage,
        carrier: &VersionedFingerprint,
    ) -> Result<TrustEffects, TrustError> {
        let mut effects = TrustEffects::default();
        if self.trust_store.status(&keys_owner.account, carrier)?.is_verified() {
            effects.authenticated = self.authenticate(keys_owner, &message.authenticate)?;
            effects.revoked = self.revoke(keys_owner, &message.revoke)?;
        } else {
            effects.will_authenticate =
                self.cache(keys_owner, &message.authenticate, carrier, true)?;
            effects.will_revoke = self.cache(keys_owner, &message.revoke, carrier, false)?;
        }
        Ok(effects)
    }

    /// Authenticate keys, scheduling those whose bundle is not fetched yet.
    /// Returns whether anything changed.
    pub fn authenticate(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> Result<bool, TrustError> {
        if fingerprints.is_empty() {
            return Ok(false);
        }
        Ok(self.trust_store.authenticate(keys_owner, fingerprints, true)?)
    }

    /// Revoke trust in keys. Returns whether any key was actually revoked.
    pub fn revoke(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> Result<bool, TrustError> {
        if fingerprints.is_empty() {
            return Ok(false);
        }
        Ok(self.trust_store.distrust(keys_owner, fingerprints)?)
    }

    /// Remember decisions until `sender_fingerprint` is verified. Keys that
    /// are already verified are skipped. The remaining entries are stored
    /// together, so a failure leaves none of them behind.
    pub fn cache(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
        sender_fingerprint: &VersionedFingerprint,
        trust: bool,
    ) -> Result<bool, TrustError> {
        let mut entries = Vec::with_capacity(fingerprints.len());
        for fingerprint in fingerprints {
            let versioned = fingerprint.with_version();
            if self
                .trust_store
                .status(&keys_owner.account, &versioned)?
                .is_verified()
            {
                continue;
            }
            entries.push(PendingTrustEntry {
                account: keys_owner.account.clone(),
                keys_owner: keys_owner.jid.clone(),
                fingerprint: versioned,
                sender_fingerprint: sender_fingerprint.clone(),
                trust,
            });
        }
        if entries.is_empty() {
            return Ok(false);
        }
        let cached = self.pending.put_all(&entries)? > 0;
        if cached {
            tracing::debug!(
                account = %keys_owner.account,
                keys_owner = %keys_owner.jid,
                sender = %sender_fingerprint,
                trust,
                "cached trust decisions"
            );
        }
        Ok(cached)
    }
}
