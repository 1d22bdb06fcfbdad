//! Replay of cached trust decisions once their sender key is verified.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use att_store::{PendingByOwner, PendingTrustStore, Roster};
use att_types::{Fingerprint, Jid, VersionedFingerprint};

use crate::{TrustDecisionEngine, TrustError};

/// What a replay applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Owners whose keys changed through a replayed authentication.
    pub authenticated_owners: Vec<Jid>,
    /// Owners whose keys changed through a replayed revocation.
    pub revoked_owners: Vec<Jid>,
    /// Cached fingerprints that no longer resolve to a known device or owner.
    pub dropped_fingerprints: usize,
}

impl ReplaySummary {
    pub fn is_empty(&self) -> bool {
        self.authenticated_owners.is_empty()
            && self.revoked_owners.is_empty()
            && self.dropped_fingerprints == 0
    }
}

pub struct ReplayCoordinator {
    engine: Arc<TrustDecisionEngine>,
    pending: Arc<dyn PendingTrustStore>,
    roster: Arc<dyn Roster>,
}

impl ReplayCoordinator {
    pub fn new(
        engine: Arc<TrustDecisionEngine>,
        pending: Arc<dyn PendingTrustStore>,
        roster: Arc<dyn Roster>,
    ) -> Self {
        Self {
            engine,
            pending,
            roster,
        }
    }

    /// Apply and consume everything cached for `sender_fingerprint`.
    ///
    /// Authentications are replayed before revocations. Holds the same
    /// sender lock as [`TrustDecisionEngine::process`].
    pub fn on_sender_key_verified(
        &self,
        account: &Jid,
        sender_fingerprint: &VersionedFingerprint,
    ) -> Result<ReplaySummary, TrustError> {
        let locks = self.engine.sender_locks();
        let summary = locks.with_sender(account, sender_fingerprint, || -> Result<_, TrustError> {
            let mut summary = ReplaySummary::default();
            for trust in [true, false] {
                let pending = self
                    .pending
                    .take_all_for_sender(account, sender_fingerprint, trust)?;
                self.apply(account, pending, trust, &mut summary)?;
            }
            Ok(summary)
        })?;

        if !summary.is_empty() {
            tracing::info!(
                %account,
                sender = %sender_fingerprint,
                authenticated = summary.authenticated_owners.len(),
                revoked = summary.revoked_owners.len(),
                dropped = summary.dropped_fingerprints,
                "replayed cached trust decisions"
            );
        }
        Ok(summary)
    }

    fn apply(
        &self,
        account: &Jid,
        pending: PendingByOwner,
        trust: bool,
        summary: &mut ReplaySummary,
    ) -> Result<(), TrustError> {
        for (owner, fingerprints) in pending {
            let Some(contact) = self.roster.resolve_contact(account, &owner) else {
                tracing::warn!(
                    %account,
                    keys_owner = %owner,
                    count = fingerprints.len(),
                    "dropping cached trust decisions for a contact no longer on the roster"
                );
                summary.dropped_fingerprints += fingerprints.len();
                continue;
            };

            let resolved: Vec<Fingerprint> = fingerprints
                .iter()
                .filter_map(|fp| contact.resolve_fingerprint(fp.without_version().as_str()))
                .collect();
            summary.dropped_fingerprints += fingerprints.len() - resolved.len();

            let changed = if trust {
                self.engine.authenticate(&contact, &resolved)?
            } else {
                self.engine.revoke(&contact, &resolved)?
            };
            if changed {
                if trust {
                    summary.authenticated_owners.push(owner);
                } else {
                    summary.revoked_owners.push(owner);
                }
            }
        }
        Ok(())
    }
}
