//! Parsed trust messages.

use serde::{Deserialize, Serialize};

use crate::{Fingerprint, Jid};

/// A decoded trust message: which keys of `keys_owner` to authenticate and
/// which to revoke.
///
/// Duplicates are kept as sent. A message is only actionable if at least one
/// of the two lists is non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustMessage {
    pub keys_owner: Jid,
    pub authenticate: Vec<Fingerprint>,
    pub revoke: Vec<Fingerprint>,
}

impl TrustMessage {
    /// A message that carries `fingerprints` under one key only.
    pub fn new(keys_owner: Jid, fingerprints: Vec<Fingerprint>, trust: bool) -> Self {
        if trust {
            Self {
                keys_owner,
                authenticate: fingerprints,
                revoke: Vec::new(),
            }
        } else {
            Self {
                keys_owner,
                authenticate: Vec::new(),
                revoke: fingerprints,
            }
        }
    }

    pub fn is_actionable(&self) -> bool {
        !self.authenticate.is_empty() || !self.revoke.is_empty()
    }

    /// The fingerprints carried under `auth` (`trust = true`) or `revoke`.
    pub fn fingerprints(&self, trust: bool) -> &[Fingerprint] {
        if trust {
            &self.authenticate
        } else {
            &self.revoke
        }
    }
}
