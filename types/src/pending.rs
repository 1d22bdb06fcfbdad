//! Trust decisions cached until their sender's key is authenticated.

use serde::{Deserialize, Serialize};

use crate::{Jid, VersionedFingerprint};

/// One deferred trust decision.
///
/// Written when a trust message arrives over a key that is not yet verified
/// and consumed exactly once when `sender_fingerprint` becomes verified.
/// Equality over all fields is the identity of an entry; storing an equal
/// entry twice has no effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingTrustEntry {
    /// Local account that received the trust message.
    pub account: Jid,
    /// Owner of the key the decision is about.
    pub keys_owner: Jid,
    pub fingerprint: VersionedFingerprint,
    /// Carrier key of the trust message.
    pub sender_fingerprint: VersionedFingerprint,
    /// `true` to authenticate, `false` to revoke.
    pub trust: bool,
}
