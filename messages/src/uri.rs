//! Encoding and decoding of trust message bodies.
//!
//! Format (case-sensitive):
//!
//! ```text
//! xmpp:<bare-jid>?omemo-trust(;auth=<hex-fingerprint>|;revoke=<hex-fingerprint>)+
//! ```
//!
//! The same key may occur in many pairs. The same fingerprint must not occur
//! under both keys; that is a producer contract and is not checked here.

use att_types::{Fingerprint, Jid, TrustMessage};

pub const SCHEME: &str = "xmpp:";

/// URI action marking a trust message.
pub const ACTION_TRUST: &str = "omemo-trust";

/// Key of a pair whose fingerprint is to be authenticated.
pub const KEY_AUTHENTICATE: &str = "auth";

/// Key of a pair whose fingerprint's trust is to be revoked.
pub const KEY_REVOKE: &str = "revoke";

/// Build the body of a trust message about `keys_owner`'s `fingerprints`.
///
/// Every fingerprint becomes an `auth` pair when `trust` is set, otherwise a
/// `revoke` pair.
pub fn encode(keys_owner: &Jid, fingerprints: &[Fingerprint], trust: bool) -> String {
    let key = if trust { KEY_AUTHENTICATE } else { KEY_REVOKE };
    let mut body = format!("{SCHEME}{keys_owner}?{ACTION_TRUST}");
    for fingerprint in fingerprints {
        body.push(';');
        body.push_str(key);
        body.push('=');
        body.push_str(fingerprint.as_str());
    }
    body
}

/// Parse a message body as a trust message.
///
/// Returns `None` for anything that is not a well-formed `omemo-trust` URI
/// carrying at least one `auth` or `revoke` pair. Pairs with other keys are
/// skipped. Order and duplicates are preserved.
pub fn decode(body: &str) -> Option<TrustMessage> {
    let rest = body.trim().strip_prefix(SCHEME)?;
    let (jid, query) = rest.split_once('?')?;
    let keys_owner = Jid::parse(jid).ok()?;

    let mut pairs = query.split(';');
    if pairs.next()? != ACTION_TRUST {
        return None;
    }

    let mut authenticate = Vec::new();
    let mut revoke = Vec::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            KEY_AUTHENTICATE => authenticate.push(Fingerprint::parse(value).ok()?),
            KEY_REVOKE => revoke.push(Fingerprint::parse(value).ok()?),
            _ => {}
        }
    }

    let message = TrustMessage {
        keys_owner,
        authenticate,
        revoke,
    };
    message.is_actionable().then_some(message)
}
