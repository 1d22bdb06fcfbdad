//! Results of processing an incoming message.
//!
//! Processing never edits the message in place. A handled trust message
//! yields a [`TrustReport`] whose body replaces the URI text when the caller
//! stores or displays the message.

use serde::{Deserialize, Serialize};

use att_types::Jid;

/// How the caller should file a processed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Leave the message to the regular chat pipeline.
    Normal,
    /// Informational entry describing an applied trust message.
    TrustInfo,
}

/// What happened to a trust message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEffects {
    /// At least one key was authenticated or scheduled for authentication.
    pub authenticated: bool,
    /// Authentications were cached until the sender's key is verified.
    pub will_authenticate: bool,
    /// Trust in at least one key was revoked.
    pub revoked: bool,
    /// Revocations were cached until the sender's key is verified.
    pub will_revoke: bool,
}

impl TrustEffects {
    pub fn is_empty(&self) -> bool {
        !(self.authenticated || self.will_authenticate || self.revoked || self.will_revoke)
    }
}

/// The informational replacement for a handled trust message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustReport {
    pub keys_owner: Jid,
    pub effects: TrustEffects,
    pub body: String,
}

impl TrustReport {
    pub fn new(keys_owner: Jid, effects: TrustEffects) -> Self {
        let body = info_body(&keys_owner, &effects);
        Self {
            keys_owner,
            effects,
            body,
        }
    }

    /// `false` for a valid, authorized message that changed nothing.
    pub fn had_effect(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Outcome of [`crate::TrustDecisionEngine::process`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Not OMEMO encrypted, or the body is not a non-empty trust message.
    NotATrustMessage,
    /// A valid trust message from a sender that may not make these assertions.
    Unauthorized,
    /// The keys owner named in the message is not on the roster.
    UnknownKeysOwner,
    /// Applied or cached. A report without effect is the "no effect" case.
    Handled(TrustReport),
}

impl ProcessingOutcome {
    pub fn message_kind(&self) -> MessageKind {
        match self {
            Self::Handled(_) => MessageKind::TrustInfo,
            _ => MessageKind::Normal,
        }
    }

    pub fn report(&self) -> Option<&TrustReport> {
        match self {
            Self::Handled(report) => Some(report),
            _ => None,
        }
    }
}

pub const NO_EFFECT_BODY: &str = "This trust message had no effect.";

/// Text shown in place of a handled trust message.
pub fn info_body(keys_owner: &Jid, effects: &TrustEffects) -> String {
    if effects.is_empty() {
        return NO_EFFECT_BODY.to_string();
    }
    let mut sentences = Vec::with_capacity(4);
    if effects.authenticated {
        sentences.push(format!("Authenticated keys of {keys_owner}."));
    }
    if effects.will_authenticate {
        sentences.push(format!(
            "Keys of {keys_owner} will be authenticated once the sender's key is authenticated."
        ));
    }
    if effects.revoked {
        sentences.push(format!("Revoked trust in keys of {keys_owner}."));
    }
    if effects.will_revoke {
        sentences.push(format!(
            "Trust in keys of {keys_owner} will be revoked once the sender's key is authenticated."
        ));
    }
    sentences.join(" ")
}
