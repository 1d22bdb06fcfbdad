//! Announcement of local trust decisions.
//!
//! After the user authenticates or revokes keys, trust messages go out to the
//! parties that have to learn about it:
//!
//! - keys of the own account: every contact with verified keys learns the
//!   decision, and the own devices learn which contact keys are verified.
//!   Messages to contacts reach the own devices through carbons; only when
//!   none was sent do the own devices get a message of their own.
//! - keys of a contact: the own devices learn the decision, and for an
//!   authentication the contact learns the own verified keys in return.
//!   Revocations are not announced back to the contact.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use att_messages::{OutgoingTrustMessage, Transport};
use att_store::Roster;
use att_types::{Contact, Fingerprint};

/// Delivery counts of one fanout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct FanoutComposer {
    roster: Arc<dyn Roster>,
    transport: Arc<dyn Transport>,
}

impl FanoutComposer {
    pub fn new(roster: Arc<dyn Roster>, transport: Arc<dyn Transport>) -> Self {
        Self { roster, transport }
    }

    pub fn compose_authentication_fanout(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> Vec<OutgoingTrustMessage> {
        self.compose_trust_messages(keys_owner, fingerprints, true)
    }

    pub fn compose_revocation_fanout(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> Vec<OutgoingTrustMessage> {
        self.compose_trust_messages(keys_owner, fingerprints, false)
    }

    /// The trust messages announcing a decision about `fingerprints` of
    /// `keys_owner`, without sending them.
    pub fn compose_trust_messages(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
        trust: bool,
    ) -> Vec<OutgoingTrustMessage> {
        let mut messages = Vec::new();
        if fingerprints.is_empty() {
            return messages;
        }

        let own = self.roster.self_contact(&keys_owner.account);
        if keys_owner.is_self() {
            let mut delivered_via_carbons = false;
            for contact in self.roster.contacts(&keys_owner.account) {
                if contact.is_self() {
                    continue;
                }
                if contact.has_verified_keys() {
                    push_message(&mut messages, &contact, &own, fingerprints.to_vec(), trust);
                    delivered_via_carbons = true;
                }
                if trust && own.has_verified_keys() {
                    let verified = contact.verified_and_active_fingerprints();
                    push_message(&mut messages, &own, &contact, verified, true);
                }
            }
            if !delivered_via_carbons && fingerprints.len() < own.count_verified_fingerprints() {
                push_message(&mut messages, &own, &own, fingerprints.to_vec(), trust);
            }
        } else {
            if own.has_verified_keys() {
                push_message(&mut messages, &own, keys_owner, fingerprints.to_vec(), trust);
            }
            if trust && keys_owner.has_verified_keys() {
                let verified = own.verified_and_active_fingerprints();
                push_message(&mut messages, keys_owner, &own, verified, true);
            }
        }
        messages
    }

    pub fn send_authentication_message(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> FanoutReport {
        self.send_trust_messages(keys_owner, fingerprints, true)
    }

    pub fn send_revocation_message(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
    ) -> FanoutReport {
        self.send_trust_messages(keys_owner, fingerprints, false)
    }

    /// Compose and send. A failed send does not stop the remaining ones.
    pub fn send_trust_messages(
        &self,
        keys_owner: &Contact,
        fingerprints: &[Fingerprint],
        trust: bool,
    ) -> FanoutReport {
        let mut report = FanoutReport::default();
        for message in self.compose_trust_messages(keys_owner, fingerprints, trust) {
            match self.transport.send(&message.recipient, &message.body()) {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    tracing::warn!(
                        account = %message.recipient.account,
                        recipient = %message.recipient.jid,
                        keys_owner = %message.keys_owner,
                        error = %e,
                        "failed to send trust message"
                    );
                    report.failed += 1;
                }
            }
        }
        tracing::debug!(
            account = %keys_owner.account,
            keys_owner = %keys_owner.jid,
            trust,
            sent = report.sent,
            failed = report.failed,
            "trust message fanout"
        );
        report
    }
}

fn push_message(
    messages: &mut Vec<OutgoingTrustMessage>,
    recipient: &Contact,
    keys_owner: &Contact,
    fingerprints: Vec<Fingerprint>,
    trust: bool,
) {
    if fingerprints.is_empty() {
        return;
    }
    messages.push(OutgoingTrustMessage {
        recipient: recipient.clone(),
        keys_owner: keys_owner.jid.clone(),
        fingerprints,
        trust,
    });
}
