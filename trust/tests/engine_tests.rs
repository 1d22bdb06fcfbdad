use std::sync::Arc;

use att_messages::uri;
use att_nullables::{NullPendingTrustStore, NullRoster, NullTrustStore, TrustCall};
use att_store::PendingTrustStore;
use att_trust::{IncomingMessage, MessageKind, ProcessingOutcome, TrustDecisionEngine};
use att_types::{Contact, Device, Encryption, Fingerprint, Jid, TrustStatus, VersionedFingerprint};

fn jid(s: &str) -> Jid {
    Jid::parse(s).unwrap()
}

fn fp(c: char) -> Fingerprint {
    Fingerprint::parse(&c.to_string().repeat(64)).unwrap()
}

fn me() -> Jid {
    jid("me@example.org")
}

fn alice() -> Jid {
    jid("alice@example.org")
}

fn bob() -> Jid {
    jid("bob@example.org")
}

struct Harness {
    trust: Arc<NullTrustStore>,
    pending: Arc<NullPendingTrustStore>,
    engine: TrustDecisionEngine,
}

fn harness() -> Harness {
    let trust = Arc::new(NullTrustStore::new());
    let pending = Arc::new(NullPendingTrustStore::new());
    let roster = Arc::new(NullRoster::with_contacts([
        Contact::new(
            me(),
            alice(),
            vec![
                Device::new(fp('a'), TrustStatus::Unverified),
                Device::new(fp('c'), TrustStatus::Verified),
            ],
        ),
        Contact::new(me(), bob(), vec![Device::new(fp('b'), TrustStatus::Unverified)]),
    ]));
    let engine = TrustDecisionEngine::new(trust.clone(), pending.clone(), roster);
    Harness {
        trust,
        pending,
        engine,
    }
}

/// Alice's carrier key, versioned.
fn carrier() -> VersionedFingerprint {
    fp('c').with_version()
}

fn from_alice(body: String) -> IncomingMessage {
    IncomingMessage::omemo(me(), alice(), body, carrier())
}

#[test]
fn verified_sender_authenticates_immediately() {
    let h = harness();
    h.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);
    h.trust.set_status(&me(), &fp('a'), TrustStatus::Unverified);

    let outcome = h
        .engine
        .process(&from_alice(uri::encode(&alice(), &[fp('a')], true)))
        .unwrap();

    assert_eq!(
        h.trust.calls(),
        vec![TrustCall::Authenticate {
            keys_owner: alice(),
            fingerprints: vec![fp('a')],
        }]
    );
    assert_eq!(outcome.message_kind(), MessageKind::TrustInfo);
    let report = outcome.report().unwrap();
    assert!(report.effects.authenticated);
    assert_eq!(report.body, "Authenticated keys of alice@example.org.");
    assert_eq!(h.trust.status_of(&me(), &fp('a')), TrustStatus::Verified);
    assert_eq!(h.pending.pending_count().unwrap(), 0);
}

#[test]
fn unverified_sender_is_cached() {
    let h = harness();
    h.trust.set_status(&me(), &fp('c'), TrustStatus::Unverified);

    let outcome = h
        .engine
        .process(&from_alice(uri::encode(&alice(), &[fp('a')], true)))
        .unwrap();

    assert!(h.trust.calls().is_empty());
    let entries = h.pending.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].account, me());
    assert_eq!(entries[0].keys_owner, alice());
    assert_eq!(entries[0].fingerprint, fp('a').with_version());
    assert_eq!(entries[0].sender_fingerprint, carrier());
    assert!(entries[0].trust);

    let report = outcome.report().unwrap();
    assert!(report.effects.will_authenticate);
    assert_eq!(
        report.body,
        "Keys of alice@example.org will be authenticated once the sender's key is authenticated."
    );

    // Another sender key sees nothing.
    let other = h
        .pending
        .take_all_for_sender(&me(), &fp('d').with_version(), true)
        .unwrap();
    assert!(other.is_empty());
}

#[test]
fn unverified_sender_caches_revocations_too() {
    let h = harness();
    let body = "xmpp:alice@example.org?omemo-trust;auth=".to_string()
        + &"a".repeat(64)
        + ";revoke="
        + &"e".repeat(64);

    let outcome = h.engine.process(&from_alice(body)).unwrap();
    let effects = outcome.report().unwrap().effects;
    assert!(effects.will_authenticate);
    assert!(effects.will_revoke);
    assert!(!effects.authenticated && !effects.revoked);
    assert_eq!(h.pending.pending_count().unwrap(), 2);
}

#[test]
fn contact_cannot_speak_for_others() {
    let h = harness();
    h.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);
    h.trust.set_status(&me(), &fp('b'), TrustStatus::Unverified);

    let outcome = h
        .engine
        .process(&from_alice(uri::encode(&bob(), &[fp('b')], true)))
        .unwrap();

    assert_eq!(outcome, ProcessingOutcome::Unauthorized);
    assert_eq!(outcome.message_kind(), MessageKind::Normal);
    assert!(h.trust.calls().is_empty());
    assert_eq!(h.pending.pending_count().unwrap(), 0);
    assert_eq!(h.trust.status_of(&me(), &fp('b')), TrustStatus::Unverified);
}

#[test]
fn own_devices_may_speak_for_anyone() {
    let h = harness();
    h.trust.set_status(&me(), &fp('d'), TrustStatus::Verified);
    h.trust.set_status(&me(), &fp('b'), TrustStatus::Unverified);

    let message = IncomingMessage::omemo(
        me(),
        me(),
        uri::encode(&bob(), &[fp('b')], true),
        fp('d').with_version(),
    );
    let outcome = h.engine.process(&message).unwrap();

    assert!(outcome.report().unwrap().had_effect());
    assert_eq!(h.trust.status_of(&me(), &fp('b')), TrustStatus::Verified);
}

#[test]
fn unknown_keys_owner() {
    let h = harness();
    let message = IncomingMessage::omemo(
        me(),
        jid("carol@example.org"),
        uri::encode(&jid("carol@example.org"), &[fp('a')], true),
        carrier(),
    );
    assert_eq!(
        h.engine.process(&message).unwrap(),
        ProcessingOutcome::UnknownKeysOwner
    );
    assert!(h.trust.calls().is_empty());
}

#[test]
fn only_omemo_trust_messages_are_considered() {
    let h = harness();

    let mut plain = from_alice(uri::encode(&alice(), &[fp('a')], true));
    plain.encryption = Encryption::None;
    plain.carrier_fingerprint = None;
    assert_eq!(
        h.engine.process(&plain).unwrap(),
        ProcessingOutcome::NotATrustMessage
    );

    let chat = from_alice("hello there".to_string());
    assert_eq!(
        h.engine.process(&chat).unwrap(),
        ProcessingOutcome::NotATrustMessage
    );

    let empty = from_alice("xmpp:alice@example.org?omemo-trust".to_string());
    assert_eq!(
        h.engine.process(&empty).unwrap(),
        ProcessingOutcome::NotATrustMessage
    );
    assert!(h.trust.calls().is_empty());
}

#[test]
fn already_verified_keys_have_no_effect() {
    let h = harness();
    h.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);
    h.trust.set_status(&me(), &fp('a'), TrustStatus::Verified);

    let outcome = h
        .engine
        .process(&from_alice(uri::encode(&alice(), &[fp('a')], true)))
        .unwrap();

    let report = outcome.report().unwrap();
    assert!(!report.had_effect());
    assert_eq!(report.body, "This trust message had no effect.");
    assert_eq!(outcome.message_kind(), MessageKind::TrustInfo);
}

#[test]
fn authenticate_is_idempotent() {
    let h = harness();
    h.trust.set_status(&me(), &fp('a'), TrustStatus::Unverified);
    let alice = Contact::new(me(), alice(), vec![]);

    assert!(h.engine.authenticate(&alice, &[fp('a')]).unwrap());
    assert!(!h.engine.authenticate(&alice, &[fp('a')]).unwrap());
    assert_eq!(h.trust.status_of(&me(), &fp('a')), TrustStatus::Verified);
}

#[test]
fn unfetched_keys_are_scheduled() {
    let h = harness();
    h.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);

    let outcome = h
        .engine
        .process(&from_alice(uri::encode(&alice(), &[fp('9')], true)))
        .unwrap();

    assert!(outcome.report().unwrap().effects.authenticated);
    assert!(h.trust.is_scheduled(&me(), &fp('9')));
}
