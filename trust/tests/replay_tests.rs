use std::sync::Arc;

use att_messages::uri;
use att_nullables::{NullPendingTrustStore, NullRoster, NullTrustStore};
use att_store::PendingTrustStore;
use att_store_lmdb::LmdbEnvironment;
use att_trust::{IncomingMessage, ReplayCoordinator, TrustDecisionEngine};
use att_types::{Contact, Device, Fingerprint, Jid, PendingTrustEntry, TrustStatus};

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

fn roster() -> Arc<NullRoster> {
    Arc::new(NullRoster::with_contacts([Contact::new(
        me(),
        alice(),
        vec![
            Device::new(fp('a'), TrustStatus::Unverified),
            Device::new(fp('b'), TrustStatus::Verified),
            Device::new(fp('c'), TrustStatus::Unverified),
        ],
    )]))
}

struct Harness {
    trust: Arc<NullTrustStore>,
    pending: Arc<dyn PendingTrustStore>,
    engine: Arc<TrustDecisionEngine>,
    replay: ReplayCoordinator,
}

fn harness_with(pending: Arc<dyn PendingTrustStore>) -> Harness {
    let trust = Arc::new(NullTrustStore::new());
    let roster = roster();
    trust.set_status(&me(), &fp('a'), TrustStatus::Unverified);
    trust.set_status(&me(), &fp('b'), TrustStatus::Verified);
    trust.set_status(&me(), &fp('c'), TrustStatus::Unverified);

    let engine = Arc::new(TrustDecisionEngine::new(
        trust.clone(),
        pending.clone(),
        roster.clone(),
    ));
    let replay = ReplayCoordinator::new(engine.clone(), pending.clone(), roster);
    Harness {
        trust,
        pending,
        engine,
        replay,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(NullPendingTrustStore::new()))
}

fn statuses(trust: &NullTrustStore) -> Vec<TrustStatus> {
    ['a', 'b', 'c']
        .into_iter()
        .map(|c| trust.status_of(&me(), &fp(c)))
        .collect()
}

fn message_from_alice(body: String) -> IncomingMessage {
    IncomingMessage::omemo(me(), alice(), body, fp('c').with_version())
}

fn mixed_body() -> String {
    format!(
        "xmpp:alice@example.org?omemo-trust;auth={};revoke={}",
        "a".repeat(64),
        "d".repeat(64)
    )
}

#[test]
fn replay_matches_immediate_processing() {
    // Alice's carrier key `c` is verified right away.
    let direct = harness();
    direct.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);
    direct.engine.process(&message_from_alice(mixed_body())).unwrap();

    // Same message first cached, then replayed once `c` is verified.
    let deferred = harness();
    let outcome = deferred
        .engine
        .process(&message_from_alice(mixed_body()))
        .unwrap();
    let effects = outcome.report().unwrap().effects;
    assert!(effects.will_authenticate && effects.will_revoke);
    assert_eq!(deferred.pending.pending_count().unwrap(), 2);

    deferred.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);
    let summary = deferred
        .replay
        .on_sender_key_verified(&me(), &fp('c').with_version())
        .unwrap();

    assert_eq!(summary.authenticated_owners, vec![alice()]);
    assert_eq!(statuses(&deferred.trust), statuses(&direct.trust));
    assert_eq!(deferred.pending.pending_count().unwrap(), 0);
}

#[test]
fn revocation_of_verified_key_is_not_cached() {
    let h = harness();
    let outcome = h
        .engine
        .process(&message_from_alice(uri::encode(&alice(), &[fp('b')], false)))
        .unwrap();

    assert!(!outcome.report().unwrap().had_effect());
    assert_eq!(h.pending.pending_count().unwrap(), 0);
    assert_eq!(h.trust.status_of(&me(), &fp('b')), TrustStatus::Verified);
}

#[test]
fn second_replay_is_empty() {
    let h = harness();
    h.engine
        .process(&message_from_alice(uri::encode(&alice(), &[fp('a')], true)))
        .unwrap();

    let sender = fp('c').with_version();
    assert!(!h.replay.on_sender_key_verified(&me(), &sender).unwrap().is_empty());
    assert!(h.replay.on_sender_key_verified(&me(), &sender).unwrap().is_empty());
}

#[test]
fn authentications_replay_before_revocations() {
    let h = harness();
    let sender = fp('f').with_version();
    for trust in [false, true] {
        h.pending
            .put(&PendingTrustEntry {
                account: me(),
                keys_owner: alice(),
                fingerprint: fp('a').with_version(),
                sender_fingerprint: sender.clone(),
                trust,
            })
            .unwrap();
    }

    let summary = h.replay.on_sender_key_verified(&me(), &sender).unwrap();

    assert_eq!(summary.authenticated_owners, vec![alice()]);
    assert_eq!(summary.revoked_owners, vec![alice()]);
    assert_eq!(h.trust.status_of(&me(), &fp('a')), TrustStatus::Unverified);
}

#[test]
fn unresolvable_entries_are_dropped() {
    let h = harness();
    let sender = fp('f').with_version();
    let entries = [
        (alice(), fp('9')),
        (jid("gone@example.org"), fp('a')),
        (alice(), fp('a')),
    ];
    for (owner, fingerprint) in entries {
        h.pending
            .put(&PendingTrustEntry {
                account: me(),
                keys_owner: owner,
                fingerprint: fingerprint.with_version(),
                sender_fingerprint: sender.clone(),
                trust: true,
            })
            .unwrap();
    }

    let summary = h.replay.on_sender_key_verified(&me(), &sender).unwrap();

    assert_eq!(summary.dropped_fingerprints, 2);
    assert_eq!(summary.authenticated_owners, vec![alice()]);
    assert_eq!(h.trust.status_of(&me(), &fp('a')), TrustStatus::Verified);
    assert!(!h.trust.is_scheduled(&me(), &fp('9')));
    assert_eq!(h.pending.pending_count().unwrap(), 0);
}

#[test]
fn replay_from_lmdb_after_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    {
        let env = LmdbEnvironment::open(dir.path(), 4, 1 << 20).unwrap();
        let h = harness_with(Arc::new(env.pending_trust_store()));
        h.engine
            .process(&message_from_alice(uri::encode(&alice(), &[fp('a')], true)))
            .unwrap();
        assert_eq!(h.pending.pending_count().unwrap(), 1);
    }

    let env = LmdbEnvironment::open(dir.path(), 4, 1 << 20).unwrap();
    let h = harness_with(Arc::new(env.pending_trust_store()));
    let summary = h
        .replay
        .on_sender_key_verified(&me(), &fp('c').with_version())
        .unwrap();

    assert_eq!(summary.authenticated_owners, vec![alice()]);
    assert_eq!(h.trust.status_of(&me(), &fp('a')), TrustStatus::Verified);
    assert_eq!(h.pending.pending_count().unwrap(), 0);
}

/// Engine and replay over an LMDB cache, with `contact` as the only roster entry.
fn lmdb_harness(dir: &std::path::Path, contact: Contact) -> Harness {
    let env = LmdbEnvironment::open(dir, 4, 1 << 20).unwrap();
    let trust = Arc::new(NullTrustStore::new());
    let pending: Arc<dyn PendingTrustStore> = Arc::new(env.pending_trust_store());
    let roster = Arc::new(NullRoster::with_contacts([contact]));
    let engine = Arc::new(TrustDecisionEngine::new(
        trust.clone(),
        pending.clone(),
        roster.clone(),
    ));
    let replay = ReplayCoordinator::new(engine.clone(), pending.clone(), roster);
    Harness {
        trust,
        pending,
        engine,
        replay,
    }
}

#[test]
fn long_jids_are_cached_and_replayed() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let long = jid(&format!("{}@{}", "l".repeat(300), "d".repeat(150)));
    let h = lmdb_harness(
        dir.path(),
        Contact::new(
            me(),
            long.clone(),
            vec![
                Device::new(fp('a'), TrustStatus::Unverified),
                Device::new(fp('c'), TrustStatus::Unverified),
            ],
        ),
    );

    let message = IncomingMessage::omemo(
        me(),
        long.clone(),
        uri::encode(&long, &[fp('a')], true),
        fp('c').with_version(),
    );
    let outcome = h.engine.process(&message).unwrap();
    assert!(outcome.report().unwrap().effects.will_authenticate);
    assert_eq!(h.pending.pending_count().unwrap(), 1);

    h.trust.set_status(&me(), &fp('c'), TrustStatus::Verified);
    let summary = h
        .replay
        .on_sender_key_verified(&me(), &fp('c').with_version())
        .unwrap();

    assert_eq!(summary.authenticated_owners, vec![long]);
    assert_eq!(h.trust.status_of(&me(), &fp('a')), TrustStatus::Verified);
}

#[test]
fn failed_cache_leaves_nothing_behind() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    // Each entry of this contact takes more than half of the map.
    let huge = jid(&format!("{}@example.org", "h".repeat(600 * 1024)));
    let h = lmdb_harness(
        dir.path(),
        Contact::new(
            me(),
            huge.clone(),
            vec![Device::new(fp('c'), TrustStatus::Unverified)],
        ),
    );

    let message = IncomingMessage::omemo(
        me(),
        huge.clone(),
        uri::encode(&huge, &[fp('a'), fp('b')], true),
        fp('c').with_version(),
    );

    assert!(h.engine.process(&message).is_err());
    assert_eq!(h.pending.pending_count().unwrap(), 0);
}
