//! Tests for the waiting queue and username registry.

use strictly_go::{
    Matchmaker, Participant, ParticipantId, SessionEvent, Stone, UsernameError, UsernameRegistry,
};
use tokio::sync::mpsc;

fn participant(id: u64, name: &str) -> (Participant, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Participant::new(ParticipantId(id), name, tx), rx)
}

#[test]
fn test_pairs_in_arrival_order() {
    let matchmaker = Matchmaker::with_board_size(9);
    let (alice, _a) = participant(1, "alice");
    let (bob, _b) = participant(2, "bob");
    let (carol, _c) = participant(3, "carol");

    assert!(matchmaker.enqueue(alice));
    assert!(matchmaker.try_pair().is_none());
    assert!(matchmaker.enqueue(bob));
    assert!(matchmaker.enqueue(carol));

    let session = matchmaker.try_pair().unwrap();
    assert_eq!(session.participant(Stone::Black).username(), "alice");
    assert_eq!(session.participant(Stone::White).username(), "bob");
    assert_eq!(matchmaker.len(), 1);
    assert!(matchmaker.is_queued(ParticipantId(3)));
    assert_eq!(matchmaker.matches_made(), 1);
}

#[test]
fn test_session_ids_are_unique() {
    let matchmaker = Matchmaker::new();
    let mut receivers = Vec::new();
    for id in 1..=4 {
        let (p, rx) = participant(id, &format!("player{}", id));
        receivers.push(rx);
        matchmaker.enqueue(p);
    }
    let first = matchmaker.try_pair().unwrap();
    let second = matchmaker.try_pair().unwrap();
    assert_ne!(first.id(), second.id());
    assert!(matchmaker.is_empty());
}

#[test]
fn test_enqueue_twice_is_rejected() {
    let matchmaker = Matchmaker::new();
    let (alice, _rx) = participant(1, "alice");
    assert!(matchmaker.enqueue(alice.clone()));
    assert!(!matchmaker.enqueue(alice));
    assert_eq!(matchmaker.len(), 1);
}

#[test]
fn test_dequeue_is_idempotent() {
    let matchmaker = Matchmaker::new();
    let (alice, _rx) = participant(1, "alice");
    matchmaker.enqueue(alice);
    assert!(matchmaker.dequeue(ParticipantId(1)));
    assert!(!matchmaker.dequeue(ParticipantId(1)));
    assert!(!matchmaker.dequeue(ParticipantId(99)));
    assert!(matchmaker.is_empty());
}

#[test]
fn test_disconnected_participants_are_skipped() {
    let matchmaker = Matchmaker::new();
    let (alice, alice_rx) = participant(1, "alice");
    let (bob, _b) = participant(2, "bob");
    let (carol, _c) = participant(3, "carol");

    matchmaker.enqueue(alice);
    drop(alice_rx);
    matchmaker.enqueue(bob);
    matchmaker.enqueue(carol);

    let session = matchmaker.try_pair().unwrap();
    assert_eq!(session.participant(Stone::Black).username(), "bob");
    assert_eq!(session.participant(Stone::White).username(), "carol");
}

#[test]
fn test_clones_share_the_queue() {
    let matchmaker = Matchmaker::new();
    let other = matchmaker.clone();
    let (alice, _rx) = participant(1, "alice");
    matchmaker.enqueue(alice);
    assert!(other.is_queued(ParticipantId(1)));
}

#[test]
fn test_registry_claims_unique_names() {
    let registry = UsernameRegistry::new();
    assert_eq!(registry.claim("alice"), Ok(()));
    assert_eq!(
        registry.claim("alice"),
        Err(UsernameError::Taken("alice".to_string()))
    );
    assert!(registry.contains("alice"));

    registry.release("alice");
    assert!(!registry.contains("alice"));
    assert_eq!(registry.claim("alice"), Ok(()));
}

#[test]
fn test_registry_rejects_bad_names() {
    let registry = UsernameRegistry::new();
    assert_eq!(registry.claim(""), Err(UsernameError::Empty));
    assert_eq!(registry.claim("   "), Err(UsernameError::Empty));
    assert_eq!(registry.claim("a~b"), Err(UsernameError::ContainsSeparator));
    assert!(!registry.contains("a~b"));
}
