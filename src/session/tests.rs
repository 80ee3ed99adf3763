use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::episode::sample_episode;

fn episodes(n: usize) -> Vec<Episode> {
    (0..n).map(|i| sample_episode(&format!("ep-{i}"))).collect()
}

fn seeded_session() -> PlaybackSession {
    PlaybackSession::with_rng(StdRng::seed_from_u64(7))
}

fn session_at(n: usize, index: usize) -> PlaybackSession {
    let mut session = seeded_session();
    session
        .play_from_queue(episodes(n), index)
        .expect("queue should be accepted");
    session
}

#[test]
fn new_session_starts_empty_and_stopped() {
    let session = seeded_session();
    assert!(session.queue().is_empty());
    assert_eq!(session.current_index(), None);
    assert!(session.current_episode().is_none());
    assert!(!session.is_playing());
    assert!(!session.is_looping());
    assert!(!session.is_shuffling());
}

#[test]
fn play_single_replaces_queue_with_one_episode() {
    let mut session = session_at(5, 3);
    session.toggle_play();
    assert!(!session.is_playing());

    session.play_single(sample_episode("direct"));

    assert_eq!(session.queue().len(), 1);
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(
        session.current_episode().map(|ep| ep.id.as_str()),
        Some("direct")
    );
    assert!(session.is_playing());
}

#[test]
fn play_from_queue_sets_index_and_starts_playing_for_every_position() {
    for n in 1..=6 {
        for i in 0..n {
            let session = session_at(n, i);
            assert_eq!(session.current_index(), Some(i));
            assert!(session.is_playing());
            assert_eq!(session.queue().len(), n);
        }
    }
}

#[test]
fn play_from_empty_queue_fails_and_keeps_state() {
    let mut session = session_at(3, 1);
    session.toggle_loop();

    let err = session
        .play_from_queue(Vec::new(), 0)
        .expect_err("empty queue must be rejected");

    assert_eq!(err, SessionError::InvalidQueue);
    assert_eq!(session.queue().len(), 3);
    assert_eq!(session.current_index(), Some(1));
    assert!(session.is_playing());
    assert!(session.is_looping());
}

#[test]
fn play_from_queue_with_out_of_range_index_fails_and_keeps_state() {
    let mut session = seeded_session();

    let err = session
        .play_from_queue(episodes(1), 5)
        .expect_err("index past the end must be rejected");

    assert_eq!(err, SessionError::IndexOutOfRange { index: 5, len: 1 });
    assert!(session.queue().is_empty());
    assert_eq!(session.current_index(), None);
    assert!(!session.is_playing());
}

#[test]
fn session_errors_describe_the_violation() {
    assert_eq!(
        SessionError::IndexOutOfRange { index: 5, len: 1 }.to_string(),
        "queue index 5 is out of range for 1 episode(s)"
    );
    assert_eq!(
        SessionError::InvalidQueue.to_string(),
        "cannot play from an empty episode queue"
    );
}

#[test]
fn toggles_applied_twice_restore_original_values() {
    let mut session = session_at(2, 0);

    session.toggle_loop();
    assert!(session.is_looping());
    session.toggle_loop();
    assert!(!session.is_looping());

    session.toggle_shuffle();
    assert!(session.is_shuffling());
    session.toggle_shuffle();
    assert!(!session.is_shuffling());

    session.toggle_play();
    assert!(!session.is_playing());
    session.toggle_play();
    assert!(session.is_playing());
}

#[test]
fn toggle_play_on_empty_queue_is_a_no_op() {
    let mut session = seeded_session();
    session.toggle_play();
    assert!(!session.is_playing());
    session.toggle_play();
    assert!(!session.is_playing());
}

#[test]
fn loop_and_shuffle_toggle_without_a_queue() {
    let mut session = seeded_session();
    session.toggle_loop();
    session.toggle_shuffle();
    assert!(session.is_looping());
    assert!(session.is_shuffling());
}

#[test]
fn advance_forward_wraps_from_newest_to_oldest() {
    let mut session = session_at(3, 0);
    session.advance_forward();
    assert_eq!(session.current_index(), Some(2));
    session.advance_forward();
    assert_eq!(session.current_index(), Some(1));
}

#[test]
fn advance_backward_wraps_from_oldest_to_newest() {
    let mut session = session_at(3, 2);
    session.advance_backward();
    assert_eq!(session.current_index(), Some(0));
    session.advance_backward();
    assert_eq!(session.current_index(), Some(1));
}

#[test]
fn forward_then_backward_restores_index() {
    for n in 1..=8 {
        for i in 0..n {
            let mut session = session_at(n, i);
            session.advance_forward();
            session.advance_backward();
            assert_eq!(session.current_index(), Some(i), "n={n} i={i}");
        }
    }
}

#[test]
fn backward_then_forward_restores_index() {
    for n in 1..=8 {
        for i in 0..n {
            let mut session = session_at(n, i);
            session.advance_backward();
            session.advance_forward();
            assert_eq!(session.current_index(), Some(i), "n={n} i={i}");
        }
    }
}

#[test]
fn single_episode_queue_stays_on_its_only_entry() {
    let mut session = session_at(1, 0);
    session.advance_forward();
    assert_eq!(session.current_index(), Some(0));
    session.advance_backward();
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn shuffle_forward_stays_in_bounds() {
    let mut session = seeded_session();
    session.toggle_shuffle();
    for n in [1_usize, 2, 3, 7, 20] {
        session
            .play_from_queue(episodes(n), 0)
            .expect("queue should be accepted");
        for _ in 0..1000 {
            session.advance_forward();
            let idx = session.current_index().expect("index present");
            assert!(idx < n, "index {idx} escaped queue of {n}");
        }
    }
}

#[test]
fn shuffle_forward_reaches_every_index() {
    let mut session = session_at(4, 0);
    session.toggle_shuffle();
    let mut seen = [false; 4];
    for _ in 0..1000 {
        session.advance_forward();
        seen[session.current_index().expect("index present")] = true;
    }
    assert!(seen.iter().all(|hit| *hit), "seen: {seen:?}");
}

#[test]
fn shuffle_does_not_affect_backward() {
    let mut session = session_at(3, 1);
    session.toggle_shuffle();
    session.advance_backward();
    assert_eq!(session.current_index(), Some(2));
    session.advance_backward();
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn advancing_an_empty_queue_does_nothing() {
    let mut session = seeded_session();
    session.advance_forward();
    session.advance_backward();
    session.toggle_shuffle();
    session.advance_forward();
    assert_eq!(session.current_index(), None);
}

#[test]
fn newest_first_queue_walks_backward_through_older_episodes() {
    let queue = vec![
        sample_episode("e0"),
        sample_episode("e1"),
        sample_episode("e2"),
    ];
    let mut session = seeded_session();
    session
        .play_from_queue(queue, 0)
        .expect("queue should be accepted");
    let current = |s: &PlaybackSession| s.current_episode().map(|ep| ep.id.clone());

    assert_eq!(current(&session).as_deref(), Some("e0"));
    assert!(session.is_playing());
    session.advance_backward();
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(current(&session).as_deref(), Some("e1"));
    session.advance_backward();
    assert_eq!(session.current_index(), Some(2));
    assert_eq!(current(&session).as_deref(), Some("e2"));
    session.advance_backward();
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(current(&session).as_deref(), Some("e0"));
}

#[test]
fn listeners_observe_every_successful_mutation() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut session = seeded_session();
    let sink = Rc::clone(&seen);
    session.subscribe(move |session, change| {
        sink.borrow_mut()
            .push((change, session.current_index(), session.is_playing()));
    });

    session.play_single(sample_episode("solo"));
    session.toggle_play();
    session.toggle_loop();
    session.toggle_shuffle();
    session.advance_backward();

    assert_eq!(
        *seen.borrow(),
        vec![
            (SessionChange::QueueReplaced, Some(0), true),
            (SessionChange::PlayToggled, Some(0), false),
            (SessionChange::LoopToggled, Some(0), false),
            (SessionChange::ShuffleToggled, Some(0), false),
            (SessionChange::Advanced, Some(0), false),
        ]
    );
}

#[test]
fn failed_and_ignored_operations_do_not_notify() {
    let count = Rc::new(RefCell::new(0_usize));
    let mut session = seeded_session();
    let counter = Rc::clone(&count);
    session.subscribe(move |_, _| *counter.borrow_mut() += 1);

    let _ = session.play_from_queue(Vec::new(), 0);
    let _ = session.play_from_queue(episodes(2), 2);
    session.toggle_play();
    session.advance_forward();
    session.advance_backward();

    assert_eq!(*count.borrow(), 0);
}

#[test]
fn listeners_see_state_after_the_change() {
    let last_index = Rc::new(RefCell::new(None));
    let mut session = session_at(3, 0);
    let sink = Rc::clone(&last_index);
    session.subscribe(move |session, _| *sink.borrow_mut() = session.current_index());

    session.advance_forward();

    assert_eq!(*last_index.borrow(), Some(2));
}
