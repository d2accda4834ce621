use std::collections::BTreeSet;

use super::*;

fn timing() -> ShuffleTiming {
    ShuffleTiming {
        scatter_hold_secs: 0.5,
        tick_secs: 0.2,
        shuffle_secs: 1.0,
        close_settle_secs: 0.3,
        bowl_radius: 100.0,
        seed: 7,
    }
}

fn run_shuffle(bowl: &mut BowlController) -> NoteId {
    assert!(bowl.shuffle());
    for _ in 0..200 {
        for ev in bowl.tick(0.05) {
            if let BowlEvent::Selected(id) = ev {
                return id;
            }
        }
    }
    panic!("shuffle never selected a note");
}

#[test]
fn shuffle_walks_through_its_phases() {
    let mut bowl = BowlController::new(5, timing()).unwrap();
    assert!(bowl.shuffle());
    assert_eq!(bowl.phase(), BowlPhase::Scattering);
    assert!(bowl.is_busy());

    assert_eq!(bowl.tick(0.5), vec![BowlEvent::ShuffleStarted]);
    assert_eq!(bowl.phase(), BowlPhase::Shuffling);

    let events = bowl.tick(1.0);
    let [BowlEvent::Selected(id)] = events.as_slice() else {
        panic!("expected a selection, got {events:?}");
    };
    assert_eq!(bowl.phase(), BowlPhase::Selected(*id));
    assert!(!bowl.is_busy());
    assert!(bowl.timers.is_empty());
    let lifted: Vec<_> = bowl.placements().iter().filter(|p| p.lifted).collect();
    assert_eq!(lifted.len(), 1);
    assert_eq!(lifted[0].id, *id);
}

#[test]
fn every_note_is_seen_once_per_cycle() {
    let mut bowl = BowlController::new(10, timing()).unwrap();
    let mut seen = BTreeSet::new();
    for _ in 0..10 {
        assert!(seen.insert(run_shuffle(&mut bowl)));
    }
    assert_eq!(seen.len(), 10);
    assert!(bowl.unseen_note_ids().is_empty());
    assert_eq!(bowl.cycles_completed(), 0);

    let eleventh = run_shuffle(&mut bowl);
    assert!(seen.contains(&eleventh));
    assert_eq!(bowl.cycles_completed(), 1);
    assert_eq!(bowl.unseen_note_ids().len(), 9);
    assert!(!bowl.unseen_note_ids().contains(&eleventh));
}

#[test]
fn unseen_pool_only_shrinks_within_a_cycle() {
    let mut bowl = BowlController::new(4, timing()).unwrap();
    let mut last = bowl.unseen_note_ids().len();
    for _ in 0..4 {
        run_shuffle(&mut bowl);
        let now = bowl.unseen_note_ids().len();
        assert_eq!(now + 1, last);
        last = now;
    }
}

#[test]
fn restarting_a_shuffle_cancels_the_old_timers() {
    let mut bowl = BowlController::new(6, timing()).unwrap();
    assert!(bowl.shuffle());
    let old = bowl.cycle.handles.clone();
    bowl.tick(0.4);

    assert!(bowl.shuffle());
    assert!(old.iter().all(|h| !bowl.timers.is_pending(*h)));

    // The old scatter would have ended at 0.5; the new one ends at 0.9.
    assert!(bowl.tick(0.2).is_empty());
    assert_eq!(bowl.phase(), BowlPhase::Scattering);
    assert_eq!(bowl.tick(0.3), vec![BowlEvent::ShuffleStarted]);
}

#[test]
fn teardown_silences_pending_timers() {
    let mut bowl = BowlController::new(3, timing()).unwrap();
    bowl.shuffle();
    bowl.tick(0.6);
    assert_eq!(bowl.phase(), BowlPhase::Shuffling);
    bowl.teardown();
    assert!(bowl.tick(5.0).is_empty());
    assert_eq!(bowl.phase(), BowlPhase::Idle);
    assert_eq!(bowl.unseen_note_ids().len(), 3);
}

#[test]
fn open_close_returns_to_idle_after_settle() {
    let mut bowl = BowlController::new(3, timing()).unwrap();
    let id = run_shuffle(&mut bowl);
    assert!(!bowl.tap(NoteId(id.0 + 1)));
    assert!(bowl.tap(id));
    assert_eq!(bowl.phase(), BowlPhase::Opening(Some(id)));
    assert!(!bowl.shuffle());

    bowl.paper_opened();
    assert_eq!(bowl.phase(), BowlPhase::Open(Some(id)));
    assert!(!bowl.is_busy());

    assert!(bowl.request_close());
    bowl.paper_closed();
    assert_eq!(bowl.phase(), BowlPhase::Settling);
    assert!(bowl.tick(0.2).is_empty());
    assert_eq!(bowl.tick(0.15), vec![BowlEvent::Settled]);
    assert_eq!(bowl.phase(), BowlPhase::Idle);
    assert!(bowl.placements().iter().all(|p| !p.lifted));
}

#[test]
fn reopen_while_settling_drops_the_settle_timer() {
    let mut bowl = BowlController::new(2, timing()).unwrap();
    assert!(bowl.begin_open(None));
    bowl.paper_closed();
    assert!(bowl.begin_open(None));
    assert!(bowl.tick(1.0).is_empty());
    assert_eq!(bowl.phase(), BowlPhase::Opening(None));
}

#[test]
fn empty_bowl_never_shuffles() {
    let mut bowl = BowlController::new(0, timing()).unwrap();
    assert!(!bowl.shuffle());
    assert!(bowl.placements().is_empty());
}

#[test]
fn invalid_timing_is_rejected() {
    let t = ShuffleTiming {
        tick_secs: 0.0,
        ..timing()
    };
    assert!(BowlController::new(3, t).is_err());
}
