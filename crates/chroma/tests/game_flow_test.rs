//! End-to-end game flow: stage file in, events and streaming stats out.
//!
//! Drives a full session the way external glue would - load, subscribe,
//! start, climb, die, reset, restart - and checks the cross-crate
//! invariants that unit tests cannot see: event ordering across a whole
//! run, entity accounting across restarts, and bounded coordinates over a
//! long climb.

use std::cell::RefCell;
use std::rc::Rc;

use chroma::{GameEvent, GameSession, PickupDescriptor, PickupKind, SessionState, StageFile};
use chroma_core::{GameColor, Rgba, SeededSource};
use chroma_stage::RecordingFactory;

const STAGE: &str = include_str!("../stage.toml");

fn loaded_session() -> (GameSession, RecordingFactory, SeededSource) {
    let setup = StageFile::from_toml(STAGE)
        .expect("demo stage parses")
        .build()
        .expect("demo stage validates");
    let rng = SeededSource::from_seed(setup.seed);
    (GameSession::new(setup), RecordingFactory::new(), rng)
}

#[test]
fn test_full_run_event_sequence() {
    let (mut session, mut factory, mut rng) = loaded_session();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let _ = session
        .events_mut()
        .subscribe(move |event| sink.borrow_mut().push(*event));

    session.start(&mut factory, &mut rng);
    let star = PickupDescriptor {
        kind: PickupKind::Star,
        color_limit: None,
    };
    for tick in 0..600 {
        session.move_player(0.4);
        if tick % 200 == 0 {
            session.collect(&star, &mut rng);
        }
        let _ = session.tick(1.0 / 60.0, &mut factory, &mut rng);
    }

    // Hit a part of a color the player cannot have.
    session.collide_with_part(GameColor::new(999, Rgba::WHITE));
    session.collide_with_part(GameColor::new(999, Rgba::WHITE));
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(session.stars(), 3);

    assert_eq!(
        *log.borrow(),
        vec![
            GameEvent::StarCountChanged(0),
            GameEvent::GameStarted,
            GameEvent::StarCountChanged(1),
            GameEvent::StarCountChanged(2),
            GameEvent::StarCountChanged(3),
            GameEvent::PlayerDied,
            GameEvent::GameOver,
        ]
    );
}

#[test]
fn test_restart_cycle_leaks_no_segments() {
    let (mut session, mut factory, mut rng) = loaded_session();

    for _ in 0..5 {
        session.start(&mut factory, &mut rng);
        for _ in 0..400 {
            session.move_player(0.5);
            let _ = session.tick(1.0 / 60.0, &mut factory, &mut rng);
        }
        assert_eq!(
            factory.live_count(),
            session.streamer().window_len(),
            "factory and window must agree on live segments"
        );
        session.reset(&mut factory);
        assert_eq!(factory.live_count(), 0);
    }
    assert_eq!(factory.spawned_total(), factory.destroyed_total());
}

#[test]
fn test_long_climb_stays_near_origin() {
    let (mut session, mut factory, mut rng) = loaded_session();
    session.start(&mut factory, &mut rng);

    let switch = PickupDescriptor {
        kind: PickupKind::ColorSwitch,
        color_limit: None,
    };
    let mut rebases = 0;
    let mut climbed = 0.0_f32;
    for tick in 0..30_000 {
        session.move_player(0.4);
        climbed += 0.4;
        if tick % 500 == 0 {
            session.collect(&switch, &mut rng);
            assert!(session.player_color().is_valid());
        }
        let report = session.tick(1.0 / 60.0, &mut factory, &mut rng);
        if let Some(shift) = report.rebase_shift {
            rebases += 1;
            assert!(shift > 0.0);
        }

        assert!(
            session.player_y().abs() < 1_000.0,
            "rebasing must keep the player near the origin"
        );
        for segment in session.streamer().segments() {
            assert!(segment.anchor_top.y.abs() < 1_000.0);
        }
    }

    assert!(rebases > 0, "a 12k-unit climb must rebase");
    println!(
        "climbed {climbed:.0} units, {rebases} rebases, {} spawns, window {}",
        factory.spawned_total(),
        session.streamer().window_len()
    );
}
