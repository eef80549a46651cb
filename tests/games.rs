//! End-to-end runs through the public API: sessions, timers and the journey

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use heart_arcade::audio::{Cue, FeedbackSink, LogBackend, Sfx};
use heart_arcade::session::{CatchSession, MazeSession};
use heart_arcade::sim::catch::{CatchStatus, FallingKind, FallingObject};
use heart_arcade::sim::maze::{MoveOutcome, shortest_route};
use heart_arcade::{Journey, Settings, Stage};

#[derive(Default)]
struct Cues(Vec<Cue>);

impl FeedbackSink for Cues {
    fn cue(&mut self, cue: Cue, _now_ms: f64) {
        self.0.push(cue);
    }
}

fn journey_at_game() -> Rc<RefCell<Journey>> {
    let journey = Rc::new(RefCell::new(Journey::new()));
    while journey.borrow().stage() != Stage::Game {
        journey.borrow_mut().advance();
    }
    journey
}

fn drop_on_catcher(session: &mut CatchSession<Cues>, kind: FallingKind) {
    let state = session.state_mut();
    let id = state.next_entity_id();
    let x = state.catcher.x / state.field_width * 100.0;
    state.objects.push(FallingObject {
        id,
        pos: Vec2::new(x, 84.0),
        kind,
        speed: 1.0,
        size: 24.0,
        opacity: 1.0,
    });
}

#[test]
fn catching_every_heart_moves_the_journey_on() {
    let mut settings = Settings::default();
    settings.catch.target_score = 3;
    let journey = journey_at_game();
    let handle = journey.clone();
    let mut session = CatchSession::new(&settings, 7, Cues::default())
        .on_won(move || {
            handle.borrow_mut().advance();
        });

    for _ in 0..3 {
        drop_on_catcher(&mut session, FallingKind::Beneficial);
        session.update(16.0);
    }

    assert_eq!(session.state().status, CatchStatus::Won);
    assert_eq!(session.state().score, 3);
    assert_eq!(journey.borrow().stage(), Stage::Gallery);
    assert_eq!(session.sink().0, vec![Cue::Pop, Cue::Pop, Cue::Success]);
}

#[test]
fn losing_leaves_the_journey_alone_until_a_restart_wins() {
    let mut settings = Settings::default();
    settings.catch.target_score = 1;
    settings.catch.lives = 2;
    let journey = journey_at_game();
    let handle = journey.clone();
    let mut session = CatchSession::new(&settings, 7, Cues::default())
        .on_won(move || {
            handle.borrow_mut().advance();
        });

    drop_on_catcher(&mut session, FallingKind::Hazardous);
    session.update(16.0);
    assert_eq!(session.state().lives, 1);
    drop_on_catcher(&mut session, FallingKind::Hazardous);
    session.update(16.0);
    assert_eq!(session.state().status, CatchStatus::Lost);
    assert_eq!(journey.borrow().stage(), Stage::Game);

    session.restart();
    assert_eq!(session.state().lives, 2);
    assert_eq!(session.state().score, 0);
    assert!(session.state().objects.is_empty());

    drop_on_catcher(&mut session, FallingKind::Beneficial);
    session.update(16.0);
    assert_eq!(session.state().status, CatchStatus::Won);
    assert_eq!(journey.borrow().stage(), Stage::Gallery);
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut session = CatchSession::new(&Settings::default(), seed, Cues::default());
        session.set_autopilot(true);
        for _ in 0..600 {
            session.update(16.0);
        }
        serde_json::to_string(session.state()).unwrap()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn pointer_drags_the_catcher_within_the_margins() {
    let mut session = CatchSession::new(&Settings::default(), 1, Cues::default());
    session.resize(400.0);
    session.pointer_moved(5.0);
    for _ in 0..120 {
        session.update(16.0);
    }
    let catcher = &session.state().catcher;
    assert_eq!(catcher.target_x, 40.0);
    assert!((catcher.x - 40.0).abs() < 1.0);
}

#[test]
fn maze_walk_dodging_the_patrol_reaches_the_goal() {
    let wins = Rc::new(RefCell::new(0));
    let counter = wins.clone();
    let sfx = Sfx::new(LogBackend::new(), &Settings::default().sfx);
    let mut session = MazeSession::new(&Settings::default(), sfx)
        .on_won(move || *counter.borrow_mut() += 1);

    let mut outcome = MoveOutcome::Ignored;
    for _ in 0..2_000 {
        session.update(150.0);
        let state = session.state();
        let route = shortest_route(&state.grid, state.player, state.grid.goal())
            .expect("goal reachable");
        let dir = route[0];
        if state.player + dir.delta() == state.patrol_cell() {
            continue;
        }
        outcome = session.press(dir);
        assert_ne!(outcome, MoveOutcome::Caught);
        if outcome == MoveOutcome::Reached {
            break;
        }
    }

    assert_eq!(outcome, MoveOutcome::Reached);
    assert!(session.state().won);
    assert_eq!(*wins.borrow(), 1);
    assert_eq!(session.press_key("w"), Some(MoveOutcome::Ignored));
}

#[test]
fn maze_state_serializes_for_the_host() {
    let session = MazeSession::new(&Settings::default(), Cues::default());
    let json = serde_json::to_value(session.state().view()).unwrap();
    assert_eq!(json["player"], serde_json::json!([1, 1]));
    assert_eq!(json["won"], false);
}

#[test]
fn settings_round_trip_through_json() {
    let mut settings = Settings::default();
    settings.catch.target_score = 5;
    settings.seed = Some(9);
    let restored = Settings::from_json(&settings.to_json().unwrap()).unwrap();
    assert_eq!(restored.catch.target_score, 5);
    assert_eq!(restored.seed, Some(9));
}
