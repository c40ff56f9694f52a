//! End-to-end scenarios on the built-in table.

use glam::Vec2;

use pinball_core::Tuning;
use pinball_core::audio::{AudioDirector, SoundEffect};
use pinball_core::consts::FRAME_DT;
use pinball_core::settings::Settings;
use pinball_core::sim::{GameEvent, GamePhase, Pinball, TickInput, tick, well_force};

fn start() -> Pinball {
    let mut game = Pinball::with_default_table(Tuning::default(), 0).unwrap();
    let input = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut game, &input, FRAME_DT);
    assert_eq!(game.state.phase, GamePhase::Playing);
    game
}

fn idle(game: &mut Pinball, frames: usize) {
    for _ in 0..frames {
        tick(game, &TickInput::default(), FRAME_DT);
    }
}

#[test]
fn ball_collects_spawned_letter() {
    let mut game = start();
    // Park the ball in the lane until a letter appears.
    for _ in 0..400 {
        idle(&mut game, 1);
        if game.collectible().is_some() {
            break;
        }
    }
    let (letter, at) = game.collectible().expect("a letter spawns within a few seconds");
    assert_eq!(letter, 'P');
    let body = game.spawner.active().unwrap().body;

    // Put the ball right on it.
    let ball = game.table.ball;
    game.world.set_position(&ball, at);
    game.world.set_velocity(&ball, Vec2::ZERO);
    idle(&mut game, 20);

    assert_eq!(game.state.combo_progress, 1);
    assert_eq!(game.state.next_letter(), Some('O'));
    assert!(game.roles.role_of(&body).is_none());
    // The collected sensor is gone from the world after the next step.
    assert!(!game.world.is_alive(&body));

    let events = game.state.drain_events();
    assert!(events.contains(&GameEvent::ComboProgress {
        progress: 1,
        total: 4
    }));
}

#[test]
fn short_loss_contact_is_forgiven() {
    let mut game = start();
    let ball = game.table.ball;
    // Graze the top of the drain sensor, then bounce back up at once.
    game.world.set_position(&ball, Vec2::new(275.0, 948.0));
    game.world.set_velocity(&ball, Vec2::new(0.0, 60.0));
    idle(&mut game, 2);
    assert!(game.is_loss_pending());

    game.world.set_position(&ball, Vec2::new(275.0, 700.0));
    game.world.set_velocity(&ball, Vec2::ZERO);
    idle(&mut game, 10);

    assert_eq!(game.state.balls_left, 3);
    assert!(!game.is_loss_pending());
}

#[test]
fn game_runs_to_the_end() {
    let mut game = start();
    let ball = game.table.ball;
    let mut frames = 0;
    while game.state.phase == GamePhase::Playing && frames < 2000 {
        if game.state.phase == GamePhase::Playing {
            // Keep feeding the drain.
            game.world.set_position(&ball, Vec2::new(275.0, 945.0));
            game.world.set_velocity(&ball, Vec2::new(0.0, 300.0));
        }
        idle(&mut game, 15);
        frames += 15;
    }
    assert_eq!(game.state.balls_left, 0);
    assert!(matches!(
        game.state.phase,
        GamePhase::GameOver | GamePhase::YouWin
    ));
    assert!(game.state.highest_score >= game.state.previous_score);

    let lost = game
        .state
        .drain_events()
        .into_iter()
        .filter(|e| *e == GameEvent::BallLost)
        .count();
    assert_eq!(lost, 3);
}

#[test]
fn events_turn_into_sounds() {
    let mut game = start();
    let bumper = game.table.bumpers[1];
    let center = game.world.position(&bumper).unwrap();
    let ball = game.table.ball;
    game.world.set_position(&ball, center + Vec2::new(0.0, -60.0));
    game.world.set_velocity(&ball, Vec2::new(0.0, 500.0));
    idle(&mut game, 20);

    let mut audio = AudioDirector::new(Settings::default());
    let sounds: Vec<_> = game
        .state
        .drain_events()
        .iter()
        .flat_map(|e| audio.handle(e))
        .collect();
    assert!(sounds.iter().any(|s| s.effect == SoundEffect::BumperHit));
}

#[test]
fn well_force_is_continuous_at_the_edge() {
    let tuning = Tuning::default().gravity_well;
    let well = Vec2::new(5.0, 5.0);
    let inside = well_force(well + Vec2::new(tuning.radius - 1e-4, 0.0), well, 1.0, &tuning);
    let edge = well_force(well + Vec2::new(tuning.radius, 0.0), well, 1.0, &tuning);
    assert!(inside.length() < 1e-3);
    assert_eq!(edge, Vec2::ZERO);
}
