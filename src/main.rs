//! Pinball Core headless driver
//!
//! Plays a scripted session on the built-in table and logs the HUD, so the
//! simulation can be smoke-run without a window. Pass a tuning JSON file as
//! the first argument to override balance values.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pinball_core::audio::AudioDirector;
    use pinball_core::consts::FRAME_DT;
    use pinball_core::sim::{GamePhase, Pinball, TickInput, tick};
    use pinball_core::{HighScore, Settings, Tuning};

    env_logger::init();
    log::info!("Pinball Core (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Tuning {} invalid ({}), using defaults", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Tuning {} unreadable ({}), using defaults", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut record = HighScore::default();
    let mut audio = AudioDirector::new(Settings::default());
    let mut game = match Pinball::with_default_table(tuning, record.score) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Table could not be built: {}", e);
            std::process::exit(1);
        }
    };

    const FRAMES: u32 = 60 * 60;
    for frame in 0..FRAMES {
        let input = scripted_input(frame, &game);
        tick(&mut game, &input, FRAME_DT);

        for event in game.state.drain_events() {
            for sound in audio.handle(&event) {
                log::debug!("{:?} -> {:?}", event, sound);
            }
        }
        for sound in audio.update(FRAME_DT) {
            log::debug!("fanfare -> {:?}", sound);
        }

        if game.state.take_save_request() && record.submit(game.state.highest_score) {
            log::debug!("Would persist {}", record.to_json());
        }

        if frame % 60 == 0 {
            let pos = game.ball_position().unwrap_or_default();
            log::info!(
                "t={:>3}s {:?} score={} x{}/x{} balls={} combo={}/{} ball=({:.0}, {:.0})",
                frame / 60,
                game.state.phase,
                game.state.current_score,
                game.state.score_multiplier,
                game.state.combo_multiplier,
                game.state.balls_left,
                game.state.combo_progress,
                game.state.combo_total(),
                pos.x,
                pos.y
            );
        }

        if matches!(game.state.phase, GamePhase::GameOver | GamePhase::YouWin) {
            break;
        }
    }

    log::info!(
        "Session over: score {}, best {}",
        game.state.current_score,
        record.score
    );

    fn scripted_input(frame: u32, game: &Pinball) -> TickInput {
        let mut input = TickInput {
            start: frame == 0,
            ..Default::default()
        };
        if !game.ball_launched() {
            // Hold the plunger for a second, then let go.
            input.launch = frame % 90 < 60;
            return input;
        }
        // Flap both flippers whenever the ball is low on the table.
        if let Some(pos) = game.ball_position() {
            let low = pos.y > 780.0;
            input.left_flipper = low && pos.x < 300.0;
            input.right_flipper = low && pos.x >= 300.0;
        }
        input
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
