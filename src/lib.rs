//! Pinball Core - single-table pinball simulation
//!
//! Core modules:
//! - `physics`: Rigid-body world over rapier2d (bodies, flippers, contacts)
//! - `sim`: Collision roles, game state machine, scoring and the frame tick
//! - `audio`: Sound cues derived from game events
//! - `settings` / `highscores`: Persisted values and their JSON form
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod physics;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Logical table size in screen pixels
    pub const TABLE_WIDTH: f32 = 600.0;
    pub const TABLE_HEIGHT: f32 = 1000.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
}
