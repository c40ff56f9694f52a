//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a table can be retuned
//! from JSON without touching code. Missing fields fall back to defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rigid-body world parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Gravity in simulation space (m/s², Y up)
    pub gravity: Vec2,
    pub pixels_per_meter: f32,
    /// Constraint solver iterations per step
    pub solver_iterations: usize,
    /// Longest step accepted before falling back to `fallback_dt`
    pub max_dt: f32,
    pub fallback_dt: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Restitution applied to bumpers after creation
    pub bumper_restitution: f32,
    /// Vertices closer than this (meters) are merged away
    pub min_vertex_distance: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -10.0),
            pixels_per_meter: 50.0,
            solver_iterations: 6,
            max_dt: 1.0 / 30.0,
            fallback_dt: 1.0 / 60.0,
            density: 1.0,
            restitution: 0.5,
            friction: 0.3,
            bumper_restitution: 1.5,
            min_vertex_distance: 0.05,
        }
    }
}

/// Flipper arm and motor parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipperTuning {
    /// Motor target speed (rad/s) while held or released
    pub motor_speed: f32,
    /// Torque cap for the joint motor
    pub max_motor_torque: f32,
    /// How hard the motor chases its target speed
    pub motor_gain: f32,
    /// How far below horizontal the arm rests (radians)
    pub rest_angle: f32,
    /// How far above horizontal the arm swings (radians)
    pub swing_angle: f32,
    pub density: f32,
    pub friction: f32,
    /// Pivot disc radius in screen pixels
    pub pivot_radius: f32,
}

impl Default for FlipperTuning {
    fn default() -> Self {
        use std::f32::consts::PI;
        Self {
            motor_speed: 20.0,
            max_motor_torque: 1000.0,
            motor_gain: 50.0,
            rest_angle: 0.15 * PI,
            swing_angle: 0.25 * PI,
            density: 10.0,
            friction: 0.5,
            pivot_radius: 5.0,
        }
    }
}

/// Points, multipliers and the combo sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub wall_points: u64,
    pub flipper_points: u64,
    pub bumper_points: u64,
    pub target_points: u64,
    pub special_points: u64,
    pub letter_points: u64,
    pub combo_bonus: u64,
    /// Consecutive hits needed per score-multiplier step
    pub hits_per_tier: u32,
    pub max_score_multiplier: u32,
    pub max_combo_multiplier: u32,
    /// Letters to collect, in order
    pub combo_sequence: String,
    /// Absolute scores that trigger a milestone cue (ascending)
    pub milestones: Vec<u64>,
    pub starting_balls: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            wall_points: 5,
            flipper_points: 10,
            bumper_points: 50,
            target_points: 100,
            special_points: 200,
            letter_points: 100,
            combo_bonus: 5000,
            hits_per_tier: 5,
            max_score_multiplier: 10,
            max_combo_multiplier: 5,
            combo_sequence: "POKE".to_string(),
            milestones: vec![5_000, 10_000, 50_000, 100_000],
            starting_balls: 3,
        }
    }
}

/// Plunger charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchTuning {
    /// Impulse gained per second of holding (N·s/s)
    pub charge_speed: f32,
    /// Impulse cap (N·s)
    pub max_impulse: f32,
    /// Impulse for a tap release (N·s)
    pub min_impulse: f32,
}

impl Default for LaunchTuning {
    fn default() -> Self {
        Self {
            charge_speed: 4.0,
            max_impulse: 6.0,
            min_impulse: 1.0,
        }
    }
}

/// Collectible letter spawning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Seconds between one letter going away and the next appearing
    pub spawn_interval: f32,
    /// Seconds before an uncollected letter expires
    pub lifetime: f32,
    /// Sensor radius in screen pixels
    pub radius: f32,
    /// Spawn region top-left (screen pixels)
    pub region_min: Vec2,
    /// Spawn region bottom-right (screen pixels)
    pub region_max: Vec2,
    pub seed: u64,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 3.0,
            lifetime: 8.0,
            radius: 15.0,
            region_min: Vec2::new(120.0, 200.0),
            region_max: Vec2::new(480.0, 600.0),
            seed: 0x5eed,
        }
    }
}

/// Black hole attraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityWellTuning {
    /// Attraction radius in meters
    pub radius: f32,
    /// Gravity constant scaling the inverse-square pull
    pub strength: f32,
    /// Distance floor (meters) so the pull stays bounded near the center
    pub min_distance: f32,
}

impl Default for GravityWellTuning {
    fn default() -> Self {
        Self {
            radius: 10.0,
            strength: 40.0,
            min_distance: 0.5,
        }
    }
}

/// Countdown durations (seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub loss_debounce: f32,
    pub transition: f32,
    pub combo_flash: f32,
    pub bumper_glow: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            loss_debounce: 0.1,
            transition: 0.5,
            combo_flash: 1.5,
            bumper_glow: 0.2,
        }
    }
}

/// All balance knobs for one table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub flipper: FlipperTuning,
    pub scoring: ScoringTuning,
    pub launch: LaunchTuning,
    pub spawner: SpawnerTuning,
    pub gravity_well: GravityWellTuning,
    pub timing: TimingTuning,
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "scoring": { "combo_sequence": "PIKACHU" } }"#).unwrap();
        assert_eq!(t.scoring.combo_sequence, "PIKACHU");
        assert_eq!(t.scoring.bumper_points, 50);
        assert_eq!(t.timing.loss_debounce, 0.1);
    }

    #[test]
    fn test_round_trips_through_json() {
        let t = Tuning::default();
        let back = Tuning::from_json(&t.to_json().unwrap()).unwrap();
        assert_eq!(back.physics.pixels_per_meter, t.physics.pixels_per_meter);
        assert_eq!(back.scoring.milestones, t.scoring.milestones);
    }
}
