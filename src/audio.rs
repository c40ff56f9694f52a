//! Audio cues
//!
//! Turns game events into sound requests: which effect, at what pitch and
//! volume. Loading and mixing samples is the host's job; this module only
//! decides what should be heard and when.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a flipper
    FlipperHit,
    /// Ball hits a bumper or a wall
    BumperHit,
    /// Ball drained
    BallLost,
    /// Targets, letters and fanfare stages
    Bonus,
    /// Combo finished, big milestones
    ComboComplete,
}

/// One sound to play now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub effect: SoundEffect,
    /// Playback rate, 1.0 = original
    pub pitch: f32,
    /// Final gain including master and sfx volume
    pub volume: f32,
}

/// Seconds between fanfare stages
pub const FANFARE_STAGE_INTERVAL: f32 = 0.15;
/// Rising stages after the opening note
pub const FANFARE_STAGES: u32 = 4;

/// Combo-complete fanfare in progress
#[derive(Debug, Clone, Copy, Default)]
struct Fanfare {
    timer: f32,
    stage: u32,
}

/// Maps events to sound requests
#[derive(Debug, Clone, Default)]
pub struct AudioDirector {
    settings: Settings,
    fanfare: Option<Fanfare>,
}

impl AudioDirector {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            fanfare: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Gain for the background music stream
    pub fn music_volume(&self) -> f32 {
        self.settings.effective_music()
    }

    pub fn is_fanfare_playing(&self) -> bool {
        self.fanfare.is_some()
    }

    /// Sounds for one game event.
    pub fn handle(&mut self, event: &GameEvent) -> Vec<SoundRequest> {
        let mut out = Vec::new();
        match *event {
            GameEvent::FlipperHit { impact } => {
                self.with_variation(&mut out, SoundEffect::FlipperHit, impact)
            }
            GameEvent::BumperHit { impact } | GameEvent::WallHit { impact } => {
                self.with_variation(&mut out, SoundEffect::BumperHit, impact)
            }
            GameEvent::TargetHit => self.push(&mut out, SoundEffect::Bonus, 1.0, 1.0),
            GameEvent::SpecialHit => self.push(&mut out, SoundEffect::Bonus, 1.25, 1.0),
            GameEvent::BallLost => self.push(&mut out, SoundEffect::BallLost, 1.0, 1.0),
            GameEvent::ComboProgress { progress, total } => {
                if progress > 0 && total > 0 {
                    let ratio = progress as f32 / total as f32;
                    self.push(&mut out, SoundEffect::Bonus, 1.0 + ratio * 0.4, 1.0);
                }
            }
            GameEvent::ComboComplete => {
                self.fanfare = Some(Fanfare::default());
                self.push(&mut out, SoundEffect::Bonus, 1.0, 1.0);
            }
            GameEvent::ScoreMilestone { score } => self.milestone(&mut out, score),
            GameEvent::BallLaunched { .. } | GameEvent::PhaseChanged { .. } => {}
        }
        out
    }

    /// Advance the fanfare. Returns the stages that became due.
    pub fn update(&mut self, dt: f32) -> Vec<SoundRequest> {
        let mut out = Vec::new();
        let Some(mut fanfare) = self.fanfare.take() else {
            return out;
        };

        fanfare.timer += dt;
        let due = (fanfare.timer / FANFARE_STAGE_INTERVAL) as u32;
        while fanfare.stage < due.min(FANFARE_STAGES) {
            fanfare.stage += 1;
            let stage = fanfare.stage as f32;
            self.push(
                &mut out,
                SoundEffect::Bonus,
                1.0 + stage * 0.25,
                0.7 + stage * 0.075,
            );
        }

        if fanfare.stage >= FANFARE_STAGES {
            self.push(&mut out, SoundEffect::ComboComplete, 1.0, 1.0);
        } else {
            self.fanfare = Some(fanfare);
        }
        out
    }

    fn milestone(&self, out: &mut Vec<SoundRequest>, score: u64) {
        match score {
            s if s >= 100_000 => {
                self.push(out, SoundEffect::ComboComplete, 1.5, 1.0);
                self.push(out, SoundEffect::Bonus, 1.0, 1.0);
            }
            s if s >= 50_000 => self.push(out, SoundEffect::ComboComplete, 1.2, 1.0),
            s if s >= 10_000 => self.push(out, SoundEffect::Bonus, 1.3, 1.0),
            s if s >= 5_000 => self.push(out, SoundEffect::Bonus, 1.1, 1.0),
            _ => {}
        }
    }

    /// Harder hits sound higher and louder.
    fn with_variation(&self, out: &mut Vec<SoundRequest>, effect: SoundEffect, impact: f32) {
        let impact = if impact.is_finite() {
            impact.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.push(out, effect, 0.8 + impact * 0.4, 0.6 + impact * 0.4);
    }

    fn push(&self, out: &mut Vec<SoundRequest>, effect: SoundEffect, pitch: f32, volume: f32) {
        let volume = volume.clamp(0.0, 1.0) * self.settings.effective_sfx();
        if volume <= 0.0 {
            return;
        }
        out.push(SoundRequest {
            effect,
            pitch: pitch.clamp(0.1, 2.0),
            volume,
        });
    }
}
