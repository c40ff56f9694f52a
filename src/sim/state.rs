//! Game state and scoring
//!
//! Everything the HUD reads and the high-score layer persists lives here.
//! The state never touches the physics world; the tick drives it from
//! classified contacts and input.

use serde::{Deserialize, Serialize};

use crate::tuning::{ScoringTuning, Tuning};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Menu,
    /// Ball in play
    Playing,
    /// Ball frozen, world not stepped
    Paused,
    /// Out of balls without beating the record
    GameOver,
    /// Out of balls with a new record
    YouWin,
}

/// What a score award came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    Wall,
    Flipper,
    Bumper,
    Target,
    SpecialTarget,
    SpecialPolygon,
    Letter,
    ComboBonus,
}

/// Fire-and-forget notifications for audio and presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FlipperHit { impact: f32 },
    BumperHit { impact: f32 },
    WallHit { impact: f32 },
    TargetHit,
    SpecialHit,
    BallLaunched { impulse: f32 },
    BallLost,
    ComboProgress { progress: usize, total: usize },
    ComboComplete,
    ScoreMilestone { score: u64 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Result of losing a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallOutcome {
    /// Balls remain; put a fresh one on the launcher
    Respawn,
    /// Last ball gone; the game moved to this phase
    RoundOver(GamePhase),
}

/// Ball speed (m/s) that counts as a full-strength impact.
pub const FULL_IMPACT_SPEED: f32 = 20.0;

/// Normalized impact strength in [0, 1] for a ball moving at `speed` m/s.
#[inline]
pub fn impact_force(speed: f32) -> f32 {
    if speed.is_finite() {
        (speed / FULL_IMPACT_SPEED).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Complete logical game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub previous_phase: GamePhase,

    // -- Score --
    pub current_score: u64,
    pub previous_score: u64,
    pub highest_score: u64,
    /// Record standing when this game started; beating it means YouWin
    pub record_to_beat: u64,
    /// Set whenever the highest score changes; read via `take_save_request`
    pub score_needs_saving: bool,

    // -- Multipliers --
    pub score_multiplier: u32,
    pub combo_multiplier: u32,
    pub consecutive_hits: u32,

    // -- Balls --
    pub balls_left: u32,
    pub total_balls: u32,
    pub round: u32,

    // -- Combo letters --
    pub combo_sequence: Vec<char>,
    pub combo_progress: usize,
    pub combo_complete: bool,
    /// Seconds of combo-complete flashing left
    pub combo_flash: f32,

    // -- Presentation --
    pub transitioning: bool,
    pub transition_timer: f32,

    next_milestone: usize,
    scoring: ScoringTuning,
    transition_duration: f32,
    combo_flash_duration: f32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Boot-time state in the menu, seeded with the persisted record.
    pub fn new(highest_score: u64, tuning: &Tuning) -> Self {
        let scoring = tuning.scoring.clone();
        Self {
            phase: GamePhase::Menu,
            previous_phase: GamePhase::Menu,
            current_score: 0,
            previous_score: 0,
            highest_score,
            record_to_beat: highest_score,
            score_needs_saving: false,
            score_multiplier: 1,
            combo_multiplier: 1,
            consecutive_hits: 0,
            balls_left: scoring.starting_balls,
            total_balls: scoring.starting_balls,
            round: 1,
            combo_sequence: scoring.combo_sequence.chars().collect(),
            combo_progress: 0,
            combo_complete: false,
            combo_flash: 0.0,
            transitioning: false,
            transition_timer: 0.0,
            next_milestone: 0,
            scoring,
            transition_duration: tuning.timing.transition,
            combo_flash_duration: tuning.timing.combo_flash,
            events: Vec::new(),
        }
    }

    pub fn scoring(&self) -> &ScoringTuning {
        &self.scoring
    }

    pub fn combo_total(&self) -> usize {
        self.combo_sequence.len()
    }

    /// The letter that advances the combo next, if any remain.
    pub fn next_letter(&self) -> Option<char> {
        self.combo_sequence.get(self.combo_progress).copied()
    }

    // -- Events --

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand over everything raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns true once per change of the highest score.
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.score_needs_saving)
    }

    // -- State machine --

    /// Move to `next`, stamping the previous phase and running entry logic.
    pub fn transition_to(&mut self, next: GamePhase) {
        if self.phase == next {
            return;
        }
        let from = self.phase;
        log::info!("State transition: {:?} -> {:?}", from, next);

        self.previous_phase = from;
        self.phase = next;
        self.transitioning = true;
        self.transition_timer = 0.0;

        match next {
            GamePhase::Playing => {
                if from != GamePhase::Paused {
                    self.reset_multipliers();
                }
                log::info!(
                    "Playing: round {}, balls {}",
                    self.round,
                    self.balls_left
                );
            }
            GamePhase::GameOver | GamePhase::YouWin => {
                self.previous_score = self.current_score;
                self.commit_highest();
                log::info!("Final score: {}", self.current_score);
            }
            GamePhase::Menu | GamePhase::Paused => {}
        }

        self.push_event(GameEvent::PhaseChanged { from, to: next });
    }

    /// Advance presentation timers.
    pub fn update(&mut self, dt: f32) {
        if self.transitioning {
            self.transition_timer += dt;
            if self.transition_timer >= self.transition_duration {
                self.transitioning = false;
                self.transition_timer = 0.0;
            }
        }

        if self.combo_flash > 0.0 {
            self.combo_flash = (self.combo_flash - dt).max(0.0);
            if self.combo_flash == 0.0 {
                self.combo_complete = false;
            }
        }
    }

    /// Fresh game: score, balls, round and combo back to their start values.
    pub fn reset_game(&mut self) {
        log::info!("Resetting game (record {})", self.highest_score);
        self.commit_highest();
        self.previous_score = self.current_score;
        self.record_to_beat = self.highest_score;

        self.current_score = 0;
        self.balls_left = self.total_balls;
        self.round = 1;
        self.combo_progress = 0;
        self.combo_complete = false;
        self.combo_flash = 0.0;
        self.next_milestone = 0;
        self.transitioning = false;
        self.transition_timer = 0.0;
        self.reset_multipliers();
    }

    pub fn reset_multipliers(&mut self) {
        self.score_multiplier = 1;
        self.combo_multiplier = 1;
        self.consecutive_hits = 0;
    }

    // -- Scoring --

    /// Award `points` scaled by both multipliers. Returns the amount added.
    pub fn add_score(&mut self, points: u64, source: ScoreSource) -> u64 {
        let factor = u64::from(self.score_multiplier) * u64::from(self.combo_multiplier);
        let awarded = points.saturating_mul(factor);
        self.current_score = self.current_score.saturating_add(awarded);

        self.consecutive_hits += 1;
        let tier = self.scoring.hits_per_tier.max(1);
        if self.consecutive_hits % tier == 0
            && self.score_multiplier < self.scoring.max_score_multiplier
        {
            self.score_multiplier += 1;
            log::debug!("Score multiplier x{}", self.score_multiplier);
        }

        if self.current_score > self.highest_score {
            self.highest_score = self.current_score;
            self.score_needs_saving = true;
        }

        while let Some(&milestone) = self.scoring.milestones.get(self.next_milestone) {
            if self.current_score < milestone {
                break;
            }
            self.next_milestone += 1;
            self.push_event(GameEvent::ScoreMilestone { score: milestone });
        }

        log::debug!("+{} ({:?}) -> {}", awarded, source, self.current_score);
        awarded
    }

    // -- Combo --

    /// Offer a collected letter. Only the next letter in sequence counts.
    pub fn collect_letter(&mut self, letter: char) -> bool {
        if self.next_letter() != Some(letter) {
            log::debug!("Letter {} out of order, ignored", letter);
            return false;
        }

        self.combo_progress += 1;
        let total = self.combo_total();
        self.push_event(GameEvent::ComboProgress {
            progress: self.combo_progress,
            total,
        });
        self.add_score(self.scoring.letter_points, ScoreSource::Letter);

        if self.combo_progress >= total {
            self.complete_combo();
        }
        true
    }

    /// Full sequence collected: extra ball, bonus, flash, start over.
    pub fn complete_combo(&mut self) {
        log::info!("Combo complete! Extra ball awarded");
        self.combo_complete = true;
        self.balls_left += 1;
        self.add_score(self.scoring.combo_bonus, ScoreSource::ComboBonus);
        if self.combo_multiplier < self.scoring.max_combo_multiplier {
            self.combo_multiplier += 1;
        }
        self.combo_progress = 0;
        self.combo_flash = self.combo_flash_duration;
        self.push_event(GameEvent::ComboComplete);
    }

    /// Drop partial combo progress.
    pub fn reset_combo(&mut self) {
        self.combo_progress = 0;
    }

    // -- Ball lifecycle --

    /// The ball drained. Decrements balls and either asks for a respawn or
    /// ends the game.
    pub fn lose_ball(&mut self) -> BallOutcome {
        self.reset_combo();
        self.balls_left = self.balls_left.saturating_sub(1);
        self.push_event(GameEvent::BallLost);
        log::info!("Ball lost, {} left", self.balls_left);

        if self.balls_left > 0 {
            self.round += 1;
            self.reset_multipliers();
            return BallOutcome::Respawn;
        }

        let next = if self.current_score > self.record_to_beat {
            GamePhase::YouWin
        } else {
            GamePhase::GameOver
        };
        self.transition_to(next);
        BallOutcome::RoundOver(next)
    }

    fn commit_highest(&mut self) {
        if self.current_score > self.highest_score {
            self.highest_score = self.current_score;
            self.score_needs_saving = true;
            log::info!("New high score: {}", self.highest_score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new(0, &Tuning::default());
        state.reset_game();
        state.transition_to(GamePhase::Playing);
        state
    }

    #[test]
    fn test_boots_in_menu() {
        let state = GameState::new(1234, &Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.balls_left, 3);
        assert_eq!(state.highest_score, 1234);
        assert_eq!(state.combo_sequence, vec!['P', 'O', 'K', 'E']);
    }

    #[test]
    fn test_five_bumper_hits_raise_multiplier_once() {
        let mut state = playing();
        for _ in 0..5 {
            state.add_score(50, ScoreSource::Bumper);
        }
        assert_eq!(state.current_score, 250);
        assert_eq!(state.score_multiplier, 2);

        // Sixth hit pays double.
        assert_eq!(state.add_score(50, ScoreSource::Bumper), 100);
    }

    #[test]
    fn test_multiplier_is_capped() {
        let mut state = playing();
        for _ in 0..200 {
            state.add_score(1, ScoreSource::Wall);
        }
        assert_eq!(state.score_multiplier, 10);
    }

    #[test]
    fn test_transition_sets_timer_and_previous() {
        let mut state = playing();
        state.transition_to(GamePhase::Paused);
        assert_eq!(state.previous_phase, GamePhase::Playing);
        assert!(state.transitioning);

        state.update(0.3);
        assert!(state.transitioning);
        state.update(0.3);
        assert!(!state.transitioning);
    }

    #[test]
    fn test_resume_keeps_multipliers() {
        let mut state = playing();
        for _ in 0..5 {
            state.add_score(10, ScoreSource::Flipper);
        }
        state.transition_to(GamePhase::Paused);
        state.transition_to(GamePhase::Playing);
        assert_eq!(state.score_multiplier, 2);
    }

    #[test]
    fn test_out_of_order_letter_is_ignored() {
        let mut state = playing();
        assert!(!state.collect_letter('O'));
        assert_eq!(state.combo_progress, 0);
        assert!(state.collect_letter('P'));
        assert!(!state.collect_letter('P'));
        assert_eq!(state.combo_progress, 1);
    }

    #[test]
    fn test_full_combo_awards_ball_and_resets() {
        let mut state = playing();
        for ch in "POKE".chars() {
            assert!(state.collect_letter(ch));
        }
        assert_eq!(state.combo_progress, 0);
        assert_eq!(state.balls_left, 4);
        assert!(state.combo_complete);
        assert_eq!(state.combo_multiplier, 2);
        assert!(state.current_score >= 5000);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ComboComplete));
        assert!(events.contains(&GameEvent::ComboProgress {
            progress: 4,
            total: 4
        }));

        state.update(2.0);
        assert!(!state.combo_complete);
    }

    #[test]
    fn test_milestones_fire_once() {
        let mut state = playing();
        state.drain_events();
        state.add_score(6000, ScoreSource::SpecialTarget);
        state.add_score(1, ScoreSource::Wall);
        let milestones: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ScoreMilestone { .. }))
            .collect();
        assert_eq!(milestones, vec![GameEvent::ScoreMilestone { score: 5000 }]);
    }

    #[test]
    fn test_last_ball_with_record_wins() {
        let mut state = GameState::new(8000, &Tuning::default());
        state.reset_game();
        state.transition_to(GamePhase::Playing);
        state.balls_left = 1;
        state.current_score = 12000;

        assert_eq!(state.lose_ball(), BallOutcome::RoundOver(GamePhase::YouWin));
        assert_eq!(state.phase, GamePhase::YouWin);
        assert_eq!(state.highest_score, 12000);
        assert_eq!(state.previous_score, 12000);
        assert!(state.take_save_request());
        assert!(!state.take_save_request());
    }

    #[test]
    fn test_last_ball_without_record_is_game_over() {
        let mut state = GameState::new(8000, &Tuning::default());
        state.reset_game();
        state.transition_to(GamePhase::Playing);
        state.balls_left = 1;
        state.current_score = 300;

        assert_eq!(state.lose_ball(), BallOutcome::RoundOver(GamePhase::GameOver));
        assert_eq!(state.highest_score, 8000);
        assert!(state.highest_score >= state.previous_score);
    }

    #[test]
    fn test_losing_a_ball_clears_combo_and_multipliers() {
        let mut state = playing();
        state.collect_letter('P');
        for _ in 0..5 {
            state.add_score(10, ScoreSource::Wall);
        }
        assert_eq!(state.lose_ball(), BallOutcome::Respawn);
        assert_eq!(state.combo_progress, 0);
        assert_eq!(state.score_multiplier, 1);
        assert_eq!(state.balls_left, 2);
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_impact_force_is_clamped() {
        assert_eq!(impact_force(0.0), 0.0);
        assert_eq!(impact_force(10.0), 0.5);
        assert_eq!(impact_force(100.0), 1.0);
        assert_eq!(impact_force(f32::NAN), 0.0);
    }
}
