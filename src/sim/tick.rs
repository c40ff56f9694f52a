//! Per-frame simulation tick
//!
//! One tick: input → flipper motors and plunger → gravity wells → world step
//! → contact reactions → loss debounce → letter spawner. Pause freezes the
//! ball and skips the world step entirely.

use std::collections::HashMap;

use glam::Vec2;

use super::ball::{LaunchCharge, LossDebounce};
use super::collectible::LetterSpawner;
use super::collision::{CollisionKind, CollisionRoles, Role};
use super::gravity::apply_gravity_wells;
use super::state::{BallOutcome, GameEvent, GamePhase, GameState, ScoreSource, impact_force};
use super::table::{Table, TableGeometry};
use crate::consts::{TABLE_HEIGHT, TABLE_WIDTH};
use crate::physics::{
    BodyHandle, BodyId, BodyKind, BodySnapshot, BuildError, Contact, FlipperSide, Listener,
    PhysicsWorld,
};
use crate::tuning::Tuning;

/// A launched ball resting this close to the launch point (px) gets the
/// plunger back.
const PLUNGER_REARM_DISTANCE: f32 = 40.0;
/// Speed (m/s) below which the ball counts as resting in the lane.
const PLUNGER_REARM_SPEED: f32 = 0.2;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a game from the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart after the game ended
    pub restart: bool,
    /// Back to the menu after the game ended
    pub menu: bool,
    /// Left flipper button held
    pub left_flipper: bool,
    /// Right flipper button held
    pub right_flipper: bool,
    /// Plunger held; releasing launches
    pub launch: bool,
}

/// One table with its world, roles and game state.
pub struct Pinball {
    pub world: PhysicsWorld,
    pub roles: CollisionRoles,
    pub table: Table,
    pub state: GameState,
    pub spawner: LetterSpawner,
    pub tuning: Tuning,
    launch: LaunchCharge,
    loss: LossDebounce,
    ball_launched: bool,
    pause_snapshot: Option<BodySnapshot>,
    /// Seconds of glow left per bumper
    bumper_glow: HashMap<BodyId, f32>,
}

impl Pinball {
    /// Build `geometry` scaled to the logical table size. The game boots
    /// into the menu with the ball parked and disabled.
    pub fn new(geometry: &TableGeometry, tuning: Tuning, highest_score: u64) -> Result<Self, BuildError> {
        let geometry = geometry.scaled_to(Vec2::new(TABLE_WIDTH, TABLE_HEIGHT));
        let mut world = PhysicsWorld::new(&tuning.physics, TABLE_HEIGHT);
        let mut roles = CollisionRoles::new();
        let table = Table::build(&geometry, &mut world, &mut roles, &tuning)?;

        let mut spawner = LetterSpawner::new(&tuning.spawner);
        if let Some((min, max)) = table.spawn_region {
            spawner.set_region(min, max);
        }
        world.set_enabled(&table.ball, false);

        Ok(Self {
            world,
            roles,
            table,
            state: GameState::new(highest_score, &tuning),
            spawner,
            tuning,
            launch: LaunchCharge::default(),
            loss: LossDebounce::default(),
            ball_launched: false,
            pause_snapshot: None,
            bumper_glow: HashMap::new(),
        })
    }

    pub fn with_default_table(tuning: Tuning, highest_score: u64) -> Result<Self, BuildError> {
        Self::new(&TableGeometry::default_table(), tuning, highest_score)
    }

    // -- Drawing queries --

    pub fn ball_position(&self) -> Option<Vec2> {
        self.world.position(&self.table.ball)
    }

    pub fn ball_angle(&self) -> Option<f32> {
        self.world.angle(&self.table.ball)
    }

    /// Screen angle of each flipper arm, in table order.
    pub fn flipper_angles(&self) -> Vec<f32> {
        self.table
            .flippers
            .iter()
            .filter_map(|f| self.world.angle(&f.arm))
            .collect()
    }

    /// Glow level in [0, 1] for a bumper hit recently.
    pub fn bumper_glow(&self, bumper: &BodyHandle) -> f32 {
        let duration = self.tuning.timing.bumper_glow;
        match self.bumper_glow.get(&bumper.id) {
            Some(&t) if duration > 0.0 => (t / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Active letter and its position, if one is on the table.
    pub fn collectible(&self) -> Option<(char, Vec2)> {
        let letter = self.spawner.active()?;
        Some((letter.letter, self.world.position(&letter.body)?))
    }

    pub fn ball_launched(&self) -> bool {
        self.ball_launched
    }

    pub fn launch_charge(&self) -> f32 {
        self.launch.ratio(&self.tuning.launch)
    }

    pub fn is_loss_pending(&self) -> bool {
        self.loss.is_armed()
    }

    // -- Lifecycle --

    /// New game: reset state and put the ball on the launcher.
    pub fn start_game(&mut self) {
        self.state.reset_game();
        self.spawner.clear(&mut self.world, &mut self.roles);
        self.loss.cancel();
        self.pause_snapshot = None;
        self.respawn_ball();
        self.state.transition_to(GamePhase::Playing);
    }

    fn respawn_ball(&mut self) {
        let ball = self.table.ball;
        self.world.set_enabled(&ball, true);
        self.world.set_kind(&ball, BodyKind::Dynamic);
        self.world.set_position(&ball, self.table.launch_point);
        self.world.set_velocity(&ball, Vec2::ZERO);
        self.world.set_angular_velocity(&ball, 0.0);
        self.launch.reset();
        self.ball_launched = false;
    }

    fn pause(&mut self) {
        let ball = self.table.ball;
        self.pause_snapshot = self.world.snapshot(&ball);
        self.world.set_kind(&ball, BodyKind::Static);
        self.launch.reset();
        self.state.transition_to(GamePhase::Paused);
    }

    fn resume(&mut self) {
        let ball = self.table.ball;
        self.world.set_kind(&ball, BodyKind::Dynamic);
        if let Some(snapshot) = self.pause_snapshot.take() {
            self.world.restore(&ball, &snapshot);
        }
        self.state.transition_to(GamePhase::Playing);
    }

    fn lose_ball(&mut self) {
        self.spawner.clear(&mut self.world, &mut self.roles);
        self.loss.cancel();
        match self.state.lose_ball() {
            BallOutcome::Respawn => self.respawn_ball(),
            BallOutcome::RoundOver(_) => self.world.set_enabled(&self.table.ball, false),
        }
    }

    // -- Playing frame --

    fn drive_flippers(&mut self, input: &TickInput) {
        let speed = self.tuning.flipper.motor_speed;
        for flipper in &self.table.flippers {
            let held = match flipper.side {
                FlipperSide::Left => input.left_flipper,
                FlipperSide::Right => input.right_flipper,
            };
            let target = if held { speed } else { -speed };
            self.world.set_motor_speed(flipper, target * flipper.side.sign());
        }
    }

    /// A launch too weak to clear the lane drops the ball back onto the
    /// plunger; hand control back instead of leaving it stranded.
    fn rearm_plunger(&mut self) {
        if !self.ball_launched {
            return;
        }
        let ball = &self.table.ball;
        let (Some(pos), Some(speed)) = (self.world.position(ball), self.world.speed(ball)) else {
            return;
        };
        if speed < PLUNGER_REARM_SPEED
            && pos.distance(self.table.launch_point) < PLUNGER_REARM_DISTANCE
        {
            log::info!("Ball back on the plunger, re-arming");
            self.launch.reset();
            self.ball_launched = false;
        }
    }

    fn drive_plunger(&mut self, input: &TickInput, dt: f32) {
        if self.ball_launched {
            return;
        }
        if input.launch {
            self.launch.hold(dt, &self.tuning.launch);
        } else if let Some(impulse) = self.launch.release(&self.tuning.launch) {
            // Screen up is -Y.
            self.world.apply_impulse(&self.table.ball, Vec2::new(0.0, -impulse));
            self.ball_launched = true;
            self.state.push_event(GameEvent::BallLaunched { impulse });
            log::info!("Ball launched with impulse {:.2}", impulse);
        }
    }

    fn handle_contact(&mut self, contact: Contact) {
        match contact.listener {
            Listener::Bumper => {
                self.bumper_glow
                    .insert(contact.this.id, self.tuning.timing.bumper_glow);
            }
            Listener::Ball => self.handle_ball_contact(&contact.this, &contact.other),
        }
    }

    fn handle_ball_contact(&mut self, ball: &BodyHandle, other: &BodyHandle) {
        let kind = self.roles.classify(ball, other);
        let impact = impact_force(self.world.speed(ball).unwrap_or(0.0));
        log::debug!("Ball contact {:?} (impact {:.2})", kind, impact);

        let points = &self.tuning.scoring;
        match kind {
            CollisionKind::WallHit => {
                self.state.add_score(points.wall_points, ScoreSource::Wall);
                self.state.push_event(GameEvent::WallHit { impact: impact * 0.5 });
            }
            CollisionKind::FlipperHit => {
                self.state.add_score(points.flipper_points, ScoreSource::Flipper);
                self.state.push_event(GameEvent::FlipperHit { impact });
            }
            CollisionKind::BumperHit => {
                self.state.add_score(points.bumper_points, ScoreSource::Bumper);
                self.state.push_event(GameEvent::BumperHit { impact });
            }
            CollisionKind::TargetHit => {
                self.state.add_score(points.target_points, ScoreSource::Target);
                self.state.push_event(GameEvent::TargetHit);
            }
            CollisionKind::SpecialTargetHit => {
                self.state
                    .add_score(points.special_points, ScoreSource::SpecialTarget);
                self.state.push_event(GameEvent::SpecialHit);
            }
            CollisionKind::SpecialPolygonHit => {
                self.state
                    .add_score(points.special_points, ScoreSource::SpecialPolygon);
                self.state.push_event(GameEvent::SpecialHit);
            }
            CollisionKind::LossSensorHit => {
                self.loss.arm(self.tuning.timing.loss_debounce);
            }
            CollisionKind::CollectibleHit => {
                if let Some(letter) = self.spawner.collect(other, &mut self.world, &mut self.roles) {
                    self.state.collect_letter(letter);
                }
            }
            // The well's pull is applied every tick.
            CollisionKind::BlackHoleHit => {}
        }
    }

    /// Any part of the ball at or below the loss sensor's top edge.
    fn ball_past_loss_line(&self) -> bool {
        let radius = self.table.ball.height * 0.5;
        match (self.table.loss_line, self.ball_position()) {
            (Some(line), Some(pos)) => pos.y + radius >= line,
            _ => false,
        }
    }

    fn play_frame(&mut self, input: &TickInput, dt: f32) {
        self.drive_flippers(input);
        self.rearm_plunger();
        self.drive_plunger(input, dt);

        apply_gravity_wells(
            &mut self.world,
            &self.table.ball,
            self.roles.members(Role::BlackHole),
            &self.tuning.gravity_well,
        );

        let step = self.world.clamp_dt(dt);
        for contact in self.world.step(dt) {
            self.handle_contact(contact);
        }

        let past = self.ball_past_loss_line();
        if self.loss.update(step, past) {
            self.lose_ball();
        }
        if self.state.phase != GamePhase::Playing {
            return;
        }

        self.spawner
            .update(step, &self.state, &mut self.world, &mut self.roles);
    }

    fn decay_glow(&mut self, dt: f32) {
        for t in self.bumper_glow.values_mut() {
            *t -= dt;
        }
        self.bumper_glow.retain(|_, t| *t > 0.0);
    }
}

/// Advance the game by one frame of `dt` seconds.
pub fn tick(game: &mut Pinball, input: &TickInput, dt: f32) {
    game.state.update(dt);
    game.decay_glow(dt);

    match game.state.phase {
        GamePhase::Menu => {
            if input.start {
                game.start_game();
            }
        }
        GamePhase::GameOver | GamePhase::YouWin => {
            if input.restart {
                game.start_game();
            } else if input.menu {
                game.state.transition_to(GamePhase::Menu);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                game.resume();
            }
        }
        GamePhase::Playing => {
            if input.pause {
                game.pause();
            } else {
                game.play_frame(input, dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> Pinball {
        Pinball::with_default_table(Tuning::default(), 0).unwrap()
    }

    fn run(game: &mut Pinball, input: &TickInput, frames: usize) {
        for _ in 0..frames {
            tick(game, input, DT);
        }
    }

    fn started() -> Pinball {
        let mut game = game();
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut game, &start, DT);
        game
    }

    #[test]
    fn test_menu_to_playing() {
        let mut game = game();
        assert_eq!(game.state.phase, GamePhase::Menu);

        run(&mut game, &TickInput::default(), 10);
        assert_eq!(game.state.phase, GamePhase::Menu);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut game, &start, DT);
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert_eq!(game.state.balls_left, 3);
        let pos = game.ball_position().unwrap();
        assert!((pos - game.table.launch_point).length() < 1e-3);
    }

    #[test]
    fn test_tick_pause() {
        let mut game = started();
        run(&mut game, &TickInput::default(), 5);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut game, &pause, DT);
        assert_eq!(game.state.phase, GamePhase::Paused);
        let frozen = game.world.snapshot(&game.table.ball).unwrap();

        // Nothing moves while paused.
        run(&mut game, &TickInput::default(), 30);
        let still = game.world.snapshot(&game.table.ball).unwrap();
        assert_eq!(still.position, frozen.position);

        tick(&mut game, &pause, DT);
        assert_eq!(game.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_round_trip_restores_ball() {
        let mut game = started();
        let ball = game.table.ball;
        game.world.set_velocity(&ball, Vec2::new(-120.0, -300.0));
        game.world.set_angular_velocity(&ball, 2.5);
        run(&mut game, &TickInput::default(), 3);

        let before = game.world.snapshot(&ball).unwrap();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut game, &pause, DT);
        tick(&mut game, &pause, DT);

        let after = game.world.snapshot(&ball).unwrap();
        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity, before.velocity);
        assert_eq!(after.angular_velocity, before.angular_velocity);
        assert_eq!(after.awake, before.awake);
    }

    #[test]
    fn test_plunger_launches_ball_up() {
        let mut game = started();
        run(&mut game, &TickInput::default(), 30);
        let resting = game.ball_position().unwrap();

        let hold = TickInput {
            launch: true,
            ..Default::default()
        };
        run(&mut game, &hold, 60);
        assert!(game.launch_charge() > 0.5);
        tick(&mut game, &TickInput::default(), DT);
        assert!(game.ball_launched());

        run(&mut game, &TickInput::default(), 10);
        assert!(game.ball_position().unwrap().y < resting.y - 20.0);
        assert!(
            game.state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BallLaunched { .. }))
        );
    }

    #[test]
    fn test_weak_launch_falls_back_onto_plunger() {
        let mut game = started();
        run(&mut game, &TickInput::default(), 30);
        let hold = TickInput {
            launch: true,
            ..Default::default()
        };

        // A one-frame tap only lifts the ball a little.
        tick(&mut game, &hold, DT);
        tick(&mut game, &TickInput::default(), DT);
        run(&mut game, &TickInput::default(), 300);
        assert!(!game.ball_launched());
        let rest = game.ball_position().unwrap();

        // A full charge still launches it.
        run(&mut game, &hold, 120);
        tick(&mut game, &TickInput::default(), DT);
        assert!(game.ball_launched());
        let mut min_y = rest.y;
        for _ in 0..60 {
            tick(&mut game, &TickInput::default(), DT);
            min_y = min_y.min(game.ball_position().unwrap().y);
        }
        assert!(min_y < rest.y - 100.0, "ball stayed in the lane: {}", min_y);
        assert_eq!(game.state.balls_left, 3);
    }

    #[test]
    fn test_flippers_follow_buttons() {
        let mut game = started();
        run(&mut game, &TickInput::default(), 30);
        let rest = game.flipper_angles();

        let both = TickInput {
            left_flipper: true,
            right_flipper: true,
            ..Default::default()
        };
        run(&mut game, &both, 30);
        let up = game.flipper_angles();
        // Screen angles: left arm raises counter-clockwise on screen (negative),
        // right arm raises clockwise (positive).
        assert!(up[0] < rest[0] - 0.3);
        assert!(up[1] > rest[1] + 0.3);
    }

    #[test]
    fn test_drained_ball_is_lost_after_debounce() {
        let mut game = started();
        let ball = game.table.ball;
        // Drop the ball straight into the drain between the flippers.
        game.world.set_position(&ball, Vec2::new(275.0, 940.0));
        game.world.set_velocity(&ball, Vec2::new(0.0, 200.0));
        game.ball_launched = true;

        run(&mut game, &TickInput::default(), 30);
        assert_eq!(game.state.balls_left, 2);
        assert!(
            game.state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::BallLost)
                .count()
                == 1
        );
        // Back in the launch lane.
        let pos = game.ball_position().unwrap();
        assert!((pos.x - game.table.launch_point.x).abs() < 1.0);
        assert!(pos.y < 930.0);
        assert!(!game.ball_launched());
    }

    #[test]
    fn test_last_ball_ends_game() {
        let mut game = started();
        game.state.balls_left = 1;
        game.state.current_score = 500;
        let ball = game.table.ball;
        game.world.set_position(&ball, Vec2::new(275.0, 940.0));
        game.world.set_velocity(&ball, Vec2::new(0.0, 200.0));

        run(&mut game, &TickInput::default(), 30);
        assert_eq!(game.state.phase, GamePhase::YouWin);
        assert_eq!(game.state.highest_score, 500);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut game, &restart, DT);
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert_eq!(game.state.current_score, 0);
        assert_eq!(game.state.previous_score, 500);
    }

    #[test]
    fn test_game_over_returns_to_menu() {
        let mut game = Pinball::with_default_table(Tuning::default(), 1_000_000).unwrap();
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut game, &start, DT);
        game.state.balls_left = 1;
        game.lose_ball();
        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.state.highest_score, 1_000_000);

        let menu = TickInput {
            menu: true,
            ..Default::default()
        };
        tick(&mut game, &menu, DT);
        assert_eq!(game.state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_bumper_contact_scores_and_glows() {
        let mut game = started();
        let bumper = game.table.bumpers[0];
        let center = game.world.position(&bumper).unwrap();
        let ball = game.table.ball;
        game.world.set_position(&ball, center + Vec2::new(0.0, -60.0));
        game.world.set_velocity(&ball, Vec2::new(0.0, 400.0));
        game.ball_launched = true;

        let mut glowed = false;
        for _ in 0..30 {
            tick(&mut game, &TickInput::default(), DT);
            glowed |= game.bumper_glow(&bumper) > 0.0;
        }
        assert!(glowed);
        assert!(game.state.current_score >= 50);
        assert!(
            game.state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BumperHit { .. }))
        );
    }
}
