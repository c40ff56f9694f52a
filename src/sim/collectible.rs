//! Collectible combo letters
//!
//! At most one letter is on the table at a time. It is always the next
//! letter the combo needs, sits in a sensor at a random spot inside the
//! spawn region, and expires if the ball does not reach it in time.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{CollisionRoles, Role};
use super::state::GameState;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::tuning::SpawnerTuning;

/// A letter waiting to be collected.
#[derive(Debug, Clone, Copy)]
pub struct CollectibleLetter {
    pub body: BodyHandle,
    pub letter: char,
    pub collected: bool,
    /// Seconds since spawning
    pub age: f32,
}

/// Keeps one letter alive on the table while the combo is incomplete.
#[derive(Debug, Clone)]
pub struct LetterSpawner {
    active: Option<CollectibleLetter>,
    /// Seconds since the last letter went away
    spawn_timer: f32,
    region: (Vec2, Vec2),
    rng: Pcg32,
    tuning: SpawnerTuning,
}

impl LetterSpawner {
    pub fn new(tuning: &SpawnerTuning) -> Self {
        Self {
            active: None,
            spawn_timer: 0.0,
            region: (tuning.region_min, tuning.region_max),
            rng: Pcg32::seed_from_u64(tuning.seed),
            tuning: tuning.clone(),
        }
    }

    /// Replace the spawn region (screen pixels, corners in any order).
    pub fn set_region(&mut self, a: Vec2, b: Vec2) {
        self.region = (a.min(b), a.max(b));
    }

    pub fn active(&self) -> Option<&CollectibleLetter> {
        self.active.as_ref()
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Age the current letter or spawn the next one.
    pub fn update(
        &mut self,
        dt: f32,
        state: &GameState,
        world: &mut PhysicsWorld,
        roles: &mut CollisionRoles,
    ) {
        if let Some(letter) = self.active.as_mut() {
            letter.age += dt;
            if letter.age > self.tuning.lifetime {
                log::debug!("Letter {} expired", letter.letter);
                self.remove(world, roles);
            }
            return;
        }

        let Some(next) = state.next_letter() else {
            return;
        };
        self.spawn_timer += dt;
        if self.spawn_timer >= self.tuning.spawn_interval {
            self.spawn(next, world, roles);
        }
    }

    /// The ball touched `body`. Returns the letter if it was the active one.
    pub fn collect(
        &mut self,
        body: &BodyHandle,
        world: &mut PhysicsWorld,
        roles: &mut CollisionRoles,
    ) -> Option<char> {
        let letter = self.active.as_mut()?;
        if letter.body != *body || letter.collected {
            return None;
        }
        letter.collected = true;
        let ch = letter.letter;
        log::info!("Collected letter {}", ch);
        self.remove(world, roles);
        Some(ch)
    }

    /// Remove any letter and restart the spawn timer.
    pub fn clear(&mut self, world: &mut PhysicsWorld, roles: &mut CollisionRoles) {
        self.remove(world, roles);
    }

    fn spawn(&mut self, letter: char, world: &mut PhysicsWorld, roles: &mut CollisionRoles) {
        let (min, max) = self.region;
        let x = if max.x > min.x {
            self.rng.random_range(min.x..max.x)
        } else {
            min.x
        };
        let y = if max.y > min.y {
            self.rng.random_range(min.y..max.y)
        } else {
            min.y
        };

        self.spawn_timer = 0.0;
        let body = match world.create_circle_sensor(x, y, self.tuning.radius) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Letter {} not spawned: {}", letter, e);
                return;
            }
        };
        if let Err(e) = roles.register(body, Role::Collectible) {
            log::warn!("Letter {} not registered: {}", letter, e);
            world.queue_destroy(&body);
            return;
        }

        log::debug!("Spawned letter {} at ({:.0}, {:.0})", letter, x, y);
        self.active = Some(CollectibleLetter {
            body,
            letter,
            collected: false,
            age: 0.0,
        });
    }

    fn remove(&mut self, world: &mut PhysicsWorld, roles: &mut CollisionRoles) {
        if let Some(letter) = self.active.take() {
            roles.unregister(&letter.body);
            world.queue_destroy(&letter.body);
        }
        self.spawn_timer = 0.0;
    }
}
