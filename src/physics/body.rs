//! Engine-independent body references
//!
//! A [`BodyHandle`] is a non-owning ticket for one rigid body held by the
//! [`PhysicsWorld`](super::PhysicsWorld). Identity is the stable [`BodyId`];
//! the rapier handles inside are generational, so a handle to a removed body
//! simply stops resolving instead of aliasing a new one.

use std::hash::{Hash, Hasher};

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle};

use super::shapes::FlipperSide;

/// Stable identifier, never reused within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Kinematic class of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Immovable, participates in contacts.
    Static,
    /// Simulated.
    Dynamic,
    /// Immovable overlap detector with no contact response.
    Sensor,
}

/// Who reacts when a body starts touching something.
///
/// Closed set: the dispatcher pattern-matches on it instead of calling back
/// into arbitrary owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// The play ball; its contacts drive scoring.
    Ball,
    /// A pop bumper; its contacts light the bumper.
    Bumper,
}

/// Reference to one body in the world.
#[derive(Debug, Clone, Copy)]
pub struct BodyHandle {
    pub id: BodyId,
    pub kind: BodyKind,
    /// Logical width in screen pixels (diameter for circles, 0 for chains).
    pub width: f32,
    /// Logical height in screen pixels (diameter for circles, 0 for chains).
    pub height: f32,
    pub(crate) body: RigidBodyHandle,
    pub(crate) collider: ColliderHandle,
}

impl PartialEq for BodyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BodyHandle {}

impl Hash for BodyHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A collision-begin notification for one listening side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub listener: Listener,
    /// The body that owns `listener`.
    pub this: BodyHandle,
    pub other: BodyHandle,
}

/// Kinematic state captured for pause/resume.
///
/// Values stay in simulation units so a restore is bit-exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    /// Meters, Y up.
    pub position: Vec2,
    /// Radians, counter-clockwise.
    pub angle: f32,
    /// Meters per second, Y up.
    pub velocity: Vec2,
    /// Radians per second, counter-clockwise.
    pub angular_velocity: f32,
    pub awake: bool,
}

/// A motorized flipper: static pivot, dynamic arm, revolute joint.
#[derive(Debug, Clone, Copy)]
pub struct FlipperJoint {
    pub side: FlipperSide,
    pub pivot: BodyHandle,
    pub arm: BodyHandle,
    pub(crate) joint: ImpulseJointHandle,
    pub(crate) motor_gain: f32,
}
