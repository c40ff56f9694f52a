//! Rigid-body world
//!
//! Everything that touches the physics backend lives here. Game logic sees
//! [`BodyHandle`]s, screen-space vectors and [`Contact`] notifications; the
//! rapier types never leave this module.

pub mod body;
pub mod coords;
pub mod error;
pub mod shapes;
pub mod world;

pub use body::{BodyHandle, BodyId, BodyKind, BodySnapshot, Contact, FlipperJoint, Listener};
pub use coords::Projection;
pub use error::BuildError;
pub use shapes::{FlipperSide, filter_close_vertices, flipper_limits, flipper_outline};
pub use world::PhysicsWorld;
