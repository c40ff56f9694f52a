//! Game simulation module
//!
//! All gameplay logic lives here:
//! - Collision roles and classification
//! - Game state machine, scoring and combo letters
//! - Ball rig, collectible spawner and gravity wells
//! - Table construction and the per-frame tick
//!
//! Physics goes through [`crate::physics::PhysicsWorld`]; nothing here talks
//! to the physics backend directly.

pub mod ball;
pub mod collectible;
pub mod collision;
pub mod gravity;
pub mod state;
pub mod table;
pub mod tick;

pub use ball::{LaunchCharge, LossDebounce};
pub use collectible::{CollectibleLetter, LetterSpawner};
pub use collision::{CollisionKind, CollisionRoles, Role, RoleError};
pub use gravity::{apply_gravity_wells, well_force};
pub use state::{BallOutcome, GameEvent, GamePhase, GameState, ScoreSource, impact_force};
pub use table::{PointChain, RectRole, Table, TableGeometry, TaggedRect};
pub use tick::{Pinball, TickInput, tick};
