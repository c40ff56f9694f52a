//! Collision classification
//!
//! Bodies are tagged with at most one gameplay [`Role`]. A ball contact is
//! classified by looking at the roles on both sides and keeping the one with
//! the highest precedence; untagged pairs are plain wall hits.

use core::fmt;
use std::collections::HashMap;

use crate::physics::{BodyHandle, BodyId};

/// Gameplay role of a body, declared in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    LossSensor,
    BlackHole,
    SpecialPolygon,
    Bumper,
    Target,
    SpecialTarget,
    Collectible,
    Flipper,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::LossSensor,
        Role::BlackHole,
        Role::SpecialPolygon,
        Role::Bumper,
        Role::Target,
        Role::SpecialTarget,
        Role::Collectible,
        Role::Flipper,
    ];

    fn collision(self) -> CollisionKind {
        match self {
            Role::LossSensor => CollisionKind::LossSensorHit,
            Role::BlackHole => CollisionKind::BlackHoleHit,
            Role::SpecialPolygon => CollisionKind::SpecialPolygonHit,
            Role::Bumper => CollisionKind::BumperHit,
            Role::Target => CollisionKind::TargetHit,
            Role::SpecialTarget => CollisionKind::SpecialTargetHit,
            Role::Collectible => CollisionKind::CollectibleHit,
            Role::Flipper => CollisionKind::FlipperHit,
        }
    }
}

/// Semantic category of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    WallHit,
    FlipperHit,
    BumperHit,
    TargetHit,
    SpecialTargetHit,
    LossSensorHit,
    BlackHoleHit,
    CollectibleHit,
    SpecialPolygonHit,
}

/// Rejected role registration.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleError {
    /// The body already carries a role.
    AlreadyRegistered { role: Role },
}

impl fmt::Display for RoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleError::AlreadyRegistered { role } => {
                write!(f, "body is already registered as {:?}", role)
            }
        }
    }
}

impl std::error::Error for RoleError {}

/// Role registries for one table.
#[derive(Debug, Clone, Default)]
pub struct CollisionRoles {
    /// Members per role, in registration order
    members: HashMap<Role, Vec<BodyHandle>>,
    by_id: HashMap<BodyId, Role>,
}

impl CollisionRoles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag `handle` with `role`. A body holds at most one role at a time.
    pub fn register(&mut self, handle: BodyHandle, role: Role) -> Result<(), RoleError> {
        if let Some(&existing) = self.by_id.get(&handle.id) {
            return Err(RoleError::AlreadyRegistered { role: existing });
        }
        self.by_id.insert(handle.id, role);
        self.members.entry(role).or_default().push(handle);
        Ok(())
    }

    /// Drop whatever role `handle` carries. Returns the removed role.
    pub fn unregister(&mut self, handle: &BodyHandle) -> Option<Role> {
        let role = self.by_id.remove(&handle.id)?;
        if let Some(list) = self.members.get_mut(&role) {
            list.retain(|h| h.id != handle.id);
        }
        Some(role)
    }

    pub fn role_of(&self, handle: &BodyHandle) -> Option<Role> {
        self.by_id.get(&handle.id).copied()
    }

    /// Registered bodies for `role`, oldest first.
    pub fn members(&self, role: Role) -> &[BodyHandle] {
        self.members.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Category of a contact between `a` and `b` (order does not matter).
    pub fn classify(&self, a: &BodyHandle, b: &BodyHandle) -> CollisionKind {
        [self.role_of(a), self.role_of(b)]
            .into_iter()
            .flatten()
            .min()
            .map_or(CollisionKind::WallHit, Role::collision)
    }
}
