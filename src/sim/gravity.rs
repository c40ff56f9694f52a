//! Black-hole gravity wells
//!
//! Each well pulls the ball with an inverse-square force applied every tick,
//! which bends the ball's path instead of kicking it. The pull fades to zero
//! at the edge of the attraction radius so entering a well is smooth.

use glam::Vec2;

use crate::physics::{BodyHandle, PhysicsWorld};
use crate::tuning::GravityWellTuning;

/// Force (N, simulation space) a well at `well` exerts on a body of `mass`
/// at `body`.
///
/// Zero outside the attraction radius or at a degenerate separation. The
/// distance is floored at `min_distance` so the pull stays bounded near the
/// center.
pub fn well_force(body: Vec2, well: Vec2, mass: f32, tuning: &GravityWellTuning) -> Vec2 {
    let delta = well - body;
    let dist_sq = delta.length_squared();
    let radius_sq = tuning.radius * tuning.radius;
    if !dist_sq.is_finite() || dist_sq <= f32::EPSILON || dist_sq >= radius_sq {
        return Vec2::ZERO;
    }

    let floor_sq = tuning.min_distance * tuning.min_distance;
    let magnitude = tuning.strength * mass / dist_sq.max(floor_sq);
    let falloff = 1.0 - dist_sq / radius_sq;

    delta / dist_sq.sqrt() * magnitude * falloff
}

/// Apply every well's pull to `ball` for the coming step.
pub fn apply_gravity_wells(
    world: &mut PhysicsWorld,
    ball: &BodyHandle,
    wells: &[BodyHandle],
    tuning: &GravityWellTuning,
) {
    let (Some(pos), Some(mass)) = (world.world_position(ball), world.mass(ball)) else {
        return;
    };

    let total = wells
        .iter()
        .filter_map(|well| world.world_position(well))
        .map(|center| well_force(pos, center, mass, tuning))
        .fold(Vec2::ZERO, |acc, f| acc + f);

    if total != Vec2::ZERO {
        world.apply_world_force(ball, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::BodyKind;
    use crate::tuning::PhysicsTuning;

    #[test]
    fn test_pulls_toward_the_well() {
        let tuning = GravityWellTuning::default();
        let f = well_force(Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), 1.0, &tuning);
        assert!(f.x > 0.0);
        assert!(f.y.abs() < 1e-6);
    }

    #[test]
    fn test_vanishes_at_the_radius() {
        let tuning = GravityWellTuning::default();
        let at_edge = well_force(Vec2::ZERO, Vec2::new(tuning.radius, 0.0), 1.0, &tuning);
        assert_eq!(at_edge, Vec2::ZERO);

        let just_inside =
            well_force(Vec2::ZERO, Vec2::new(tuning.radius - 1e-3, 0.0), 1.0, &tuning);
        assert!(just_inside.length() < 1e-3);
    }

    #[test]
    fn test_bounded_near_center() {
        let tuning = GravityWellTuning::default();
        let cap = tuning.strength / (tuning.min_distance * tuning.min_distance);
        let near = well_force(Vec2::ZERO, Vec2::new(1e-3, 0.0), 1.0, &tuning);
        assert!(near.length() <= cap * 1.001);
        assert_eq!(well_force(Vec2::ZERO, Vec2::ZERO, 1.0, &tuning), Vec2::ZERO);
    }

    #[test]
    fn test_scales_with_mass() {
        let tuning = GravityWellTuning::default();
        let light = well_force(Vec2::ZERO, Vec2::new(2.0, 1.0), 1.0, &tuning);
        let heavy = well_force(Vec2::ZERO, Vec2::new(2.0, 1.0), 3.0, &tuning);
        assert!((heavy - light * 3.0).length() < 1e-4);
    }

    #[test]
    fn test_well_bends_a_falling_ball() {
        let mut world = PhysicsWorld::new(&PhysicsTuning::default(), 1000.0);
        let ball = world
            .create_circle(300.0, 500.0, 15.0, BodyKind::Dynamic)
            .unwrap();
        let well = world.create_circle_sensor(450.0, 500.0, 25.0).unwrap();
        let tuning = GravityWellTuning::default();

        for _ in 0..20 {
            apply_gravity_wells(&mut world, &ball, &[well], &tuning);
            world.step(1.0 / 60.0);
        }
        assert!(world.velocity(&ball).unwrap().x > 0.0);
    }
}
