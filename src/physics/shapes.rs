//! Shape preparation helpers
//!
//! Vertex clean-up for chains/loops and the flipper arm outline. Everything
//! here works in simulation units (meters, Y up).

use glam::Vec2;

/// Drop vertices closer than `min_distance` to any vertex already kept.
///
/// The first vertex always survives. Near-duplicate vertices produce
/// zero-length or collinear segments that destabilize narrow-phase contact
/// generation, so chains and loops pass through here before building.
pub fn filter_close_vertices(vertices: &[Vec2], min_distance: f32) -> Vec<Vec2> {
    let min_sq = min_distance * min_distance;
    let mut kept: Vec<Vec2> = Vec::with_capacity(vertices.len());

    for &v in vertices {
        if kept.iter().all(|k| k.distance_squared(v) >= min_sq) {
            kept.push(v);
        }
    }

    if kept.len() != vertices.len() {
        log::debug!("Filtered vertices: {} -> {}", vertices.len(), kept.len());
    }
    kept
}

/// Which side of the table a flipper sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

impl FlipperSide {
    /// +1 for left (driven counter-clockwise), -1 for right.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            FlipperSide::Left => 1.0,
            FlipperSide::Right => -1.0,
        }
    }
}

/// Tapered quad for a flipper arm, pivot at the local origin.
///
/// The arm is wide at the pivot and narrows toward the tip; a left arm
/// extends toward +X, a right arm toward -X.
pub fn flipper_outline(length: f32, thickness: f32, side: FlipperSide) -> [Vec2; 4] {
    let reach = length * 0.8 * side.sign();
    [
        Vec2::new(0.0, -thickness / 2.0),
        Vec2::new(reach, -thickness / 4.0),
        Vec2::new(reach, thickness / 4.0),
        Vec2::new(0.0, thickness / 2.0),
    ]
}

/// Joint limits `[lower, upper]` in radians (counter-clockwise positive).
///
/// Mirrored between sides: the left arm rests slightly down and swings up
/// counter-clockwise; the right arm rests slightly down and swings up clockwise.
pub fn flipper_limits(side: FlipperSide, rest: f32, swing: f32) -> [f32; 2] {
    match side {
        FlipperSide::Left => [-rest, swing],
        FlipperSide::Right => [-swing, rest],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_vertex_and_drops_duplicates() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.01, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.02),
            Vec2::new(2.0, 1.0),
        ];
        let kept = filter_close_vertices(&pts, 0.05);
        assert_eq!(kept, vec![pts[0], pts[2], pts[4]]);
    }

    #[test]
    fn test_filter_checks_against_all_kept_vertices() {
        // Last point returns next to the first one.
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.02, 0.01),
        ];
        assert_eq!(filter_close_vertices(&pts, 0.05).len(), 3);
    }

    #[test]
    fn test_outlines_mirror_each_other() {
        let left = flipper_outline(2.0, 0.4, FlipperSide::Left);
        let right = flipper_outline(2.0, 0.4, FlipperSide::Right);
        for (l, r) in left.iter().zip(right.iter()) {
            assert_eq!(l.x, -r.x);
            assert_eq!(l.y, r.y);
        }
        assert!(left[1].x > 0.0);
    }

    #[test]
    fn test_limits_are_mirrored() {
        let [ll, lu] = flipper_limits(FlipperSide::Left, 0.3, 0.7);
        let [rl, ru] = flipper_limits(FlipperSide::Right, 0.3, 0.7);
        assert_eq!(ll, -ru);
        assert_eq!(lu, -rl);
    }
}
