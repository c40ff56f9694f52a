//! Screen-space ↔ simulation-space projection
//!
//! The table is described in screen pixels (origin top-left, Y down). The
//! simulation runs in meters with Y up. Every crossing between the two goes
//! through [`Projection`] so no other module flips axes or rescales.

use glam::Vec2;

/// Maps screen pixels to simulation meters for a table of fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pixels_per_meter: f32,
    screen_height: f32,
}

impl Projection {
    pub fn new(pixels_per_meter: f32, screen_height: f32) -> Self {
        Self {
            pixels_per_meter,
            screen_height,
        }
    }

    #[inline]
    pub fn pixels_per_meter(&self) -> f32 {
        self.pixels_per_meter
    }

    #[inline]
    pub fn screen_height(&self) -> f32 {
        self.screen_height
    }

    /// Absolute screen point → simulation point.
    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.pixels_per_meter,
            (self.screen_height - screen.y) / self.pixels_per_meter,
        )
    }

    /// Absolute simulation point → screen point.
    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x * self.pixels_per_meter,
            self.screen_height - world.y * self.pixels_per_meter,
        )
    }

    /// Offset relative to a body origin (no height translation, Y flipped).
    #[inline]
    pub fn offset_to_world(&self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x, -offset.y) / self.pixels_per_meter
    }

    /// Screen length → meters.
    #[inline]
    pub fn length_to_world(&self, pixels: f32) -> f32 {
        pixels / self.pixels_per_meter
    }

    /// Simulation velocity (m/s, Y up) → screen velocity (px/s, Y down).
    #[inline]
    pub fn velocity_to_screen(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y) * self.pixels_per_meter
    }

    /// Screen velocity (px/s, Y down) → simulation velocity (m/s, Y up).
    #[inline]
    pub fn velocity_to_world(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y) / self.pixels_per_meter
    }

    /// Flip a physical vector (force, impulse) between orientations.
    /// Magnitudes are physical units on both sides.
    #[inline]
    pub fn flip(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y)
    }

    /// Angles are counter-clockwise in the simulation, clockwise on screen.
    #[inline]
    pub fn flip_angle(&self, angle: f32) -> f32 {
        -angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_maps_to_top_of_world() {
        let proj = Projection::new(50.0, 1000.0);
        let w = proj.to_world(Vec2::new(0.0, 0.0));
        assert!((w.y - 20.0).abs() < 1e-5);
        assert!(w.x.abs() < 1e-5);
    }

    #[test]
    fn test_velocity_flips_vertical_axis() {
        let proj = Projection::new(50.0, 1000.0);
        let down_screen = Vec2::new(0.0, 100.0);
        let w = proj.velocity_to_world(down_screen);
        assert!(w.y < 0.0);
        assert_eq!(proj.velocity_to_screen(w), down_screen);
    }
}
