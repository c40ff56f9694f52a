//! Ball rig helpers: plunger charge and loss-sensor debounce.

use crate::tuning::LaunchTuning;

/// Plunger charge that builds while the launch input is held.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaunchCharge {
    charge: f32,
    charging: bool,
}

impl LaunchCharge {
    /// Accumulate `dt` seconds of charge, capped at the maximum impulse.
    pub fn hold(&mut self, dt: f32, tuning: &LaunchTuning) {
        self.charging = true;
        self.charge = (self.charge + tuning.charge_speed * dt.max(0.0)).min(tuning.max_impulse);
    }

    /// Let go of the plunger. Returns the impulse (N·s) to apply, or `None`
    /// if nothing was being charged.
    pub fn release(&mut self, tuning: &LaunchTuning) -> Option<f32> {
        if !self.charging {
            return None;
        }
        let impulse = self.charge.clamp(tuning.min_impulse, tuning.max_impulse);
        self.reset();
        Some(impulse)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Charge as a fraction of the maximum, for a plunger gauge.
    pub fn ratio(&self, tuning: &LaunchTuning) -> f32 {
        if tuning.max_impulse > 0.0 {
            (self.charge / tuning.max_impulse).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Countdown armed by a loss-sensor touch.
///
/// The ball is only lost if it is still past the sensor when the countdown
/// runs out; coming back into play first cancels it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LossDebounce {
    remaining: Option<f32>,
}

impl LossDebounce {
    /// Start the countdown. Re-arming while armed keeps the original deadline.
    pub fn arm(&mut self, duration: f32) {
        if self.remaining.is_none() {
            self.remaining = Some(duration);
        }
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance the countdown. Returns true exactly once, when it expires
    /// with the ball still past the sensor.
    pub fn update(&mut self, dt: f32, ball_past_sensor: bool) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        if !ball_past_sensor {
            self.remaining = None;
            return false;
        }

        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(remaining);
            false
        }
    }
}
