//! The bird: a circular body with vertical physics only

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BirdConfig;

/// Player-controlled body. `x` never changes during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity in px/s (negative = up)
    pub velocity: f32,
    pub radius: f32,
    params: BirdConfig,
}

impl Bird {
    pub fn new(params: &BirdConfig) -> Self {
        Self {
            x: params.x,
            y: params.start_y,
            velocity: 0.0,
            radius: params.radius,
            params: *params,
        }
    }

    /// Centre of the collision circle
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Set velocity to the flap impulse. No cooldown.
    pub fn flap(&mut self) {
        self.velocity = self.params.flap_velocity;
    }

    /// Integrate one step of `dt` seconds. Returns true if the bird landed on the ground.
    pub fn update(&mut self, dt: f32, ground_y: f32) -> bool {
        let p = &self.params;
        self.velocity = (self.velocity + p.gravity * dt)
            .max(p.max_rise_speed)
            .min(p.max_fall_speed);
        self.y += self.velocity * dt;

        if self.y < self.radius {
            self.y = self.radius;
            self.velocity = 0.0;
        }

        // Checked last so the ground wins a degenerate double clamp
        if self.y + self.radius >= ground_y {
            self.y = ground_y - self.radius;
            self.velocity = 0.0;
            return true;
        }
        false
    }

    /// Back to the start height with no velocity
    pub fn reset(&mut self, start_y: f32) {
        self.y = start_y;
        self.velocity = 0.0;
    }

    /// Nose angle in radians for renderers, derived from velocity
    pub fn tilt(&self) -> f32 {
        let span = if self.velocity < 0.0 {
            -self.params.max_rise_speed
        } else {
            self.params.max_fall_speed
        };
        if span <= 0.0 {
            return 0.0;
        }
        (self.velocity / span).clamp(-1.0, 1.0) * std::f32::consts::FRAC_PI_4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 520.0;

    fn bird() -> Bird {
        Bird::new(&BirdConfig::default())
    }

    #[test]
    fn test_gravity_accelerates_downward() {
        let mut b = bird();
        let y0 = b.y;
        assert!(!b.update(0.1, GROUND));
        assert!(b.velocity > 0.0);
        assert!(b.y > y0);
    }

    #[test]
    fn test_flap_sets_impulse_unconditionally() {
        let mut b = bird();
        b.velocity = 300.0;
        b.flap();
        assert_eq!(b.velocity, BirdConfig::default().flap_velocity);
        b.flap();
        assert_eq!(b.velocity, BirdConfig::default().flap_velocity);
    }

    #[test]
    fn test_velocity_clamped_to_limits() {
        let cfg = BirdConfig::default();
        let mut b = bird();
        b.y = 100.0;
        for _ in 0..5 {
            b.update(0.05, 10_000.0);
        }
        assert!(b.velocity <= cfg.max_fall_speed);

        let mut b = Bird::new(&BirdConfig {
            flap_velocity: -5000.0,
            ..cfg
        });
        b.flap();
        b.update(0.0, GROUND);
        assert_eq!(b.velocity, cfg.max_rise_speed);
    }

    #[test]
    fn test_ceiling_clamp() {
        let mut b = bird();
        b.y = b.radius + 1.0;
        b.flap();
        assert!(!b.update(0.1, GROUND));
        assert_eq!(b.y, b.radius);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_ground_clamp_reports_hit() {
        let mut b = bird();
        b.y = GROUND - b.radius - 0.5;
        b.velocity = 400.0;
        assert!(b.update(0.05, GROUND));
        assert_eq!(b.y, GROUND - b.radius);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_ground_wins_degenerate_clamp() {
        // Ground above the ceiling clamp: both trigger, ground resolves last
        let mut b = bird();
        b.y = 5.0;
        assert!(b.update(0.01, 20.0));
        assert_eq!(b.y, 20.0 - b.radius);
    }

    #[test]
    fn test_reset() {
        let mut b = bird();
        b.y = 400.0;
        b.velocity = 123.0;
        b.reset(250.0);
        assert_eq!(b.y, 250.0);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_tilt_range() {
        let mut b = bird();
        b.flap();
        assert!(b.tilt() < 0.0);
        b.velocity = 10_000.0;
        assert!((b.tilt() - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }
}
