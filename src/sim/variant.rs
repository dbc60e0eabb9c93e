//! Per-spawn obstacle variants: static, moving and pulsing gaps
//!
//! A variant is rolled once when a pipe spawns and then re-applied every
//! step. Application always clamps the gap centre back into the legal band
//! for the gap's current height, so a moving or pulsing gap can never clip
//! the margins.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::pipe::PipePair;
use super::rng::{RandomSource, random_range};
use super::spawn::GapGeometry;
use crate::config::{GameConfig, VariantConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariantKind {
    #[default]
    Static,
    /// Gap centre oscillates vertically
    Moving,
    /// Gap height breathes in and out
    Pulse,
}

impl VariantKind {
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, VariantKind::Static)
    }
}

/// Gap behaviour attached to one pipe at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObstacleVariant {
    pub kind: VariantKind,
    pub base_gap_y: f32,
    pub gap_multiplier: f32,
    pub offset_amplitude: f32,
    /// Radians per millisecond
    pub offset_speed: f32,
    pub offset_phase: f32,
    /// Fraction of the gap added or removed at the pulse peak
    pub gap_pulse_amplitude: f32,
    /// Radians per millisecond
    pub gap_pulse_speed: f32,
    pub gap_pulse_phase: f32,
}

impl ObstacleVariant {
    /// A static gap centred on `base_gap_y`
    pub fn fixed(base_gap_y: f32, gap_multiplier: f32) -> Self {
        Self {
            base_gap_y,
            gap_multiplier,
            ..Default::default()
        }
    }
}

#[inline]
fn wave(elapsed_ms: f64, speed: f32, phase: f32) -> f32 {
    (elapsed_ms * speed as f64 + phase as f64).sin() as f32
}

#[derive(Debug, Clone)]
pub struct ObstacleVariantSystem {
    config: VariantConfig,
    geometry: GapGeometry,
    elapsed_ms: f64,
    dynamic_cooldown: u32,
}

impl ObstacleVariantSystem {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.variants,
            geometry: GapGeometry::new(config),
            elapsed_ms: 0.0,
            dynamic_cooldown: 0,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Spawns left before another dynamic variant is allowed
    pub fn dynamic_cooldown(&self) -> u32 {
        self.dynamic_cooldown
    }

    /// Roll the variant for a new spawn.
    ///
    /// Draw order: kind roll, gap multiplier, then amplitude/speed/phase for
    /// dynamic kinds.
    pub fn create_variant(
        &mut self,
        base_gap_y: f32,
        rng: &mut dyn RandomSource,
    ) -> ObstacleVariant {
        let c = &self.config;
        let roll = rng.next() as f32;
        let mut gap_multiplier = random_range(rng, c.gap_multiplier_min, c.gap_multiplier_max);

        let kind = if self.dynamic_cooldown > 0 {
            self.dynamic_cooldown -= 1;
            VariantKind::Static
        } else if roll < c.moving_chance {
            VariantKind::Moving
        } else if roll < c.moving_chance + c.pulse_chance {
            VariantKind::Pulse
        } else {
            VariantKind::Static
        };

        let mut variant = ObstacleVariant::fixed(base_gap_y, gap_multiplier);
        variant.kind = kind;

        match kind {
            VariantKind::Static => {}
            VariantKind::Moving => {
                variant.offset_amplitude =
                    random_range(rng, c.offset_amplitude_min, c.offset_amplitude_max);
                variant.offset_speed = random_range(rng, c.offset_speed_min, c.offset_speed_max);
                variant.offset_phase = (rng.next() * TAU) as f32;
            }
            VariantKind::Pulse => {
                variant.gap_pulse_amplitude =
                    random_range(rng, c.gap_pulse_amplitude_min, c.gap_pulse_amplitude_max);
                variant.gap_pulse_speed =
                    random_range(rng, c.gap_pulse_speed_min, c.gap_pulse_speed_max);
                variant.gap_pulse_phase = (rng.next() * TAU) as f32;
            }
        }

        if kind.is_dynamic() {
            gap_multiplier += c.dynamic_gap_bonus;
            variant.gap_multiplier = gap_multiplier;
            self.dynamic_cooldown = c.dynamic_cooldown;
            log::debug!("Dynamic obstacle {:?} at gap {:.1}", kind, base_gap_y);
        }

        variant
    }

    /// Recompute `pipe.gap` and `pipe.gap_y` for the current time
    pub fn apply_variant(&self, pipe: &mut PipePair, variant: &ObstacleVariant, base_gap: f32) {
        let pulse = match variant.kind {
            VariantKind::Pulse => {
                wave(self.elapsed_ms, variant.gap_pulse_speed, variant.gap_pulse_phase)
                    * variant.gap_pulse_amplitude
            }
            _ => 0.0,
        };
        pipe.gap = base_gap * variant.gap_multiplier * (1.0 + pulse);

        let gap_y = match variant.kind {
            VariantKind::Moving => {
                variant.base_gap_y
                    + wave(self.elapsed_ms, variant.offset_speed, variant.offset_phase)
                        * variant.offset_amplitude
            }
            _ => variant.base_gap_y,
        };
        pipe.gap_y = self.geometry.gap_center_bounds(pipe.gap).clamp(gap_y);
    }

    pub fn update(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.dynamic_cooldown = 0;
    }
}
