//! Gap geometry and the timer-driven obstacle spawner

use super::rng::{RandomSource, random_range};
use crate::clamp_range;
use crate::config::GameConfig;

/// Inclusive range of legal gap centres for one gap height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapBounds {
    pub min: f32,
    pub max: f32,
}

impl GapBounds {
    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        y >= self.min && y <= self.max
    }

    /// Clamp into the range; a degenerate range resolves to `min`
    #[inline]
    pub fn clamp(&self, y: f32) -> f32 {
        clamp_range(y, self.min, self.max)
    }
}

/// Vertical limits a gap must stay within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapGeometry {
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub floor_y: f32,
}

impl GapGeometry {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            top_margin: config.pipes.top_margin,
            bottom_margin: config.pipes.bottom_margin,
            floor_y: config.playfield.floor_y(),
        }
    }

    /// Centres that keep a gap of height `gap` fully between the margins
    pub fn gap_center_bounds(&self, gap: f32) -> GapBounds {
        GapBounds {
            min: self.top_margin + gap / 2.0,
            max: self.floor_y - self.bottom_margin - gap / 2.0,
        }
    }

    /// Uniform gap centre for `gap`, one RNG draw
    pub fn generate_gap_center_y(&self, rng: &mut dyn RandomSource, gap: f32) -> f32 {
        let bounds = self.gap_center_bounds(gap);
        // Guard against a one-ulp overshoot of min + (max - min)
        bounds.clamp(random_range(rng, bounds.min, bounds.max))
    }
}

/// Fires a spawn every `interval_ms`, catching up on long frames
#[derive(Debug, Clone)]
pub struct SpawnSystem {
    geometry: GapGeometry,
    interval_ms: f64,
    timer_ms: f64,
}

impl SpawnSystem {
    pub fn new(config: &GameConfig) -> Self {
        let interval_ms = config.pipes.spawn_interval_ms;
        Self {
            geometry: GapGeometry::new(config),
            interval_ms,
            timer_ms: interval_ms,
        }
    }

    pub fn geometry(&self) -> &GapGeometry {
        &self.geometry
    }

    /// Time until the next spawn
    pub fn timer_ms(&self) -> f64 {
        self.timer_ms
    }

    /// Advance the timer. Calls `on_spawn(gap_center, rng)` once per elapsed
    /// interval and returns how many spawns fired.
    pub fn update<F>(
        &mut self,
        dt_ms: f64,
        gap: f32,
        rng: &mut dyn RandomSource,
        mut on_spawn: F,
    ) -> u32
    where
        F: FnMut(f32, &mut dyn RandomSource),
    {
        if self.interval_ms <= 0.0 {
            return 0;
        }
        self.timer_ms -= dt_ms;
        let mut fired = 0;
        while self.timer_ms <= 0.0 {
            self.timer_ms += self.interval_ms;
            let gap_y = self.geometry.generate_gap_center_y(rng, gap);
            on_spawn(gap_y, rng);
            fired += 1;
        }
        fired
    }

    /// Re-arm to a full interval
    pub fn reset(&mut self) {
        self.timer_ms = self.interval_ms;
    }
}
