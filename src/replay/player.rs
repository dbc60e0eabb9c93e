//! Ghost playback of a recorded run
//!
//! The player drains host frame time in whole fixed steps and never applies
//! a partial step, so the ghost bird follows exactly the trajectory of the
//! live run regardless of the rendering frame rate.

use super::data::ReplayData;
use crate::config::BirdConfig;
use crate::consts::{FIXED_STEP_MS, FIXED_STEP_SECS};
use crate::sim::Bird;

/// True once a recorded offset is due at `elapsed_ms`.
///
/// Offsets are stored rounded to whole milliseconds, so they are compared
/// against the rounded step time.
#[inline]
pub(crate) fn flap_due(offset: u32, elapsed_ms: f64) -> bool {
    offset as f64 <= elapsed_ms.round()
}

#[derive(Debug, Clone)]
pub struct ReplayPlayer {
    bird_config: BirdConfig,
    bird: Bird,
    replay: Option<ReplayData>,
    accumulator_ms: f64,
    steps: u64,
    cursor: usize,
    active: bool,
}

impl ReplayPlayer {
    pub fn new(bird_config: &BirdConfig) -> Self {
        Self {
            bird_config: *bird_config,
            bird: Bird::new(bird_config),
            replay: None,
            accumulator_ms: 0.0,
            steps: 0,
            cursor: 0,
            active: false,
        }
    }

    /// Restart playback of `replay` from its first step
    pub fn start(&mut self, replay: ReplayData) {
        self.bird.reset(self.bird_config.start_y);
        self.accumulator_ms = 0.0;
        self.steps = 0;
        self.cursor = 0;
        self.active = true;
        log::debug!(
            "Ghost playback: seed {}, {} flaps, {}ms",
            replay.seed,
            replay.flaps.len(),
            replay.duration_ms
        );
        self.replay = Some(replay);
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn replay(&self) -> Option<&ReplayData> {
        self.replay.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.steps as f64 * FIXED_STEP_MS
    }

    /// Feed `dt_ms` of host time. Returns the number of fixed steps taken.
    pub fn update(&mut self, dt_ms: f64, ground_y: f32) -> u32 {
        let Some(replay) = self.replay.as_ref() else {
            return 0;
        };
        if !self.active {
            return 0;
        }

        self.accumulator_ms += dt_ms.max(0.0);
        let mut taken = 0;
        while self.accumulator_ms >= FIXED_STEP_MS {
            if finished(self.steps, replay) {
                break;
            }
            self.accumulator_ms -= FIXED_STEP_MS;

            let elapsed = self.steps as f64 * FIXED_STEP_MS;
            while self.cursor < replay.flaps.len() && flap_due(replay.flaps[self.cursor], elapsed) {
                self.bird.flap();
                self.cursor += 1;
            }
            self.bird.update(FIXED_STEP_SECS, ground_y);
            self.steps += 1;
            taken += 1;
        }

        if finished(self.steps, replay) {
            self.active = false;
        }
        taken
    }
}

#[inline]
fn finished(steps: u64, replay: &ReplayData) -> bool {
    (steps as f64 * FIXED_STEP_MS).round() >= replay.duration_ms as f64
}
