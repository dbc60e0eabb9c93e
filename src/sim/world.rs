//! Simulation world: every entity and system of one run
//!
//! All state that determines a run lives here. A `World` seeded with the
//! same value and fed the same flap steps evolves identically.

use super::bird::Bird;
use super::pipe::{Ground, PipePair};
use super::pool::Pool;
use super::rng::{Lcg, RandomSource};
use super::score::ScoreSystem;
use super::spawn::SpawnSystem;
use super::variant::{ObstacleVariant, ObstacleVariantSystem};
use crate::config::GameConfig;
use crate::consts::FIXED_STEP_MS;

pub struct World {
    pub(crate) config: GameConfig,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) bird: Bird,
    pub(crate) ground: Ground,
    /// Active pipes, oldest first
    pub(crate) pipes: Vec<PipePair>,
    /// Variant for the pipe at the same index
    pub(crate) variants: Vec<ObstacleVariant>,
    pub(crate) pool: Pool<PipePair>,
    pub(crate) spawner: SpawnSystem,
    pub(crate) variant_system: ObstacleVariantSystem,
    pub(crate) score: ScoreSystem,
    pub(crate) steps: u64,
}

impl World {
    /// Create a world driven by the seeded LCG
    pub fn new(config: &GameConfig, seed: u32) -> Self {
        Self::with_rng(config, Box::new(Lcg::new(seed)))
    }

    /// Create a world with any random source (unseeded play, scripted tests)
    pub fn with_rng(config: &GameConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config: config.clone(),
            rng,
            bird: Bird::new(&config.bird),
            ground: Ground::new(&config.playfield),
            pipes: Vec::new(),
            variants: Vec::new(),
            pool: Pool::new(),
            spawner: SpawnSystem::new(config),
            variant_system: ObstacleVariantSystem::new(config),
            score: ScoreSystem::new(),
            steps: 0,
        }
    }

    /// Start over with a fresh seeded LCG
    pub fn reset(&mut self, seed: u32) {
        self.reset_with_rng(Box::new(Lcg::new(seed)));
    }

    /// Start over: bird back to start height, all pipes back in the pool
    pub fn reset_with_rng(&mut self, rng: Box<dyn RandomSource>) {
        self.rng = rng;
        for pipe in self.pipes.drain(..) {
            self.pool.release(pipe);
        }
        self.variants.clear();
        self.bird.reset(self.config.bird.start_y);
        self.spawner.reset();
        self.variant_system.reset();
        self.score.reset();
        self.steps = 0;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn pipes(&self) -> &[PipePair] {
        &self.pipes
    }

    pub fn variants(&self) -> &[ObstacleVariant] {
        &self.variants
    }

    pub fn score(&self) -> u32 {
        self.score.score
    }

    /// Fixed steps taken since the run started
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulation time since the run started
    pub fn elapsed_ms(&self) -> f64 {
        self.steps as f64 * FIXED_STEP_MS
    }

    /// Idle pipes waiting in the pool
    pub fn pooled_pipes(&self) -> usize {
        self.pool.len()
    }
}
