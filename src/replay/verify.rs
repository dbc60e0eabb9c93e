//! Full re-simulation of a replay
//!
//! Rebuilds the whole world (pipes, variants, scoring) from the recorded seed
//! and flap timeline. A replay recorded on the fixed-step live simulation
//! reproduces its score exactly.

use super::data::ReplayData;
use super::player::flap_due;
use crate::config::GameConfig;
use crate::sim::{TickInput, World, tick};

/// Result of re-running a replay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub score: u32,
    pub steps: u64,
    pub elapsed_ms: f64,
    /// The re-run ended in a collision
    pub crashed: bool,
}

impl Verification {
    /// The re-run crashed with the score the replay claims
    pub fn matches(&self, replay: &ReplayData) -> bool {
        self.crashed && self.score == replay.score
    }
}

/// Replay `replay` through a fresh world built from `config`
pub fn verify_replay(replay: &ReplayData, config: &GameConfig) -> Verification {
    let mut world = World::new(config, replay.seed);
    let mut cursor = 0;
    let mut crashed = false;

    while world.elapsed_ms().round() < replay.duration_ms as f64 {
        let elapsed = world.elapsed_ms();
        let mut flap = false;
        while cursor < replay.flaps.len() && flap_due(replay.flaps[cursor], elapsed) {
            flap = true;
            cursor += 1;
        }
        if tick(&mut world, &TickInput { flap }).hit() {
            crashed = true;
            break;
        }
    }

    let result = Verification {
        score: world.score(),
        steps: world.steps(),
        elapsed_ms: world.elapsed_ms(),
        crashed,
    };
    if !result.matches(replay) {
        log::warn!(
            "Replay seed {} claims score {} but re-run gives {} (crashed: {})",
            replay.seed,
            replay.score,
            result.score,
            result.crashed
        );
    }
    result
}
