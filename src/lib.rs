//! Flappy Sim - deterministic core of a side-scrolling flappy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, obstacles, scoring, state machine)
//! - `replay`: Run recording, ghost playback and replay verification
//! - `session`: Headless frame driver tying input, simulation and persistence together
//! - `config`: Immutable tunables and difficulty presets
//! - `economy`: Coin rewards for finished runs
//! - `mode`: Game modes, run seeds and daily keys
//! - `persistence`: Versioned save snapshot and replay storage
//! - `platform`: Browser/native storage and clock abstraction

pub mod config;
pub mod economy;
pub mod mode;
pub mod persistence;
pub mod platform;
pub mod replay;
pub mod session;
pub mod sim;

pub use config::{ConfigError, Difficulty, GameConfig};
pub use economy::coins_for_score;
pub use mode::{GameMode, SeedSpec};
pub use persistence::{ProgressStore, SaveSnapshot};
pub use replay::{ReplayData, ReplayPlayer, ReplayRecorder, verify_replay};
pub use session::{RenderView, RunResult, Session};

/// Simulation rate and replay format constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const FIXED_STEP_MS: f64 = 1000.0 / 60.0;
    /// Fixed simulation timestep in seconds
    pub const FIXED_STEP_SECS: f32 = 1.0 / 60.0;
    /// Upper bound on a single frame delta fed to the simulation
    pub const MAX_FRAME_MS: f64 = 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Replay JSON format version
    pub const REPLAY_VERSION: u32 = 1;
    /// Maximum number of flaps stored in one replay
    pub const MAX_REPLAY_FLAPS: usize = 5000;
    /// Maximum length of free-text replay labels (seed label, mode, preset)
    pub const MAX_REPLAY_LABEL_LEN: usize = 64;
}

/// Clamp `value` into `[min, max]` without panicking when `min > max`.
///
/// A degenerate range resolves to `min`, so a too-large gap sits against the
/// top margin instead of aborting the frame.
#[inline]
pub fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
