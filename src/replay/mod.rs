//! Run recording, ghost playback and verification
//!
//! A replay is a seed plus the flap timeline in whole milliseconds from the
//! start of the run. Given the same configuration it regenerates the run.

pub mod data;
pub mod player;
pub mod recorder;
pub mod verify;

pub use data::{ReplayData, ReplayError, ReplayMeta};
pub use player::ReplayPlayer;
pub use recorder::ReplayRecorder;
pub use verify::{Verification, verify_replay};
