//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pipes oldest first)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod despawn;
pub mod input;
pub mod pipe;
pub mod pool;
pub mod rng;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod variant;
pub mod world;

pub use bird::Bird;
pub use collision::{Collision, Rect, check, circle_rect_overlap, first_collision};
pub use despawn::despawn_offscreen;
pub use input::InputSystem;
pub use pipe::{Ground, PipePair, PipeSpawn};
pub use pool::{Pool, Recycle};
pub use rng::{HostRandom, Lcg, RandomSource, ScriptedRandom};
pub use score::ScoreSystem;
pub use spawn::{GapBounds, GapGeometry, SpawnSystem};
pub use state::{GameEvent, GameState, GameStateMachine};
pub use tick::{StepOutcome, TickInput, tick};
pub use variant::{ObstacleVariant, ObstacleVariantSystem, VariantKind};
pub use world::World;
