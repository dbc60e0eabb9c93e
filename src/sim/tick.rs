//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly `FIXED_STEP_MS`. Order within a
//! step: flap, bird, spawn, pipe scroll and variant, despawn, collision,
//! score. Variants are applied before collision and scoring read pipe
//! geometry.

use super::collision::{Collision, first_collision};
use super::despawn::despawn_offscreen;
use super::pipe::PipeSpawn;
use super::world::World;
use crate::consts::{FIXED_STEP_MS, FIXED_STEP_SECS};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub flap: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub collision: Option<Collision>,
    /// Pipes passed this step
    pub points: u32,
    /// Pipes spawned this step
    pub spawned: u32,
}

impl StepOutcome {
    pub fn hit(&self) -> bool {
        self.collision.is_some()
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) -> StepOutcome {
    let dt = FIXED_STEP_SECS;
    let dt_ms = FIXED_STEP_MS;
    let ground_y = world.ground.y;
    let base_gap = world.config.pipes.gap;
    let speed = world.config.pipes.speed;
    let template = PipeSpawn {
        x: world.config.playfield.width + world.config.pipes.spawn_offset,
        gap_y: 0.0,
        gap: base_gap,
        width: world.config.pipes.width,
        floor_y: ground_y,
    };

    if input.flap {
        world.bird.flap();
    }
    world.bird.update(dt, ground_y);

    let World {
        rng,
        bird,
        pipes,
        variants,
        pool,
        spawner,
        variant_system,
        score,
        steps,
        ..
    } = world;

    let spawned = spawner.update(dt_ms, base_gap, &mut **rng, |gap_y, rng| {
        let variant = variant_system.create_variant(gap_y, rng);
        pipes.push(pool.acquire(PipeSpawn {
            gap_y,
            gap: base_gap * variant.gap_multiplier,
            ..template
        }));
        variants.push(variant);
    });

    variant_system.update(dt_ms);
    for (pipe, variant) in pipes.iter_mut().zip(variants.iter()) {
        pipe.update(dt, speed);
        variant_system.apply_variant(pipe, variant, base_gap);
    }

    despawn_offscreen(pipes, pool, |_, index| {
        variants.remove(index);
    });

    let collision = first_collision(bird, pipes, ground_y);
    let points = score.update(bird.x, pipes);
    *steps += 1;

    StepOutcome {
        collision,
        points,
        spawned,
    }
}
