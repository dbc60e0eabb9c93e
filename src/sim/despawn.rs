//! Removal of pipes that scrolled off the left edge

use super::pipe::PipePair;
use super::pool::Pool;

/// Remove every pipe whose trailing edge is past x=0 and return it to `pool`.
///
/// Iterates in reverse so removals never shift an unvisited index.
/// `on_despawn(pipe, index)` runs before the pipe is pooled, letting callers
/// drop parallel per-pipe data at the same index. Returns the number removed.
pub fn despawn_offscreen<F>(
    pipes: &mut Vec<PipePair>,
    pool: &mut Pool<PipePair>,
    mut on_despawn: F,
) -> usize
where
    F: FnMut(&PipePair, usize),
{
    let mut removed = 0;
    for index in (0..pipes.len()).rev() {
        if pipes[index].right() < 0.0 {
            let pipe = pipes.remove(index);
            on_despawn(&pipe, index);
            pool.release(pipe);
            removed += 1;
        }
    }
    removed
}
