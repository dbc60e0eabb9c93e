//! Pass-through scoring

use super::pipe::PipePair;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSystem {
    pub score: u32,
}

impl ScoreSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score every unscored pipe whose trailing edge is strictly behind `bird_x`.
    /// Returns the points gained by this call.
    pub fn update(&mut self, bird_x: f32, pipes: &mut [PipePair]) -> u32 {
        let mut gained = 0;
        for pipe in pipes.iter_mut().filter(|p| !p.scored && p.right() < bird_x) {
            pipe.scored = true;
            gained += 1;
        }
        self.score += gained;
        gained
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
