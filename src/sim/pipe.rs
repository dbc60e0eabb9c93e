//! Obstacle pairs and the ground plane

use serde::{Deserialize, Serialize};

use super::pool::Recycle;
use crate::config::PlayfieldConfig;

/// Everything a pooled pipe needs to start a new life
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeSpawn {
    pub x: f32,
    pub gap_y: f32,
    pub gap: f32,
    pub width: f32,
    pub floor_y: f32,
}

/// One top/bottom obstacle pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    /// Left edge
    pub x: f32,
    /// Vertical centre of the gap
    pub gap_y: f32,
    /// Gap height
    pub gap: f32,
    /// Set once the bird has passed the trailing edge
    pub scored: bool,
    pub width: f32,
    floor_y: f32,
}

impl PipePair {
    /// Scroll left by `speed * dt`
    pub fn update(&mut self, dt: f32, speed: f32) {
        self.x -= speed * dt;
    }

    /// Re-initialise in place for pool reuse
    pub fn reset(&mut self, x: f32, gap_y: f32, gap: f32) {
        self.x = x;
        self.gap_y = gap_y;
        self.gap = gap;
        self.scored = false;
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top_height(&self) -> f32 {
        (self.gap_y - self.gap / 2.0).max(0.0)
    }

    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.gap_y + self.gap / 2.0
    }

    #[inline]
    pub fn bottom_height(&self) -> f32 {
        (self.floor_y - self.bottom_y()).max(0.0)
    }

    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }
}

impl Recycle for PipePair {
    type Spawn = PipeSpawn;

    fn recycle(&mut self, spawn: PipeSpawn) {
        self.width = spawn.width;
        self.floor_y = spawn.floor_y;
        self.reset(spawn.x, spawn.gap_y, spawn.gap);
    }
}

/// Static ground strip; its top edge is the collision plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub y: f32,
    pub height: f32,
}

impl Ground {
    pub fn new(playfield: &PlayfieldConfig) -> Self {
        Self {
            y: playfield.floor_y(),
            height: playfield.ground_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe(gap_y: f32, gap: f32) -> PipePair {
        let mut p = PipePair::default();
        p.recycle(PipeSpawn {
            x: 300.0,
            gap_y,
            gap,
            width: 70.0,
            floor_y: 520.0,
        });
        p
    }

    #[test]
    fn test_derived_geometry() {
        let p = pipe(250.0, 100.0);
        assert_eq!(p.top_height(), 200.0);
        assert_eq!(p.bottom_y(), 300.0);
        assert_eq!(p.bottom_height(), 220.0);
        assert_eq!(p.right(), 370.0);
    }

    #[test]
    fn test_derived_geometry_clamps_to_zero() {
        let p = pipe(20.0, 100.0);
        assert_eq!(p.top_height(), 0.0);
        let p = pipe(510.0, 100.0);
        assert_eq!(p.bottom_height(), 0.0);
    }

    #[test]
    fn test_getters_track_mutation() {
        let mut p = pipe(250.0, 100.0);
        p.gap = 160.0;
        p.gap_y = 300.0;
        assert_eq!(p.top_height(), 220.0);
        assert_eq!(p.bottom_y(), 380.0);
    }

    #[test]
    fn test_update_scrolls_left() {
        let mut p = pipe(250.0, 100.0);
        p.update(0.5, 150.0);
        assert_eq!(p.x, 225.0);
    }

    #[test]
    fn test_reset_clears_scored() {
        let mut p = pipe(250.0, 100.0);
        p.scored = true;
        p.reset(400.0, 200.0, 120.0);
        assert!(!p.scored);
        assert_eq!((p.x, p.gap_y, p.gap), (400.0, 200.0, 120.0));
    }

    #[test]
    fn test_ground_from_playfield() {
        let g = Ground::new(&PlayfieldConfig::default());
        assert_eq!(g.y, 520.0);
        assert_eq!(g.height, 80.0);
    }
}
