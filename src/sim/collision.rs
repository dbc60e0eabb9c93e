//! Collision queries: bird circle against the ground and pipe rectangles
//!
//! Stateless. Called once per step while playing.

use glam::Vec2;

use super::bird::Bird;
use super::pipe::PipePair;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.max(self.min).min(self.max)
    }
}

/// What the bird hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Ground,
    /// Index into the pipe slice
    Pipe(usize),
}

/// Circle vs rectangle: closest-point distance within the radius
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    center.distance_squared(rect.closest_point(center)) <= radius * radius
}

/// Top and bottom rectangles of a pipe pair
pub fn pipe_rects(pipe: &PipePair) -> [Rect; 2] {
    [
        Rect::new(pipe.x, 0.0, pipe.width, pipe.top_height()),
        Rect::new(pipe.x, pipe.bottom_y(), pipe.width, pipe.bottom_height()),
    ]
}

/// Bird's bottom edge at or past the ground plane
#[inline]
pub fn hits_ground(bird: &Bird, ground_y: f32) -> bool {
    bird.y + bird.radius >= ground_y
}

/// First collision found, ground before pipes
pub fn first_collision(bird: &Bird, pipes: &[PipePair], ground_y: f32) -> Option<Collision> {
    if hits_ground(bird, ground_y) {
        return Some(Collision::Ground);
    }
    let center = bird.center();
    pipes
        .iter()
        .position(|pipe| {
            pipe_rects(pipe)
                .iter()
                .any(|rect| circle_rect_overlap(center, bird.radius, rect))
        })
        .map(Collision::Pipe)
}

/// True if the bird touches the ground or any pipe
pub fn check(bird: &Bird, pipes: &[PipePair], ground_y: f32) -> bool {
    first_collision(bird, pipes, ground_y).is_some()
}
