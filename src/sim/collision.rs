//! Axis-aligned collision geometry
//!
//! Everything in the arena is a box: players, items, and (for hit tests)
//! the single contact point of a projectile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `min` is the top-left corner (screen coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            min: center - Vec2::splat(size / 2.0),
            size: Vec2::splat(size),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.min.x + self.size.x / 2.0
    }

    /// Strict point containment (points on an edge are outside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}
