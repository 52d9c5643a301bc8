//! Occluders: floor shadow casters and vertical wall segments.
//!
//! Both are axis-aligned rectangles. The editor that moves and resizes them
//! lives elsewhere; this module only derives the geometry the lighting
//! pipeline needs.

use crate::geometry::{Bounds, Vec2};

/// Smallest shadow depth a floor occluder may have
pub const MIN_DEPTH: f32 = 0.2;

/// Editor increment for depth and offset adjustments
pub const PARAM_STEP: f32 = 0.2;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rectangle { position: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    /// Corners in clockwise screen order: top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn vertices(&self) -> [Vec2; 4] {
        let Rectangle { position: p, size: s } = *self;
        [
            Vec2::new(p.x, p.y),
            Vec2::new(p.x + s.x, p.y),
            Vec2::new(p.x + s.x, p.y + s.y),
            Vec2::new(p.x, p.y + s.y),
        ]
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            top: self.position.y,
            bottom: self.position.y + self.size.y,
            left: self.position.x,
            right: self.position.x + self.size.x,
        }
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let b = self.bounds();
        p.x >= b.left && p.x < b.right && p.y >= b.top && p.y < b.bottom
    }
}

/// A floor-standing object that casts shadows away from each light
#[derive(Debug, Clone, PartialEq)]
pub struct FloorOccluder {
    pub footprint: Rectangle,
    /// Shadow length per unit of light-to-vertex distance
    pub depth: f32,
    /// Height of the object's top above the floor, as a fraction of the
    /// light-to-vertex distance
    pub offset: f32,
}

impl FloorOccluder {
    pub fn new(footprint: Rectangle, depth: f32, offset: f32) -> Self {
        FloorOccluder { footprint, depth, offset }
    }

    pub fn vertices(&self) -> [Vec2; 4] {
        self.footprint.vertices()
    }

    pub fn bottom(&self) -> f32 {
        self.footprint.bottom()
    }

    pub fn is_elevated(&self) -> bool {
        self.offset > 0.0
    }

    /// Footprint pushed away from `light` by `offset` times the
    /// light-to-vertex vector.
    pub fn elevated_vertices(&self, light: Vec2) -> [Vec2; 4] {
        self.vertices().map(|v| v + (v - light) * self.offset)
    }

    pub fn adjust_depth(&mut self, delta: f32) {
        self.depth = (self.depth + delta).max(MIN_DEPTH);
    }

    pub fn adjust_offset(&mut self, delta: f32) {
        self.offset = (self.offset + delta).max(0.0);
    }
}

/// A vertical wall; its bottom edge is the baseline it stands on
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    pub footprint: Rectangle,
}

impl WallSegment {
    pub fn new(footprint: Rectangle) -> Self {
        WallSegment { footprint }
    }

    pub fn vertices(&self) -> [Vec2; 4] {
        self.footprint.vertices()
    }

    pub fn bounds(&self) -> Bounds {
        self.footprint.bounds()
    }

    /// Baseline y-coordinate
    pub fn bottom(&self) -> f32 {
        self.footprint.bottom()
    }

    pub fn top(&self) -> f32 {
        self.footprint.top()
    }
}

/// Either kind of occluder, as stored in a scene's actor list
#[derive(Debug, Clone, PartialEq)]
pub enum Occluder {
    Floor(FloorOccluder),
    Wall(WallSegment),
}
