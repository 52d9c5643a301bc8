//! 2D geometry kernel: vectors, scalar interpolation and interval overlap.
//!
//! Everything here is a pure function over `f32` values in scene space
//! (x grows to the right, y grows downwards).

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector / point in scene space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length input yields `Vec2::ZERO`; callers that need a real
    /// direction must check the length first.
    pub fn normalize(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / len, self.y / len)
    }

    /// Rotate 90° clockwise on screen (y down). For a clockwise polygon
    /// this turns an edge direction into its outward normal.
    pub fn perp(self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }

    pub fn midpoint(self, other: Vec2) -> Vec2 {
        (self + other) * 0.5
    }

    pub fn round(self) -> Vec2 {
        Vec2::new(self.x.round(), self.y.round())
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Scalar helpers
// ============================================================================

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: the `t` for which `lerp(a, b, t) == v`.
///
/// Produces a non-finite value when `a == b`.
#[inline]
pub fn unlerp(a: f32, b: f32, v: f32) -> f32 {
    (v - a) / (b - a)
}

#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// X coordinate where segment `p -> q` crosses the horizontal line `y`,
/// clamped to the segment's x-range. `None` for a horizontal segment.
pub fn horizontal_intercept(p: Vec2, q: Vec2, y: f32) -> Option<f32> {
    let t = unlerp(p.y, q.y, y);
    if !t.is_finite() {
        return None;
    }
    Some(clamp(lerp(p.x, q.x, t), p.x.min(q.x), p.x.max(q.x)))
}

// ============================================================================
// Overlap tests
// ============================================================================

/// Intersection of two closed 1D intervals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f32,
    pub length: f32,
}

/// Axis-aligned box described by its four edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Intersection of two 2D boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub start: Vec2,
    pub size: Vec2,
}

impl Overlap {
    /// Corners in the same winding as a rectangle's vertices.
    pub fn vertices(&self) -> [Vec2; 4] {
        let Overlap { start, size } = *self;
        [
            start,
            Vec2::new(start.x + size.x, start.y),
            Vec2::new(start.x + size.x, start.y + size.y),
            Vec2::new(start.x, start.y + size.y),
        ]
    }
}

/// Overlap of `[a1, a2]` on `[b1, b2]`, or `None` when they are disjoint.
/// Touching intervals overlap with zero length.
pub fn overlap1d(a1: f32, a2: f32, b1: f32, b2: f32) -> Option<Span> {
    if a2 < b1 || a1 > b2 {
        return None;
    }
    let start = a1.max(b1);
    Some(Span { start, length: a2.min(b2) - start })
}

pub fn overlap2d(a: &Bounds, b: &Bounds) -> Option<Overlap> {
    let x = overlap1d(a.left, a.right, b.left, b.right)?;
    let y = overlap1d(a.top, a.bottom, b.top, b.bottom)?;
    Some(Overlap {
        start: Vec2::new(x.start, y.start),
        size: Vec2::new(x.length, y.length),
    })
}
