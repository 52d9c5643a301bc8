//! Shadow-volume projection for a single light.
//!
//! For each silhouette edge of a floor occluder the projector builds:
//! - a floor quad swept away from the light, its length proportional to the
//!   light-to-vertex distance times the occluder's depth
//! - a band on every wall whose baseline the floor quad climbs over

use crate::config::LightingConfig;
use crate::geometry::{Overlap, Vec2, horizontal_intercept, overlap2d};
use crate::occluder::{FloorOccluder, WallSegment};

/// Floor shadow cast by one edge: `v1 -> v4` is the near edge, `v2 -> v3`
/// the far edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowVolume {
    pub v1: Vec2,
    pub v2: Vec2,
    pub v3: Vec2,
    pub v4: Vec2,
}

impl ShadowVolume {
    pub fn quad(&self) -> [Vec2; 4] {
        [self.v1, self.v2, self.v3, self.v4]
    }
}

/// Shadowed slice of a wall face, in scene space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBand {
    /// Index of the receiving wall
    pub wall: usize,
    pub left: f32,
    pub right: f32,
    /// Y of the band edge nearest the baseline
    pub lower: f32,
    /// Y of the band edge furthest up the wall
    pub upper: f32,
}

impl WallBand {
    pub fn quad(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.lower),
            Vec2::new(self.right, self.lower),
            Vec2::new(self.right, self.upper),
            Vec2::new(self.left, self.upper),
        ]
    }

    pub fn height(&self) -> f32 {
        (self.lower - self.upper).abs()
    }
}

/// Everything one silhouette edge contributes
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub volume: ShadowVolume,
    pub bands: Vec<WallBand>,
}

/// Projects occluder edges away from one light onto the floor and walls
pub struct ShadowProjector<'a> {
    light: Vec2,
    walls: &'a [WallSegment],
    wall_shadow_length: f32,
}

impl<'a> ShadowProjector<'a> {
    pub fn new(light: Vec2, walls: &'a [WallSegment], config: &LightingConfig) -> Self {
        ShadowProjector { light, walls, wall_shadow_length: config.wall_shadow_length }
    }

    /// A wall whose baseline lies below the light is entirely in its shadow.
    pub fn wall_in_shadow(&self, wall: &WallSegment) -> bool {
        wall.bottom() > self.light.y
    }

    /// Where the occluder's shadow meets the floor in y, accounting for
    /// elevation.
    pub fn shadow_baseline(&self, occluder: &FloorOccluder) -> f32 {
        let bottom = occluder.bottom();
        if occluder.is_elevated() {
            bottom + (bottom - self.light.y) * occluder.offset
        } else {
            bottom
        }
    }

    /// The far edge is extruded from the lifted near edge, so elevation
    /// lengthens the shadow by a factor of `1 + offset`.
    pub fn floor_volume(&self, a: Vec2, b: Vec2, occluder: &FloorOccluder) -> ShadowVolume {
        let light = self.light;
        let (mut v1, mut v4) = (a, b);
        if occluder.is_elevated() {
            v1 = v1 + (a - light) * occluder.offset;
            v4 = v4 + (b - light) * occluder.offset;
        }
        ShadowVolume {
            v1,
            v2: v1 + (v1 - light) * occluder.depth,
            v3: v4 + (v4 - light) * occluder.depth,
            v4,
        }
    }

    /// Band cast on wall `index` by the shadow of edge `a -> b`, if the
    /// shadow starts on or below the baseline and reaches past it.
    pub fn wall_band(
        &self,
        a: Vec2,
        b: Vec2,
        volume: &ShadowVolume,
        index: usize,
        shadow_baseline: f32,
    ) -> Option<WallBand> {
        let wall = &self.walls[index];
        let wall_y = wall.bottom();
        let ShadowVolume { v1, v2, v3, v4 } = *volume;

        if !(a.y >= wall_y && b.y >= wall_y && (v2.y < wall_y || v3.y < wall_y)) {
            return None;
        }

        // A far vertex short of the baseline bounds the band directly
        let left = if v2.y >= wall_y { Some(v2.x) } else { horizontal_intercept(v1, v2, wall_y) };
        let right = if v3.y >= wall_y { Some(v3.x) } else { horizontal_intercept(v4, v3, wall_y) };
        let (Some(left), Some(right)) = (left, right) else {
            log::trace!("horizontal shadow edge on baseline {wall_y}, no band");
            return None;
        };

        let k = self.wall_shadow_length;
        let height = (wall_y - v2.y.min(v3.y)).max(0.0) * k;
        let offset = (wall_y - shadow_baseline).max(0.0) * k;
        if height == 0.0 || left == right {
            return None;
        }

        let top = wall.top();
        Some(WallBand {
            wall: index,
            left,
            right,
            lower: (wall_y - offset).max(top),
            upper: (wall_y - height).max(top),
        })
    }

    /// Floor quad plus wall bands for silhouette edge `a -> b`
    pub fn project(&self, a: Vec2, b: Vec2, occluder: &FloorOccluder) -> Projection {
        let volume = self.floor_volume(a, b, occluder);
        let baseline = self.shadow_baseline(occluder);
        let bands = (0..self.walls.len())
            .filter_map(|i| self.wall_band(a, b, &volume, i, baseline))
            .collect();
        Projection { volume, bands }
    }
}

/// Parts of wall `index` covered by walls standing in front of it (lower
/// baseline on screen). Shadows drawn on `index` must leave these out.
pub fn lower_wall_overlaps(walls: &[WallSegment], index: usize) -> Vec<Overlap> {
    let wall = &walls[index];
    let bounds = wall.bounds();
    walls
        .iter()
        .filter(|w| w.bottom() > wall.bottom())
        .filter_map(|w| overlap2d(&w.bounds(), &bounds))
        .collect()
}
