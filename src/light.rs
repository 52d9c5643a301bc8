//! Colored point lights and the lightmap buffers each one owns

use crate::color::{PALETTE, RGBA, palette_color};
use crate::config::MIN_LIGHT_RADIUS;
use crate::geometry::Vec2;
use crate::raster::Raster;

/// A colored point light with its own floor and wall lightmaps
#[derive(Debug, Clone)]
pub struct Light {
    position: Vec2,
    radius: f32,
    color_index: usize,
    disposed: bool,
    pub(crate) floor_map: Raster,
    pub(crate) wall_map: Raster,
}

/// Side length of a light's buffers
pub fn buffer_side(radius: f32) -> usize {
    (2.0 * radius).ceil() as usize
}

impl Light {
    pub fn new(position: Vec2, radius: f32, color_index: usize) -> Self {
        debug_assert!(radius > 0.0, "light radius must be positive, got {radius}");
        let side = buffer_side(radius);
        Light {
            position,
            radius,
            color_index: color_index % PALETTE.len(),
            disposed: false,
            floor_map: Raster::new(side, side),
            wall_map: Raster::new(side, side),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn color(&self) -> RGBA {
        palette_color(self.color_index)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Resize the light, never below [`MIN_LIGHT_RADIUS`]. Buffers are
    /// reallocated only when their side length changes.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(MIN_LIGHT_RADIUS);
        let side = buffer_side(self.radius);
        if side != self.floor_map.width() {
            self.floor_map.resize(side, side);
            self.wall_map.resize(side, side);
        }
    }

    pub fn cycle_color_forward(&mut self) {
        self.color_index = (self.color_index + 1) % PALETTE.len();
    }

    pub fn cycle_color_backward(&mut self) {
        self.color_index = (self.color_index + PALETTE.len() - 1) % PALETTE.len();
    }

    /// Mark for removal before the next frame
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Lightmap for floor surfaces, in light-local pixels
    pub fn floor_map(&self) -> &Raster {
        &self.floor_map
    }

    /// Lightmap for wall faces, in light-local pixels
    pub fn wall_map(&self) -> &Raster {
        &self.wall_map
    }

    /// Does the square marker around the light contain `p`?
    pub fn hit_test(&self, p: Vec2, half_size: f32) -> bool {
        (p.x - self.position.x).abs() <= half_size && (p.y - self.position.y).abs() <= half_size
    }
}
