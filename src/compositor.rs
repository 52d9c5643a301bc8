//! Merges every light's buffers into the two scene-sized layers.
//!
//! Floor maps are screened onto the floor layer at their own origin. Wall
//! maps were already built `wall_y_offset` higher, so they land shifted up;
//! they are screened onto the wall layer only where a wall face is.

use crate::light::Light;
use crate::occluder::WallSegment;
use crate::raster::{BlendMode, ClipMask, Path, Raster};

/// Owns the scene-space floor and wall illumination layers
#[derive(Debug, Clone)]
pub struct Compositor {
    floor: Raster,
    wall: Raster,
}

impl Compositor {
    pub fn new(width: usize, height: usize) -> Self {
        Compositor { floor: Raster::new(width, height), wall: Raster::new(width, height) }
    }

    pub fn width(&self) -> usize {
        self.floor.width()
    }

    pub fn height(&self) -> usize {
        self.floor.height()
    }

    pub fn floor_layer(&self) -> &Raster {
        &self.floor
    }

    pub fn wall_layer(&self) -> &Raster {
        &self.wall
    }

    /// Rebuild both layers from lights whose buffers are up to date.
    pub fn composite(&mut self, lights: &[Light], walls: &[WallSegment]) {
        self.floor.clear();
        self.wall.clear();

        let mut faces = Path::new();
        for wall in walls {
            faces.add_polygon(&wall.vertices());
        }
        let wall_clip = ClipMask::from_path(&faces, &self.wall);

        for light in lights {
            self.floor.draw(light.floor_map(), BlendMode::Screen, None);
            self.wall.draw(light.wall_map(), BlendMode::Screen, Some(&wall_clip));
        }
        log::trace!(
            "composited {} lights: {} floor px, {} wall px lit",
            lights.len(),
            self.floor.lit_pixel_count(),
            self.wall.lit_pixel_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RGBA;
    use crate::config::LightingConfig;
    use crate::geometry::Vec2;
    use crate::lightmap::LightmapSynthesizer;
    use crate::occluder::Rectangle;

    fn lit(lights: &mut [Light], walls: &[WallSegment]) -> Compositor {
        let config = LightingConfig::default();
        let synth = LightmapSynthesizer::new(&[], walls, &config);
        for light in lights.iter_mut() {
            synth.synthesize(light);
        }
        let mut compositor = Compositor::new(200, 200);
        compositor.composite(lights, walls);
        compositor
    }

    #[test]
    fn test_floor_placed_at_light() {
        let mut lights = [Light::new(Vec2::new(100.0, 100.0), 20.0, 0)];
        let c = lit(&mut lights, &[]);
        assert!(c.floor_layer().get(100, 100).r > 0.9);
        assert_eq!(c.floor_layer().get(100, 130), RGBA::transparent());
        assert_eq!(c.floor_layer().get(130, 100), RGBA::transparent());
    }

    #[test]
    fn test_wall_layer_only_on_wall_faces() {
        let walls = [WallSegment::new(Rectangle::new(60.0, 40.0, 80.0, 20.0))];
        let mut lights = [Light::new(Vec2::new(100.0, 100.0), 50.0, 0)];
        let c = lit(&mut lights, &walls);
        // Wall circle is centered 50 px higher, at (100, 50), right on the wall
        assert!(c.wall_layer().get(100, 50).r > 0.9);
        // Off the wall face nothing is drawn, even inside the circle
        assert_eq!(c.wall_layer().get(100, 70), RGBA::transparent());
        assert_eq!(c.wall_layer().get(100, 30), RGBA::transparent());
    }

    #[test]
    fn test_overlapping_lights_accumulate() {
        let mut red = [Light::new(Vec2::new(100.0, 100.0), 40.0, 1)];
        let mut both = [
            Light::new(Vec2::new(100.0, 100.0), 40.0, 1),
            Light::new(Vec2::new(110.0, 100.0), 40.0, 3),
        ];
        let single = lit(&mut red, &[]);
        let merged = lit(&mut both, &[]);
        let a = single.floor_layer().get(105, 100);
        let b = merged.floor_layer().get(105, 100);
        assert!((a.r - b.r).abs() < 0.01);
        assert!(b.b > 0.5 && a.b == 0.0);
        assert!(b.a > a.a);
    }

    #[test]
    fn test_light_order_does_not_matter() {
        let mut forward = [
            Light::new(Vec2::new(90.0, 100.0), 40.0, 2),
            Light::new(Vec2::new(110.0, 95.0), 35.0, 3),
        ];
        let mut reverse = [forward[1].clone(), forward[0].clone()];
        let f = lit(&mut forward, &[]);
        let r = lit(&mut reverse, &[]);
        for (p, q) in f.floor_layer().pixels().zip(r.floor_layer().pixels()) {
            assert!((p.r - q.r).abs() < 0.01 && (p.g - q.g).abs() < 0.01 && (p.b - q.b).abs() < 0.01);
        }
        assert!(f.floor_layer().lit_pixel_count() > 0);
    }

    #[test]
    fn test_layers_cleared_between_frames() {
        let mut lights = [Light::new(Vec2::new(50.0, 50.0), 20.0, 0)];
        let mut c = lit(&mut lights, &[]);
        c.composite(&[], &[]);
        assert_eq!(c.floor_layer().lit_pixel_count(), 0);
        assert_eq!(c.wall_layer().lit_pixel_count(), 0);
    }
}
