//! Per-light lightmap synthesis.
//!
//! Each light owns a floor map and a wall map, both `2 * radius` pixels
//! square. Every frame they are rebuilt from scratch:
//! 1. radial falloff in the light's color
//! 2. walls below the light blacked out on the wall map
//! 3. floor shadow volumes and wall bands cut out for every silhouette edge
//! 4. wall footprints cut out of the floor map
//!
//! The wall map is shifted up by `wall_y_offset` so the light's circle sits
//! higher on vertical surfaces than on the floor.

use crate::color::RGBA;
use crate::config::LightingConfig;
use crate::geometry::Vec2;
use crate::light::{Light, buffer_side};
use crate::occluder::{FloorOccluder, MIN_DEPTH, WallSegment};
use crate::raster::{ClipMask, Path, Raster};
use crate::shadow::{ShadowProjector, lower_wall_overlaps, silhouette_edges};

/// What shadowed pixels are set to: no light at all
pub const SHADOW: RGBA = RGBA::transparent();

/// Rebuilds light buffers against a fixed set of occluders.
///
/// Holds only shared references, so one synthesizer can serve many lights
/// on different threads.
pub struct LightmapSynthesizer<'a> {
    occluders: &'a [FloorOccluder],
    walls: &'a [WallSegment],
    config: &'a LightingConfig,
}

impl<'a> LightmapSynthesizer<'a> {
    pub fn new(
        occluders: &'a [FloorOccluder],
        walls: &'a [WallSegment],
        config: &'a LightingConfig,
    ) -> Self {
        for o in occluders {
            debug_assert!(o.depth >= MIN_DEPTH, "occluder depth {} below {MIN_DEPTH}", o.depth);
            debug_assert!(o.offset >= 0.0, "occluder offset {} is negative", o.offset);
        }
        LightmapSynthesizer { occluders, walls, config }
    }

    /// Repopulate both of `light`'s buffers.
    pub fn synthesize(&self, light: &mut Light) {
        let position = light.position();
        let radius = light.radius();
        let color = light.color();
        debug_assert!(radius > 0.0, "light radius must be positive, got {radius}");

        let side = buffer_side(radius);
        let wall_shift = Vec2::new(0.0, self.config.wall_y_offset);
        let corner = position - Vec2::new(radius, radius);

        let floor = &mut light.floor_map;
        if floor.width() != side {
            floor.resize(side, side);
        }
        floor.origin = corner;
        floor.fill_radial_gradient(position, radius, color, RGBA::transparent());

        let wall = &mut light.wall_map;
        if wall.width() != side {
            wall.resize(side, side);
        }
        wall.origin = corner - wall_shift;
        wall.fill_radial_gradient(position - wall_shift, radius, color, RGBA::transparent());

        self.cast_shadows(position, floor, wall);
    }

    fn cast_shadows(&self, position: Vec2, floor: &mut Raster, wall_map: &mut Raster) {
        let projector = ShadowProjector::new(position, self.walls, self.config);

        for wall in self.walls.iter().filter(|w| projector.wall_in_shadow(w)) {
            wall_map.fill_polygon(&wall.vertices(), SHADOW);
        }

        // Clip masks are per wall, built the first time a band lands on it
        let mut clips: Vec<Option<ClipMask>> =
            std::iter::repeat_with(|| None).take(self.walls.len()).collect();

        for occluder in self.occluders {
            if occluder.is_elevated() {
                floor.fill_polygon(&occluder.elevated_vertices(position), SHADOW);
            }

            for (a, b) in silhouette_edges(position, &occluder.vertices()) {
                let projection = projector.project(a, b, occluder);
                floor.fill_polygon(&projection.volume.quad(), SHADOW);

                for band in &projection.bands {
                    let clip = &*clips[band.wall]
                        .get_or_insert_with(|| wall_clip(self.walls, band.wall, wall_map));
                    wall_map.fill_path(&Path::polygon(&band.quad()), SHADOW, Some(clip));
                }
            }
        }

        for wall in self.walls {
            floor.fill_polygon(&wall.vertices(), SHADOW);
        }
    }
}

/// Face of wall `index` minus the parts hidden behind walls in front of it
fn wall_clip(walls: &[WallSegment], index: usize, target: &Raster) -> ClipMask {
    let mut clip = ClipMask::from_path(&Path::polygon(&walls[index].vertices()), target);
    for overlap in lower_wall_overlaps(walls, index) {
        clip.exclude(&Path::polygon(&overlap.vertices()));
    }
    clip
}
