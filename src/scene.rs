//! Scenes: the entity lists, the map description format and the per-frame
//! pipeline.
//!
//! Map files are JSON. Each actor record names its kind in a `type` field;
//! only the kinds listed in [`ActorRecord`] are accepted.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compositor::Compositor;
use crate::config::LightingConfig;
use crate::error::{LightingError, Result};
use crate::geometry::Vec2;
use crate::light::Light;
use crate::lightmap::LightmapSynthesizer;
use crate::occluder::{FloorOccluder, MIN_DEPTH, Occluder, Rectangle, WallSegment};
use crate::raster::Raster;

// ============================================================================
// Map description
// ============================================================================

fn default_depth() -> f32 {
    1.0
}

/// One stored occluder, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActorRecord {
    #[serde(rename = "ShadowBase")]
    FloorOccluder {
        position: Vec2,
        size: Vec2,
        #[serde(default = "default_depth")]
        depth: f32,
        #[serde(default)]
        offset: f32,
    },
    #[serde(rename = "ShadowWall")]
    Wall { position: Vec2, size: Vec2 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightRecord {
    pub position: Vec2,
    pub radius: f32,
    /// Palette index
    #[serde(default)]
    pub colour: usize,
}

/// Serialized form of a whole scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub actors: Vec<ActorRecord>,
    #[serde(default)]
    pub lights: Vec<LightRecord>,
}

fn invalid(entity: &'static str, detail: String) -> LightingError {
    LightingError::InvalidParameter { entity, detail }
}

fn footprint(entity: &'static str, position: Vec2, size: Vec2) -> Result<Rectangle> {
    if !(size.x > 0.0 && size.y > 0.0) {
        return Err(invalid(entity, format!("size must be positive, got {} x {}", size.x, size.y)));
    }
    Ok(Rectangle { position, size })
}

impl ActorRecord {
    /// Build the occluder this record describes, rejecting values the
    /// lighting model does not support.
    pub fn into_occluder(self) -> Result<Occluder> {
        match self {
            ActorRecord::FloorOccluder { position, size, depth, offset } => {
                // Editor steps of 0.2 can land a hair under the minimum
                if depth < MIN_DEPTH - 1e-4 {
                    return Err(invalid("shadow base", format!("depth {depth} below {MIN_DEPTH}")));
                }
                if offset < 0.0 {
                    return Err(invalid("shadow base", format!("negative offset {offset}")));
                }
                let rect = footprint("shadow base", position, size)?;
                Ok(Occluder::Floor(FloorOccluder::new(rect, depth.max(MIN_DEPTH), offset)))
            }
            ActorRecord::Wall { position, size } => {
                Ok(Occluder::Wall(WallSegment::new(footprint("shadow wall", position, size)?)))
            }
        }
    }

    pub fn from_floor(o: &FloorOccluder) -> Self {
        ActorRecord::FloorOccluder {
            position: o.footprint.position,
            size: o.footprint.size,
            depth: o.depth,
            offset: o.offset,
        }
    }

    pub fn from_wall(w: &WallSegment) -> Self {
        ActorRecord::Wall { position: w.footprint.position, size: w.footprint.size }
    }
}

impl LightRecord {
    pub fn into_light(self) -> Result<Light> {
        if !(self.radius > 0.0) {
            return Err(invalid("light", format!("radius must be positive, got {}", self.radius)));
        }
        Ok(Light::new(self.position, self.radius, self.colour))
    }

    pub fn from_light(light: &Light) -> Self {
        LightRecord { position: light.position(), radius: light.radius(), colour: light.color_index() }
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Everything lit in one frame, plus the output layers
pub struct Scene {
    config: LightingConfig,
    occluders: Vec<FloorOccluder>,
    walls: Vec<WallSegment>,
    lights: Vec<Light>,
    compositor: Compositor,
}

impl Scene {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, LightingConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: LightingConfig) -> Self {
        Scene {
            config,
            occluders: Vec::new(),
            walls: Vec::new(),
            lights: Vec::new(),
            compositor: Compositor::new(width, height),
        }
    }

    pub fn from_description(desc: SceneDescription) -> Result<Self> {
        let mut scene = Scene::with_config(desc.width, desc.height, desc.lighting);
        for actor in desc.actors {
            scene.add_occluder(actor.into_occluder()?);
        }
        for light in desc.lights {
            scene.add_light(light.into_light()?);
        }
        Ok(scene)
    }

    /// A small room used by the viewer and the benchmark
    pub fn demo(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let mut scene = Scene::new(width, height);
        scene.add_occluder(Occluder::Wall(WallSegment::new(Rectangle::new(0.0, 0.0, w, h * 0.15))));
        scene.add_occluder(Occluder::Wall(WallSegment::new(Rectangle::new(
            w * 0.6,
            h * 0.35,
            w * 0.08,
            h * 0.2,
        ))));
        scene.add_occluder(Occluder::Floor(FloorOccluder::new(
            Rectangle::new(w * 0.25, h * 0.5, 40.0, 40.0),
            1.0,
            0.0,
        )));
        scene.add_occluder(Occluder::Floor(FloorOccluder::new(
            Rectangle::new(w * 0.45, h * 0.65, 60.0, 30.0),
            0.6,
            0.4,
        )));
        scene.add_light(Light::new(Vec2::new(w * 0.3, h * 0.35), 150.0, 0));
        scene.add_light(Light::new(Vec2::new(w * 0.7, h * 0.7), 120.0, 4));
        scene
    }

    pub fn description(&self) -> SceneDescription {
        let actors = self
            .occluders
            .iter()
            .map(ActorRecord::from_floor)
            .chain(self.walls.iter().map(ActorRecord::from_wall))
            .collect();
        SceneDescription {
            width: self.width(),
            height: self.height(),
            lighting: self.config,
            actors,
            lights: self.lights.iter().map(LightRecord::from_light).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_description(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.description())?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let scene = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!(
            "loaded {}: {} occluders, {} walls, {} lights",
            path.display(),
            scene.occluders.len(),
            scene.walls.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("saved scene to {}", path.display());
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.compositor.width()
    }

    pub fn height(&self) -> usize {
        self.compositor.height()
    }

    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    pub fn add_occluder(&mut self, occluder: Occluder) {
        match occluder {
            Occluder::Floor(o) => self.occluders.push(o),
            Occluder::Wall(w) => self.walls.push(w),
        }
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn occluders(&self) -> &[FloorOccluder] {
        &self.occluders
    }

    pub fn occluders_mut(&mut self) -> &mut [FloorOccluder] {
        &mut self.occluders
    }

    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    /// Rebuild every light's buffers in parallel, then composite.
    ///
    /// Returns the `(floor, wall)` layers.
    pub fn recompute(&mut self) -> (&Raster, &Raster) {
        self.recompute_with(true);
        (self.floor_layer(), self.wall_layer())
    }

    /// Same as [`Scene::recompute`] on the calling thread only.
    pub fn recompute_sequential(&mut self) -> (&Raster, &Raster) {
        self.recompute_with(false);
        (self.floor_layer(), self.wall_layer())
    }

    fn recompute_with(&mut self, parallel: bool) {
        let before = self.lights.len();
        self.lights.retain(|l| !l.is_disposed());
        if self.lights.len() != before {
            log::debug!("removed {} disposed lights", before - self.lights.len());
        }

        let synth = LightmapSynthesizer::new(&self.occluders, &self.walls, &self.config);
        if parallel {
            self.lights.par_iter_mut().for_each(|light| synth.synthesize(light));
        } else {
            self.lights.iter_mut().for_each(|light| synth.synthesize(light));
        }
        self.compositor.composite(&self.lights, &self.walls);
        log::debug!("recomputed {} lights", self.lights.len());
    }

    pub fn floor_layer(&self) -> &Raster {
        self.compositor.floor_layer()
    }

    pub fn wall_layer(&self) -> &Raster {
        self.compositor.wall_layer()
    }
}
