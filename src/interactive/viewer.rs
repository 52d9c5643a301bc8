//! Interactive lighting viewer - drag lights around a scene in real-time

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::color::RGBA;
use crate::error::{LightingError, Result};
use crate::geometry::Vec2;
use crate::light::Light;
use crate::occluder::PARAM_STEP;
use crate::raster::Raster;
use crate::render::{shade, to_argb};
use crate::scene::Scene;

/// Half the side of the square grab handle drawn on each light
const HANDLE: f32 = 6.0;

/// Configuration for the interactive viewer
#[derive(Clone)]
pub struct ViewerConfig {
    /// Window size in pixels, also the scene size
    pub window_size: (usize, usize),
    /// Light level everything gets even when unlit
    pub ambient: RGBA,
    pub floor_color: RGBA,
    pub occluder_color: RGBA,
    pub wall_color: RGBA,
    /// Radius change per +/- key press
    pub radius_step: f32,
    /// Radius of lights added with a click
    pub new_light_radius: f32,
    /// Where S writes the scene
    pub save_path: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_size: (800, 600),
            ambient: RGBA::rgb(0.15, 0.15, 0.2),
            floor_color: RGBA::rgb(0.55, 0.5, 0.45),
            occluder_color: RGBA::rgb(0.35, 0.25, 0.2),
            wall_color: RGBA::rgb(0.7, 0.7, 0.75),
            radius_step: 10.0,
            new_light_radius: 120.0,
            save_path: "scene.json".to_string(),
        }
    }
}

/// Interactive viewer for placing and tuning lights
pub struct InteractiveViewer {
    config: ViewerConfig,
    scene: Scene,
    /// Unlit scene colors, painted once
    base: Raster,
    window: Window,
    buffer: Vec<u32>,
    active: Option<usize>,
    dragging: bool,
}

impl InteractiveViewer {
    /// Create a viewer over the built-in demo room
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let (w, h) = config.window_size;
        Self::with_scene(config, Scene::demo(w, h))
    }

    /// Create a viewer over an existing scene; the window takes the scene's size
    pub fn with_scene(mut config: ViewerConfig, scene: Scene) -> Result<Self> {
        let (w, h) = (scene.width(), scene.height());
        config.window_size = (w, h);

        let window = Window::new(
            "Shadowcaster 2D - Interactive Viewer (ESC to exit)",
            w,
            h,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| LightingError::Viewer(e.to_string()))?;

        let base = paint_base(&scene, &config);
        log::info!("viewer opened at {w}x{h} with {} lights", scene.lights().len());

        Ok(Self {
            config,
            scene,
            base,
            window,
            buffer: vec![0u32; w * h],
            active: None,
            dragging: false,
        })
    }

    /// Run the interactive viewer loop
    pub fn run(&mut self) -> Result<()> {
        let (w, h) = self.config.window_size;

        // Limit to ~60fps
        self.window.set_target_fps(60);

        println!("=== Interactive Shadow Viewer ===");
        println!("Controls:");
        println!("  Left Click  - Select / drag a light, or add one on empty floor");
        println!("  A/Z         - Cycle light color forward/backward");
        println!("  +/-         - Grow/shrink light radius");
        println!("  Delete      - Remove selected light");
        println!("  Up/Down     - Shadow depth of the occluder under the mouse");
        println!("  Right/Left  - Elevation of the occluder under the mouse");
        println!("  S           - Save scene to {}", self.config.save_path);
        println!("  ESC         - Exit");
        println!();

        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            let mouse = self
                .window
                .get_mouse_pos(MouseMode::Discard)
                .map(|(x, y)| Vec2::new(x, y));

            if let Some(p) = mouse {
                self.handle_mouse(p);
                self.handle_occluder_keys(p);
            }
            self.handle_light_keys();

            if self.window.is_key_pressed(Key::S, KeyRepeat::No) {
                match self.scene.save(&self.config.save_path) {
                    Ok(()) => println!("Saved {}", self.config.save_path),
                    Err(e) => log::warn!("could not save {}: {e}", self.config.save_path),
                }
            }

            self.render();
            self.window
                .update_with_buffer(&self.buffer, w, h)
                .map_err(|e| LightingError::Viewer(e.to_string()))?;
        }

        Ok(())
    }

    fn handle_mouse(&mut self, p: Vec2) {
        if !self.window.get_mouse_down(MouseButton::Left) {
            self.dragging = false;
            return;
        }

        if !self.dragging {
            // Fresh press: grab the topmost light under the cursor, or add one
            let hit = self.scene.lights().iter().rposition(|l| l.hit_test(p, HANDLE));
            self.active = match hit {
                Some(i) => Some(i),
                None => {
                    let color = self.active_light().map_or(0, |l| l.color_index());
                    self.scene.add_light(Light::new(p, self.config.new_light_radius, color));
                    println!("Added light at ({:.0}, {:.0})", p.x, p.y);
                    Some(self.scene.lights().len() - 1)
                }
            };
            self.dragging = true;
        }

        if let Some(light) = self.active_light_mut() {
            light.set_position(p);
        }
    }

    fn handle_light_keys(&mut self) {
        let step = self.config.radius_step;
        let window = &self.window;
        let grow = window.is_key_pressed(Key::Equal, KeyRepeat::Yes)
            || window.is_key_pressed(Key::NumPadPlus, KeyRepeat::Yes);
        let shrink = window.is_key_pressed(Key::Minus, KeyRepeat::Yes)
            || window.is_key_pressed(Key::NumPadMinus, KeyRepeat::Yes);
        let forward = window.is_key_pressed(Key::A, KeyRepeat::No);
        let backward = window.is_key_pressed(Key::Z, KeyRepeat::No);
        let delete = window.is_key_pressed(Key::Delete, KeyRepeat::No)
            || window.is_key_pressed(Key::Backspace, KeyRepeat::No);

        let Some(light) = self.active_light_mut() else {
            return;
        };
        if grow || shrink {
            let delta = if grow { step } else { -step };
            light.set_radius(light.radius() + delta);
            println!("Radius: {:.0}", light.radius());
        }
        if forward {
            light.cycle_color_forward();
            println!("Color: {}", light.color_index());
        }
        if backward {
            light.cycle_color_backward();
            println!("Color: {}", light.color_index());
        }
        if delete {
            light.dispose();
            self.active = None;
            self.dragging = false;
            println!("Light removed");
        }
    }

    fn handle_occluder_keys(&mut self, p: Vec2) {
        let window = &self.window;
        let depth = if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            PARAM_STEP
        } else if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            -PARAM_STEP
        } else {
            0.0
        };
        let offset = if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            PARAM_STEP
        } else if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            -PARAM_STEP
        } else {
            0.0
        };
        if depth == 0.0 && offset == 0.0 {
            return;
        }

        let Some(occluder) =
            self.scene.occluders_mut().iter_mut().find(|o| o.footprint.contains(p))
        else {
            return;
        };
        occluder.adjust_depth(depth);
        occluder.adjust_offset(offset);
        println!("Occluder depth {:.1}, offset {:.1}", occluder.depth, occluder.offset);
    }

    fn active_light(&self) -> Option<&Light> {
        self.active.and_then(|i| self.scene.lights().get(i))
    }

    fn active_light_mut(&mut self) -> Option<&mut Light> {
        self.active.and_then(|i| self.scene.lights_mut().get_mut(i))
    }

    /// Recompute lighting and shade the base image into the pixel buffer
    fn render(&mut self) {
        let (floor, wall) = self.scene.recompute();
        let frame = shade(&self.base, floor, wall, self.config.ambient);

        for (dst, px) in self.buffer.iter_mut().zip(frame.pixels()) {
            *dst = to_argb(px);
        }

        // Grab handles, the selected one in white
        let (w, h) = self.config.window_size;
        for (i, light) in self.scene.lights().iter().enumerate() {
            let color = if Some(i) == self.active { 0x00FFFFFF } else { 0x00808080 };
            let c = light.position();
            let x0 = (c.x - HANDLE).max(0.0) as usize;
            let y0 = (c.y - HANDLE).max(0.0) as usize;
            let x1 = ((c.x + HANDLE).max(0.0) as usize).min(w);
            let y1 = ((c.y + HANDLE).max(0.0) as usize).min(h);
            for y in y0..y1 {
                for x in x0..x1 {
                    let edge = x == x0 || y == y0 || x + 1 == x1 || y + 1 == y1;
                    if edge {
                        self.buffer[y * w + x] = color;
                    }
                }
            }
        }
    }
}

/// Paint floor, occluder and wall colors into a scene-sized raster
fn paint_base(scene: &Scene, config: &ViewerConfig) -> Raster {
    let mut base = Raster::new(scene.width(), scene.height());
    base.fill(config.floor_color);
    for occluder in scene.occluders() {
        base.fill_polygon(&occluder.vertices(), config.occluder_color);
    }
    for wall in scene.walls() {
        base.fill_polygon(&wall.vertices(), config.wall_color);
    }
    base
}
