mod color;
mod compositor;
mod config;
mod error;
mod geometry;
mod interactive;
mod light;
mod lightmap;
mod occluder;
mod raster;
mod render;
mod scene;
mod shadow;

#[cfg(test)]
mod tests;

// Re-export public API
pub use color::{PALETTE, RGBA, palette_color};
pub use compositor::Compositor;
pub use config::LightingConfig;
pub use error::{LightingError, Result};
pub use geometry::{Bounds, Overlap, Vec2};
pub use interactive::{InteractiveViewer, ViewerConfig};
pub use light::Light;
pub use lightmap::{LightmapSynthesizer, SHADOW};
pub use occluder::{FloorOccluder, Occluder, Rectangle, WallSegment};
pub use raster::{BlendMode, ClipMask, Path, Raster};
pub use render::{save_ppm, shade, to_argb};
pub use scene::{ActorRecord, LightRecord, Scene, SceneDescription};
pub use shadow::{ShadowProjector, silhouette_edges};

fn main() {
    let _ = env_logger::try_init();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        Some("--interactive") => run_interactive(args.get(2)),
        Some("--render") => match (args.get(2), args.get(3)) {
            (Some(scene), Some(prefix)) => run_render(scene, prefix),
            _ => {
                print_usage();
                Ok(())
            }
        },
        Some("--benchmark") => {
            run_benchmark();
            Ok(())
        }
        Some(flag) => {
            log::warn!("unknown option {flag}");
            print_usage();
            Ok(())
        }
        None => {
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
    }
}

fn print_usage() {
    println!("Shadowcaster 2D");
    println!("Run with --interactive [scene.json] for minifb viewer");
    println!("Run with --render <scene.json> <out_prefix> to write floor and wall layers as PPM");
    println!("Run with --benchmark to test performance");
}

fn run_render(scene_path: &str, prefix: &str) -> Result<()> {
    let mut scene = Scene::load(scene_path)?;
    let (floor, wall) = scene.recompute();

    let floor_path = format!("{prefix}_floor.ppm");
    let wall_path = format!("{prefix}_wall.ppm");
    save_ppm(floor, &floor_path)?;
    save_ppm(wall, &wall_path)?;
    println!("Wrote {floor_path} and {wall_path}");
    Ok(())
}

fn run_benchmark() {
    use std::time::Instant;

    println!("=== Lightmap Benchmark ===\n");

    let sizes = [(320, 240), (640, 480), (1280, 960)];
    let light_counts = [2, 4, 16];
    let iterations = 20;

    for (width, height) in sizes {
        println!("Scene size: {}x{}", width, height);
        println!("-----------------------");

        for lights in light_counts {
            let mut scene = benchmark_scene(width, height, lights);

            let start = Instant::now();
            for _ in 0..iterations {
                scene.recompute_sequential();
            }
            let avg_sequential_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

            let start = Instant::now();
            for _ in 0..iterations {
                scene.recompute();
            }
            let avg_parallel_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

            println!("  {} lights:", scene.lights().len());
            println!("    Sequential: {:.3} ms/frame ({:.1} FPS)", avg_sequential_ms, 1000.0 / avg_sequential_ms);
            println!("    Parallel:   {:.3} ms/frame ({:.1} FPS)", avg_parallel_ms, 1000.0 / avg_parallel_ms);
            println!("    Speedup: {:.2}x", avg_sequential_ms / avg_parallel_ms);
        }
        println!();
    }
}

/// Demo room topped up to `lights` lights
fn benchmark_scene(width: usize, height: usize, lights: usize) -> Scene {
    let mut scene = Scene::demo(width, height);
    let (w, h) = (width as f32, height as f32);
    for i in scene.lights().len()..lights {
        // Spread extra lights on a diagonal through the room
        let t = (i as f32 + 0.5) / lights as f32;
        scene.add_light(Light::new(Vec2::new(w * t, h * (0.2 + 0.7 * t)), 120.0, i));
    }
    scene
}

fn run_interactive(scene_path: Option<&String>) -> Result<()> {
    let config = ViewerConfig::default();

    let mut viewer = match scene_path {
        Some(path) => InteractiveViewer::with_scene(config, Scene::load(path)?)?,
        None => InteractiveViewer::new(config)?,
    };
    viewer.run()
}
