//! End-to-end tests for the lighting pipeline

use crate::geometry::overlap2d;
use crate::light::buffer_side;
use crate::shadow::lower_wall_overlaps;
use crate::{
    FloorOccluder, Light, LightingConfig, Occluder, RGBA, Rectangle, SHADOW, Scene,
    ShadowProjector, Vec2, WallSegment, silhouette_edges,
};

fn floor(x: f32, y: f32, w: f32, h: f32, depth: f32) -> Occluder {
    Occluder::Floor(FloorOccluder::new(Rectangle::new(x, y, w, h), depth, 0.0))
}

fn wall(x: f32, y: f32, w: f32, h: f32) -> Occluder {
    Occluder::Wall(WallSegment::new(Rectangle::new(x, y, w, h)))
}

fn close(a: RGBA, b: RGBA) -> bool {
    (a.r - b.r).abs() < 0.02
        && (a.g - b.g).abs() < 0.02
        && (a.b - b.b).abs() < 0.02
        && (a.a - b.a).abs() < 0.02
}

#[test]
fn test_main() {
    crate::main();
}

#[test]
fn test_benchmark_scenes_hold_requested_lights() {
    for lights in [2, 4, 16] {
        let scene = crate::benchmark_scene(320, 240, lights);
        assert_eq!(scene.lights().len(), lights);
    }
}

#[test]
fn test_lone_light_is_pure_gradient() {
    let mut scene = Scene::new(200, 200);
    scene.add_light(Light::new(Vec2::new(100.0, 100.0), 50.0, 0));
    scene.recompute();

    let light = &scene.lights()[0];
    let map = light.floor_map();
    assert_eq!((map.width(), map.height()), (100, 100));

    for y in 0..map.height() {
        for x in 0..map.width() {
            let d = Vec2::new(x as f32 + 0.5 - 50.0, y as f32 + 0.5 - 50.0).length();
            // White fading out, read back premultiplied
            let a = 1.0 - (d / 50.0).min(1.0);
            let expected = RGBA::new(a * a, a * a, a * a, a);
            assert!(close(map.get(x, y), expected), "pixel ({x}, {y})");
        }
    }
    assert_eq!(map.get(0, 0), RGBA::transparent());

    // Same picture on the wall map, only placed higher
    assert!(light.wall_map().pixels().eq(map.pixels()));
    assert_eq!(light.wall_map().origin, map.origin - Vec2::new(0.0, 50.0));
}

#[test]
fn test_occluder_below_light_shadows_away_from_it() {
    let vertices = Rectangle::new(80.0, 80.0, 40.0, 40.0).vertices();
    let light = Vec2::new(100.0, 50.0);
    let edges = silhouette_edges(light, &vertices);

    let top = (vertices[0], vertices[1]);
    let right = (vertices[1], vertices[2]);
    let bottom = (vertices[2], vertices[3]);
    let left = (vertices[3], vertices[0]);
    assert_eq!(edges.len(), 3);
    assert!(!edges.contains(&top));
    assert!(edges.contains(&right) && edges.contains(&bottom) && edges.contains(&left));

    let mut scene = Scene::new(200, 200);
    scene.add_occluder(floor(80.0, 80.0, 40.0, 40.0, 1.0));
    scene.add_light(Light::new(light, 100.0, 0));
    let (layer, _) = scene.recompute();

    // The floor map reaches down to y = 150
    assert_eq!(layer.get(100, 140), RGBA::transparent());
    assert_eq!(layer.get(70, 130), RGBA::transparent());
    // Between the light and the top edge nothing is cast
    assert!(layer.get(100, 70).r > 0.5);
    assert_eq!(scene.lights()[0].floor_map().sample(Vec2::new(100.0, 140.0)), Some(SHADOW));
}

#[test]
fn test_band_follows_shadow_across_baseline() {
    let walls = [WallSegment::new(Rectangle::new(0.0, 50.0, 300.0, 100.0))];
    let config = LightingConfig::default();
    let light = Vec2::new(100.0, 200.0);
    let projector = ShadowProjector::new(light, &walls, &config);

    // Top edge at y = 160 faces away from the light; its far end sits at
    // y = 160 - 40 * depth
    let mut seen = Vec::new();
    for depth in [0.2, 0.25, 0.3, 1.0, 0.6, 0.25, 0.2] {
        let occluder = FloorOccluder::new(Rectangle::new(80.0, 160.0, 40.0, 20.0), depth, 0.0);
        let v = occluder.vertices();
        let projection = projector.project(v[0], v[1], &occluder);
        let crosses = projection.volume.v2.y < 150.0 || projection.volume.v3.y < 150.0;
        assert_eq!(!projection.bands.is_empty(), crosses, "depth {depth}");
        seen.push(crosses);
    }
    assert_eq!(seen, [false, false, true, true, true, false, false]);
}

#[test]
fn test_no_band_when_light_above_wall_baseline() {
    let walls = [WallSegment::new(Rectangle::new(0.0, 50.0, 300.0, 100.0))];
    let config = LightingConfig::default();
    let light = Vec2::new(100.0, 50.0);
    let projector = ShadowProjector::new(light, &walls, &config);

    for depth in [0.2, 1.0, 3.0] {
        let occluder = FloorOccluder::new(Rectangle::new(80.0, 160.0, 40.0, 20.0), depth, 0.0);
        for (a, b) in silhouette_edges(light, &occluder.vertices()) {
            assert!(projector.project(a, b, &occluder).bands.is_empty());
        }
    }
}

#[test]
fn test_band_excludes_overlap_with_wall_in_front() {
    // A stands behind, B in front and overlapping it
    let a = WallSegment::new(Rectangle::new(0.0, 20.0, 200.0, 80.0));
    let b = WallSegment::new(Rectangle::new(50.0, 60.0, 100.0, 140.0));
    let walls = [a.clone(), b.clone()];

    let overlap = overlap2d(&a.bounds(), &b.bounds());
    assert!(overlap.is_some());
    assert_eq!(lower_wall_overlaps(&walls, 0), overlap.into_iter().collect::<Vec<_>>());
    assert!(lower_wall_overlaps(&walls, 1).is_empty());

    let mut scene = Scene::new(300, 300);
    scene.add_occluder(wall(0.0, 20.0, 200.0, 80.0));
    scene.add_occluder(wall(50.0, 60.0, 100.0, 140.0));
    scene.add_occluder(floor(50.0, 150.0, 40.0, 10.0, 1.0));
    // Below both baselines, so neither wall is wholly dark
    scene.add_light(Light::new(Vec2::new(70.0, 260.0), 250.0, 0));
    scene.recompute();

    let wall_map = scene.lights()[0].wall_map();
    // The top edge's band on A spans x = 41..99 up to A's top
    assert_eq!(wall_map.sample(Vec2::new(45.0, 80.0)), Some(SHADOW));
    assert_eq!(wall_map.sample(Vec2::new(70.0, 40.0)), Some(SHADOW));
    // Inside the overlap B's face is not darkened by A's band
    assert_ne!(wall_map.sample(Vec2::new(70.0, 80.0)), Some(SHADOW));
}

#[test]
fn test_buffers_match_diameter_after_recompute() {
    let mut scene = Scene::new(400, 400);
    for (i, r) in [25.0, 60.0, 33.5].into_iter().enumerate() {
        scene.add_light(Light::new(Vec2::new(100.0 * (i + 1) as f32, 200.0), r, i));
    }
    scene.lights_mut()[0].set_radius(80.0);
    scene.recompute();
    for light in scene.lights() {
        let side = buffer_side(light.radius());
        assert_eq!(side, (2.0 * light.radius()).ceil() as usize);
        assert_eq!((light.floor_map().width(), light.floor_map().height()), (side, side));
        assert_eq!((light.wall_map().width(), light.wall_map().height()), (side, side));
    }
    assert_eq!(scene.lights()[0].floor_map().width(), 160);
}

#[test]
fn test_recompute_is_idempotent() {
    let mut scene = Scene::demo(320, 240);
    scene.recompute();
    let floor = scene.floor_layer().clone();
    let wall = scene.wall_layer().clone();
    let maps: Vec<_> =
        scene.lights().iter().map(|l| (l.floor_map().clone(), l.wall_map().clone())).collect();

    scene.recompute();
    assert_eq!(*scene.floor_layer(), floor);
    assert_eq!(*scene.wall_layer(), wall);
    for (light, (f, w)) in scene.lights().iter().zip(&maps) {
        assert_eq!(light.floor_map(), f);
        assert_eq!(light.wall_map(), w);
    }
}

#[test]
fn test_moving_light_moves_its_circle() {
    let mut scene = Scene::new(300, 200);
    scene.add_light(Light::new(Vec2::new(60.0, 100.0), 40.0, 1));
    scene.recompute();
    assert!(scene.floor_layer().get(60, 100).r > 0.9);

    scene.lights_mut()[0].set_position(Vec2::new(240.0, 100.0));
    let (layer, _) = scene.recompute();
    assert_eq!(layer.get(60, 100), RGBA::transparent());
    assert!(layer.get(240, 100).r > 0.9);
}
