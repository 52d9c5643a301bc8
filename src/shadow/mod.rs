//! Shadow geometry: silhouette detection and shadow-volume projection.
//!
//! Everything here produces shapes in scene space; drawing them into a
//! light's buffers is the job of [`crate::lightmap`].

pub mod projector;

pub use projector::{ShadowProjector, lower_wall_overlaps};

use crate::geometry::Vec2;

/// Does edge `a -> b` of a clockwise outline face away from `light`?
///
/// Compares the edge's outward normal with the direction from the edge
/// midpoint towards the light. A zero-length edge, or a light sitting on the
/// midpoint, gives a zero product and is never a silhouette.
pub fn edge_faces_away(light: Vec2, a: Vec2, b: Vec2) -> bool {
    let edge = b - a;
    if edge.length() == 0.0 {
        return false;
    }
    let normal = edge.normalize().perp();
    let to_light = (light - a.midpoint(b)).normalize();
    normal.dot(to_light) < 0.0
}

/// Edges `(previous, current)` of `vertices` that cast shadows from `light`.
pub fn silhouette_edges(light: Vec2, vertices: &[Vec2]) -> Vec<(Vec2, Vec2)> {
    let n = vertices.len();
    (0..n)
        .map(|i| (vertices[(i + n - 1) % n], vertices[i]))
        .filter(|&(a, b)| {
            let casts = edge_faces_away(light, a, b);
            if !casts && a == b {
                log::trace!("skipping zero-length edge at ({}, {})", a.x, a.y);
            }
            casts
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occluder::Rectangle;

    fn block() -> [Vec2; 4] {
        Rectangle::new(80.0, 80.0, 40.0, 40.0).vertices()
    }

    #[test]
    fn test_light_above_selects_bottom_edge() {
        let edges = silhouette_edges(Vec2::new(100.0, 50.0), &block());
        assert!(edges.contains(&(Vec2::new(120.0, 120.0), Vec2::new(80.0, 120.0))));
        assert!(!edges.contains(&(Vec2::new(80.0, 80.0), Vec2::new(120.0, 80.0))));
    }

    #[test]
    fn test_light_above_centered_selects_bottom_and_sides() {
        // Midpoints of the side edges are at y=100, below the light, so their
        // outward normals point away from it
        let edges = silhouette_edges(Vec2::new(100.0, 50.0), &block());
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_light_left_selects_right_side() {
        let edges = silhouette_edges(Vec2::new(0.0, 100.0), &block());
        assert!(edges.contains(&(Vec2::new(120.0, 80.0), Vec2::new(120.0, 120.0))));
        assert!(!edges.contains(&(Vec2::new(80.0, 120.0), Vec2::new(80.0, 80.0))));
    }

    #[test]
    fn test_light_level_with_edge_is_excluded() {
        // Light on the line of the top edge, to the left: the top edge's normal
        // is perpendicular to the light direction (dot == 0)
        let light = Vec2::new(0.0, 80.0);
        assert!(!edge_faces_away(light, Vec2::new(80.0, 80.0), Vec2::new(120.0, 80.0)));
    }

    #[test]
    fn test_light_at_center_is_degenerate() {
        // Every outward normal points away from a light inside the block
        let edges = silhouette_edges(Vec2::new(100.0, 100.0), &block());
        assert_eq!(edges.len(), 4);
        // ...but a light exactly on an edge midpoint never selects that edge
        assert!(!edge_faces_away(Vec2::new(100.0, 80.0), Vec2::new(80.0, 80.0), Vec2::new(120.0, 80.0)));
    }

    #[test]
    fn test_zero_length_edge_casts_nothing() {
        let p = Vec2::new(5.0, 5.0);
        assert!(!edge_faces_away(Vec2::ZERO, p, p));
        let degenerate = [p, p, Vec2::new(10.0, 5.0), Vec2::new(10.0, 10.0)];
        let edges = silhouette_edges(Vec2::ZERO, &degenerate);
        assert!(edges.iter().all(|(a, b)| a != b));
    }
}
