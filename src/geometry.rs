//! Polygons, shape templates and the pose transform.

use glam::DVec2;

use crate::error::GeometryError;
use crate::types::{Bounds, Pose};

/// Closed polygon with at least three vertices; the last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<DVec2>,
}

impl Polygon {
    pub fn new(points: Vec<DVec2>) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewVertices(points.len()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edge `i` runs from vertex `i` to vertex `i + 1` (wrapping).
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn bounds(&self) -> Bounds {
        let first = self.points[0];
        let mut b = Bounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        for p in &self.points[1..] {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        b
    }

    /// Mean of the vertices.
    pub fn vertex_centroid(&self) -> DVec2 {
        let sum: DVec2 = self.points.iter().copied().sum();
        sum / self.points.len() as f64
    }

    /// Radius of the circle around the vertex centroid that encloses every vertex.
    pub fn bounding_circle_radius(&self) -> f64 {
        let c = self.vertex_centroid();
        self.points.iter().map(|p| p.distance(c)).fold(0.0, f64::max)
    }
}

/// Canonical shape in local coordinates, placed by a [`Pose`].
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeTemplate {
    vertices: Vec<DVec2>,
}

impl ShapeTemplate {
    pub fn new(vertices: Vec<DVec2>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// The 15-vertex tiered tree outline (tip at +0.8, trunk down to -0.2).
    pub fn tree() -> Self {
        const TRUNK_W: f64 = 0.15;
        const TRUNK_H: f64 = 0.2;
        const BASE_W: f64 = 0.7;
        const MID_W: f64 = 0.4;
        const TOP_W: f64 = 0.25;
        const TIP_Y: f64 = 0.8;
        const TIER_1_Y: f64 = 0.5;
        const TIER_2_Y: f64 = 0.25;
        const BASE_Y: f64 = 0.0;
        const TRUNK_BOTTOM_Y: f64 = -TRUNK_H;

        let vertices = vec![
            DVec2::new(0.0, TIP_Y),
            // right side, top to bottom
            DVec2::new(TOP_W / 2.0, TIER_1_Y),
            DVec2::new(TOP_W / 4.0, TIER_1_Y),
            DVec2::new(MID_W / 2.0, TIER_2_Y),
            DVec2::new(MID_W / 4.0, TIER_2_Y),
            DVec2::new(BASE_W / 2.0, BASE_Y),
            // trunk
            DVec2::new(TRUNK_W / 2.0, BASE_Y),
            DVec2::new(TRUNK_W / 2.0, TRUNK_BOTTOM_Y),
            DVec2::new(-(TRUNK_W / 2.0), TRUNK_BOTTOM_Y),
            DVec2::new(-(TRUNK_W / 2.0), BASE_Y),
            // left side, bottom to top
            DVec2::new(-(BASE_W / 2.0), BASE_Y),
            DVec2::new(-(MID_W / 4.0), TIER_2_Y),
            DVec2::new(-(MID_W / 2.0), TIER_2_Y),
            DVec2::new(-(TOP_W / 4.0), TIER_1_Y),
            DVec2::new(-(TOP_W / 2.0), TIER_1_Y),
        ];
        Self { vertices }
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }
}

impl Default for ShapeTemplate {
    fn default() -> Self {
        Self::tree()
    }
}

/// Rotate every template vertex about the origin by `pose.angle_degrees`, then translate
/// by the pose center. Vertex order follows the template.
pub fn build_polygon(pose: &Pose, template: &ShapeTemplate) -> Polygon {
    let (sin, cos) = pose.angle_degrees.to_radians().sin_cos();
    let points = template
        .vertices
        .iter()
        .map(|v| {
            DVec2::new(
                v.x * cos - v.y * sin + pose.center_x,
                v.x * sin + v.y * cos + pose.center_y,
            )
        })
        .collect();
    // Template already holds >= 3 vertices.
    Polygon { points }
}

/// Distance from `p` to the closest point on segment `a..b`.
pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq != 0.0 { (p - a).dot(ab) / len_sq } else { -1.0 };
    let closest = if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        a + ab * t
    };
    p.distance(closest)
}
