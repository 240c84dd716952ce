use glam::DVec2;

use crate::error::SceneError;
use crate::geometry::Polygon;
use crate::object::PlacedObject;
use crate::types::*;

/// Public API contract for a placement scene.
pub trait SceneApi {
    // --- Object lifecycle --------------------------------------------------

    /// Add an object at the given pose. Refreshes the collision set.
    fn add_object(&mut self, x: f64, y: f64, angle_degrees: f64) -> Result<ObjectId, SceneError>;

    /// Remove an object and return it. Refreshes the collision set.
    fn remove_object(&mut self, id: ObjectId) -> Result<PlacedObject, SceneError>;

    /// Replace an object's pose. Refreshes the collision set.
    fn set_pose(&mut self, id: ObjectId, x: f64, y: f64, angle_degrees: f64) -> Result<(), SceneError>;

    // --- Collision ---------------------------------------------------------

    /// Recompute and store the collision set.
    fn detect_all(&mut self) -> Vec<CollisionPair>;

    /// Currently stored collision set.
    fn collisions(&self) -> &[CollisionPair];

    // --- Placement ---------------------------------------------------------

    /// Slide `id` as far as possible along `direction` without creating an overlap
    /// and without leaving the containment square.
    fn move_to_farthest(&mut self, id: ObjectId, direction: Direction) -> Result<MoveOutcome, SceneError>;

    /// Union of all object bounds; `None` when the scene is empty.
    fn containment_bounds(&self) -> Option<Bounds>;

    // --- Queries -----------------------------------------------------------

    /// Topmost (most recently added) object containing `p`.
    fn object_at_point(&self, p: DVec2) -> Option<ObjectId>;

    /// Closest polygon hit along the ray.
    fn raycast(&self, origin: DVec2, dir: DVec2) -> Option<(ObjectId, RayHit)>;
}

/// Pairwise polygon predicates and measurements.
pub trait NarrowphaseApi {
    // Primitives ------------------------------------------------------------

    fn segments_intersect(a: Segment, b: Segment) -> bool;
    fn point_in_polygon(p: DVec2, poly: &Polygon) -> bool;
    fn bounds_intersect(a: &Bounds, b: &Bounds, tolerance: f64) -> bool;

    // Polygons --------------------------------------------------------------

    fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool;
    fn overlap_extent(a: &Polygon, b: &Polygon) -> f64;
    fn center_distance(c0: DVec2, c1: DVec2) -> f64;

    // Rays ------------------------------------------------------------------

    fn ray_segment(origin: DVec2, dir: DVec2, seg: Segment) -> Option<RayHit>;
    fn ray_polygon(origin: DVec2, dir: DVec2, poly: &Polygon) -> Option<RayHit>;
}
