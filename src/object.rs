use glam::DVec2;

use crate::geometry::{Polygon, ShapeTemplate, build_polygon};
use crate::types::{Bounds, ObjectId, Pose};

/// A placed shape instance.
///
/// Polygon and bounds are derived from the pose and rebuilt by [`PlacedObject::set_pose`],
/// the only way to change the pose, so they never go stale.
#[derive(Clone, Debug)]
pub struct PlacedObject {
    id: ObjectId,
    pose: Pose,
    polygon: Polygon,
    bounds: Bounds,
}

impl PlacedObject {
    pub fn new(pose: Pose, template: &ShapeTemplate) -> Self {
        let polygon = build_polygon(&pose, template);
        let bounds = polygon.bounds();
        Self { id: ObjectId::next(), pose, polygon, bounds }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn center(&self) -> DVec2 {
        self.pose.center()
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Replace the pose and rebuild polygon and bounds.
    pub fn set_pose(&mut self, pose: Pose, template: &ShapeTemplate) {
        self.pose = pose;
        self.polygon = build_polygon(&pose, template);
        self.bounds = self.polygon.bounds();
    }

    pub fn translate_to(&mut self, center: DVec2, template: &ShapeTemplate) {
        let pose = Pose::new(center.x, center.y, self.pose.angle_degrees);
        self.set_pose(pose, template);
    }

    pub fn rotate_to(&mut self, angle_degrees: f64, template: &ShapeTemplate) {
        let pose = Pose { angle_degrees, ..self.pose };
        self.set_pose(pose, template);
    }
}
