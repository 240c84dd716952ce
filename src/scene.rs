use glam::DVec2;
use log::{debug, info};
use rand::Rng;

use std::path::Path;

use crate::api::{NarrowphaseApi, SceneApi};
use crate::collision;
use crate::config::SceneConfig;
use crate::error::{ExchangeError, SceneError};
use crate::exchange;
use crate::geometry::ShapeTemplate;
use crate::narrowphase::Narrowphase;
use crate::object::PlacedObject;
use crate::placement;
use crate::types::*;

/// Demo layout: one object at the origin ringed by four rotated neighbours.
const EXAMPLE_LAYOUT: [(f64, f64, f64); 5] = [
    (0.0, 0.0, 0.0),
    (1.5, 0.0, 45.0),
    (0.0, 1.5, 90.0),
    (-1.5, 0.0, 135.0),
    (0.0, -1.5, 180.0),
];

/// Owns every placed object plus the derived collision set.
pub struct Scene {
    pub cfg: SceneConfig,
    template: ShapeTemplate,
    objects: Vec<PlacedObject>,
    collisions: Vec<CollisionPair>,
    selected: Option<ObjectId>,
    last_report: Option<PassReport>,
}

impl Scene {
    pub fn new(cfg: SceneConfig) -> Self {
        Self::with_template(cfg, ShapeTemplate::tree())
    }

    pub fn with_template(cfg: SceneConfig, template: ShapeTemplate) -> Self {
        Self {
            cfg,
            template,
            objects: Vec::new(),
            collisions: Vec::new(),
            selected: None,
            last_report: None,
        }
    }

    /// Scene whose objects use a custom outline.
    pub fn with_vertices(cfg: SceneConfig, vertices: Vec<DVec2>) -> Result<Self, SceneError> {
        let template = ShapeTemplate::new(vertices)?;
        Ok(Self::with_template(cfg, template))
    }

    pub fn template(&self) -> &ShapeTemplate {
        &self.template
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Report from the most recent collision pass.
    pub fn last_report(&self) -> Option<PassReport> {
        self.last_report
    }

    fn slot_of(&self, id: ObjectId) -> Result<usize, SceneError> {
        self.objects.iter().position(|o| o.id() == id).ok_or(SceneError::UnknownObject(id))
    }

    fn checked_pose(x: f64, y: f64, angle_degrees: f64) -> Result<Pose, SceneError> {
        let pose = Pose::new(x, y, angle_degrees);
        if !pose.is_finite() {
            return Err(SceneError::NonFinitePose { x, y, angle_degrees });
        }
        Ok(pose)
    }

    fn refresh(&mut self) {
        let (pairs, report) = collision::detect_all_with_report(&self.objects, &self.cfg);
        self.collisions = pairs;
        self.last_report = Some(report);
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
        self.refresh();
    }

    /// Populate an empty scene with the five-object demo layout. Returns how many objects
    /// were added (zero when the scene already had content).
    pub fn add_example_layout(&mut self) -> usize {
        if !self.objects.is_empty() {
            return 0;
        }
        for (x, y, deg) in EXAMPLE_LAYOUT {
            self.objects.push(PlacedObject::new(Pose::new(x, y, deg), &self.template));
        }
        self.refresh();
        EXAMPLE_LAYOUT.len()
    }

    /// Add an object at a random pose near the current content.
    pub fn add_random_object<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ObjectId {
        let range = self.containment_square().map(|sq| sq.side + 2.0).unwrap_or(10.0);
        let x = (rng.gen_range(0.0..1.0) - 0.5) * range;
        let y = (rng.gen_range(0.0..1.0) - 0.5) * range;
        let angle = rng.gen_range(0.0..360.0);
        let obj = PlacedObject::new(Pose::new(x, y, angle), &self.template);
        let id = obj.id();
        self.objects.push(obj);
        self.refresh();
        id
    }

    /// Smallest square covering all objects, anchored at the minimum corner.
    pub fn containment_square(&self) -> Option<ContainmentSquare> {
        self.containment_bounds().map(|b| ContainmentSquare::covering(&b))
    }

    /// Containment square area per object; lower is a tighter packing.
    pub fn score(&self) -> Option<f64> {
        let sq = self.containment_square()?;
        Some(sq.area() / self.objects.len() as f64)
    }

    // --- Selection ---------------------------------------------------------

    pub fn select(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.slot_of(id)?;
        self.selected = Some(id);
        Ok(())
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn move_selected_to_farthest(&mut self, direction: Direction) -> Result<MoveOutcome, SceneError> {
        let id = self.selected.ok_or(SceneError::NoSelection)?;
        self.move_to_farthest(id, direction)
    }

    // --- Exchange ----------------------------------------------------------

    /// Encode every pose as a table; `None` when there is nothing to export.
    pub fn export_table(&self) -> Option<String> {
        if self.objects.is_empty() {
            return None;
        }
        let poses: Vec<Pose> = self.objects.iter().map(|o| o.pose()).collect();
        Some(exchange::write_table(&poses))
    }

    /// Replace the scene contents with the rows of `text`. Returns the number of objects loaded.
    pub fn import_table(&mut self, text: &str) -> usize {
        let table = exchange::parse_table(text);
        self.objects = table.poses.iter().map(|p| PlacedObject::new(*p, &self.template)).collect();
        self.selected = None;
        self.refresh();
        info!("imported {} objects ({} rows skipped)", self.objects.len(), table.skipped);
        self.objects.len()
    }

    pub fn save_table<P: AsRef<Path>>(&self, path: P) -> Result<(), ExchangeError> {
        let text = self.export_table().ok_or(ExchangeError::EmptyScene)?;
        std::fs::write(path.as_ref(), text)?;
        info!("exported {} objects to {}", self.objects.len(), path.as_ref().display());
        Ok(())
    }

    pub fn load_table<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, ExchangeError> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.import_table(&text))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneApi for Scene {
    fn add_object(&mut self, x: f64, y: f64, angle_degrees: f64) -> Result<ObjectId, SceneError> {
        let pose = Self::checked_pose(x, y, angle_degrees)?;
        let obj = PlacedObject::new(pose, &self.template);
        let id = obj.id();
        self.objects.push(obj);
        self.refresh();
        Ok(id)
    }

    fn remove_object(&mut self, id: ObjectId) -> Result<PlacedObject, SceneError> {
        let slot = self.slot_of(id)?;
        let removed = self.objects.remove(slot);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.refresh();
        Ok(removed)
    }

    fn set_pose(&mut self, id: ObjectId, x: f64, y: f64, angle_degrees: f64) -> Result<(), SceneError> {
        let pose = Self::checked_pose(x, y, angle_degrees)?;
        let slot = self.slot_of(id)?;
        self.objects[slot].set_pose(pose, &self.template);
        self.refresh();
        Ok(())
    }

    fn detect_all(&mut self) -> Vec<CollisionPair> {
        self.refresh();
        self.collisions.clone()
    }

    fn collisions(&self) -> &[CollisionPair] {
        &self.collisions
    }

    fn move_to_farthest(&mut self, id: ObjectId, direction: Direction) -> Result<MoveOutcome, SceneError> {
        let slot = self.slot_of(id)?;
        let moved = placement::move_to_farthest(&mut self.objects, slot, direction, &self.template, &self.cfg.placement);
        match moved {
            Some(distance) => {
                self.refresh();
                Ok(MoveOutcome { moved: true, distance })
            }
            None => Ok(MoveOutcome::stuck()),
        }
    }

    fn containment_bounds(&self) -> Option<Bounds> {
        placement::containment_bounds(&self.objects)
    }

    fn object_at_point(&self, p: DVec2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| Narrowphase::point_in_polygon(p, o.polygon()))
            .map(|o| o.id())
    }

    fn raycast(&self, origin: DVec2, dir: DVec2) -> Option<(ObjectId, RayHit)> {
        if dir.length_squared() == 0.0 {
            return None;
        }
        let mut best: Option<(ObjectId, RayHit)> = None;
        for o in &self.objects {
            if let Some(hit) = Narrowphase::ray_polygon(origin, dir, o.polygon()) {
                match &best {
                    Some((_, bh)) if hit.distance >= bh.distance => {}
                    _ => best = Some((o.id(), hit)),
                }
            }
        }
        debug!("raycast from {:?} along {:?}: {:?}", origin, dir, best.map(|(id, _)| id));
        best
    }
}
