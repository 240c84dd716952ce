//! Farthest-placement search.
//!
//! Slides one object along an axis direction in small steps, growing the step after every
//! free probe and halving it after every blocked one, until the step drops below the
//! configured resolution. This is a greedy scan, not a bisection: a narrow gap past a
//! blocked probe is never explored, so the result can fall short of the true maximum.

use log::{debug, trace};

use crate::api::NarrowphaseApi;
use crate::config::PlacementConfig;
use crate::geometry::ShapeTemplate;
use crate::narrowphase::Narrowphase;
use crate::object::PlacedObject;
use crate::types::{Bounds, ContainmentSquare, Direction};

/// Diagnostics from one search.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SearchTrace {
    /// Largest collision-free distance found.
    pub distance: f64,
    /// Free travel before the containment square edge.
    pub max_distance: f64,
    pub iterations: usize,
    /// Probes that reached the collision test.
    pub probes: usize,
}

/// Union of the bounds of every object; `None` for an empty slice.
pub fn containment_bounds(objects: &[PlacedObject]) -> Option<Bounds> {
    let (first, rest) = objects.split_first()?;
    Some(rest.iter().fold(first.bounds(), |acc, o| acc.union(&o.bounds())))
}

/// Free travel from `bounds` to the square's far edge in `direction`, clamped to `>= 0`.
pub fn distance_to_boundary(bounds: &Bounds, square: &ContainmentSquare, direction: Direction) -> f64 {
    let d = match direction {
        Direction::Right => square.max_x() - bounds.max_x,
        Direction::Left => bounds.min_x - square.origin.x,
        Direction::Up => square.max_y() - bounds.max_y,
        Direction::Down => bounds.min_y - square.origin.y,
    };
    d.max(0.0)
}

/// True when `probe` overlaps any object other than itself. Uses an exact (zero tolerance)
/// box pre-filter before the polygon test.
fn blocked(probe: &PlacedObject, objects: &[PlacedObject]) -> bool {
    objects.iter().filter(|o| o.id() != probe.id()).any(|other| {
        Narrowphase::bounds_intersect(&probe.bounds(), &other.bounds(), 0.0)
            && Narrowphase::polygons_intersect(probe.polygon(), other.polygon())
    })
}

/// Search the largest distance `objects[slot]` can travel along `direction`.
///
/// Trial positions are evaluated on a scratch copy; `objects` itself is never mutated.
pub fn search_farthest(
    objects: &[PlacedObject],
    slot: usize,
    direction: Direction,
    template: &ShapeTemplate,
    cfg: &PlacementConfig,
) -> SearchTrace {
    let mut found = SearchTrace::default();
    let Some(all) = containment_bounds(objects) else {
        return found;
    };
    let target = &objects[slot];
    let square = ContainmentSquare::covering(&all);
    let max_distance = distance_to_boundary(&target.bounds(), &square, direction);
    found.max_distance = max_distance;

    let origin = target.pose();
    let unit = direction.unit();
    let mut probe = target.clone();

    let mut current = 0.0;
    let mut step = cfg.initial_step;
    let mut last_valid = 0.0;

    while step >= cfg.min_step && found.iterations < cfg.max_iterations {
        found.iterations += 1;
        let test = current + step;
        if test > max_distance {
            step /= 2.0;
            continue;
        }

        found.probes += 1;
        probe.set_pose(origin.translated(unit * test), template);
        let hit = blocked(&probe, objects);

        if hit {
            step /= 2.0;
        } else {
            current = test;
            last_valid = current;
            step = (step * cfg.growth_factor).min(cfg.initial_step);
        }
    }

    trace!(
        "search {:?}: {} iterations, {} probes, final step {:e}",
        direction, found.iterations, found.probes, step
    );
    found.distance = last_valid;
    found
}

/// Run the search and, when it found more than `min_step` of travel, move the object there.
/// Returns the distance moved, or `None` when the object stays put.
pub fn move_to_farthest(
    objects: &mut [PlacedObject],
    slot: usize,
    direction: Direction,
    template: &ShapeTemplate,
    cfg: &PlacementConfig,
) -> Option<f64> {
    let found = search_farthest(objects, slot, direction, template, cfg);
    if found.distance <= cfg.min_step {
        debug!(
            "object {:?} cannot move {:?} (limit {})",
            objects[slot].id(),
            direction,
            found.max_distance
        );
        return None;
    }
    let target = &mut objects[slot];
    let pose = target.pose().translated(direction.unit() * found.distance);
    target.set_pose(pose, template);
    debug!("object {:?} moved {:?} by {}", target.id(), direction, found.distance);
    Some(found.distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pose;
    use approx::assert_abs_diff_eq;

    fn objs(poses: &[(f64, f64, f64)]) -> Vec<PlacedObject> {
        let t = ShapeTemplate::tree();
        poses.iter().map(|&(x, y, d)| PlacedObject::new(Pose::new(x, y, d), &t)).collect()
    }

    #[test]
    fn test_containment_bounds_union() {
        assert!(containment_bounds(&[]).is_none());
        let o = objs(&[(0.0, 0.0, 0.0), (2.0, 3.0, 0.0)]);
        let b = containment_bounds(&o).unwrap();
        assert_abs_diff_eq!(b.min_x, -0.35, epsilon = 1e-12);
        assert_abs_diff_eq!(b.min_y, -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(b.max_x, 2.35, epsilon = 1e-12);
        assert_abs_diff_eq!(b.max_y, 3.8, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_to_boundary_per_direction() {
        let square = ContainmentSquare { origin: glam::DVec2::new(0.0, 0.0), side: 10.0 };
        let b = Bounds { min_x: 2.0, min_y: 3.0, max_x: 4.0, max_y: 5.0 };
        assert_eq!(distance_to_boundary(&b, &square, Direction::Right), 6.0);
        assert_eq!(distance_to_boundary(&b, &square, Direction::Left), 2.0);
        assert_eq!(distance_to_boundary(&b, &square, Direction::Up), 5.0);
        assert_eq!(distance_to_boundary(&b, &square, Direction::Down), 3.0);
        let outside = Bounds { min_x: 9.0, min_y: 0.0, max_x: 11.0, max_y: 1.0 };
        assert_eq!(distance_to_boundary(&outside, &square, Direction::Right), 0.0);
    }

    #[test]
    fn test_blocked_by_neighbour() {
        let t = ShapeTemplate::tree();
        let mut o = objs(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let trace = search_farthest(&o, 0, Direction::Right, &t, &PlacementConfig::default());
        // Base corners meet after 2.0 - 0.7 of travel.
        assert!(trace.distance <= 1.3 + 1e-12);
        assert_abs_diff_eq!(trace.distance, 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(trace.max_distance, 2.0, epsilon = 1e-12);
        assert!(trace.iterations < PlacementConfig::default().max_iterations);
        // Searching never moves anything.
        assert_eq!(o[0].pose(), Pose::new(0.0, 0.0, 0.0));

        let moved = move_to_farthest(&mut o, 0, Direction::Right, &t, &PlacementConfig::default()).unwrap();
        assert_abs_diff_eq!(moved, 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(o[0].pose().center_x, moved);
        assert_eq!(o[0].pose().center_y, 0.0);
    }

    #[test]
    fn test_lone_object_at_square_edge_stays() {
        let t = ShapeTemplate::tree();
        let mut o = objs(&[(1.0, 1.0, 0.0)]);
        let before = o[0].pose();
        for dir in [Direction::Left, Direction::Up, Direction::Down] {
            assert!(move_to_farthest(&mut o, 0, dir, &t, &PlacementConfig::default()).is_none());
            assert_eq!(o[0].pose(), before);
        }
    }

    #[test]
    fn test_lone_object_fills_square_slack() {
        // A 0.7 x 1.0 tree inside its own 1.0 square has 0.3 of slack to the right.
        let t = ShapeTemplate::tree();
        let mut o = objs(&[(0.0, 0.0, 0.0)]);
        let moved = move_to_farthest(&mut o, 0, Direction::Right, &t, &PlacementConfig::default()).unwrap();
        assert!(moved <= 0.3 + 1e-12);
        assert_abs_diff_eq!(moved, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_iteration_ceiling_bounds_work() {
        let t = ShapeTemplate::tree();
        let o = objs(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let cfg = PlacementConfig { max_iterations: 50, ..Default::default() };
        let trace = search_farthest(&o, 0, Direction::Right, &t, &cfg);
        assert_eq!(trace.iterations, 50);
        // Every probe was free and took a full initial step.
        assert_abs_diff_eq!(trace.distance, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_step_growth_capped_at_initial_step() {
        // With growth capped, reaching d takes at least d / initial_step accepted probes.
        let t = ShapeTemplate::tree();
        let o = objs(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let trace = search_farthest(&o, 0, Direction::Right, &t, &PlacementConfig::default());
        assert!(trace.probes >= 1300);
    }
}
