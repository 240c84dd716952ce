use glam::DVec2;

use crate::api::NarrowphaseApi;
use crate::geometry::Polygon;
use crate::types::*;

/// Box pre-filter slack absorbing jitter from repeated transform rebuilds.
pub const DEFAULT_BOUNDS_TOLERANCE: f64 = 0.001;

/// Cross-product magnitude below which two directions count as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Narrowphase polygon tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn segments_intersect(a: Segment, b: Segment) -> bool {
        let (p1, p2) = a;
        let (p3, p4) = b;
        let d = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
        // Parallel or collinear: collinear overlap is deliberately not reported.
        if d.abs() < PARALLEL_EPSILON {
            return false;
        }
        let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / d;
        let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / d;
        (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
    }

    fn point_in_polygon(p: DVec2, poly: &Polygon) -> bool {
        // Even-odd rule with a horizontal ray towards +x.
        let pts = poly.points();
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (pi, pj) = (pts[i], pts[j]);
            if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    fn bounds_intersect(a: &Bounds, b: &Bounds, tolerance: f64) -> bool {
        !(a.max_x < b.min_x - tolerance
            || b.max_x < a.min_x - tolerance
            || a.max_y < b.min_y - tolerance
            || b.max_y < a.min_y - tolerance)
    }

    fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
        if !Self::bounds_intersect(&a.bounds(), &b.bounds(), DEFAULT_BOUNDS_TOLERANCE) {
            return false;
        }
        for ea in a.edges() {
            if b.edges().any(|eb| Self::segments_intersect(ea, eb)) {
                return true;
            }
        }
        // No edge crossings: one may still sit wholly inside the other.
        Self::point_in_polygon(a.points()[0], b) || Self::point_in_polygon(b.points()[0], a)
    }

    fn overlap_extent(a: &Polygon, b: &Polygon) -> f64 {
        a.bounds().overlap_area(&b.bounds())
    }

    fn center_distance(c0: DVec2, c1: DVec2) -> f64 {
        c0.distance(c1)
    }

    fn ray_segment(origin: DVec2, dir: DVec2, seg: Segment) -> Option<RayHit> {
        let (s0, s1) = seg;
        let r = s1 - s0;
        let den = r.x * dir.y - r.y * dir.x;
        if den.abs() < PARALLEL_EPSILON {
            return None;
        }
        let rel = origin - s0;
        let t = (rel.x * dir.y - rel.y * dir.x) / den;
        let u = (rel.x * r.y - rel.y * r.x) / den;
        if (0.0..=1.0).contains(&t) && u >= 0.0 {
            Some(RayHit { point: s0 + r * t, distance: u })
        } else {
            None
        }
    }

    fn ray_polygon(origin: DVec2, dir: DVec2, poly: &Polygon) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for edge in poly.edges() {
            if let Some(hit) = Self::ray_segment(origin, dir, edge) {
                match &best {
                    Some(b) if hit.distance >= b.distance => {}
                    _ => best = Some(hit),
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ShapeTemplate, build_polygon};
    use approx::assert_abs_diff_eq;

    fn square(cx: f64, cy: f64, h: f64) -> Polygon {
        Polygon::new(vec![
            DVec2::new(cx - h, cy - h),
            DVec2::new(cx + h, cy - h),
            DVec2::new(cx + h, cy + h),
            DVec2::new(cx - h, cy + h),
        ])
        .unwrap()
    }

    fn tree(x: f64, y: f64, deg: f64) -> Polygon {
        build_polygon(&Pose::new(x, y, deg), &ShapeTemplate::tree())
    }

    // --- Primitives ---------------------------------------------------------

    #[test]
    fn test_segments_crossing() {
        let a = (DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0));
        let b = (DVec2::new(0.0, -1.0), DVec2::new(0.0, 1.0));
        assert!(Narrowphase::segments_intersect(a, b));
        assert!(Narrowphase::segments_intersect(b, a));
    }

    #[test]
    fn test_segments_shared_endpoint_counts() {
        let a = (DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0));
        let b = (DVec2::new(1.0, 1.0), DVec2::new(2.0, 0.0));
        assert!(Narrowphase::segments_intersect(a, b));
    }

    #[test]
    fn test_segments_disjoint() {
        let a = (DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0));
        let b = (DVec2::new(2.0, -1.0), DVec2::new(2.0, 1.0));
        assert!(!Narrowphase::segments_intersect(a, b));
    }

    #[test]
    fn test_collinear_overlap_not_reported() {
        let a = (DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0));
        let b = (DVec2::new(1.0, 0.0), DVec2::new(3.0, 0.0));
        assert!(!Narrowphase::segments_intersect(a, b));
    }

    #[test]
    fn test_point_in_polygon_square() {
        let sq = square(0.0, 0.0, 1.0);
        assert!(Narrowphase::point_in_polygon(DVec2::ZERO, &sq));
        assert!(Narrowphase::point_in_polygon(DVec2::new(0.9, -0.9), &sq));
        assert!(!Narrowphase::point_in_polygon(DVec2::new(1.1, 0.0), &sq));
        assert!(!Narrowphase::point_in_polygon(DVec2::new(0.0, 5.0), &sq));
    }

    #[test]
    fn test_point_in_concave_tree() {
        let t = tree(0.0, 0.0, 0.0);
        assert!(Narrowphase::point_in_polygon(DVec2::new(0.0, 0.4), &t));
        assert!(Narrowphase::point_in_polygon(DVec2::new(0.0, -0.1), &t));
        // Beside the trunk, below the lowest tier.
        assert!(!Narrowphase::point_in_polygon(DVec2::new(0.3, -0.1), &t));
        // Just outside the middle tier's flank.
        assert!(!Narrowphase::point_in_polygon(DVec2::new(0.19, 0.3), &t));
    }

    #[test]
    fn test_bounds_intersect_tolerance() {
        let a = Bounds { min_x: 0.0, min_y: 0.0, max_x: 1.0, max_y: 1.0 };
        let b = Bounds { min_x: 1.0005, min_y: 0.0, max_x: 2.0, max_y: 1.0 };
        assert!(Narrowphase::bounds_intersect(&a, &b, DEFAULT_BOUNDS_TOLERANCE));
        assert!(Narrowphase::bounds_intersect(&b, &a, DEFAULT_BOUNDS_TOLERANCE));
        assert!(!Narrowphase::bounds_intersect(&a, &b, 0.0));
        assert!(!Narrowphase::bounds_intersect(&b, &a, 0.0));
        // Touching edges intersect even with zero tolerance.
        let c = Bounds { min_x: 1.0, min_y: 0.0, max_x: 2.0, max_y: 1.0 };
        assert!(Narrowphase::bounds_intersect(&a, &c, 0.0));
    }

    // --- Polygons -----------------------------------------------------------

    #[test]
    fn test_polygons_overlapping_edges() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.5, 0.5, 1.0);
        assert!(Narrowphase::polygons_intersect(&a, &b));
        assert!(Narrowphase::polygons_intersect(&b, &a));
    }

    #[test]
    fn test_polygons_containment_without_edge_crossing() {
        let outer = square(0.0, 0.0, 2.0);
        let inner = square(0.2, -0.1, 0.5);
        assert!(Narrowphase::polygons_intersect(&outer, &inner));
        assert!(Narrowphase::polygons_intersect(&inner, &outer));
    }

    #[test]
    fn test_polygons_boxes_overlap_shapes_do_not() {
        // Trees side by side: base corners fit inside each other's box but the
        // outlines stay apart.
        let a = tree(0.0, 0.0, 0.0);
        let b = tree(0.6, 0.3, 0.0);
        assert!(Narrowphase::bounds_intersect(&a.bounds(), &b.bounds(), 0.0));
        assert!(!Narrowphase::polygons_intersect(&a, &b));
        assert!(!Narrowphase::polygons_intersect(&b, &a));
    }

    #[test]
    fn test_polygons_far_apart() {
        let a = tree(0.0, 0.0, 0.0);
        let b = tree(10.0, 10.0, 0.0);
        assert!(!Narrowphase::polygons_intersect(&a, &b));
    }

    #[test]
    fn test_identical_trees_intersect() {
        let a = tree(0.0, 0.0, 0.0);
        let b = tree(0.0, 0.0, 0.0);
        assert!(Narrowphase::polygons_intersect(&a, &b));
    }

    #[test]
    fn test_overlap_extent_is_box_overlap() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.5, 0.5, 1.0);
        // x: [0.5, 1.0], y: [-0.5, 1.0]
        assert_abs_diff_eq!(Narrowphase::overlap_extent(&a, &b), 0.5 * 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(Narrowphase::overlap_extent(&b, &a), 0.75, epsilon = 1e-12);
        let far = square(10.0, 0.0, 1.0);
        assert_eq!(Narrowphase::overlap_extent(&a, &far), 0.0);
    }

    #[test]
    fn test_center_distance() {
        assert_abs_diff_eq!(
            Narrowphase::center_distance(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0)),
            5.0
        );
    }

    // --- Rays ---------------------------------------------------------------

    #[test]
    fn test_ray_segment_hit() {
        let hit = Narrowphase::ray_segment(
            DVec2::new(-5.0, 0.0),
            DVec2::X,
            (DVec2::new(0.0, -1.0), DVec2::new(0.0, 1.0)),
        )
        .unwrap();
        assert_abs_diff_eq!(hit.distance, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.point.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.point.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_segment_behind_and_parallel() {
        let seg = (DVec2::new(0.0, -1.0), DVec2::new(0.0, 1.0));
        assert!(Narrowphase::ray_segment(DVec2::new(-5.0, 0.0), DVec2::NEG_X, seg).is_none());
        assert!(Narrowphase::ray_segment(DVec2::new(-5.0, 0.0), DVec2::Y, seg).is_none());
    }

    #[test]
    fn test_ray_polygon_closest_edge() {
        let sq = square(3.0, 0.0, 1.0);
        let hit = Narrowphase::ray_polygon(DVec2::ZERO, DVec2::X, &sq).unwrap();
        assert_abs_diff_eq!(hit.distance, 2.0, epsilon = 1e-12);
        assert!(Narrowphase::ray_polygon(DVec2::ZERO, DVec2::NEG_X, &sq).is_none());
    }
}
