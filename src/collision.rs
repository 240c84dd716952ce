//! Collision pass: broad phase, narrow phase, and the exhaustive fallback.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, trace, warn};

use crate::api::NarrowphaseApi;
use crate::broadphase::SpatialIndex;
use crate::config::SceneConfig;
use crate::narrowphase::Narrowphase;
use crate::object::PlacedObject;
use crate::types::{CollisionPair, ObjectId, PassReport, PassTiming};

fn elapsed_ms(t: Option<Instant>) -> f64 {
    t.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0)
}

/// Box pre-filter, exact polygon test, then metrics. `None` when the two do not overlap.
fn confirm_pair(a: &PlacedObject, b: &PlacedObject, tolerance: f64) -> Option<CollisionPair> {
    if !Narrowphase::bounds_intersect(&a.bounds(), &b.bounds(), tolerance) {
        return None;
    }
    if !Narrowphase::polygons_intersect(a.polygon(), b.polygon()) {
        return None;
    }
    let (lo, hi) = if a.id() < b.id() { (a, b) } else { (b, a) };
    Some(CollisionPair {
        a: lo.id(),
        b: hi.id(),
        overlap_extent: Narrowphase::overlap_extent(lo.polygon(), hi.polygon()),
        center_distance: Narrowphase::center_distance(lo.center(), hi.center()),
    })
}

/// Indexed pairs when there are any, otherwise whatever `exhaustive` finds. The flag tells
/// whether the exhaustive result was taken.
fn prefer_indexed<F>(indexed: Vec<CollisionPair>, exhaustive: F) -> (Vec<CollisionPair>, bool)
where
    F: FnOnce() -> Vec<CollisionPair>,
{
    if !indexed.is_empty() {
        return (indexed, false);
    }
    let fallback = exhaustive();
    if fallback.is_empty() {
        return (fallback, false);
    }
    warn!(
        "indexed pass found no pairs but exhaustive scan found {}; using exhaustive result",
        fallback.len()
    );
    (fallback, true)
}

/// Exhaustive O(n^2) scan with the same filter chain as the indexed pass.
pub fn detect_all_brute_force(objects: &[PlacedObject], cfg: &SceneConfig) -> Vec<CollisionPair> {
    let mut out = Vec::new();
    for i in 0..objects.len() {
        for j in (i + 1)..objects.len() {
            if let Some(pair) = confirm_pair(&objects[i], &objects[j], cfg.detect_tolerance) {
                out.push(pair);
            }
        }
    }
    out
}

/// Find every overlapping pair. Poses are only read.
pub fn detect_all(objects: &[PlacedObject], cfg: &SceneConfig) -> Vec<CollisionPair> {
    detect_all_with_report(objects, cfg).0
}

/// [`detect_all`] plus a summary of how the result was produced.
///
/// The indexed result wins whenever it is non-empty; the exhaustive scan runs, and supplies
/// the answer, only when the indexed pass finds nothing.
pub fn detect_all_with_report(objects: &[PlacedObject], cfg: &SceneConfig) -> (Vec<CollisionPair>, PassReport) {
    let mut report = PassReport { objects: objects.len(), ..Default::default() };
    if objects.len() <= 1 {
        return (Vec::new(), report);
    }

    let now = || if cfg.enable_timing { Some(Instant::now()) } else { None };
    let t_all = now();

    let t_index = now();
    let mut index = SpatialIndex::new(cfg.cell_size);
    let mut slots: HashMap<ObjectId, usize> = HashMap::with_capacity(objects.len());
    for (slot, obj) in objects.iter().enumerate() {
        index.insert(obj.id(), &obj.bounds());
        slots.insert(obj.id(), slot);
    }
    let candidates = index.potential_pairs();
    report.index = index.stats();
    let index_ms = elapsed_ms(t_index);

    let t_np = now();
    let mut indexed = Vec::new();
    for (ia, ib) in candidates {
        let (a, b) = (&objects[slots[&ia]], &objects[slots[&ib]]);
        if let Some(pair) = confirm_pair(a, b, cfg.detect_tolerance) {
            trace!("pair {:?}-{:?} overlaps, extent {}", pair.a, pair.b, pair.overlap_extent);
            indexed.push(pair);
        }
    }
    let narrowphase_ms = elapsed_ms(t_np);

    let t_fb = now();
    let (pairs, used_fallback) = prefer_indexed(indexed, || detect_all_brute_force(objects, cfg));
    report.used_fallback = used_fallback;
    let fallback_ms = elapsed_ms(t_fb);

    report.confirmed = pairs.len();
    if cfg.enable_timing {
        report.timing = Some(PassTiming {
            total_ms: elapsed_ms(t_all),
            index_ms,
            narrowphase_ms,
            fallback_ms,
        });
    }
    debug!(
        "collision pass: {} objects, {} cells, {} candidates, {} confirmed",
        report.objects, report.index.cells, report.index.unique_pairs, report.confirmed
    );
    (pairs, report)
}
