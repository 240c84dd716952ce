//! Uniform-grid broad phase.
//!
//! Every object is registered in each cell its bounds touch; any two objects sharing a cell
//! become a candidate pair. The result over-approximates: objects far apart inside one
//! large cell are still reported, and the narrow phase filters them out.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{Bounds, IndexStats, ObjectId};

const MIN_CELL_SIZE: f64 = 1e-5;

/// Cell key -> ids whose bounds overlap that cell. Holds no versioning: call
/// [`SpatialIndex::clear`] before every rebuild.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<(i64, i64), HashSet<ObjectId>>,
    entries: usize,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            cells: HashMap::new(),
            entries: 0,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries = 0;
    }

    fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        ((x / self.cell_size).floor() as i64, (y / self.cell_size).floor() as i64)
    }

    /// Register `id` in every cell of the inclusive range covered by `bounds`.
    pub fn insert(&mut self, id: ObjectId, bounds: &Bounds) {
        let (ix0, iy0) = self.cell_of(bounds.min_x, bounds.min_y);
        let (ix1, iy1) = self.cell_of(bounds.max_x, bounds.max_y);
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                self.cells.entry((ix, iy)).or_default().insert(id);
            }
        }
        self.entries += 1;
    }

    /// Ids registered in the cell containing `(x, y)`.
    pub fn members_at(&self, x: f64, y: f64) -> Vec<ObjectId> {
        let mut out: Vec<ObjectId> = self
            .cells
            .get(&self.cell_of(x, y))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    /// Unordered pairs sharing at least one cell, each reported once as `(low, high)`,
    /// in ascending order.
    pub fn potential_pairs(&self) -> Vec<(ObjectId, ObjectId)> {
        let mut seen: BTreeSet<(ObjectId, ObjectId)> = BTreeSet::new();
        for members in self.cells.values() {
            let ids: Vec<ObjectId> = members.iter().copied().collect();
            for i0 in 0..ids.len() {
                for i1 in (i0 + 1)..ids.len() {
                    let (a, b) = (ids[i0], ids[i1]);
                    seen.insert(if a < b { (a, b) } else { (b, a) });
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Debug statistics for the current contents.
    pub fn stats(&self) -> IndexStats {
        let mut candidate_pairs = 0;
        for members in self.cells.values() {
            let n = members.len();
            if n >= 2 {
                candidate_pairs += n * (n - 1) / 2;
            }
        }
        IndexStats {
            entries: self.entries,
            cells: self.cells.len(),
            candidate_pairs,
            unique_pairs: self.potential_pairs().len(),
        }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(1.0)
    }
}
