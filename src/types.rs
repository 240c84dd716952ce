use glam::DVec2;

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable object handle, unique for the lifetime of the process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Center position plus rotation in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub center_x: f64,
    pub center_y: f64,
    pub angle_degrees: f64,
}

impl Pose {
    pub fn new(center_x: f64, center_y: f64, angle_degrees: f64) -> Self {
        Self { center_x, center_y, angle_degrees }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.center_x, self.center_y)
    }

    pub fn is_finite(&self) -> bool {
        self.center_x.is_finite() && self.center_y.is_finite() && self.angle_degrees.is_finite()
    }

    /// Same rotation, center shifted by `delta`.
    pub fn translated(&self, delta: DVec2) -> Self {
        Self {
            center_x: self.center_x + delta.x,
            center_y: self.center_y + delta.y,
            angle_degrees: self.angle_degrees,
        }
    }
}

/// Line segment as a pair of endpoints.
pub type Segment = (DVec2, DVec2);

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn min(&self) -> DVec2 {
        DVec2::new(self.min_x, self.min_y)
    }

    pub fn max(&self) -> DVec2 {
        DVec2::new(self.max_x, self.max_y)
    }

    /// Area of the intersection of the two boxes (0 when disjoint).
    pub fn overlap_area(&self, other: &Bounds) -> f64 {
        let ox = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let oy = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        ox * oy
    }
}

/// Smallest square covering a set of bounds, anchored at their minimum corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContainmentSquare {
    pub origin: DVec2,
    pub side: f64,
}

impl ContainmentSquare {
    pub fn covering(bounds: &Bounds) -> Self {
        Self { origin: bounds.min(), side: bounds.width().max(bounds.height()) }
    }

    pub fn area(&self) -> f64 {
        self.side * self.side
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.side
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.side
    }
}

/// Confirmed overlap between two objects. `a < b` always holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionPair {
    pub a: ObjectId,
    pub b: ObjectId,
    /// Overlap area of the two bounding boxes (not true polygon overlap).
    pub overlap_extent: f64,
    pub center_distance: f64,
}

impl CollisionPair {
    pub fn involves(&self, id: ObjectId) -> bool {
        self.a == id || self.b == id
    }
}

/// Axis direction for the farthest-placement search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +y
    Up,
    /// -y
    Down,
    /// -x
    Left,
    /// +x
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn unit(self) -> DVec2 {
        match self {
            Direction::Up => DVec2::Y,
            Direction::Down => DVec2::NEG_Y,
            Direction::Left => DVec2::NEG_X,
            Direction::Right => DVec2::X,
        }
    }
}

/// Result of a farthest-placement request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub distance: f64,
}

impl MoveOutcome {
    pub fn stuck() -> Self {
        Self { moved: false, distance: 0.0 }
    }
}

/// Ray/segment hit. `distance` is the ray parameter (in units of `dir`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    pub point: DVec2,
    pub distance: f64,
}

/// Broad-phase statistics for a built index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub cells: usize,
    /// Sum of per-cell pair counts (n*(n-1)/2), counts duplicates across cells.
    pub candidate_pairs: usize,
    /// Unique pairs when deduplicated across cells.
    pub unique_pairs: usize,
}

/// Timing breakdown for one collision pass.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassTiming {
    pub total_ms: f64,
    pub index_ms: f64,
    pub narrowphase_ms: f64,
    pub fallback_ms: f64,
}

/// Summary of the last collision pass.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassReport {
    pub objects: usize,
    pub index: IndexStats,
    pub confirmed: usize,
    /// True when the exhaustive scan supplied the result.
    pub used_fallback: bool,
    pub timing: Option<PassTiming>,
}
