//! polyplace: polygon overlap detection and greedy compaction for 2D packing layouts

pub mod types;
pub mod error;
pub mod config;
pub mod api;
pub mod geometry;
pub mod object;
pub mod broadphase;
pub mod narrowphase;
pub mod collision;
pub mod placement;
pub mod exchange;
pub mod scene;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::config::{PlacementConfig, SceneConfig};
pub use crate::error::{ConfigError, ExchangeError, GeometryError, SceneError};
pub use crate::geometry::{Polygon, ShapeTemplate};
pub use crate::narrowphase::Narrowphase;
pub use crate::object::PlacedObject;
pub use crate::scene::Scene;
