//! Common types and utilities shared across the MapML WMS crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod layer;
pub mod metadata;

pub use bbox::BoundingBox;
pub use crs::{AxisOrder, CrsCode, RectReprojector};
pub use error::{WmsError, WmsResult};
pub use layer::{LayerDefinition, LayerStatus, MapDefinition};
pub use metadata::Metadata;
