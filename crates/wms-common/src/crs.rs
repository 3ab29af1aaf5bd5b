//! Coordinate Reference System types and utilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{BoundingBox, WmsResult};

/// CRS codes understood by the MapML service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// Web Mercator (meters)
    Epsg3857,
    /// NAD83 / Canada Atlas Lambert (meters)
    Epsg3978,
    /// WGS 84 / EPSG Alaska Polar Stereographic (meters)
    Epsg5936,
    /// WGS84 Geographic, lat/lon axis order in WMS 1.3.0
    Epsg4326,
    /// WGS84 Geographic, lon/lat axis order
    Crs84,
}

impl CrsCode {
    /// Every supported code, in a stable order.
    pub const ALL: [CrsCode; 5] = [
        CrsCode::Epsg3857,
        CrsCode::Epsg3978,
        CrsCode::Epsg5936,
        CrsCode::Epsg4326,
        CrsCode::Crs84,
    ];

    /// Parse a CRS string from a WMS request or a map definition.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:3857"
    /// - "CRS:84"
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            "EPSG:3978" => Ok(CrsCode::Epsg3978),
            "EPSG:5936" => Ok(CrsCode::Epsg5936),
            "EPSG:4326" => Ok(CrsCode::Epsg4326),
            "CRS:84" => Ok(CrsCode::Crs84),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// The identifier used in WMS `CRS=` parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrsCode::Epsg3857 => "EPSG:3857",
            CrsCode::Epsg3978 => "EPSG:3978",
            CrsCode::Epsg5936 => "EPSG:5936",
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Crs84 => "CRS:84",
        }
    }

    /// Get the axis order for this CRS in WMS 1.3.0.
    ///
    /// Only EPSG:4326 flips to lat/lon. CRS:84 keeps lon/lat.
    pub fn axis_order_wms_1_3(&self) -> AxisOrder {
        match self {
            CrsCode::Epsg4326 => AxisOrder::LatLon,
            _ => AxisOrder::XY,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326 | CrsCode::Crs84)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CrsCode {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wms_string(s)
    }
}

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    XY,
    /// Y (latitude/northing), X (longitude/easting)
    LatLon,
}

/// Reprojects an axis-aligned rectangle between two coordinate systems.
///
/// Geographic rectangles always carry longitude in `x` and latitude in `y`.
pub trait RectReprojector {
    fn reproject_rect(&self, from: CrsCode, to: CrsCode, rect: &BoundingBox)
        -> WmsResult<BoundingBox>;
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
