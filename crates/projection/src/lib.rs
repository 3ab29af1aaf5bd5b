//! Coordinate reference system transformations.
//!
//! Implements the map projections behind the MapML tile matrix sets from
//! scratch, without external projection libraries.

pub mod ellipsoid;
pub mod lambert;
pub mod mercator;
pub mod polar;
pub mod transform;

pub use ellipsoid::Ellipsoid;
pub use lambert::LambertConformal;
pub use polar::PolarStereographic;
pub use transform::{CrsTransformer, Projection};

/// Normalize a longitude in degrees to [-180, 180].
///
/// Values within rounding noise of the antimeridian are left alone.
pub fn wrap_longitude(lon: f64) -> f64 {
    if lon.abs() <= 180.0 + 1e-9 {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
