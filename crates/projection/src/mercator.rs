//! Spherical ("Web") Mercator, EPSG:3857.
//!
//! Geographic coordinates are treated as if on a sphere of radius equal to the
//! WGS84 semi-major axis, as every web map does.

use std::f64::consts::FRAC_PI_4;

/// Sphere radius used by EPSG:3857.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit where the projected square world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the width of the projected world, in meters.
pub const MAX_EXTENT: f64 = 20_037_508.342_789_244;

/// Project lon/lat degrees to EPSG:3857 meters.
///
/// Latitudes beyond ±[`MAX_LATITUDE`] are clamped so that polar extents still
/// produce a finite rectangle.
pub fn forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat = lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = EARTH_RADIUS * lon_deg.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}

/// Unproject EPSG:3857 meters to lon/lat degrees.
pub fn inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}
