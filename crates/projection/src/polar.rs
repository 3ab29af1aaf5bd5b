//! Polar stereographic projection (ellipsoidal, variant A, north pole).
//!
//! Used for EPSG:5936 (WGS 84 / EPSG Alaska Polar Stereographic), the CRS behind
//! the MapML `APSTILE` tile matrix set.

use crate::ellipsoid::Ellipsoid;

/// North polar stereographic with a scale factor at the pole.
#[derive(Debug, Clone)]
pub struct PolarStereographic {
    /// Longitude pointing "down" from the pole, in radians
    pub lon0: f64,
    /// Scale factor at the natural origin
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    /// 2 a k0 / sqrt((1+e)^(1+e) (1-e)^(1-e))
    scale: f64,
}

impl PolarStereographic {
    pub fn north(
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let e = ellipsoid.e;
        let denom = ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();
        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            ellipsoid,
            scale: 2.0 * ellipsoid.a * k0 / denom,
        }
    }

    /// EPSG:5936: pole at (2000000, 2000000), 150°W pointing down, k0 = 0.994.
    pub fn alaska() -> Self {
        Self::north(-150.0, 0.994, 2_000_000.0, 2_000_000.0, Ellipsoid::WGS84)
    }

    /// Project geographic degrees to easting/northing in meters.
    ///
    /// The south pole maps to infinity and yields `None`.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if lat_deg <= -90.0 + 1e-10 {
            return None;
        }
        let rho = self.scale * self.ellipsoid.t(lat_deg.to_radians());
        let dlon = lon_deg.to_radians() - self.lon0;

        let x = self.false_easting + rho * dlon.sin();
        let y = self.false_northing - rho * dlon.cos();
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    /// Unproject easting/northing in meters to geographic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let dx = x - self.false_easting;
        let dy = y - self.false_northing;
        let rho = (dx * dx + dy * dy).sqrt();
        if rho == 0.0 {
            return Some((self.lon0.to_degrees(), 90.0));
        }

        let lat = self.ellipsoid.phi_from_t(rho / self.scale)?;
        let lon = self.lon0 + dx.atan2(-dy);
        Some((lon.to_degrees(), lat.to_degrees()))
    }
}
