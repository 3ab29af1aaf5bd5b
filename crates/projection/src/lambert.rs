//! Lambert Conformal Conic projection (ellipsoidal, two standard parallels).
//!
//! Used for EPSG:3978 (NAD83 / Canada Atlas Lambert), the CRS behind the
//! MapML `CBMTILE` tile matrix set.
//!
//! The projection parameters include:
//! - Latitude of false origin (lat0) and central meridian (lon0)
//! - Standard parallels: latin1 and latin2 (can be equal for tangent cone)
//! - False easting / northing

use std::f64::consts::{FRAC_PI_2, PI};

use crate::ellipsoid::Ellipsoid;

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of false origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Build a projection from EPSG-style parameters in degrees.
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        let m1 = ellipsoid.m(latin1);
        let t1 = ellipsoid.t(latin1);

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            let m2 = ellipsoid.m(latin2);
            let t2 = ellipsoid.t(latin2);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };

        let f = m1 / (n * t1.powf(n));
        let rho0 = ellipsoid.a * f * ellipsoid.t(lat0).powf(n);

        Self {
            lon0,
            lat0,
            latin1,
            latin2,
            false_easting,
            false_northing,
            ellipsoid,
            n,
            f,
            rho0,
        }
    }

    /// EPSG:3978, NAD83 / Canada Atlas Lambert.
    ///
    /// Origin 49°N 95°W, standard parallels 49°N and 77°N, no false offsets, GRS80.
    pub fn canada_atlas() -> Self {
        Self::new(49.0, -95.0, 49.0, 77.0, 0.0, 0.0, Ellipsoid::GRS80)
    }

    /// Project geographic degrees to easting/northing in meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let lat = lat_deg.to_radians();
        // The cone apex is only reachable from the pole on the same side as n
        if (lat.abs() - FRAC_PI_2).abs() < 1e-10 && lat.signum() != self.n.signum() {
            return None;
        }

        let mut dlon = lon_deg.to_radians() - self.lon0;
        // Normalize longitude difference to [-π, π]
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.ellipsoid.a * self.f * self.ellipsoid.t(lat).powf(self.n);
        let theta = self.n * dlon;

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    /// Unproject easting/northing in meters to geographic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);

        let sign = self.n.signum();
        let rho = sign * (dx * dx + dy * dy).sqrt();
        let theta = (sign * dx).atan2(sign * dy);

        if rho == 0.0 {
            return Some((self.lon0.to_degrees(), sign * 90.0));
        }

        let t = (rho / (self.ellipsoid.a * self.f)).powf(1.0 / self.n);
        let lat = self.ellipsoid.phi_from_t(t)?;
        let lon = theta / self.n + self.lon0;

        Some((lon.to_degrees(), lat.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canada_atlas_origin() {
        let proj = LambertConformal::canada_atlas();
        let (x, y) = proj.forward(-95.0, 49.0).unwrap();
        assert!(x.abs() < 1e-6, "x = {}", x);
        assert!(y.abs() < 1e-6, "y = {}", y);
    }

    #[test]
    fn test_canada_atlas_roundtrip() {
        let proj = LambertConformal::canada_atlas();

        // Ottawa
        let (x, y) = proj.forward(-75.7, 45.42).unwrap();
        assert!(x > 1_000_000.0 && x < 2_000_000.0, "x = {}", x);
        assert!(y < 0.0, "Ottawa is south of the 49th parallel origin, y = {}", y);

        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert!((lon - (-75.7)).abs() < 1e-7, "lon roundtrip: {}", lon);
        assert!((lat - 45.42).abs() < 1e-7, "lat roundtrip: {}", lat);
    }

    #[test]
    fn test_south_pole_is_unprojectable() {
        let proj = LambertConformal::canada_atlas();
        assert!(proj.forward(0.0, -90.0).is_none());
        assert!(proj.forward(0.0, 90.0).is_some());
    }
}
