//! Reference ellipsoids and the conformal-latitude helpers shared by the
//! conic and azimuthal projections (Snyder, "Map Projections: A Working Manual").

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE: f64 = 1e-12;

/// An ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// First eccentricity
    pub e: f64,
}

impl Ellipsoid {
    /// WGS 84, 1/f = 298.257223563
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        e: 0.081_819_190_842_621_5,
    };

    /// GRS 1980, 1/f = 298.257222101
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        e: 0.081_819_191_042_815_8,
    };

    /// Snyder eq. 14-15: m = cos φ / sqrt(1 - e² sin² φ)
    pub fn m(&self, phi: f64) -> f64 {
        let es = self.e * phi.sin();
        phi.cos() / (1.0 - es * es).sqrt()
    }

    /// Snyder eq. 15-9: t = tan(π/4 - φ/2) / ((1 - e sin φ) / (1 + e sin φ))^(e/2)
    pub fn t(&self, phi: f64) -> f64 {
        let es = self.e * phi.sin();
        (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)
    }

    /// Invert [`Ellipsoid::t`] by fixed-point iteration (Snyder eq. 7-9).
    pub fn phi_from_t(&self, t: f64) -> Option<f64> {
        if !t.is_finite() || t < 0.0 {
            return None;
        }
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let es = self.e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            if (next - phi).abs() < CONVERGENCE {
                return Some(next);
            }
            phi = next;
        }
        Some(phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eccentricity_matches_flattening() {
        let e_of = |inv_f: f64| {
            let f = 1.0 / inv_f;
            (2.0 * f - f * f).sqrt()
        };
        assert!((Ellipsoid::WGS84.e - e_of(298.257_223_563)).abs() < 1e-12);
        assert!((Ellipsoid::GRS80.e - e_of(298.257_222_101)).abs() < 1e-12);
    }

    #[test]
    fn test_t_inverse() {
        let ell = Ellipsoid::WGS84;
        for deg in [-60.0_f64, 0.0, 37.5, 71.0, 89.0] {
            let phi = deg.to_radians();
            let back = ell.phi_from_t(ell.t(phi)).unwrap();
            assert!((back - phi).abs() < 1e-10, "{} -> {}", deg, back.to_degrees());
        }
    }
}
