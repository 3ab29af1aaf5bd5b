//! Point and rectangle transformations between the supported CRSs.
//!
//! Every transformation goes through geographic lon/lat. Rectangles are
//! transformed by sampling a regular grid of points over the source rectangle
//! (edges included) and taking the bounds of the transformed samples.

use tracing::debug;
use wms_common::{BoundingBox, CrsCode, RectReprojector, WmsError, WmsResult};

use crate::{mercator, wrap_longitude, LambertConformal, PolarStereographic};

/// Default number of sampling intervals along each rectangle edge.
pub const DEFAULT_SAMPLES_PER_EDGE: usize = 20;

/// A concrete projection for one CRS.
#[derive(Debug, Clone)]
pub enum Projection {
    /// EPSG:4326 and CRS:84; x is longitude, y is latitude
    Geographic,
    WebMercator,
    Lambert(LambertConformal),
    Polar(PolarStereographic),
}

impl Projection {
    pub fn for_crs(code: CrsCode) -> Self {
        match code {
            CrsCode::Epsg4326 | CrsCode::Crs84 => Projection::Geographic,
            CrsCode::Epsg3857 => Projection::WebMercator,
            CrsCode::Epsg3978 => Projection::Lambert(LambertConformal::canada_atlas()),
            CrsCode::Epsg5936 => Projection::Polar(PolarStereographic::alaska()),
        }
    }

    /// Projected coordinates to lon/lat degrees.
    pub fn to_geographic(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lon, lat) = match self {
            Projection::Geographic => (x, y),
            Projection::WebMercator => mercator::inverse(x, y),
            Projection::Lambert(p) => p.inverse(x, y)?,
            Projection::Polar(p) => p.inverse(x, y)?,
        };
        (lon.is_finite() && lat.is_finite()).then(|| (wrap_longitude(lon), lat))
    }

    /// Lon/lat degrees to projected coordinates.
    pub fn from_geographic(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        match self {
            Projection::Geographic => Some((lon, lat)),
            Projection::WebMercator => Some(mercator::forward(lon, lat)),
            Projection::Lambert(p) => p.forward(lon, lat),
            Projection::Polar(p) => p.forward(lon, lat),
        }
    }
}

/// [`RectReprojector`] backed by this crate's projection math.
#[derive(Debug, Clone)]
pub struct CrsTransformer {
    samples_per_edge: usize,
}

impl Default for CrsTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl CrsTransformer {
    pub fn new() -> Self {
        Self {
            samples_per_edge: DEFAULT_SAMPLES_PER_EDGE,
        }
    }

    pub fn with_samples_per_edge(samples_per_edge: usize) -> Self {
        Self {
            samples_per_edge: samples_per_edge.max(1),
        }
    }

    /// Transform a single point.
    pub fn transform_point(&self, from: CrsCode, to: CrsCode, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lon, lat) = Projection::for_crs(from).to_geographic(x, y)?;
        Projection::for_crs(to).from_geographic(lon, lat)
    }
}

impl RectReprojector for CrsTransformer {
    fn reproject_rect(
        &self,
        from: CrsCode,
        to: CrsCode,
        rect: &BoundingBox,
    ) -> WmsResult<BoundingBox> {
        if from == to || (from.is_geographic() && to.is_geographic()) {
            return Ok(*rect);
        }

        let source = Projection::for_crs(from);
        let target = Projection::for_crs(to);
        let n = self.samples_per_edge;
        let step_x = rect.width() / n as f64;
        let step_y = rect.height() / n as f64;

        let mut out = BoundingBox::empty();
        let mut failed = 0usize;
        for i in 0..=n {
            for j in 0..=n {
                let x = rect.min_x + step_x * i as f64;
                let y = rect.min_y + step_y * j as f64;
                match source
                    .to_geographic(x, y)
                    .and_then(|(lon, lat)| target.from_geographic(lon, lat))
                {
                    Some((px, py)) => out.expand_to_include(px, py),
                    None => failed += 1,
                }
            }
        }

        if !out.is_valid() {
            return Err(WmsError::ReprojectionFailure(format!(
                "unable to reproject extent {:?} from {} to {}",
                rect, from, to
            )));
        }

        debug!(
            from = %from,
            to = %to,
            failed_samples = failed,
            min_x = out.min_x,
            min_y = out.min_y,
            max_x = out.max_x,
            max_y = out.max_y,
            "Reprojected rectangle"
        );
        Ok(out)
    }
}
