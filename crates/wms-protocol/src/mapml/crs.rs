//! MapML projection keywords and their CRS bindings.

use tracing::debug;
use wms_common::{CrsCode, LayerDefinition, MapDefinition, WmsError, WmsResult};

/// A MapML projection keyword bound to the CRS used in WMS requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionBinding {
    pub keyword: &'static str,
    pub crs: CrsCode,
}

const fn bind(keyword: &'static str, crs: CrsCode) -> ProjectionBinding {
    ProjectionBinding { keyword, crs }
}

/// Keyword table; `WGS84` means CRS:84 (lon/lat axis order).
#[cfg(not(feature = "legacy-wgs84"))]
pub const PROJECTION_BINDINGS: &[ProjectionBinding] = &[
    bind("OSMTILE", CrsCode::Epsg3857),
    bind("CBMTILE", CrsCode::Epsg3978),
    bind("APSTILE", CrsCode::Epsg5936),
    bind("WGS84", CrsCode::Crs84),
    bind("WGS84-4326", CrsCode::Epsg4326),
];

/// Keyword table with `WGS84` bound straight to EPSG:4326.
#[cfg(feature = "legacy-wgs84")]
pub const PROJECTION_BINDINGS: &[ProjectionBinding] = &[
    bind("OSMTILE", CrsCode::Epsg3857),
    bind("CBMTILE", CrsCode::Epsg3978),
    bind("APSTILE", CrsCode::Epsg5936),
    bind("WGS84", CrsCode::Epsg4326),
];

/// Keywords offered as alternate projections, in output order.
pub const ALTERNATE_PROJECTIONS: [&str; 4] = ["OSMTILE", "CBMTILE", "APSTILE", "WGS84"];

/// CRS bound to a projection keyword (case-insensitive).
pub fn lookup_projection(keyword: &str) -> Option<CrsCode> {
    PROJECTION_BINDINGS
        .iter()
        .find(|b| b.keyword.eq_ignore_ascii_case(keyword))
        .map(|b| b.crs)
}

/// Decides whether a CRS may be served for a layer.
pub trait CrsPolicy {
    fn is_crs_enabled(&self, map: &MapDefinition, layer: &LayerDefinition, crs: CrsCode) -> bool;
}

/// Enablement from the `srs` metadata list, layer first then map.
///
/// Without any list only the map's native CRS is enabled.
#[derive(Debug, Clone, Copy)]
pub struct MetadataCrsPolicy {
    namespaces: &'static str,
}

impl MetadataCrsPolicy {
    pub fn new(namespaces: &'static str) -> Self {
        Self { namespaces }
    }
}

impl Default for MetadataCrsPolicy {
    fn default() -> Self {
        Self::new(super::MAPML_NAMESPACES)
    }
}

impl CrsPolicy for MetadataCrsPolicy {
    fn is_crs_enabled(&self, map: &MapDefinition, layer: &LayerDefinition, crs: CrsCode) -> bool {
        let srs_list = layer
            .metadata
            .lookup(self.namespaces, "srs")
            .or_else(|| map.metadata.lookup(self.namespaces, "srs"));

        match srs_list {
            Some(list) => list
                .split_whitespace()
                .any(|code| code.eq_ignore_ascii_case(crs.as_str())),
            None => crs == map.projection,
        }
    }
}

/// Resolves projection keywords for one layer of a map.
pub struct CrsResolver<'a> {
    map: &'a MapDefinition,
    layer: &'a LayerDefinition,
    policy: &'a dyn CrsPolicy,
}

impl<'a> CrsResolver<'a> {
    pub fn new(map: &'a MapDefinition, layer: &'a LayerDefinition, policy: &'a dyn CrsPolicy) -> Self {
        Self { map, layer, policy }
    }

    /// Resolve `keyword`, failing with `InvalidParameter` for an unknown keyword
    /// and `ProjectionNotEnabled` when the layer does not serve its CRS.
    ///
    /// The keyword is checked before enablement is consulted.
    pub fn resolve(&self, keyword: &str) -> WmsResult<CrsCode> {
        let crs = lookup_projection(keyword)
            .ok_or_else(|| WmsError::invalid_parameter("PROJECTION", "Invalid PROJECTION parameter"))?;

        if !self.policy.is_crs_enabled(self.map, self.layer, crs) {
            return Err(WmsError::ProjectionNotEnabled {
                projection: keyword.to_string(),
                crs: crs.as_str().to_string(),
            });
        }

        debug!(projection = keyword, crs = %crs, "Resolved MapML projection");
        Ok(crs)
    }

    /// Same as [`CrsResolver::resolve`] without reporting why a keyword is unusable.
    pub fn probe(&self, keyword: &str) -> Option<CrsCode> {
        let crs = lookup_projection(keyword)?;
        self.policy
            .is_crs_enabled(self.map, self.layer, crs)
            .then_some(crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use wms_common::BoundingBox;

    struct CountingPolicy {
        calls: Cell<usize>,
        allow: bool,
    }

    impl CrsPolicy for CountingPolicy {
        fn is_crs_enabled(&self, _: &MapDefinition, _: &LayerDefinition, _: CrsCode) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.allow
        }
    }

    fn map() -> MapDefinition {
        MapDefinition::new(
            "demo",
            CrsCode::Epsg3857,
            BoundingBox::new(-1000.0, -1000.0, 1000.0, 1000.0),
        )
        .with_layer(LayerDefinition::new("roads"))
    }

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(lookup_projection("osmtile"), Some(CrsCode::Epsg3857));
        assert_eq!(lookup_projection("CbmTile"), Some(CrsCode::Epsg3978));
        assert_eq!(lookup_projection("APSTILE"), Some(CrsCode::Epsg5936));
        assert_eq!(lookup_projection("BOGUS"), None);
    }

    #[cfg(not(feature = "legacy-wgs84"))]
    #[test]
    fn test_wgs84_binds_crs84() {
        assert_eq!(lookup_projection("WGS84"), Some(CrsCode::Crs84));
        assert_eq!(lookup_projection("WGS84-4326"), Some(CrsCode::Epsg4326));
    }

    #[cfg(feature = "legacy-wgs84")]
    #[test]
    fn test_wgs84_binds_epsg4326() {
        assert_eq!(lookup_projection("WGS84"), Some(CrsCode::Epsg4326));
        assert_eq!(lookup_projection("WGS84-4326"), None);
    }

    #[test]
    fn test_unknown_keyword_fails_before_enablement() {
        let map = map();
        let policy = CountingPolicy {
            calls: Cell::new(0),
            allow: true,
        };
        let resolver = CrsResolver::new(&map, &map.layers[0], &policy);

        let err = resolver.resolve("BOGUS").unwrap_err();
        assert!(matches!(err, WmsError::InvalidParameter { ref param, .. } if param == "PROJECTION"));
        assert_eq!(policy.calls.get(), 0);
    }

    #[test]
    fn test_disabled_crs() {
        let map = map();
        let policy = CountingPolicy {
            calls: Cell::new(0),
            allow: false,
        };
        let resolver = CrsResolver::new(&map, &map.layers[0], &policy);

        let err = resolver.resolve("CBMTILE").unwrap_err();
        assert!(matches!(err, WmsError::ProjectionNotEnabled { ref crs, .. } if crs == "EPSG:3978"));
        assert_eq!(resolver.probe("CBMTILE"), None);
        assert_eq!(resolver.probe("BOGUS"), None);
    }

    #[test]
    fn test_metadata_policy_falls_back_to_native_crs() {
        let map = map();
        let policy = MetadataCrsPolicy::default();
        let resolver = CrsResolver::new(&map, &map.layers[0], &policy);
        assert_eq!(resolver.resolve("OSMTILE").unwrap(), CrsCode::Epsg3857);
        assert_eq!(resolver.probe("CBMTILE"), None);
    }

    #[test]
    fn test_metadata_policy_layer_list_wins() {
        let map = map().with_metadata("ows_srs", "EPSG:3857 EPSG:3978");
        let layer = LayerDefinition::new("parks").with_metadata("wms_srs", "epsg:5936");
        let policy = MetadataCrsPolicy::default();

        assert!(policy.is_crs_enabled(&map, &layer, CrsCode::Epsg5936));
        assert!(!policy.is_crs_enabled(&map, &layer, CrsCode::Epsg3978));
        assert!(policy.is_crs_enabled(&map, &map.layers[0], CrsCode::Epsg3978));
    }
}
