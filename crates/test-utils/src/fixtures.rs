//! Common test fixtures for the MapML WMS tests.
//!
//! A small map covering most of Canada in Web Mercator, with layers that
//! exercise groups, nested groups, per-layer CRS lists, output modes and
//! request access control.

use wms_common::{BoundingBox, CrsCode, LayerDefinition, MapDefinition};

/// Base URL configured as `ows_onlineresource` on the sample map.
pub const ONLINE_RESOURCE: &str = "http://localhost:8080/mapml";

/// Layer names of the sample map, in declared order.
pub mod layers {
    pub const ROADS: &str = "roads";
    pub const RAIL: &str = "rail";
    pub const PARKS: &str = "parks";
    pub const CONTOURS: &str = "contours";
    pub const RESTRICTED: &str = "restricted";

    /// Flat group shared by roads and rail
    pub const TRANSPORT_GROUP: &str = "transport";
}

/// Sample map extent in EPSG:3857.
pub const SAMPLE_EXTENT: BoundingBox = BoundingBox {
    min_x: -15_000_000.0,
    min_y: 5_000_000.0,
    max_x: -5_000_000.0,
    max_y: 10_000_000.0,
};

/// The sample map under its default name `demo`.
pub fn sample_map() -> MapDefinition {
    sample_map_named("demo")
}

/// The sample map with a custom map name.
pub fn sample_map_named(name: &str) -> MapDefinition {
    MapDefinition::new(name, CrsCode::Epsg3857, SAMPLE_EXTENT)
        .with_metadata("wms_title", "Demo Map")
        .with_metadata("ows_enable_request", "*")
        .with_metadata("ows_srs", "EPSG:3857 EPSG:3978 EPSG:5936 CRS:84 EPSG:4326")
        .with_metadata("ows_onlineresource", ONLINE_RESOURCE)
        .with_metadata("ows_attribution_title", "Demo contributors")
        .with_metadata("ows_attribution_onlineresource", "http://example.com/credits")
        .with_layer(
            LayerDefinition::new(layers::ROADS)
                .with_group(layers::TRANSPORT_GROUP)
                .with_metadata("wms_title", "Roads"),
        )
        .with_layer(
            LayerDefinition::new(layers::RAIL)
                .with_group(layers::TRANSPORT_GROUP)
                .with_metadata("wms_title", "Railways"),
        )
        .with_layer(
            LayerDefinition::new(layers::PARKS)
                .with_metadata("wms_title", "Parks")
                .with_metadata("wms_layer_group", "/landuse/green")
                .with_metadata("wms_srs", "EPSG:3857"),
        )
        .with_layer(
            LayerDefinition::new(layers::CONTOURS)
                .with_metadata("wms_title", "Contours")
                .with_metadata("mapml_wms_mode", "tile"),
        )
        .with_layer(
            LayerDefinition::new(layers::RESTRICTED).with_metadata("ows_enable_request", "!*"),
        )
}

/// The sample map as a map file, as read by the HTTP service.
pub const SAMPLE_MAP_YAML: &str = r#"
name: demo
projection: EPSG:3857
extent: [-15000000, 5000000, -5000000, 10000000]
metadata:
  wms_title: Demo Map
  ows_enable_request: "*"
  ows_srs: EPSG:3857 EPSG:3978 EPSG:5936 CRS:84 EPSG:4326
  ows_attribution_title: Demo contributors
layers:
  - name: roads
    group: transport
    metadata:
      wms_title: Roads
  - name: rail
    group: transport
    metadata:
      wms_title: Railways
  - name: parks
    metadata:
      wms_title: Parks
      wms_layer_group: /landuse/green
      wms_srs: EPSG:3857
  - name: contours
    metadata:
      wms_title: Contours
      mapml_wms_mode: tile
  - name: restricted
    metadata:
      ows_enable_request: "!*"
"#;

/// Common HTTP request parameters for GetMapML testing.
pub mod mapml {
    /// GetMapML parameters; `None` leaves the parameter out.
    #[derive(Debug, Clone, Copy)]
    pub struct GetMapMlParams {
        pub service: Option<&'static str>,
        pub layer: Option<&'static str>,
        pub projection: Option<&'static str>,
        pub style: Option<&'static str>,
        pub mode: Option<&'static str>,
    }

    /// GetMapML for the roads layer with every optional parameter unset.
    pub const DEFAULT_GETMAPML: GetMapMlParams = GetMapMlParams {
        service: Some("WMS"),
        layer: Some(super::layers::ROADS),
        projection: None,
        style: None,
        mode: None,
    };

    impl GetMapMlParams {
        /// Parameters as ordered key/value pairs, REQUEST included.
        pub fn to_pairs(&self) -> Vec<(&'static str, &'static str)> {
            let mut pairs = Vec::new();
            if let Some(service) = self.service {
                pairs.push(("SERVICE", service));
            }
            pairs.push(("REQUEST", "GetMapML"));
            let optional = [
                ("LAYER", self.layer),
                ("PROJECTION", self.projection),
                ("STYLE", self.style),
                ("MAPML_MODE", self.mode),
            ];
            for (key, value) in optional {
                if let Some(value) = value {
                    pairs.push((key, value));
                }
            }
            pairs
        }

        /// Converts parameters to a query string.
        pub fn to_query_string(&self) -> String {
            self.to_pairs()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&")
        }
    }
}
