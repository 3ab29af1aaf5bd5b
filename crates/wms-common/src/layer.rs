//! Map and layer definitions served over WMS/MapML.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::metadata::{request_enabled, Metadata};
use crate::{BoundingBox, CrsCode};

/// Display status of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerStatus {
    On,
    #[default]
    Off,
    Default,
}

/// A single layer of a map.
#[derive(Debug, Clone, Default)]
pub struct LayerDefinition {
    /// Layer name (used in LAYER/LAYERS parameters)
    pub name: Option<String>,

    /// Optional flat group name
    pub group: Option<String>,

    /// Current display status
    pub status: LayerStatus,

    /// OWS metadata (`wms_title`, `ows_srs`, `wms_layer_group`, ...)
    pub metadata: Metadata,
}

impl LayerDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_metadata(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Group names from `layer_group` metadata, outermost first.
    ///
    /// A value of `/parent/child` puts the layer in both `parent` and `child`.
    pub fn nested_groups(&self, namespaces: &str) -> Vec<&str> {
        let Some(path) = self.metadata.lookup(namespaces, "layer_group") else {
            return Vec::new();
        };
        if !path.starts_with('/') {
            warn!(
                layer = self.name.as_deref().unwrap_or(""),
                value = path,
                "layer_group metadata does not start with '/', ignoring"
            );
            return Vec::new();
        }
        path.split('/').filter(|g| !g.is_empty()).collect()
    }

    /// Whether `request` is enabled on this layer, ignoring map-level settings.
    pub fn request_enabled(&self, namespaces: &str, request: &str) -> Option<bool> {
        self.metadata
            .lookup(namespaces, "enable_request")
            .and_then(|value| request_enabled(value, request))
    }
}

/// A map: the top-level collection of layers with its own name and extent.
#[derive(Debug, Clone)]
pub struct MapDefinition {
    /// Map name; requesting it as LAYER addresses the whole map
    pub name: Option<String>,

    /// Native projection of the map extent
    pub projection: CrsCode,

    /// Declared map extent in the native projection
    pub extent: BoundingBox,

    /// Map-level (web) metadata
    pub metadata: Metadata,

    /// Layers in declared order; a layer's index is its position
    pub layers: Vec<LayerDefinition>,
}

impl MapDefinition {
    pub fn new(name: impl Into<String>, projection: CrsCode, extent: BoundingBox) -> Self {
        Self {
            name: Some(name.into()),
            projection,
            extent,
            metadata: Metadata::new(),
            layers: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn with_layer(mut self, layer: LayerDefinition) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layer(&self, index: usize) -> Option<&LayerDefinition> {
        self.layers.get(index)
    }

    /// True when `name` addresses the whole map (case-insensitive).
    pub fn is_map_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    /// Indexes of the layers on which `request` is enabled.
    ///
    /// A layer's own `enable_request` decides when it mentions the request,
    /// otherwise the map's setting applies. Unmentioned requests are disabled.
    pub fn enabled_layers(&self, namespaces: &str, request: &str) -> Vec<usize> {
        let map_default = self
            .metadata
            .lookup(namespaces, "enable_request")
            .and_then(|value| request_enabled(value, request))
            .unwrap_or(false);

        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| {
                layer
                    .request_enabled(namespaces, request)
                    .unwrap_or(map_default)
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Apply `(index, active)` status updates; unknown indexes are ignored.
    pub fn apply_statuses(&mut self, updates: &[(usize, bool)]) {
        for &(index, active) in updates {
            if let Some(layer) = self.layers.get_mut(index) {
                layer.status = if active {
                    LayerStatus::On
                } else {
                    LayerStatus::Off
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> MapDefinition {
        MapDefinition::new(
            "demo",
            CrsCode::Epsg3857,
            BoundingBox::new(-1000.0, -1000.0, 1000.0, 1000.0),
        )
        .with_metadata("ows_enable_request", "*")
        .with_layer(LayerDefinition::new("roads"))
        .with_layer(LayerDefinition::new("rivers").with_metadata("wms_enable_request", "!GetMapML"))
        .with_layer(
            LayerDefinition::new("parks").with_metadata("wms_layer_group", "/landuse/green"),
        )
    }

    #[test]
    fn test_enabled_layers_layer_overrides_map() {
        let map = sample_map();
        assert_eq!(map.enabled_layers("MO", "GetMapML"), vec![0, 2]);
        assert_eq!(map.enabled_layers("MO", "GetMap"), vec![0, 1, 2]);
    }

    #[test]
    fn test_enabled_layers_default_is_disabled() {
        let mut map = sample_map();
        map.metadata = Metadata::new();
        assert!(map.enabled_layers("MO", "GetMapML").is_empty());
    }

    #[test]
    fn test_nested_groups() {
        let map = sample_map();
        assert_eq!(map.layers[2].nested_groups("MO"), vec!["landuse", "green"]);
        assert!(map.layers[0].nested_groups("MO").is_empty());

        let bad = LayerDefinition::new("x").with_metadata("wms_layer_group", "landuse");
        assert!(bad.nested_groups("MO").is_empty());
    }

    #[test]
    fn test_apply_statuses() {
        let mut map = sample_map();
        map.apply_statuses(&[(0, false), (1, true), (99, true)]);
        assert_eq!(map.layers[0].status, LayerStatus::Off);
        assert_eq!(map.layers[1].status, LayerStatus::On);
    }

    #[test]
    fn test_is_map_name() {
        let map = sample_map();
        assert!(map.is_map_name("DEMO"));
        assert!(!map.is_map_name("roads"));
    }
}
