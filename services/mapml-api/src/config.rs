//! Map file loader.
//!
//! The service serves a single map described by a YAML file: its name,
//! native projection and extent, OWS metadata, and an ordered list of layers.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use wms_common::{
    BoundingBox, CrsCode, LayerDefinition, LayerStatus, Metadata, MapDefinition, WmsError,
    WmsResult,
};
use wms_protocol::MatchPolicy;

/// A loaded map file.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub map: MapDefinition,
    /// How LAYER values matching several layers are handled
    pub match_policy: MatchPolicy,
}

impl MapConfig {
    /// Load and validate a map file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> WmsResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            warn!(error = %e, path = ?path, "Failed to read map file");
            WmsError::from(e)
        })?;

        let config = Self::from_yaml_str(&contents)?;
        info!(
            path = ?path,
            map = config.map.name.as_deref().unwrap_or(""),
            layers = config.map.layers.len(),
            "Loaded map file"
        );
        Ok(config)
    }

    /// Parse and validate a map file.
    pub fn from_yaml_str(contents: &str) -> WmsResult<Self> {
        let yaml: YamlMapFile = serde_yaml::from_str(contents)?;
        yaml.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct YamlMapFile {
    #[serde(default)]
    name: Option<String>,
    projection: String,
    extent: [f64; 4],
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    #[serde(default)]
    layers: Vec<YamlLayer>,
    /// Reject LAYER values that name more than one enabled layer
    #[serde(default)]
    strict_layer_names: bool,
}

#[derive(Debug, Deserialize)]
struct YamlLayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    status: LayerStatus,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl From<YamlLayer> for LayerDefinition {
    fn from(layer: YamlLayer) -> Self {
        LayerDefinition {
            name: layer.name,
            group: layer.group,
            status: layer.status,
            metadata: layer.metadata.into_iter().collect(),
        }
    }
}

impl TryFrom<YamlMapFile> for MapConfig {
    type Error = WmsError;

    fn try_from(yaml: YamlMapFile) -> WmsResult<Self> {
        let projection = CrsCode::from_wms_string(&yaml.projection)?;

        let [min_x, min_y, max_x, max_y] = yaml.extent;
        let extent = BoundingBox::new(min_x, min_y, max_x, max_y);
        if !extent.is_valid() {
            return Err(WmsError::ConfigurationError(format!(
                "map extent is not a valid rectangle: {:?}",
                yaml.extent
            )));
        }

        let layers: Vec<LayerDefinition> = yaml.layers.into_iter().map(Into::into).collect();
        for (index, layer) in layers.iter().enumerate() {
            if layer.name.is_none() {
                warn!(index, "Layer has no name and can only be requested through its group");
            }
        }

        let metadata: Metadata = yaml.metadata.into_iter().collect();
        let match_policy = if yaml.strict_layer_names {
            MatchPolicy::UniqueName
        } else {
            MatchPolicy::FirstMatch
        };

        Ok(MapConfig {
            map: MapDefinition {
                name: yaml.name,
                projection,
                extent,
                metadata,
                layers,
            },
            match_policy,
        })
    }
}
