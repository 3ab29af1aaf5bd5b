//! Finding the layer a GetMapML request addresses.

use tracing::debug;
use wms_common::{LayerDefinition, MapDefinition, WmsError, WmsResult};

const LAYER_NOT_FOUND: &str = "Invalid layer given in the LAYER parameter. A layer might be \
    disabled for this request. Check wms/ows_enable_request settings.";

/// How duplicate layer names are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// The first enabled match in declared order wins.
    #[default]
    FirstMatch,
    /// Two enabled layers with the requested name are an error.
    UniqueName,
}

/// The located layer and the status flips the caller should apply.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMatch {
    /// Index of the located layer in the map
    pub index: usize,
    /// The request named the map itself
    pub whole_map: bool,
    /// `(index, active)` for every layer: only the match is active
    pub status_updates: Vec<(usize, bool)>,
}

fn matches_layer(layer: &LayerDefinition, requested: &str, namespaces: &str) -> bool {
    let eq = |candidate: &str| candidate.eq_ignore_ascii_case(requested);

    layer.name.as_deref().is_some_and(eq)
        || layer.group.as_deref().is_some_and(eq)
        || layer.nested_groups(namespaces).into_iter().any(eq)
}

/// Locate the layer addressed by `requested` among the `enabled` layer indexes.
///
/// A layer matches by name, group or nested group; naming the map matches every
/// enabled layer. Nothing is mutated: the caller applies `status_updates`.
pub fn locate_layer(
    map: &MapDefinition,
    requested: &str,
    enabled: &[usize],
    namespaces: &str,
    policy: MatchPolicy,
) -> WmsResult<LayerMatch> {
    let whole_map = map.is_map_name(requested);

    let candidates = move || {
        map.layers
            .iter()
            .enumerate()
            .filter(move |(index, _)| enabled.contains(index))
    };

    let index = candidates()
        .find(|(_, layer)| whole_map || matches_layer(layer, requested, namespaces))
        .map(|(index, _)| index)
        .ok_or_else(|| WmsError::invalid_parameter("LAYER", LAYER_NOT_FOUND))?;

    if policy == MatchPolicy::UniqueName && !whole_map {
        let named = candidates()
            .filter(|(_, layer)| {
                layer
                    .name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(requested))
            })
            .count();
        if named > 1 {
            return Err(WmsError::invalid_parameter(
                "LAYER",
                format!(
                    "Layer name '{}' matches {} layers. Layer names must be unique when \
                     strict layer matching is enabled.",
                    requested, named
                ),
            ));
        }
    }

    debug!(layer = requested, index, whole_map, "Located MapML layer");

    Ok(LayerMatch {
        index,
        whole_map,
        status_updates: (0..map.layers.len()).map(|i| (i, i == index)).collect(),
    })
}
