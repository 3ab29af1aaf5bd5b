//! GetMapML request parameters.

use wms_common::{WmsError, WmsResult};

/// Projection used when the request carries no PROJECTION parameter.
pub const DEFAULT_PROJECTION: &str = "OSMTILE";

/// Ordered key/value request parameters with case-insensitive names.
///
/// When a name repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KvpParams {
    pairs: Vec<(String, String)>,
}

impl KvpParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Builder-style push.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KvpParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parsed GetMapML request.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMlRequest {
    /// Requested layer, group or map name
    pub layer: String,
    /// Projection keyword as sent; `OSMTILE` only when the key is absent
    pub projection: String,
    /// Style name, passed through to templates unchanged
    pub style: String,
    /// Explicit `MAPML_MODE`, if any
    pub mode: Option<String>,
}

impl MapMlRequest {
    pub fn from_params(params: &KvpParams) -> WmsResult<Self> {
        let layer = params
            .get("LAYER")
            .filter(|l| !l.is_empty())
            .ok_or_else(|| WmsError::MissingParameter("LAYER".to_string()))?;

        Ok(Self {
            layer: layer.to_string(),
            projection: params
                .get("PROJECTION")
                .unwrap_or(DEFAULT_PROJECTION)
                .to_string(),
            style: params.get("STYLE").unwrap_or_default().to_string(),
            mode: params.get("MAPML_MODE").map(str::to_string),
        })
    }
}
