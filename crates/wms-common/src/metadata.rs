//! OWS metadata lookup with namespace scoping.
//!
//! Map and layer metadata are flat key/value tables. Keys are case-insensitive and
//! usually carry a service prefix (`wms_title`, `ows_srs`, ...). Lookups name the
//! namespaces to try as a string of letters, e.g. `"MO"` tries `wms_` then `ows_`.

use std::collections::HashMap;

/// A case-insensitive metadata table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: HashMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; the key is stored lowercased.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(&key.to_ascii_lowercase())
    }

    /// Raw lookup of an exact (case-insensitive) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Look up `name` under each namespace in turn.
    ///
    /// Unknown namespace letters are skipped.
    pub fn lookup(&self, namespaces: &str, name: &str) -> Option<&str> {
        namespaces
            .chars()
            .filter_map(namespace_prefix)
            .find_map(|prefix| self.get(&format!("{}_{}", prefix, name)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

/// Map a namespace letter to its key prefix.
pub fn namespace_prefix(ns: char) -> Option<&'static str> {
    match ns.to_ascii_uppercase() {
        'M' => Some("wms"),
        'O' => Some("ows"),
        'F' => Some("wfs"),
        'G' => Some("gml"),
        'C' => Some("wcs"),
        'S' => Some("sos"),
        _ => None,
    }
}

/// Two-level lookup: the layer's table first, then the map's.
///
/// With `namespaces == None` the key is looked up without a prefix.
pub fn lookup_metadata2<'a>(
    primary: &'a Metadata,
    secondary: &'a Metadata,
    namespaces: Option<&str>,
    name: &str,
) -> Option<&'a str> {
    let find = |metadata: &'a Metadata| match namespaces {
        Some(ns) => metadata.lookup(ns, name),
        None => metadata.get(name),
    };
    find(primary).or_else(|| find(secondary))
}

/// Evaluate an `enable_request` value for one request name.
///
/// Tokens are whitespace separated and applied left to right: `*` and `!*` switch
/// every request, `Name` and `!Name` switch one. Returns `None` when no token
/// mentions the request.
pub fn request_enabled(value: &str, request: &str) -> Option<bool> {
    let mut result = None;
    for token in value.split_whitespace() {
        let (enabled, name) = match token.strip_prefix('!') {
            Some(rest) => (false, rest),
            None => (true, token),
        };
        if name == "*" || name.eq_ignore_ascii_case(request) {
            result = Some(enabled);
        }
    }
    result
}
