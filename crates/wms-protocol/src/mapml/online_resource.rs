//! The base URL that generated MapML links point back to.

use wms_common::{MapDefinition, WmsError, WmsResult};

/// Base URL from `onlineresource` metadata, else `request_url`.
///
/// The result always ends in `?` or `&` so parameters can be appended.
pub fn resolve_online_resource(
    map: &MapDefinition,
    namespaces: &str,
    request_url: Option<&str>,
) -> WmsResult<String> {
    let url = map
        .metadata
        .lookup(namespaces, "onlineresource")
        .filter(|u| !u.is_empty())
        .or(request_url.filter(|u| !u.is_empty()))
        .ok_or_else(|| WmsError::ConfigurationError("Missing OnlineResource.".to_string()))?;

    Ok(terminate_url(url))
}

fn terminate_url(url: &str) -> String {
    if url.ends_with('?') || url.ends_with('&') {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&", url)
    } else {
        format!("{}?", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wms_common::{BoundingBox, CrsCode};

    fn map() -> MapDefinition {
        MapDefinition::new(
            "demo",
            CrsCode::Epsg3857,
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        )
    }

    #[test]
    fn test_terminate_url() {
        assert_eq!(terminate_url("http://h/wms"), "http://h/wms?");
        assert_eq!(terminate_url("http://h/wms?"), "http://h/wms?");
        assert_eq!(terminate_url("http://h/cgi?map=x"), "http://h/cgi?map=x&");
        assert_eq!(terminate_url("http://h/cgi?map=x&"), "http://h/cgi?map=x&");
    }

    #[test]
    fn test_metadata_wins_over_request_url() {
        let map = map().with_metadata("ows_onlineresource", "http://configured/wms");
        let url = resolve_online_resource(&map, "MO", Some("http://request/wms")).unwrap();
        assert_eq!(url, "http://configured/wms?");
    }

    #[test]
    fn test_request_url_fallback_and_missing() {
        let url = resolve_online_resource(&map(), "MO", Some("http://request/mapml")).unwrap();
        assert_eq!(url, "http://request/mapml?");

        let err = resolve_online_resource(&map(), "MO", None).unwrap_err();
        assert!(matches!(err, WmsError::ConfigurationError(ref m) if m == "Missing OnlineResource."));
    }
}
