//! Routing of inbound KVP requests to the MapML writer.

use tracing::warn;
use wms_common::{MapDefinition, WmsError};

use super::exception::{render_exception, INVALID_REQUEST};
use super::request::KvpParams;
use super::{MapMlOutput, MapMlResponse, MapMlWriter, RequestContext, MAPML_NAMESPACES};

/// Service name when the request carries no SERVICE parameter.
pub const MAPMLTILE_SERVICE: &str = "MAPMLTILE";

/// Result of dispatching one request.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A MapML document was written
    Success(MapMlOutput),
    /// The request targeted MapML but failed; carries the exception document
    Failure(MapMlResponse),
    /// The request is for another handler
    NotApplicable,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }

    /// Label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Success(_) => "success",
            DispatchOutcome::Failure(_) => "failure",
            DispatchOutcome::NotApplicable => "not_applicable",
        }
    }
}

/// Dispatch a request addressed to `SERVICE=MAPMLTILE` or `SERVICE=WMS`.
///
/// `REQUEST=GetMapML` runs the writer against the layers on which GetMapML is
/// enabled. Any other MAPMLTILE request fails; anything else is left to other
/// handlers.
pub fn dispatch(
    writer: &MapMlWriter<'_>,
    map: &MapDefinition,
    params: &KvpParams,
    request_url: Option<&str>,
) -> DispatchOutcome {
    let service = match params.get("SERVICE") {
        None => MAPMLTILE_SERVICE,
        Some(s) if s.eq_ignore_ascii_case(MAPMLTILE_SERVICE) => MAPMLTILE_SERVICE,
        Some(s) if s.eq_ignore_ascii_case("WMS") => "WMS",
        Some(_) => return DispatchOutcome::NotApplicable,
    };

    let is_getmapml = params
        .get("REQUEST")
        .is_some_and(|r| r.eq_ignore_ascii_case("GetMapML"));

    if !is_getmapml {
        if service == MAPMLTILE_SERVICE && params.get("SERVICE").is_some() {
            let err = WmsError::invalid_parameter("REQUEST", "Incomplete or unsupported MAPMLTILE request");
            warn!(error = %err, "Rejected MAPMLTILE request");
            return DispatchOutcome::Failure(render_exception(&err, Some(INVALID_REQUEST)));
        }
        return DispatchOutcome::NotApplicable;
    }

    let enabled_layers = map.enabled_layers(MAPML_NAMESPACES, "GetMapML");
    let ctx = RequestContext {
        params,
        enabled_layers: &enabled_layers,
        request_url,
        service,
    };

    match writer.write_layer(map, &ctx) {
        Ok(output) => DispatchOutcome::Success(output),
        Err(err) => {
            warn!(
                error = %err,
                layer = params.get("LAYER").unwrap_or(""),
                "GetMapML request failed"
            );
            DispatchOutcome::Failure(render_exception(&err, Some(INVALID_REQUEST)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapml::MetadataCrsPolicy;
    use wms_common::{BoundingBox, CrsCode, LayerDefinition, RectReprojector, WmsResult};

    struct Identity;

    impl RectReprojector for Identity {
        fn reproject_rect(&self, _: CrsCode, _: CrsCode, rect: &BoundingBox) -> WmsResult<BoundingBox> {
            Ok(*rect)
        }
    }

    fn map() -> MapDefinition {
        MapDefinition::new(
            "demo",
            CrsCode::Epsg3857,
            BoundingBox::new(-1000.0, -1000.0, 1000.0, 1000.0),
        )
        .with_metadata("ows_enable_request", "*")
        .with_metadata("ows_onlineresource", "http://localhost/wms")
        .with_metadata("ows_srs", "EPSG:3857 EPSG:3978")
        .with_layer(LayerDefinition::new("roads"))
    }

    fn run(params: KvpParams) -> DispatchOutcome {
        let policy = MetadataCrsPolicy::default();
        let writer = MapMlWriter::new(&Identity, &policy);
        dispatch(&writer, &map(), &params, None)
    }

    #[test]
    fn test_other_services_are_not_applicable() {
        let params = KvpParams::new()
            .with("SERVICE", "WFS")
            .with("REQUEST", "GetMapML")
            .with("LAYER", "roads");
        assert!(matches!(run(params), DispatchOutcome::NotApplicable));

        let params = KvpParams::new().with("SERVICE", "WMS").with("REQUEST", "GetMap");
        assert!(matches!(run(params), DispatchOutcome::NotApplicable));

        assert!(matches!(run(KvpParams::new()), DispatchOutcome::NotApplicable));
    }

    #[test]
    fn test_unsupported_mapmltile_request() {
        let params = KvpParams::new().with("service", "mapmltile");
        match run(params) {
            DispatchOutcome::Failure(response) => {
                assert!(response.body.contains("code=\"InvalidRequest\""));
                assert!(response.body.contains("Incomplete or unsupported MAPMLTILE request"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_getmapml_without_service() {
        let params = KvpParams::new().with("REQUEST", "getmapml").with("LAYER", "roads");
        match run(params) {
            DispatchOutcome::Success(output) => {
                assert_eq!(output.response.content_type, "text/mapml");
                assert!(output
                    .response
                    .body
                    .contains("SERVICE=MAPMLTILE&amp;REQUEST=GetMapML&amp;LAYER=roads"));
                assert_eq!(output.status_updates, vec![(0, true)]);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_uses_invalid_request_code() {
        let params = KvpParams::new()
            .with("SERVICE", "WMS")
            .with("REQUEST", "GetMapML")
            .with("LAYER", "roads")
            .with("MAPML_MODE", "vector");
        let outcome = run(params);
        assert!(!outcome.is_success());
        assert_eq!(outcome.as_str(), "failure");
        let DispatchOutcome::Failure(response) = outcome else {
            unreachable!()
        };
        assert_eq!(response.content_type, "text/xml; charset=UTF-8");
        assert!(response.body.contains("<ServiceException code=\"InvalidRequest\">"));
    }
}
