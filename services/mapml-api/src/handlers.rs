//! HTTP handlers for GetMapML, GetFeatureInfo, health, and metrics.

use axum::{
    extract::{Extension, Query},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use wms_common::WmsError;
use wms_protocol::{
    dispatch, render_exception, DispatchOutcome, FeatureQueryResults, InfoFormat, KvpParams,
    MapMlResponse,
};

use crate::state::AppState;

/// Exception code for requests no handler on this server accepts.
const OPERATION_NOT_SUPPORTED: &str = "OperationNotSupported";

/// Exception code for an INFO_FORMAT this server cannot write.
const INVALID_FORMAT: &str = "InvalidFormat";

/// GET /wms, /mapml - MapML KVP endpoint
#[instrument(skip(state, headers, query), fields(path = %uri.path()))]
pub async fn mapml_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let params: KvpParams = query.into_iter().collect();
    let request_url = request_url(&headers, &uri);

    let outcome = {
        let mut map = state.map.write().await;
        let outcome = dispatch(&state.writer(), &map, &params, request_url.as_deref());
        if let DispatchOutcome::Success(output) = &outcome {
            map.apply_statuses(&output.status_updates);
        }
        outcome
    };

    let mode = match &outcome {
        DispatchOutcome::Success(output) => output.mode.as_str(),
        _ => "none",
    };
    metrics::counter!(
        "mapml_requests_total",
        "outcome" => outcome.as_str(),
        "mode" => mode
    )
    .increment(1);
    debug!(outcome = outcome.as_str(), mode, "Dispatched request");

    match outcome {
        DispatchOutcome::Success(output) => document_response(StatusCode::OK, output.response),
        DispatchOutcome::Failure(response) => {
            document_response(StatusCode::BAD_REQUEST, response)
        }
        DispatchOutcome::NotApplicable if is_feature_info(&params) => feature_info_response(&params),
        DispatchOutcome::NotApplicable => {
            let service = params.get("SERVICE").unwrap_or("");
            let request = params.get("REQUEST").unwrap_or("");
            let err = WmsError::invalid_parameter(
                "REQUEST",
                format!("{} {} is not supported by this server", service, request),
            );
            document_response(
                StatusCode::NOT_FOUND,
                render_exception(&err, Some(OPERATION_NOT_SUPPORTED)),
            )
        }
    }
}

fn is_feature_info(params: &KvpParams) -> bool {
    let wms = params
        .get("SERVICE")
        .map_or(true, |s| s.eq_ignore_ascii_case("WMS"));
    wms && params
        .get("REQUEST")
        .is_some_and(|r| r.eq_ignore_ascii_case("GetFeatureInfo"))
}

/// Answer the query link of image-mode documents.
///
/// The served map has no feature source, so every query comes back empty.
fn feature_info_response(params: &KvpParams) -> Response {
    let requested = params
        .get("INFO_FORMAT")
        .unwrap_or(InfoFormat::default().to_mime());
    let Some(format) = InfoFormat::from_mime(requested) else {
        let err = WmsError::invalid_parameter(
            "INFO_FORMAT",
            format!("{} is not supported. Use text/mapml or application/json.", requested),
        );
        return document_response(
            StatusCode::BAD_REQUEST,
            render_exception(&err, Some(INVALID_FORMAT)),
        );
    };

    match FeatureQueryResults::new(Vec::new()).render(format) {
        Ok(document) => document_response(StatusCode::OK, document),
        Err(e) => {
            warn!(error = %e, "Failed to write GetFeatureInfo response");
            let err = WmsError::SerializationFailure(e.to_string());
            document_response(StatusCode::INTERNAL_SERVER_ERROR, render_exception(&err, None))
        }
    }
}

fn document_response(status: StatusCode, document: MapMlResponse) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, document.content_type)],
        document.body,
    )
        .into_response()
}

/// URL the request arrived on, rebuilt from the Host header.
///
/// The scheme follows `X-Forwarded-Proto` when a proxy set it to http or https.
fn request_url(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|p| p.eq_ignore_ascii_case("https"))
        .map_or("http", |_| "https");
    Some(format!("{}://{}{}", scheme, host, uri.path()))
}

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}
