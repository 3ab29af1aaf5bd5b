//! MapML `GetMapML` support.
//!
//! Translates a request for one layer (or layer group, or the whole map) into a
//! MapML document whose `<extent>` carries URL templates a MapML client fills in
//! to fetch images or tiles from this server.
//!
//! The pipeline is: locate the layer, resolve the PROJECTION keyword to a CRS,
//! reproject the map extent, build `<head>`, let the output mode build the
//! `<extent>` content, then serialize. Any failure short-circuits into a
//! `ServiceExceptionReport` (see [`dispatch`]).

pub mod crs;
pub mod dispatch;
pub mod document;
pub mod exception;
pub mod extent;
pub mod locator;
pub mod mode;
pub mod online_resource;
pub mod request;
pub mod xml;

use tracing::{debug, info};
use wms_common::metadata::lookup_metadata2;
use wms_common::{MapDefinition, RectReprojector, WmsError, WmsResult};

pub use crs::{lookup_projection, CrsPolicy, CrsResolver, MetadataCrsPolicy};
pub use dispatch::{dispatch, DispatchOutcome};
pub use exception::render_exception;
pub use extent::{resolve_extent, Extent};
pub use locator::{locate_layer, LayerMatch, MatchPolicy};
pub use mode::{MapMlMode, ModeContext};
pub use request::{KvpParams, MapMlRequest};

/// Metadata namespaces consulted for MapML output: `wms_` then `ows_`.
pub const MAPML_NAMESPACES: &str = "MO";

/// Content type of MapML documents.
pub const MAPML_CONTENT_TYPE: &str = "text/mapml";

/// A rendered document and its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMlResponse {
    pub content_type: &'static str,
    pub body: String,
}

/// A successfully written GetMapML document.
#[derive(Debug, Clone)]
pub struct MapMlOutput {
    pub response: MapMlResponse,
    /// Layer status flips for the caller to apply to the map
    pub status_updates: Vec<(usize, bool)>,
    pub mode: MapMlMode,
}

/// Per-request inputs besides the map.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub params: &'a KvpParams,
    /// Layer indexes on which GetMapML is enabled
    pub enabled_layers: &'a [usize],
    /// URL the request arrived on, used without `onlineresource` metadata
    pub request_url: Option<&'a str>,
    /// SERVICE name used in alternate projection links
    pub service: &'a str,
}

/// Writes GetMapML documents.
pub struct MapMlWriter<'a> {
    reprojector: &'a dyn RectReprojector,
    crs_policy: &'a dyn CrsPolicy,
    match_policy: MatchPolicy,
}

impl<'a> MapMlWriter<'a> {
    pub fn new(reprojector: &'a dyn RectReprojector, crs_policy: &'a dyn CrsPolicy) -> Self {
        Self {
            reprojector,
            crs_policy,
            match_policy: MatchPolicy::default(),
        }
    }

    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    /// Produce the MapML document for a GetMapML request.
    ///
    /// The map is not modified; apply [`MapMlOutput::status_updates`] afterwards.
    pub fn write_layer(&self, map: &MapDefinition, req: &RequestContext<'_>) -> WmsResult<MapMlOutput> {
        let script_url = online_resource::resolve_online_resource(map, MAPML_NAMESPACES, req.request_url)?;
        let request = MapMlRequest::from_params(req.params)?;

        let found = locate_layer(
            map,
            &request.layer,
            req.enabled_layers,
            MAPML_NAMESPACES,
            self.match_policy,
        )?;
        let layer = map.layer(found.index).ok_or_else(|| {
            WmsError::ConfigurationError(format!("Layer index {} out of range", found.index))
        })?;

        let resolver = CrsResolver::new(map, layer, self.crs_policy);
        let crs = resolver.resolve(&request.projection)?;
        let extent = resolve_extent(map, crs, self.reprojector)?;

        let head = document::build_head(&document::HeadContext {
            map,
            layer,
            requested: &request.layer,
            whole_map: found.whole_map,
            projection: &request.projection,
            style: &request.style,
            script_url: &script_url,
            service: req.service,
            resolver: &resolver,
        });

        let mode: MapMlMode = request
            .mode
            .as_deref()
            .or_else(|| lookup_metadata2(&layer.metadata, &map.metadata, None, "mapml_wms_mode"))
            .map(str::parse::<MapMlMode>)
            .transpose()?
            .unwrap_or_default();
        debug!(mode = %mode, "Selected MapML output mode");

        let children = mode.extent_children(&ModeContext {
            script_url: &script_url,
            layer: &request.layer,
            style: &request.style,
            extent: &extent,
            whole_map: found.whole_map,
        });

        let doc = document::assemble_document(head, &request.projection, children);
        let body = xml::serialize(&doc)?;

        info!(
            layer = %request.layer,
            projection = %request.projection,
            crs = %crs,
            mode = %mode,
            "Wrote MapML document"
        );

        Ok(MapMlOutput {
            response: MapMlResponse {
                content_type: MAPML_CONTENT_TYPE,
                body,
            },
            status_updates: found.status_updates,
            mode,
        })
    }
}
