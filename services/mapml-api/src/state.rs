//! Application state and shared resources.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

use projection::CrsTransformer;
use wms_common::MapDefinition;
use wms_protocol::{MapMlWriter, MatchPolicy, MetadataCrsPolicy};

use crate::config::MapConfig;

/// Shared application state.
pub struct AppState {
    /// The served map. GetMapML updates layer status, so requests against
    /// it are serialized through the write lock.
    pub map: RwLock<MapDefinition>,
    pub transformer: CrsTransformer,
    pub crs_policy: MetadataCrsPolicy,
    pub match_policy: MatchPolicy,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: MapConfig) -> Self {
        Self {
            map: RwLock::new(config.map),
            transformer: CrsTransformer::new(),
            crs_policy: MetadataCrsPolicy::default(),
            match_policy: config.match_policy,
            prometheus: None,
        }
    }

    /// Load the map file at `path`.
    pub fn from_map_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = MapConfig::load(path)?;
        info!(match_policy = ?config.match_policy, "Initialized application state");
        Ok(Self::new(config))
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// A writer bound to this state's reprojector and policies.
    pub fn writer(&self) -> MapMlWriter<'_> {
        MapMlWriter::new(&self.transformer, &self.crs_policy).with_match_policy(self.match_policy)
    }
}
