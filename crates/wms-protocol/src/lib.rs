//! OGC WMS protocol pieces for MapML clients.
//!
//! Supports:
//! - `GetMapML`: MapML documents describing a layer as WMS GetMap URL templates
//! - `GetFeatureInfo` results as `text/mapml`

pub mod getfeatureinfo;
pub mod mapml;

pub use getfeatureinfo::{FeatureQueryResults, InfoFormat, LayerQueryResult, QueryFeature, QueryItem};
pub use mapml::{
    dispatch, render_exception, DispatchOutcome, KvpParams, MapMlMode, MapMlOutput, MapMlResponse,
    MapMlWriter, MatchPolicy, MetadataCrsPolicy,
};
