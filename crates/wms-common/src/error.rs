//! Error types for the MapML WMS services.

use thiserror::Error;

/// Result type alias using WmsError.
pub type WmsResult<T> = Result<T, WmsError>;

/// Primary error type for WMS/MapML operations.
#[derive(Debug, Error)]
pub enum WmsError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("PROJECTION {projection} requires CRS {crs} to be enabled for this layer.")]
    ProjectionNotEnabled { projection: String, crs: String },

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    // === Service Errors ===
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Reprojection failed: {0}")]
    ReprojectionFailure(String),

    #[error("Writing MapML XML output failed: {0}")]
    SerializationFailure(String),
}

impl WmsError {
    /// Shorthand for an [`WmsError::InvalidParameter`].
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        WmsError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

impl From<crate::crs::CrsParseError> for WmsError {
    fn from(err: crate::crs::CrsParseError) -> Self {
        WmsError::InvalidCrs(err.to_string())
    }
}

impl From<serde_yaml::Error> for WmsError {
    fn from(err: serde_yaml::Error) -> Self {
        WmsError::ConfigurationError(format!("YAML error: {}", err))
    }
}

impl From<std::io::Error> for WmsError {
    fn from(err: std::io::Error) -> Self {
        WmsError::ConfigurationError(err.to_string())
    }
}
