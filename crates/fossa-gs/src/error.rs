//! Error types for the ground station tools.

use fossa_bitcode::LinkError;
use fossa_fcp::{FcpError, TelemetryError};
use thiserror::Error;

/// Errors that can occur when running a ground station command.
#[derive(Debug, Error)]
pub enum GsError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Station configuration is not valid YAML for [`crate::StationConfig`].
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Report could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Hex argument could not be decoded.
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Frame codec rejected the frame or its arguments.
    #[error("FCP error: {0}")]
    Fcp(#[from] FcpError),

    /// Telemetry record could not be decoded.
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// Link layer decoding failed.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Station configuration is incomplete or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GsError {

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        GsError::Config(message.into())
    }
}
