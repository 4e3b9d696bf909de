//! Station configuration.
//!
//! A station is described by a small YAML document:
//!
//! ```yaml
//! callsign: FOSSASAT-1
//! password: password
//! key: 000102030405060708090a0b0c0d0e0f
//! telemetry_layout: v2
//! ```
//!
//! `password` and `key` select the encrypted path and must be given
//! together. Every field can be overridden from the command line.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use fossa_fcp::{Credentials, TelemetryLayout};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::GsError;

/// Cipher key given as hex text.
#[derive(Clone, PartialEq, Eq)]
pub struct HexKey(pub Vec<u8>);

impl HexKey {
    /// Key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Keys stay out of logs.
impl fmt::Debug for HexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexKey([{} bytes])", self.0.len())
    }
}

impl FromStr for HexKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s.trim()).map(HexKey)
    }
}

impl Serialize for HexKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for HexKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("Invalid hex key: {}", e)))
    }
}

/// Station configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    /// Station callsign, the leading field of every frame.
    #[serde(default)]
    pub callsign: String,
    /// Password embedded in encrypted sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Cipher key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<HexKey>,
    /// Protocol revision: function ID table and system info record.
    #[serde(default)]
    pub telemetry_layout: TelemetryLayout,
}

/// Command line values that replace configuration fields.
#[derive(Debug, Clone, Default)]
pub struct StationOverrides {
    pub callsign: Option<String>,
    pub password: Option<String>,
    pub key: Option<HexKey>,
    pub telemetry_layout: Option<TelemetryLayout>,
}

impl StationConfig {
    /// Apply command line overrides.
    pub fn with_overrides(mut self, overrides: StationOverrides) -> Self {
        if let Some(callsign) = overrides.callsign {
            self.callsign = callsign;
        }
        if let Some(password) = overrides.password {
            self.password = Some(password);
        }
        if let Some(key) = overrides.key {
            self.key = Some(key);
        }
        if let Some(layout) = overrides.telemetry_layout {
            self.telemetry_layout = layout;
        }
        self
    }

    /// Check that the configuration can address frames.
    pub fn validate(&self) -> Result<(), GsError> {
        if self.callsign.is_empty() {
            return Err(GsError::config("callsign must not be empty"));
        }
        match (&self.key, &self.password) {
            (Some(_), None) => Err(GsError::config("key given without password")),
            (None, Some(_)) => Err(GsError::config("password given without key")),
            _ => Ok(()),
        }
    }

    /// Credentials for the encrypted path, if both key and password are set.
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        match (&self.key, &self.password) {
            (Some(key), Some(password)) => Some(Credentials::new(key.as_bytes(), password)),
            _ => None,
        }
    }

    /// Credentials, or a configuration error naming `purpose`.
    pub fn require_credentials(&self, purpose: &str) -> Result<Credentials<'_>, GsError> {
        self.credentials()
            .ok_or_else(|| GsError::config(format!("{} needs both key and password", purpose)))
    }
}

/// Load a station configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<StationConfig, GsError> {
    let contents = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "loading station configuration");
    load_config_from_str(&contents)
}

/// Load a station configuration from a YAML string.
pub fn load_config_from_str(yaml: &str) -> Result<StationConfig, GsError> {
    Ok(serde_yaml::from_str(yaml)?)
}
