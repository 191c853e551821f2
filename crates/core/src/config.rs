//! Link configuration.
//!
//! Every struct uses `#[serde(default)]`, so a file only needs to name the
//! fields it overrides.

use std::fmt;
use std::net::{AddrParseError, Ipv4Addr, SocketAddrV4};
use std::path::Path;

use anglelink_math::normalize_360;
use anglelink_protocol::{DEFAULT_DATA_PORT, DEFAULT_DISCOVERY_PORT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration document shipped with the crate.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../config/anglelink.yaml");

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} address '{value}'")]
    InvalidAddress {
        field: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid {field} port {port}")]
    InvalidPort { field: &'static str, port: u16 },

    #[error("discovery interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f32),

    #[error("connection timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f32),

    #[error("smoothing speed must be positive and finite, got {0}")]
    InvalidSmoothingSpeed(f32),

    #[error("rotation {field} must be finite")]
    NonFiniteRotation { field: &'static str },

    #[error("failed to parse {format} configuration: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Rotation axis the angle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Roll
    X,
    /// Pitch
    Y,
    /// Yaw
    #[default]
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Network endpoints and liveness timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub listen_address: String,
    pub data_port: u16,
    pub discovery_port: u16,
    pub broadcast_address: String,
    pub discovery_interval_seconds: f32,
    pub connection_timeout_seconds: f32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            listen_address: Ipv4Addr::UNSPECIFIED.to_string(),
            data_port: DEFAULT_DATA_PORT,
            discovery_port: DEFAULT_DISCOVERY_PORT,
            broadcast_address: Ipv4Addr::BROADCAST.to_string(),
            discovery_interval_seconds: 2.0,
            connection_timeout_seconds: 5.0,
        }
    }
}

/// Socket addresses derived from a validated [`DiscoveryConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    /// Where the data socket binds.
    pub data: SocketAddrV4,
    /// Where discovery datagrams are sent.
    pub discovery_target: SocketAddrV4,
}

impl DiscoveryConfig {
    /// Validate the configuration and resolve its socket addresses.
    ///
    /// A data port of 0 asks the OS for an ephemeral port; the discovery port
    /// must name a real destination.
    pub fn resolve(&self) -> Result<ResolvedEndpoints, ConfigError> {
        let listen = parse_ipv4("listen", &self.listen_address)?;
        let broadcast = parse_ipv4("broadcast", &self.broadcast_address)?;

        if self.discovery_port == 0 {
            return Err(ConfigError::InvalidPort {
                field: "discovery",
                port: self.discovery_port,
            });
        }
        if !is_positive_finite(self.discovery_interval_seconds) {
            return Err(ConfigError::InvalidInterval(
                self.discovery_interval_seconds,
            ));
        }
        if !is_positive_finite(self.connection_timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(
                self.connection_timeout_seconds,
            ));
        }

        Ok(ResolvedEndpoints {
            data: SocketAddrV4::new(listen, self.data_port),
            discovery_target: SocketAddrV4::new(broadcast, self.discovery_port),
        })
    }
}

/// How the received angle is transformed and applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub axis: Axis,
    pub angle_multiplier: f32,
    pub angle_offset: f32,
    pub smoothing_enabled: bool,
    /// Higher is snappier. Alpha per tick is `smoothing_speed * dt`.
    pub smoothing_speed: f32,
    /// Drive the orientation sink every tick.
    pub auto_apply: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Z,
            angle_multiplier: 1.0,
            angle_offset: 0.0,
            smoothing_enabled: true,
            smoothing_speed: 15.0,
            auto_apply: true,
        }
    }
}

impl RotationConfig {
    /// Check that multiplier and offset are finite and the smoothing speed is
    /// finite and positive.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonFiniteRotation`] or
    /// [`ConfigError::InvalidSmoothingSpeed`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.angle_multiplier.is_finite() {
            return Err(ConfigError::NonFiniteRotation {
                field: "angle_multiplier",
            });
        }
        if !self.angle_offset.is_finite() {
            return Err(ConfigError::NonFiniteRotation {
                field: "angle_offset",
            });
        }
        if !is_positive_finite(self.smoothing_speed) {
            return Err(ConfigError::InvalidSmoothingSpeed(self.smoothing_speed));
        }
        Ok(())
    }

    /// Apply multiplier and offset, then wrap into `[0, 360)`.
    pub fn process(&self, raw_angle: f32) -> f32 {
        normalize_360(raw_angle * self.angle_multiplier + self.angle_offset)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub discovery: DiscoveryConfig,
    pub rotation: RotationConfig,
}

impl LinkConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::Parse {
            format: "YAML",
            message: e.to_string(),
        })
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Parse {
            format: "JSON",
            message: e.to_string(),
        })
    }

    /// Load from a file; `.json` is read as JSON, anything else as YAML.
    ///
    /// The loaded configuration is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&source)?
        } else {
            Self::from_yaml_str(&source)?
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded link configuration");
        Ok(config)
    }

    /// The embedded default document, parsed.
    pub fn embedded_default() -> Result<Self, ConfigError> {
        Self::from_yaml_str(DEFAULT_CONFIG_YAML)
    }

    /// Validate both sections, returning the resolved endpoints.
    pub fn validate(&self) -> Result<ResolvedEndpoints, ConfigError> {
        self.rotation.validate()?;
        self.discovery.resolve()
    }

    /// Serialize as a YAML document, the format `load` reads by default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse {
            format: "YAML",
            message: e.to_string(),
        })
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            format: "JSON",
            message: e.to_string(),
        })
    }
}

fn parse_ipv4(field: &'static str, value: &str) -> Result<Ipv4Addr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidAddress {
            field,
            value: value.to_string(),
            source,
        })
}

fn is_positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
