//! Configuration management for neopixel-bridge.
//!
//! Configuration is read from the JSON file named by `NEOPIXEL_CONFIG`, if
//! set, and then overridden by individual environment variables. Every field
//! has a default, so running with no configuration at all talks to
//! `/dev/ttyACM0` at 9600 baud.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use crate::driver::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE};
use crate::error::{Error, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NEOPIXEL_CONFIG";

/// Default address for the HTTP API.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:7786";

/// Main configuration structure for the bridge.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Display label. Cosmetic only.
    pub text: String,

    /// Serial device configuration
    pub device: DeviceConfig,

    /// API server configuration
    pub api: ApiConfig,
}

/// Serial device configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device path, e.g. /dev/ttyACM0
    pub path: String,

    /// Baud rate
    pub baud_rate: u32,
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listen address
    pub listen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: "NeoPixel".to_string(),
            device: DeviceConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DEVICE.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `NEOPIXEL_CONFIG` (or defaults) and the
    /// environment.
    pub fn load() -> Result<Self> {
        let config = match env::var(CONFIG_ENV) {
            Ok(path) => Self::load_from(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NEOPIXEL_DEVICE`, `NEOPIXEL_BAUD_RATE` and `NEOPIXEL_LISTEN`
    /// as looked up by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup("NEOPIXEL_DEVICE") {
            self.device.path = path;
        }
        if let Some(baud_rate) = lookup("NEOPIXEL_BAUD_RATE") {
            self.device.baud_rate = baud_rate.parse().map_err(|_| {
                Error::Config(format!("NEOPIXEL_BAUD_RATE is not a number: {baud_rate:?}"))
            })?;
        }
        if let Some(listen) = lookup("NEOPIXEL_LISTEN") {
            self.api.listen = listen;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.device.path.is_empty() {
            return Err(Error::Config("device path is empty".to_string()));
        }
        if self.device.baud_rate == 0 {
            return Err(Error::Config("baud rate must be positive".to_string()));
        }
        Ok(())
    }
}
