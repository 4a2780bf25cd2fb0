//! Engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::window::WindowGeometry;

/// Settings shared by every host. Missing fields take their defaults,
/// so a partial document deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// List URL; relative for same-origin hosts
    pub endpoint: String,
    /// Delay between the end of one fetch cycle and the start of the next
    #[serde(with = "seconds")]
    pub refresh_interval: Duration,
    /// Scheme of the connect deep link
    pub connect_scheme: String,
    pub row_height: u32,
    pub header_height: u32,
    /// Extra rows materialized above and below the viewport
    pub overscan: usize,
    /// Key of the durable preference record
    pub storage_key: String,
}

impl Config {
    pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);
    /// Alternate cadence for small deployments
    pub const FAST_REFRESH: Duration = Duration::from_secs(5);

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.row_height == 0 {
            return Err(ConfigError::ZeroRowHeight);
        }
        if self.connect_scheme.trim().is_empty() {
            return Err(ConfigError::EmptyScheme);
        }
        Ok(())
    }

    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.row_height, self.overscan)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "/api/list".to_string(),
            refresh_interval: Self::DEFAULT_REFRESH,
            connect_scheme: "mtasa".to_string(),
            row_height: 60,
            header_height: 40,
            overscan: 4,
            storage_key: "masterlist.preferences".to_string(),
        }
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
