//! Session and detector configuration types.

use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::symbology::{Facing, Symbology};

/// Configuration handed to a detection capability on start.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DetectorConfig {
    /// Preferred camera facing.
    #[builder(default)]
    #[serde(default)]
    pub facing: Facing,

    /// Symbologies the detector should report. Must not be empty.
    #[builder(default = "Symbology::all()")]
    #[serde(default = "Symbology::all")]
    pub symbologies: Vec<Symbology>,
}

impl DetectorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref symbologies) = self.symbologies {
            if symbologies.is_empty() {
                return Err("At least one symbology is required".to_string());
            }
        }
        Ok(())
    }
}

impl DetectorConfig {
    /// Create a new detector config builder.
    pub fn builder() -> DetectorConfigBuilder {
        DetectorConfigBuilder::default()
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            symbologies: Symbology::all(),
        }
    }
}

/// Configuration for a scan session.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SessionConfig {
    /// Suppression window after an automatic detection is accepted.
    /// Zero disables the cooldown.
    #[builder(default = "default_cooldown()")]
    #[serde(default = "default_cooldown")]
    pub cooldown: Duration,

    /// How long `begin_acquisition` waits for the capability to report
    /// readiness before giving up. Must be non-zero.
    #[builder(default = "default_acquisition_timeout()")]
    #[serde(default = "default_acquisition_timeout")]
    pub acquisition_timeout: Duration,

    /// Configuration forwarded to the detection capability.
    #[builder(default)]
    #[serde(default)]
    pub detector: DetectorConfig,
}

fn default_cooldown() -> Duration {
    Duration::from_millis(1500)
}

fn default_acquisition_timeout() -> Duration {
    Duration::from_secs(10)
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.acquisition_timeout {
            if timeout.is_zero() {
                return Err("Acquisition timeout must be non-zero".to_string());
            }
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cooldown: default_cooldown(),
            acquisition_timeout: default_acquisition_timeout(),
            detector: DetectorConfig::default(),
        }
    }
}
