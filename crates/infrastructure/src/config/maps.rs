//! Mapping provider configuration

use std::fmt;

use integration_maps::MapsConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Google Maps settings as read from file and environment
#[derive(Clone, Serialize, Deserialize)]
pub struct MapsAppConfig {
    /// API key; absent means every enrichment call degrades to empty
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL of the web service endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    MapsConfig::default().base_url
}

fn default_timeout_secs() -> u64 {
    MapsConfig::default().timeout_secs
}

impl Default for MapsAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for MapsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsAppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MapsAppConfig {
    /// Whether a non-blank key is set
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Convert to the client configuration
    #[must_use]
    pub fn to_maps_config(&self) -> MapsConfig {
        MapsConfig {
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
