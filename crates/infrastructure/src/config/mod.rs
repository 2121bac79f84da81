//! Application configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml`, then `WAYFARER_*` environment variables with `__`
//! between nested keys (`WAYFARER_GATEWAY__MAX_CONCURRENCY=4`).
//!
//! The maps API key may also come from `WAYFARER_MAPS_API_KEY` or the
//! legacy `GOOGLE_MAPS_API_KEY`.

mod database;
mod gateway;
mod maps;

use std::collections::HashMap;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use crate::telemetry::TelemetryConfig;
pub use database::DatabaseConfig;
pub use gateway::GatewayAppConfig;
pub use maps::MapsAppConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

const ENV_PREFIX: &str = "WAYFARER";

/// Flat variables checked, in order, when no key is configured
const API_KEY_VARIABLES: [&str; 2] = ["WAYFARER_MAPS_API_KEY", "GOOGLE_MAPS_API_KEY"];

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Maps client
    #[serde(default)]
    pub maps: MapsAppConfig,

    /// Enrichment gateway
    #[serde(default)]
    pub gateway: GatewayAppConfig,

    /// Location database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging and trace export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from `config.toml` (if present) and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Some(Path::new("config")), None)
    }

    /// Load from an optional file and an explicit environment
    ///
    /// `env = None` reads the process environment. `file` is passed to
    /// `config::File::with_name`, so the extension may be omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value has the wrong type.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(
                config::File::with_name(&file.to_string_lossy()).required(false),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env.clone()),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if !config.maps.has_api_key() {
            config.maps.api_key = fallback_api_key(|name| match &env {
                Some(vars) => vars.get(name).cloned(),
                None => std::env::var(name).ok(),
            });
        }

        debug!(
            has_maps_key = config.maps.has_api_key(),
            profile = ?config.gateway.profile,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check value ranges
    ///
    /// A missing API key is not an error; it only produces a warning.
    ///
    /// # Errors
    ///
    /// Returns every problem found, joined into one message.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.maps.base_url.trim().is_empty() {
            problems.push("maps.base_url must not be empty".to_string());
        }
        if self.maps.timeout_secs == 0 {
            problems.push("maps.timeout_secs must be greater than 0".to_string());
        }
        if self.gateway.max_concurrency == 0 {
            problems.push("gateway.max_concurrency must be at least 1".to_string());
        }
        if self.gateway.place_search_radius_m == 0 {
            problems.push("gateway.place_search_radius_m must be greater than 0".to_string());
        }
        if self.database.path.trim().is_empty() {
            problems.push("database.path must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.telemetry.sampling_ratio) {
            problems.push(format!(
                "telemetry.sampling_ratio must be between 0 and 1, got {}",
                self.telemetry.sampling_ratio
            ));
        }

        if !self.maps.has_api_key() {
            warn!("No maps API key configured; enrichment results will be empty");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}

fn fallback_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<SecretString> {
    API_KEY_VARIABLES.iter().find_map(|name| {
        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                debug!(variable = name, "Using maps API key from environment");
                SecretString::from(value)
            })
    })
}
