//! Tracing subscriber and OpenTelemetry setup
//!
//! Console logging is always on. OTLP export is opt-in and degrades to
//! console-only logging when the exporter cannot be built, unless
//! `graceful_fallback` is off.

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{BatchConfigBuilder, BatchSpanProcessor, Sampler, SdkTracerProvider},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging and trace export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether OpenTelemetry export is enabled
    #[serde(default)]
    pub enabled: bool,

    /// OTLP gRPC endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service name attached to exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Sampling ratio (0.0 - 1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Export timeout in seconds
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// Maximum spans per export batch
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,

    /// Continue with console logging when the exporter cannot be created
    #[serde(default = "crate::config::default_true")]
    pub graceful_fallback: bool,
}

const fn default_sampling_ratio() -> f64 {
    1.0
}

const fn default_export_timeout() -> u64 {
    10
}

const fn default_max_batch_size() -> usize {
    512
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "wayfarer".to_string()
}

fn default_log_filter() -> String {
    "info,application=debug,integration_maps=info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
            export_timeout_secs: default_export_timeout(),
            max_batch_size: default_max_batch_size(),
            log_filter: default_log_filter(),
            json: false,
            graceful_fallback: true,
        }
    }
}

impl TelemetryConfig {
    fn sampler(&self) -> Sampler {
        if self.sampling_ratio >= 1.0 {
            Sampler::AlwaysOn
        } else if self.sampling_ratio <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sampling_ratio)
        }
    }
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed or the filter is invalid
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// The OTLP exporter could not be created
    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(String),
}

/// Flushes and shuts down the tracer provider when dropped
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("exporting", &self.provider.is_some())
            .finish()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!(error = %e, "Failed to shut down tracer provider");
            }
        }
    }
}

fn build_provider(config: &TelemetryConfig) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_timeout(Duration::from_secs(config.export_timeout_secs))
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let processor = BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_export_batch_size(config.max_batch_size)
                .build(),
        )
        .build();

    Ok(SdkTracerProvider::builder()
        .with_span_processor(processor)
        .with_sampler(config.sampler())
        .with_resource(
            Resource::builder()
                .with_service_name(config.service_name.clone())
                .build(),
        )
        .build())
}

/// Install the global tracing subscriber
///
/// Keep the returned guard alive for the lifetime of the process; dropping
/// it flushes pending spans.
///
/// # Errors
///
/// Returns [`TelemetryError::Init`] if a global subscriber is already set,
/// or [`TelemetryError::Exporter`] if export is enabled, the exporter
/// cannot be built and `graceful_fallback` is off.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    let (provider, export_error) = if config.enabled {
        match build_provider(config) {
            Ok(provider) => (Some(provider), None),
            Err(e) if config.graceful_fallback => (None, Some(e)),
            Err(e) => return Err(e),
        }
    } else {
        (None, None)
    };

    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(config.json.then(|| fmt::layer().json().with_target(true)))
        .with((!config.json).then(|| fmt::layer().with_target(true)))
        .with(otel_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    match (&provider, export_error) {
        (Some(_), _) => info!(
            endpoint = %config.endpoint,
            service = %config.service_name,
            sampling = config.sampling_ratio,
            "Telemetry initialized with OTLP export"
        ),
        (None, Some(e)) => warn!(
            endpoint = %config.endpoint,
            error = %e,
            "OTLP exporter unavailable, logging to console only"
        ),
        (None, None) => info!("Telemetry initialized (console only)"),
    }

    Ok(TelemetryGuard { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert!(!config.json);
        assert!(config.graceful_fallback);
        assert_eq!(config.service_name, "wayfarer");
        assert_eq!(config.endpoint, "http://localhost:4317");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: TelemetryConfig =
            serde_json::from_str(r#"{"enabled": true, "json": true}"#).unwrap();
        assert!(parsed.enabled);
        assert!(parsed.json);
        assert!(parsed.graceful_fallback);
        assert_eq!(parsed.max_batch_size, 512);
    }

    #[test]
    fn sampler_follows_ratio() {
        let mut config = TelemetryConfig::default();
        assert!(matches!(config.sampler(), Sampler::AlwaysOn));

        config.sampling_ratio = 0.0;
        assert!(matches!(config.sampler(), Sampler::AlwaysOff));

        config.sampling_ratio = 0.25;
        assert!(matches!(
            config.sampler(),
            Sampler::TraceIdRatioBased(r) if (r - 0.25).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn idle_guard_drops_cleanly() {
        let guard = TelemetryGuard { provider: None };
        assert!(!guard.is_exporting());
        drop(guard);
    }
}
