//! Geo-enrichment gateway
//!
//! Fans out provider calls per destination and travel mode, applies the
//! mode selection rules and normalizes the answers. The three public
//! operations never fail: every problem is reported through the
//! diagnostics port and turned into an empty or partial result.

use std::fmt;
use std::sync::Arc;

use domain::{GeoLocation, TravelMode};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::isolation::isolate;
use super::mode_selection::select_by_precedence;
use super::normalizer;
use super::records::{
    CommuteOptions, EnrichedDistanceResult, PlaceDetails, RouteSummary, TravelLeg,
};
use super::resolver::{AttractionResolver, Destination, DestinationResolver, GenericLocationResolver};
use crate::error::EnrichmentFailure;
use crate::ports::{
    Diagnostic, DiagnosticsPort, MapsProviderPort, ProviderRequest, Severity, TracingDiagnostics,
};

const OP_DISTANCE_MATRIX: &str = "distance_matrix";
const OP_PLACE_DETAILS: &str = "place_details";
const OP_BEST_COMMUTE: &str = "best_commute_options";

/// Fields requested from the place details endpoint
pub const DEFAULT_PLACE_DETAIL_FIELDS: &str = "opening_hours,rating,review,formatted_address,photos";

/// Which kind of stored location a gateway serves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayProfile {
    /// Architecture, Films, History and Music
    #[default]
    Attractions,
    /// The generic Location category
    GenericLocations,
}

impl GatewayProfile {
    /// Modes tried in precedence order for the distance matrix
    #[must_use]
    pub fn distance_modes(self) -> Vec<TravelMode> {
        match self {
            Self::Attractions => vec![TravelMode::Transit, TravelMode::Walking],
            Self::GenericLocations => vec![TravelMode::Driving],
        }
    }

    /// Modes compared for the best commute
    #[must_use]
    pub fn commute_modes(self) -> Vec<TravelMode> {
        match self {
            Self::Attractions => vec![TravelMode::Transit, TravelMode::Walking],
            Self::GenericLocations => vec![
                TravelMode::Driving,
                TravelMode::Transit,
                TravelMode::Walking,
                TravelMode::Bicycling,
            ],
        }
    }

    /// Resolver matching the profile's categories
    #[must_use]
    pub fn resolver(self) -> Arc<dyn DestinationResolver> {
        match self {
            Self::Attractions => Arc::new(AttractionResolver),
            Self::GenericLocations => Arc::new(GenericLocationResolver),
        }
    }
}

/// Tunables of the enrichment gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Distance matrix modes in precedence order
    pub distance_modes: Vec<TravelMode>,
    /// Commute modes in tie-break order
    pub commute_modes: Vec<TravelMode>,
    /// Maximum in-flight futures per fan-out level (1 = sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Nearby search radius in meters
    #[serde(default = "default_place_search_radius")]
    pub place_search_radius_m: u32,
    /// `fields` parameter of the place details call
    #[serde(default = "default_place_detail_fields")]
    pub place_detail_fields: String,
}

const fn default_max_concurrency() -> usize {
    1
}

const fn default_place_search_radius() -> u32 {
    100
}

fn default_place_detail_fields() -> String {
    DEFAULT_PLACE_DETAIL_FIELDS.to_string()
}

impl GatewayConfig {
    /// Defaults for a profile
    #[must_use]
    pub fn for_profile(profile: GatewayProfile) -> Self {
        Self {
            distance_modes: profile.distance_modes(),
            commute_modes: profile.commute_modes(),
            max_concurrency: default_max_concurrency(),
            place_search_radius_m: default_place_search_radius(),
            place_detail_fields: default_place_detail_fields(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::for_profile(GatewayProfile::default())
    }
}

/// Enrichment gateway over a mapping provider
pub struct EnrichmentGateway {
    provider: Arc<dyn MapsProviderPort>,
    resolver: Arc<dyn DestinationResolver>,
    diagnostics: Arc<dyn DiagnosticsPort>,
    config: GatewayConfig,
}

impl fmt::Debug for EnrichmentGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentGateway")
            .field("configured", &self.provider.is_configured())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EnrichmentGateway {
    /// Create a gateway with the profile's modes and resolver
    ///
    /// Diagnostics go to `tracing` until replaced with
    /// [`with_diagnostics`](Self::with_diagnostics).
    #[must_use]
    pub fn new(provider: Arc<dyn MapsProviderPort>, profile: GatewayProfile) -> Self {
        Self {
            provider,
            resolver: profile.resolver(),
            diagnostics: Arc::new(TracingDiagnostics),
            config: GatewayConfig::for_profile(profile),
        }
    }

    /// Replace the diagnostics sink
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsPort>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the destination resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn DestinationResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the fan-out width; values below 1 are treated as 1
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Travel distance and time from an origin to each destination
    ///
    /// Each destination is tried with the distance modes in precedence
    /// order; the first success is kept. Destinations where every mode
    /// failed, or whose enrichment panicked, are left out. The output
    /// follows the input order.
    #[instrument(skip(self, destinations), fields(destinations = destinations.len()))]
    pub async fn get_distance_matrix(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        destinations: &[Destination],
    ) -> Vec<EnrichedDistanceResult> {
        if !self.ensure_configured(OP_DISTANCE_MATRIX) {
            return Vec::new();
        }
        let origin = GeoLocation::new_unchecked(origin_lat, origin_lon);

        let outcomes: Vec<_> = stream::iter(destinations)
            .map(|destination| async move {
                let outcome = isolate(self.enrich_destination(origin, destination)).await;
                (destination, outcome)
            })
            .buffered(self.concurrency())
            .collect()
            .await;

        let results: Vec<_> = outcomes
            .into_iter()
            .filter_map(|(destination, outcome)| match outcome {
                Ok(result) => Some(result),
                Err(failure) => {
                    self.report_destination_failure(destination, &failure);
                    None
                },
            })
            .collect();

        debug!(enriched = results.len(), "Distance matrix complete");
        results
    }

    /// Opening hours, rating, reviews and address of the place nearest to
    /// a coordinate
    ///
    /// Returns an empty [`PlaceDetails`] when nothing is nearby or any
    /// call fails.
    #[instrument(skip(self))]
    pub async fn get_place_details(&self, lat: f64, lon: f64) -> PlaceDetails {
        if !self.ensure_configured(OP_PLACE_DETAILS) {
            return PlaceDetails::default();
        }
        let location = GeoLocation::new_unchecked(lat, lon);

        match isolate(self.lookup_place(location)).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                self.diagnostics.emit(Diagnostic::new(
                    Severity::Warning,
                    OP_PLACE_DETAILS,
                    format!("No place found near {}", location.to_query_value()),
                ));
                PlaceDetails::default()
            },
            Err(failure) => {
                self.report(
                    OP_PLACE_DETAILS,
                    &failure,
                    format!("Place details for {} failed: {failure}", location.to_query_value()),
                );
                PlaceDetails::default()
            },
        }
    }

    /// Routes for every commute mode and the fastest of them
    ///
    /// Returns `None` when no mode produced a route.
    #[instrument(skip(self))]
    pub async fn get_best_commute_options(
        &self,
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Option<CommuteOptions> {
        if !self.ensure_configured(OP_BEST_COMMUTE) {
            return None;
        }
        let origin = GeoLocation::new_unchecked(origin_lat, origin_lon);
        let destination = GeoLocation::new_unchecked(dest_lat, dest_lon);

        let attempts = self
            .query_modes(
                &self.config.commute_modes,
                |mode| ProviderRequest::directions(&origin, &destination, mode),
                normalizer::directions_leg,
            )
            .await;

        let mut routes = Vec::with_capacity(attempts.len());
        for (mode, attempt) in attempts {
            match attempt {
                Ok(leg) => routes.push((mode, RouteSummary::from(leg))),
                Err(failure) => self.report(
                    OP_BEST_COMMUTE,
                    &failure,
                    format!("No {mode} route to {}: {failure}", destination.to_query_value()),
                ),
            }
        }

        let options = CommuteOptions::from_routes(routes);
        match &options {
            Some(options) => debug!(best = %options.best_commute_mode(), "Best commute selected"),
            None => self.diagnostics.emit(Diagnostic::new(
                Severity::Warning,
                OP_BEST_COMMUTE,
                format!("No commute option found to {}", destination.to_query_value()),
            )),
        }
        options
    }

    fn concurrency(&self) -> usize {
        self.config.max_concurrency.max(1)
    }

    fn ensure_configured(&self, operation: &'static str) -> bool {
        if self.provider.is_configured() {
            return true;
        }
        let failure = EnrichmentFailure::MissingConfiguration;
        self.report(operation, &failure, format!("{failure}; skipping {operation}"));
        false
    }

    fn report(&self, operation: &'static str, failure: &EnrichmentFailure, message: String) {
        self.diagnostics.emit(
            Diagnostic::new(failure.severity(), operation, message).with_cause(failure.cause_tag()),
        );
    }

    fn report_destination_failure(&self, destination: &Destination, failure: &EnrichmentFailure) {
        let message = match failure {
            EnrichmentFailure::NoRouteFound { .. } => failure.to_string(),
            _ => format!("Failed to enrich {}: {failure}", destination.display_name()),
        };
        self.report(OP_DISTANCE_MATRIX, failure, message);
    }

    async fn enrich_destination(
        &self,
        origin: GeoLocation,
        destination: &Destination,
    ) -> Result<EnrichedDistanceResult, EnrichmentFailure> {
        let target = destination.coordinate();
        let attempts = self
            .query_modes(
                &self.config.distance_modes,
                |mode| ProviderRequest::distance_matrix(&origin, &target, mode),
                normalizer::distance_matrix_leg,
            )
            .await;

        match select_by_precedence(attempts) {
            Ok((mode, leg)) => {
                debug!(destination = %destination.display_name(), %mode, "Route selected");
                Ok(self.enriched(destination, &leg))
            },
            Err(failures) => Err(EnrichmentFailure::NoRouteFound {
                destination: destination.display_name(),
                attempts: failures
                    .into_iter()
                    .map(|(mode, failure)| (mode, failure.cause_tag()))
                    .collect(),
            }),
        }
    }

    fn enriched(&self, destination: &Destination, leg: &TravelLeg) -> EnrichedDistanceResult {
        let identity = self.resolver.identify(destination);
        EnrichedDistanceResult {
            location_id: identity.as_ref().map(|i| i.id),
            location_name: identity.as_ref().map(|i| i.name.clone()),
            location_type: identity.as_ref().map(|i| i.category),
            distance_km: leg.distance_km(),
            distance_text: leg.distance_text.clone(),
            travel_time_min: leg.duration_minutes(),
            travel_time_text: leg.duration_text.clone(),
            travel_mode: leg.mode,
        }
    }

    /// `nearby search` then `place details`; `Ok(None)` when nothing is nearby
    async fn lookup_place(
        &self,
        location: GeoLocation,
    ) -> Result<Option<PlaceDetails>, EnrichmentFailure> {
        let nearby = self
            .provider
            .query(&ProviderRequest::nearby_search(
                &location,
                self.config.place_search_radius_m,
            ))
            .await?;
        let Some(place_id) = normalizer::first_place_id(&nearby)? else {
            return Ok(None);
        };

        let details = self
            .provider
            .query(&ProviderRequest::place_details(
                &place_id,
                &self.config.place_detail_fields,
            ))
            .await?;
        normalizer::place_details(&details).map(Some)
    }

    /// One provider call per mode; every result is buffered before returning
    ///
    /// Each mode runs behind its own isolation boundary, so a panic only
    /// costs that mode.
    async fn query_modes<T>(
        &self,
        modes: &[TravelMode],
        build_request: impl Fn(TravelMode) -> ProviderRequest,
        normalize: impl Fn(&Value, TravelMode) -> Result<T, EnrichmentFailure>,
    ) -> Vec<(TravelMode, Result<T, EnrichmentFailure>)> {
        let normalize = &normalize;
        stream::iter(modes.iter().copied())
            .map(|mode| {
                let request = build_request(mode);
                async move {
                    let result = isolate(async {
                        self.provider
                            .query(&request)
                            .await
                            .and_then(|body| normalize(&body, mode))
                    })
                    .await;
                    debug!(%mode, ok = result.is_ok(), "Mode queried");
                    (mode, result)
                }
            })
            .buffered(self.concurrency())
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use domain::{LocationCategory, LocationId, StoredLocation};
    use serde_json::json;

    use super::*;
    use crate::ports::{EndpointKind, MockMapsProviderPort};

    type Handler = Box<dyn Fn(&ProviderRequest) -> Result<Value, EnrichmentFailure> + Send + Sync>;

    /// Provider double that answers through a closure and logs every call
    struct StubProvider {
        configured: bool,
        handler: Handler,
        delays_ms: HashMap<String, u64>,
        calls: Mutex<Vec<ProviderRequest>>,
    }

    impl StubProvider {
        fn new(
            handler: impl Fn(&ProviderRequest) -> Result<Value, EnrichmentFailure> + Send + Sync + 'static,
        ) -> Self {
            Self {
                configured: true,
                handler: Box::new(handler),
                delays_ms: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, destination: &str, millis: u64) -> Self {
            self.delays_ms.insert(destination.to_string(), millis);
            self
        }

        fn calls(&self) -> Vec<ProviderRequest> {
            self.calls.lock().unwrap().clone()
        }

        fn calls_to(&self, endpoint: EndpointKind) -> usize {
            self.calls().iter().filter(|c| c.endpoint == endpoint).count()
        }
    }

    #[async_trait]
    impl MapsProviderPort for StubProvider {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn query(&self, request: &ProviderRequest) -> Result<Value, EnrichmentFailure> {
            self.calls.lock().unwrap().push(request.clone());
            let delay = request
                .param("destinations")
                .and_then(|d| self.delays_ms.get(d))
                .copied();
            if let Some(millis) = delay {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            (self.handler)(request)
        }
    }

    #[derive(Default)]
    struct RecordingDiagnostics(Mutex<Vec<Diagnostic>>);

    impl RecordingDiagnostics {
        fn recorded(&self) -> Vec<Diagnostic> {
            self.0.lock().unwrap().clone()
        }
    }

    impl DiagnosticsPort for RecordingDiagnostics {
        fn emit(&self, diagnostic: Diagnostic) {
            self.0.lock().unwrap().push(diagnostic);
        }
    }

    fn matrix_ok(meters: u32, seconds: u32) -> Result<Value, EnrichmentFailure> {
        Ok(json!({
            "status": "OK",
            "rows": [{ "elements": [{
                "status": "OK",
                "distance": { "text": format!("{meters} m"), "value": meters },
                "duration": { "text": format!("{seconds} s"), "value": seconds }
            }]}]
        }))
    }

    fn directions_ok(minutes: u32) -> Result<Value, EnrichmentFailure> {
        Ok(json!({
            "status": "OK",
            "routes": [{
                "legs": [{
                    "distance": { "text": "5 km", "value": 5000 },
                    "duration": { "text": format!("{minutes} mins"), "value": minutes * 60 },
                    "steps": [{}, {}]
                }],
                "overview_polyline": { "points": "poly" }
            }]
        }))
    }

    fn zero_results() -> Result<Value, EnrichmentFailure> {
        Err(EnrichmentFailure::ProviderStatus("ZERO_RESULTS".into()))
    }

    fn mode_of(request: &ProviderRequest) -> TravelMode {
        request
            .param("mode")
            .and_then(|m| m.parse().ok())
            .expect("request carries a mode")
    }

    fn attraction(id: i64, name: &str, lat: f64) -> Destination {
        Destination::Stored(StoredLocation::restore(
            LocationId::new(id),
            LocationCategory::History,
            name.to_string(),
            GeoLocation::new_unchecked(lat, -6.26),
            "fact".to_string(),
            None,
            Utc::now(),
        ))
    }

    fn gateway(
        provider: &Arc<StubProvider>,
        profile: GatewayProfile,
    ) -> (EnrichmentGateway, Arc<RecordingDiagnostics>) {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let gateway = EnrichmentGateway::new(Arc::clone(provider) as Arc<dyn MapsProviderPort>, profile)
            .with_diagnostics(Arc::clone(&diagnostics) as Arc<dyn DiagnosticsPort>);
        (gateway, diagnostics)
    }

    #[test]
    fn profiles_carry_mode_lists() {
        let attractions = GatewayConfig::for_profile(GatewayProfile::Attractions);
        assert_eq!(attractions.distance_modes, vec![TravelMode::Transit, TravelMode::Walking]);
        assert_eq!(attractions.commute_modes, vec![TravelMode::Transit, TravelMode::Walking]);
        assert_eq!(attractions.max_concurrency, 1);
        assert_eq!(attractions.place_search_radius_m, 100);

        let generic = GatewayConfig::for_profile(GatewayProfile::GenericLocations);
        assert_eq!(generic.distance_modes, vec![TravelMode::Driving]);
        assert_eq!(generic.commute_modes.len(), 4);
    }

    #[test]
    fn gateway_config_deserializes_with_defaults() {
        let config: GatewayConfig = serde_json::from_value(json!({
            "distance_modes": ["walking"],
            "commute_modes": ["bicycling", "driving"]
        }))
        .expect("config");
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.place_detail_fields, DEFAULT_PLACE_DETAIL_FIELDS);
    }

    #[tokio::test]
    async fn transit_wins_when_both_modes_succeed() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Transit => matrix_ok(2000, 600),
            _ => matrix_ok(1800, 1500),
        }));
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);

        let results = gateway
            .get_distance_matrix(53.34, -6.26, &[attraction(1, "GPO", 53.35)])
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].travel_mode, TravelMode::Transit);
        assert_eq!(results[0].distance_km, 2.0);
        assert_eq!(results[0].travel_time_min, 10.0);
        assert_eq!(results[0].location_id, Some(LocationId::new(1)));
        assert_eq!(results[0].location_name.as_deref(), Some("GPO"));
        assert_eq!(results[0].location_type, Some(LocationCategory::History));
    }

    #[tokio::test]
    async fn every_mode_is_queried_before_selection() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Transit => matrix_ok(2000, 600),
            _ => matrix_ok(1800, 1500),
        }));
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);

        gateway
            .get_distance_matrix(53.34, -6.26, &[attraction(1, "GPO", 53.35)])
            .await;

        let modes: Vec<_> = provider.calls().iter().map(mode_of).collect();
        assert_eq!(modes, vec![TravelMode::Transit, TravelMode::Walking]);
    }

    #[tokio::test]
    async fn walking_is_used_when_transit_fails() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Transit => zero_results(),
            _ => matrix_ok(1500, 90),
        }));
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);

        let results = gateway
            .get_distance_matrix(53.34, -6.26, &[attraction(1, "GPO", 53.35)])
            .await;

        assert_eq!(results[0].travel_mode, TravelMode::Walking);
        assert_eq!(results[0].distance_km, 1.5);
        assert_eq!(results[0].travel_time_min, 1.5);
    }

    #[tokio::test]
    async fn failed_destination_is_dropped_and_order_kept() {
        let provider = Arc::new(StubProvider::new(|request| {
            if request.param("destinations") == Some("2,-6.26") {
                Err(EnrichmentFailure::Transport("connection reset".into()))
            } else {
                matrix_ok(1000, 60)
            }
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::Attractions);
        let destinations = [
            attraction(1, "First", 1.0),
            attraction(2, "Second", 2.0),
            attraction(3, "Third", 3.0),
        ];

        let results = gateway.get_distance_matrix(0.0, 0.0, &destinations).await;

        let names: Vec<_> = results.iter().filter_map(|r| r.location_name.as_deref()).collect();
        assert_eq!(names, vec!["First", "Third"]);

        let recorded = diagnostics.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].severity, Severity::Warning);
        assert_eq!(recorded[0].cause.as_deref(), Some("no_route_found"));
        assert!(recorded[0].message.contains("Second"));
    }

    #[tokio::test]
    async fn single_mode_exhaustion_is_an_error_naming_the_cause() {
        let provider = Arc::new(StubProvider::new(|_| {
            Err(EnrichmentFailure::ProviderStatus("NOT_FOUND".into()))
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::GenericLocations);

        let results = gateway
            .get_distance_matrix(0.0, 0.0, &[Destination::from((1.0, 2.0))])
            .await;

        assert!(results.is_empty());
        let recorded = diagnostics.recorded();
        assert_eq!(recorded[0].severity, Severity::Error);
        assert!(recorded[0].message.contains("provider_status:NOT_FOUND"));
        assert!(recorded[0].message.contains("1,2"));
    }

    #[tokio::test]
    async fn output_never_exceeds_input() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Walking if request.param("destinations") == Some("2,-6.26") => {
                matrix_ok(10, 10)
            },
            _ => zero_results(),
        }));
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);
        let destinations = [
            attraction(1, "First", 1.0),
            attraction(2, "Second", 2.0),
            attraction(3, "Third", 3.0),
        ];

        let results = gateway.get_distance_matrix(0.0, 0.0, &destinations).await;

        assert!(results.len() <= destinations.len());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].location_id, Some(LocationId::new(2)));
    }

    #[tokio::test]
    async fn panic_in_one_destination_is_contained() {
        let provider = Arc::new(StubProvider::new(|request| {
            assert_ne!(request.param("destinations"), Some("2,-6.26"), "stub blew up");
            matrix_ok(500, 120)
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::Attractions);
        let destinations = [
            attraction(1, "First", 1.0),
            attraction(2, "Second", 2.0),
            attraction(3, "Third", 3.0),
        ];

        let results = gateway.get_distance_matrix(0.0, 0.0, &destinations).await;

        assert_eq!(results.len(), 2);
        let recorded = diagnostics.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].severity, Severity::Error);
        assert_eq!(recorded[0].cause.as_deref(), Some("no_route_found"));
        assert!(recorded[0].message.contains("Second"));
        assert!(recorded[0].message.contains("transit: panicked"));
        assert!(recorded[0].message.contains("walking: panicked"));
    }

    #[tokio::test]
    async fn panicking_mode_falls_back_to_next_mode() {
        let provider = Arc::new(StubProvider::new(|request| {
            assert_ne!(mode_of(request), TravelMode::Transit, "stub blew up");
            matrix_ok(800, 600)
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::Attractions);

        let results = gateway
            .get_distance_matrix(0.0, 0.0, &[attraction(1, "First", 1.0)])
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].travel_mode, TravelMode::Walking);
        assert!(diagnostics.recorded().is_empty());
    }

    #[tokio::test]
    async fn bare_coordinates_have_no_identity() {
        let provider = Arc::new(StubProvider::new(|_| matrix_ok(1000, 60)));
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);

        let results = gateway
            .get_distance_matrix(0.0, 0.0, &[Destination::from((1.0, 1.0))])
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[0].location_id.is_none());
        assert!(results[0].location_name.is_none());
        assert!(results[0].location_type.is_none());
    }

    #[tokio::test]
    async fn concurrent_fan_out_keeps_input_order() {
        let provider = Arc::new(
            StubProvider::new(|_| matrix_ok(1000, 60))
                .with_delay("1,-6.26", 60)
                .with_delay("2,-6.26", 30),
        );
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);
        let gateway = gateway.with_max_concurrency(3);
        let destinations = [
            attraction(1, "First", 1.0),
            attraction(2, "Second", 2.0),
            attraction(3, "Third", 3.0),
        ];

        let results = gateway.get_distance_matrix(0.0, 0.0, &destinations).await;

        let ids: Vec<_> = results.iter().filter_map(|r| r.location_id).collect();
        assert_eq!(ids, vec![LocationId::new(1), LocationId::new(2), LocationId::new(3)]);
    }

    #[tokio::test]
    async fn missing_configuration_short_circuits_every_operation() {
        let mut provider = MockMapsProviderPort::new();
        provider.expect_is_configured().return_const(false);
        provider.expect_query().never();
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let gateway = EnrichmentGateway::new(Arc::new(provider), GatewayProfile::Attractions)
            .with_diagnostics(Arc::clone(&diagnostics) as Arc<dyn DiagnosticsPort>);

        assert!(gateway
            .get_distance_matrix(0.0, 0.0, &[Destination::from((1.0, 1.0))])
            .await
            .is_empty());
        assert!(gateway.get_place_details(1.0, 1.0).await.is_empty());
        assert!(gateway.get_best_commute_options(0.0, 0.0, 1.0, 1.0).await.is_none());

        let recorded = diagnostics.recorded();
        assert_eq!(recorded.len(), 3);
        assert!(recorded.iter().all(|d| d.severity == Severity::Warning));
        assert!(recorded
            .iter()
            .all(|d| d.cause.as_deref() == Some("missing_configuration")));
    }

    #[tokio::test]
    async fn best_commute_is_minimum_duration() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Driving => directions_ok(30),
            TravelMode::Transit => directions_ok(20),
            TravelMode::Walking => directions_ok(45),
            TravelMode::Bicycling => Err(EnrichmentFailure::HttpStatus(500)),
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::GenericLocations);

        let options = gateway
            .get_best_commute_options(53.34, -6.26, 53.35, -6.25)
            .await
            .expect("options");

        assert_eq!(options.best_commute_mode(), TravelMode::Transit);
        assert_eq!(options.best_commute().duration_min, 20.0);
        assert_eq!(options.best_commute().steps, 2);
        assert_eq!(options.all_options().len(), 3);
        assert!(!options.all_options().contains_key(&TravelMode::Bicycling));

        let calls = provider.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|c| c.endpoint == EndpointKind::Directions));
        assert!(calls.iter().all(|c| c.param("alternatives") == Some("true")));
        assert_eq!(calls[0].param("origin"), Some("53.34,-6.26"));
        assert_eq!(calls[0].param("destination"), Some("53.35,-6.25"));

        let recorded = diagnostics.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].cause.as_deref(), Some("http_status:500"));
    }

    #[tokio::test]
    async fn best_commute_tie_goes_to_declared_order() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Walking | TravelMode::Bicycling => directions_ok(15),
            _ => zero_results(),
        }));
        let (gateway, _) = gateway(&provider, GatewayProfile::GenericLocations);

        let options = gateway
            .get_best_commute_options(0.0, 0.0, 1.0, 1.0)
            .await
            .expect("options");

        assert_eq!(options.best_commute_mode(), TravelMode::Walking);
    }

    #[tokio::test]
    async fn panicking_commute_mode_keeps_other_routes() {
        let provider = Arc::new(StubProvider::new(|request| match mode_of(request) {
            TravelMode::Bicycling => panic!("stub blew up"),
            TravelMode::Driving => directions_ok(30),
            TravelMode::Transit => directions_ok(20),
            TravelMode::Walking => directions_ok(45),
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::GenericLocations);

        let options = gateway
            .get_best_commute_options(53.34, -6.26, 53.35, -6.25)
            .await
            .expect("options");

        assert_eq!(options.best_commute_mode(), TravelMode::Transit);
        assert_eq!(options.all_options().len(), 3);
        assert!(!options.all_options().contains_key(&TravelMode::Bicycling));

        let recorded = diagnostics.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].severity, Severity::Error);
        assert_eq!(recorded[0].cause.as_deref(), Some("panicked"));
    }

    #[tokio::test]
    async fn best_commute_none_when_every_mode_fails() {
        let provider = Arc::new(StubProvider::new(|_| zero_results()));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::Attractions);

        assert!(gateway.get_best_commute_options(0.0, 0.0, 1.0, 1.0).await.is_none());
        let recorded = diagnostics.recorded();
        assert_eq!(recorded.len(), 3);
        assert!(recorded.iter().all(|d| d.severity == Severity::Warning));
    }

    #[tokio::test]
    async fn place_details_from_first_nearby_result() {
        let provider = Arc::new(StubProvider::new(|request| match request.endpoint {
            EndpointKind::NearbySearch => Ok(json!({
                "status": "OK",
                "results": [{ "place_id": "abbey" }, { "place_id": "other" }]
            })),
            EndpointKind::PlaceDetails => Ok(json!({
                "status": "OK",
                "result": {
                    "opening_hours": { "open_now": false },
                    "rating": 4.4,
                    "formatted_address": "26 Lower Abbey St"
                }
            })),
            _ => unreachable!("unexpected endpoint"),
        }));
        let (gateway, _) = gateway(&provider, GatewayProfile::Attractions);

        let details = gateway.get_place_details(53.3486, -6.2564).await;

        assert_eq!(details.is_open, Some(false));
        assert_eq!(details.rating, Some(4.4));
        assert_eq!(details.formatted_address.as_deref(), Some("26 Lower Abbey St"));

        let calls = provider.calls();
        assert_eq!(calls[0].param("location"), Some("53.3486,-6.2564"));
        assert_eq!(calls[0].param("radius"), Some("100"));
        assert_eq!(calls[1].param("place_id"), Some("abbey"));
        assert_eq!(calls[1].param("fields"), Some(DEFAULT_PLACE_DETAIL_FIELDS));
    }

    #[tokio::test]
    async fn no_nearby_place_skips_details_call() {
        let provider = Arc::new(StubProvider::new(|request| match request.endpoint {
            EndpointKind::NearbySearch => Ok(json!({ "status": "OK", "results": [] })),
            _ => unreachable!("details must not be requested"),
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::Attractions);

        let details = gateway.get_place_details(1.0, 1.0).await;

        assert!(details.is_empty());
        assert_eq!(provider.calls_to(EndpointKind::PlaceDetails), 0);
        assert_eq!(diagnostics.recorded()[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn place_details_failure_is_empty() {
        let provider = Arc::new(StubProvider::new(|request| match request.endpoint {
            EndpointKind::NearbySearch => Ok(json!({ "results": [{ "place_id": "x" }] })),
            _ => Err(EnrichmentFailure::Transport("timed out".into())),
        }));
        let (gateway, diagnostics) = gateway(&provider, GatewayProfile::Attractions);

        assert!(gateway.get_place_details(1.0, 1.0).await.is_empty());
        let recorded = diagnostics.recorded();
        assert_eq!(recorded[0].severity, Severity::Error);
        assert_eq!(recorded[0].cause.as_deref(), Some("transport"));
    }

    #[test]
    fn debug_hides_collaborators() {
        let mut provider = MockMapsProviderPort::new();
        provider.expect_is_configured().return_const(true);
        let gateway = EnrichmentGateway::new(Arc::new(provider), GatewayProfile::GenericLocations);
        let debug = format!("{gateway:?}");
        assert!(debug.contains("EnrichmentGateway"));
        assert!(debug.contains("configured: true"));
    }
}
