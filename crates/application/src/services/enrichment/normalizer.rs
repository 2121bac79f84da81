//! Provider response normalizer
//!
//! Turns the provider's JSON bodies into [`TravelLeg`] and
//! [`PlaceDetails`]. Missing or mistyped fields become
//! [`EnrichmentFailure::MalformedResponse`].

use domain::TravelMode;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::Value;

use super::records::{PlaceDetails, TravelLeg};
use crate::error::EnrichmentFailure;

const STATUS_OK: &str = "OK";
const ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u32,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<RouteLeg>,
    overview_polyline: Polyline,
}

#[derive(Debug, Deserialize)]
struct RouteLeg {
    distance: TextValue,
    duration: TextValue,
    #[serde(default)]
    steps: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct Polyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    results: Vec<NearbyResult>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: DetailsResult,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    opening_hours: Option<Value>,
    rating: Option<f64>,
    reviews: Option<Vec<Value>>,
    formatted_address: Option<String>,
}

fn parse<T: DeserializeOwned>(body: &Value, what: &str) -> Result<T, EnrichmentFailure> {
    T::deserialize(body)
        .map_err(|e| EnrichmentFailure::MalformedResponse(format!("{what}: {e}")))
}

/// Extract `rows[0].elements[0]` of a distance matrix body
///
/// # Errors
///
/// `ProviderStatus` when the element status is not `OK`, otherwise
/// `MalformedResponse` for a body of the wrong shape.
pub fn distance_matrix_leg(body: &Value, mode: TravelMode) -> Result<TravelLeg, EnrichmentFailure> {
    let response: MatrixResponse = parse(body, "distance matrix")?;
    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| {
            EnrichmentFailure::MalformedResponse("distance matrix: no elements".to_string())
        })?;

    if element.status != STATUS_OK {
        return Err(EnrichmentFailure::ProviderStatus(element.status));
    }

    match (element.distance, element.duration) {
        (Some(distance), Some(duration)) => Ok(TravelLeg {
            mode,
            distance_meters: distance.value,
            distance_text: distance.text,
            duration_seconds: duration.value,
            duration_text: duration.text,
            steps: None,
            polyline: None,
        }),
        _ => Err(EnrichmentFailure::MalformedResponse(
            "distance matrix: element without distance or duration".to_string(),
        )),
    }
}

/// Extract the first leg of the first route of a directions body
///
/// # Errors
///
/// `ProviderStatus("ZERO_RESULTS")` when the route list is empty, otherwise
/// `MalformedResponse` for a body of the wrong shape.
pub fn directions_leg(body: &Value, mode: TravelMode) -> Result<TravelLeg, EnrichmentFailure> {
    let response: DirectionsResponse = parse(body, "directions")?;
    let Some(route) = response.routes.into_iter().next() else {
        return Err(EnrichmentFailure::ProviderStatus(ZERO_RESULTS.to_string()));
    };
    let leg = route.legs.into_iter().next().ok_or_else(|| {
        EnrichmentFailure::MalformedResponse("directions: route without legs".to_string())
    })?;

    Ok(TravelLeg {
        mode,
        distance_meters: leg.distance.value,
        distance_text: leg.distance.text,
        duration_seconds: leg.duration.value,
        duration_text: leg.duration.text,
        steps: Some(leg.steps.len()),
        polyline: Some(route.overview_polyline.points),
    })
}

/// `place_id` of the first nearby search result, if any
///
/// # Errors
///
/// `MalformedResponse` for a body of the wrong shape.
pub fn first_place_id(body: &Value) -> Result<Option<String>, EnrichmentFailure> {
    let response: NearbyResponse = parse(body, "nearby search")?;
    Ok(response.results.into_iter().next().map(|r| r.place_id))
}

/// Place details with `opening_hours.open_now` flattened into `is_open`
///
/// # Errors
///
/// `MalformedResponse` for a body without a `result` object.
pub fn place_details(body: &Value) -> Result<PlaceDetails, EnrichmentFailure> {
    let response: DetailsResponse = parse(body, "place details")?;
    let result = response.result;
    let is_open = result
        .opening_hours
        .as_ref()
        .and_then(|hours| hours.get("open_now"))
        .and_then(Value::as_bool);

    Ok(PlaceDetails {
        opening_hours: result.opening_hours,
        is_open,
        rating: result.rating,
        reviews: result.reviews,
        formatted_address: result.formatted_address,
    })
}
