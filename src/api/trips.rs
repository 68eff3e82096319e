//! Trip ledger API and the ephemeral fleet scratch list
//!
//! Trip and fleet routes are intentionally public; see DESIGN.md for the
//! route guard policy.

use axum::Extension;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::scratchpad::FleetTrip;
use crate::scratchpad::Scratchpad;
use crate::storage::CreateTripValues;
use crate::storage::Storage;
use crate::trips::Trip;
use crate::trips::export_csv;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: Uuid,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose: Option<String>,
    pub participants: String,
    pub created_at: NaiveDateTime,
}

impl TripResponse {
    fn from_trip(trip: Trip) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            purpose: trip.purpose,
            participants: trip.participants,
            created_at: trip.created_at,
        }
    }

    fn from_trip_multiple(mut trips: Vec<Trip>) -> Vec<Self> {
        trips.drain(..).map(Self::from_trip).collect::<Vec<Self>>()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTripsQuery {
    /// Case-sensitive substring filter on the participants field
    participant: Option<String>,
}

/// List all trips, ordered by start date ascending
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/business_trip?participant=Alice
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    Query(query): Query<ListTripsQuery>,
) -> Result<Success<Vec<TripResponse>>, Error> {
    let trips = storage
        .find_all_trips(query.participant.as_deref())
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(TripResponse::from_trip_multiple(trips)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripForm {
    destination: String,
    /// `YYYY-MM-DD`
    start_date: String,
    /// `YYYY-MM-DD`
    end_date: String,
    purpose: Option<String>,
    #[serde(default)]
    participants: String,
}

/// Record a business trip
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateTripForm>,
) -> Result<Success<TripResponse>, Error> {
    let destination = form.destination.trim();

    if destination.is_empty() {
        return Err(Error::bad_request("Destination is required"));
    }

    let start_date = parse_date(&form.start_date)?;
    let end_date = parse_date(&form.end_date)?;

    let values = CreateTripValues {
        destination,
        start_date,
        end_date,
        purpose: form.purpose.as_deref(),
        participants: &form.participants,
    };

    let trip = storage
        .create_trip(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(TripResponse::from_trip(trip)))
}

/// Delete a trip
///
/// The delete is hard; a second call for the same ID is a 404.
pub async fn remove<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(trip_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    let deleted = storage
        .delete_trip(&trip_id)
        .await
        .map_err(Error::internal_server_error)?;

    if deleted {
        Ok(Success::<&'static str>::no_content())
    } else {
        Err(Error::not_found("Trip not found"))
    }
}

/// Download all trips as a CSV document
pub async fn export<S: Storage>(Extension(storage): Extension<S>) -> Result<Response, Error> {
    let trips = storage
        .find_all_trips(None)
        .await
        .map_err(Error::internal_server_error)?;

    let document = export_csv(&trips);

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"trips.csv\""),
        ],
        document,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFleetTripForm {
    fleet: String,
    destination: String,
    /// `YYYY-MM-DD`
    start_date: String,
    /// `YYYY-MM-DD`
    end_date: String,
    purpose: Option<String>,
}

/// Append a trip to the in-memory fleet scratch list
///
/// The scratchpad is not persisted; a restart empties it.
pub async fn add_fleet_trip(
    Extension(scratchpad): Extension<Scratchpad>,
    Form(form): Form<AddFleetTripForm>,
) -> Result<Success<FleetTrip>, Error> {
    let fleet = form.fleet.trim();

    if fleet.is_empty() {
        return Err(Error::bad_request("Fleet is required"));
    }

    let trip = FleetTrip {
        destination: form.destination,
        start_date: parse_date(&form.start_date)?,
        end_date: parse_date(&form.end_date)?,
        purpose: form.purpose,
    };

    scratchpad.add_fleet_trip(fleet, trip.clone()).await;

    Ok(Success::created(trip))
}

/// Render the whole fleet map
pub async fn fleet_trips(
    Extension(scratchpad): Extension<Scratchpad>,
) -> Success<HashMap<String, Vec<FleetTrip>>> {
    Success::ok(scratchpad.fleet_trips().await)
}

/// Parse a `YYYY-MM-DD` date field
fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::bad_request(format!("Invalid date: {value}")))
}
