use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use skywave_core::repository::FlightRepository;
use skywave_catalog::find_airport;
use skywave_core::{Airport, Flight, FlightFilter, FlightStatus, FlightUpdate, NewFlight, PassengerSummary};
use skywave_store::statistics::{DailyStatusRow, DashboardSummary, FlightStatistics};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_REPORT_DAYS: u32 = 7;
const MAX_REPORT_DAYS: u32 = 366;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct FlightListParams {
    /// A flight status, or `all`
    status: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PassengerParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportParams {
    from: Option<NaiveDate>,
    days: Option<u32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/flights", get(list_flights).post(create_flight))
        .route("/v1/admin/flights/{id}", put(update_flight).delete(delete_flight))
        .route("/v1/admin/passengers", get(search_passengers))
        .route("/v1/admin/passengers/{id}", delete(delete_passenger))
        .route("/v1/admin/statistics", get(statistics))
        .route("/v1/admin/dashboard", get(dashboard))
        .route("/v1/admin/reports/daily", get(daily_report))
}

fn parse_status(raw: Option<&str>) -> Result<Option<FlightStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => FlightStatus::ALL
            .iter()
            .find(|s| s.as_str() == value)
            .copied()
            .map(Some)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown flight status '{}'", value))),
    }
}

/// Canonical airport for a code; admins may only schedule within the network
fn known_airport(code: &str) -> Result<Airport, AppError> {
    find_airport(code).ok_or_else(|| AppError::ValidationError(format!("Unknown airport '{}'", code)))
}

// ============================================================================
// Flights
// ============================================================================

async fn list_flights(
    State(state): State<AppState>,
    Query(params): Query<FlightListParams>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let filter = FlightFilter {
        status: parse_status(params.status.as_deref())?,
        query: params.q,
    };
    Ok(Json(state.store.filter_flights(&filter).await))
}

async fn create_flight(
    State(state): State<AppState>,
    Json(mut req): Json<NewFlight>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    req.departure_airport = known_airport(&req.departure_airport.code)?;
    req.arrival_airport = known_airport(&req.arrival_airport.code)?;
    req.validate()?;

    let flight = state.store.create_flight(req).await;
    Ok((StatusCode::CREATED, Json(flight)))
}

async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut update): Json<FlightUpdate>,
) -> Result<Json<Flight>, AppError> {
    update.departure_airport = update.departure_airport.map(|a| known_airport(&a.code)).transpose()?;
    update.arrival_airport = update.arrival_airport.map(|a| known_airport(&a.code)).transpose()?;

    // Route and fare rules are checked against the merged flight by the store
    state
        .store
        .update_flight(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Flight", id))
}

/// Active bookings on the flight are cancelled, not removed
async fn delete_flight(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if state.store.delete_flight(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Flight", id))
    }
}

// ============================================================================
// Passengers
// ============================================================================

async fn search_passengers(
    State(state): State<AppState>,
    Query(params): Query<PassengerParams>,
) -> Json<Vec<PassengerSummary>> {
    Json(state.store.search_passengers(params.q.as_deref().unwrap_or("")).await)
}

async fn delete_passenger(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if state.store.delete_passenger(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Passenger", id))
    }
}

// ============================================================================
// Reports
// ============================================================================

async fn statistics(State(state): State<AppState>) -> Json<FlightStatistics> {
    Json(state.store.flight_statistics().await)
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(state.store.dashboard_summary().await)
}

async fn daily_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<DailyStatusRow>>, AppError> {
    let days = params.days.unwrap_or(DEFAULT_REPORT_DAYS);
    if days == 0 || days > MAX_REPORT_DAYS {
        return Err(AppError::ValidationError(format!(
            "days must be between 1 and {}",
            MAX_REPORT_DAYS
        )));
    }
    let anchor = params.from.unwrap_or_else(|| Utc::now().date_naive());
    state
        .store
        .daily_status_report(anchor, days)
        .await
        .map(Json)
        .ok_or_else(|| AppError::ValidationError(format!("{} days from {} runs past the calendar", days, anchor)))
}
