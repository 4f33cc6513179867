use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use skywave_core::repository::FlightRepository;
use skywave_core::{Airport, Flight, FlightSearchCriteria, FlightStatusQuery};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

const TODAYS_FLIGHTS_LIMIT: usize = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights", get(search_flights))
        .route("/v1/flights/status", get(flight_status))
        .route("/v1/flights/today", get(todays_flights))
        .route("/v1/flights/{id}", get(get_flight))
        .route("/v1/airports", get(list_airports))
        .route("/v1/events", get(stream_events))
}

/// `?from=JFK&to=LAX&date=2026-10-19`; omitted parameters match everything
async fn search_flights(
    State(state): State<AppState>,
    Query(criteria): Query<FlightSearchCriteria>,
) -> Json<Vec<Flight>> {
    Json(state.store.search_flights(&criteria).await)
}

async fn flight_status(
    State(state): State<AppState>,
    Query(query): Query<FlightStatusQuery>,
) -> Json<Vec<Flight>> {
    Json(state.store.flight_status(&query).await)
}

#[derive(Debug, Deserialize)]
struct TodayParams {
    limit: Option<usize>,
}

async fn todays_flights(
    State(state): State<AppState>,
    Query(params): Query<TodayParams>,
) -> Json<Vec<Flight>> {
    let today = Utc::now().date_naive();
    let limit = params.limit.unwrap_or(TODAYS_FLIGHTS_LIMIT);
    Json(state.store.todays_flights(today, limit).await)
}

async fn get_flight(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Flight>, AppError> {
    state
        .store
        .get_flight_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Flight", id))
}

async fn list_airports(State(state): State<AppState>) -> Json<Vec<Airport>> {
    Json(state.store.airports().await)
}

/// Live feed of store events, one SSE message per event named after its topic
async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.store.events().subscribe();

    // Lagged receivers just skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let event = result.ok()?;
        Event::default().event(event.topic()).json_data(&event).ok().map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
