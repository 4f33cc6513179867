use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use skywave_core::repository::BookingRepository;
use skywave_core::{Booking, BookingUpdate, NewBooking};
use skywave_order::{BookingDashboard, BookingPartition};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route(
            "/v1/bookings/{id}",
            get(get_booking).patch(update_booking).delete(delete_booking),
        )
        .route("/v1/users/{email}/bookings", get(user_bookings))
        .route("/v1/users/{email}/dashboard", get(user_dashboard))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    if req.passenger_name.trim().is_empty() || req.passenger_email.trim().is_empty() || req.seat_number.trim().is_empty() {
        return Err(AppError::ValidationError(
            "passengerName, passengerEmail and seatNumber are required".to_string(),
        ));
    }

    let booking = state.store.create_booking(req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Booking>, AppError> {
    state
        .store
        .get_booking_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Booking", id))
}

/// Partial update; `{"status":"cancelled"}` is how customers cancel
async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<Booking>, AppError> {
    state
        .store
        .update_booking(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Booking", id))
}

async fn delete_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if state.store.delete_booking(id).await {
        info!("Booking {} removed via API", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Booking", id))
    }
}

async fn user_bookings(State(state): State<AppState>, Path(email): Path<String>) -> Json<BookingPartition> {
    let bookings = state.store.get_bookings_by_user(&email).await;
    Json(BookingPartition::new(bookings, Utc::now().date_naive()))
}

async fn user_dashboard(State(state): State<AppState>, Path(email): Path<String>) -> Json<BookingDashboard> {
    let bookings = state.store.get_bookings_by_user(&email).await;
    Json(BookingDashboard::new(&bookings, Utc::now().date_naive()))
}
