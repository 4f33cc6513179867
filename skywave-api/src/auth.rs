use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use skywave_core::UserProfile;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let profile = state.accounts.register(&req.name, &req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Json<UserProfile>, AppError> {
    let profile = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(profile))
}
