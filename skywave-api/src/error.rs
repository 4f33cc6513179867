use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skywave_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFoundError(format!("{} not found: {}", what, id))
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::FlightNotFound(_) | CoreError::BookingNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::SoldOut { .. } | CoreError::EmailTaken(_) => StatusCode::CONFLICT,
        CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::ValidationError(_) => StatusCode::BAD_REQUEST,
        CoreError::PaymentDeclined(_) => StatusCode::PAYMENT_REQUIRED,
        CoreError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Anyhow(err) => match err.downcast_ref::<CoreError>() {
                Some(core) if core_status(core) != StatusCode::INTERNAL_SERVER_ERROR => {
                    (core_status(core), core.to_string())
                }
                _ => {
                    tracing::error!("Internal Server Error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
                }
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
