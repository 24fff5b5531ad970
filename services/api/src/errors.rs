use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use simulator::{ServiceError, SimulationError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("No simulation has been run yet")]
    SimulationNotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            AppError::Simulation(e) => ServiceError::from(e),
            AppError::SimulationNotFound => ServiceError::simulation_not_found(),
            AppError::Internal(_) => ServiceError::internal("Internal server error"),
        }
    }
}

/// Render a standardized error body and record it
pub fn error_response(error: &ServiceError) -> Response {
    let status = StatusCode::from_u16(error.category.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match error.category.log_level() {
        "error" => tracing::error!(error_code = %error.code, error = %error, "Request failed"),
        "warn" => tracing::warn!(error_code = %error.code, error = %error, "Request rejected"),
        _ => tracing::info!(error_code = %error.code, error = %error, "Request rejected"),
    }

    metrics::counter!(
        "errors_total",
        "category" => error.category.as_str(),
        "code" => error.code.clone()
    )
    .increment(1);

    let body = Json(json!({
        "error": {
            "code": error.code,
            "message": error.message,
            "category": error.category.as_str(),
        }
    }));

    (status, body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref e) = self {
            tracing::error!("Internal error: {:?}", e);
        }
        error_response(&self.to_service_error())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
