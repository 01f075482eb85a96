//! # HTTP Error Type
//!
//! Maps lot outcomes onto status codes and a `{"error": "..."}` body.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LotError::Core(NoSpaceAvailable)   → 400 "No space available"         │
//! │  LotError::Core(AlreadyParked)      → 409 "Vehicle already parked"     │
//! │  LotError::Core(VehicleNotParked)   → 404 "Vehicle not found"          │
//! │  LotError::Core(Validation)         → 400 "<validation message>"       │
//! │  LotError::Db(_)                    → 500 (logged, details hidden)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use parklot_core::{CoreError, ValidationError};
use parklot_db::{DbError, LotError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No space available")]
    NoSpace,

    #[error("Vehicle already parked")]
    AlreadyParked,

    #[error("Vehicle not found")]
    VehicleNotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("A database error occurred")]
    Storage(#[source] DbError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoSpace | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AlreadyParked => StatusCode::CONFLICT,
            ApiError::VehicleNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            ApiError::Storage(e) => error!(error = %e, "Storage failure"),
            other => debug!(error = %other, "Request rejected"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

impl From<LotError> for ApiError {
    fn from(err: LotError) -> Self {
        match err {
            LotError::Core(core) => core.into(),
            LotError::Db(db) => ApiError::Storage(db),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoSpaceAvailable { .. } => ApiError::NoSpace,
            CoreError::AlreadyParked(_) => ApiError::AlreadyParked,
            CoreError::VehicleNotParked(_) | CoreError::InvalidTicketStatus { .. } => {
                ApiError::VehicleNotFound
            }
            CoreError::Validation(v) => v.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
