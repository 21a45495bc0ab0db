//! # REST API Interface Layer
//!
//! HTTP endpoints of the finance tracker. Handlers parse the request through a
//! mapper (shape validation), call one domain service, and translate the
//! outcome into a status code and JSON body. Every error body is
//! `{"error": "..."}`.

pub mod analytics_apis;
pub mod budget_apis;
pub mod category_apis;
pub mod mappers;
pub mod settings_apis;
pub mod transaction_apis;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::{DomainError, MonthPeriod};

/// `?month=M&year=Y` as sent by the client. Kept as raw text so that bad
/// numbers produce the same error body as every other validation failure.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl PeriodQuery {
    /// Both parameters must be present and valid
    pub fn required(&self) -> Result<MonthPeriod, DomainError> {
        match (self.month.as_deref(), self.year.as_deref()) {
            (Some(month), Some(year)) => parse_period(month, year),
            _ => Err(DomainError::validation("Month and year are required")),
        }
    }

    /// A period only when both parameters are present
    pub fn optional(&self) -> Result<Option<MonthPeriod>, DomainError> {
        match (self.month.as_deref(), self.year.as_deref()) {
            (Some(month), Some(year)) => parse_period(month, year).map(Some),
            _ => Ok(None),
        }
    }
}

fn parse_period(month: &str, year: &str) -> Result<MonthPeriod, DomainError> {
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("Invalid month: {}", month)))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("Invalid year: {}", year)))?;
    MonthPeriod::new(month, year)
}

/// Unwrap a JSON body, turning malformed input into a validation error
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, DomainError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| DomainError::validation(rejection.body_text()))
}

/// Translate a domain error into an HTTP response.
///
/// `context` is the message shown for storage failures; their details only go
/// to the log.
pub fn error_response(err: DomainError, context: &str) -> Response {
    let (status, message) = match err {
        DomainError::Validation(message) => {
            warn!("{}: {}", context, message);
            (StatusCode::BAD_REQUEST, message)
        }
        DomainError::NotFound(message) => {
            warn!("{}: {}", context, message);
            (StatusCode::NOT_FOUND, message)
        }
        DomainError::Conflict(message) => {
            warn!("{}: {}", context, message);
            (StatusCode::CONFLICT, message)
        }
        DomainError::Storage(cause) => {
            error!("{}: {:#}", context, cause);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    };

    (status, Json(ErrorResponse { error: message })).into_response()
}
