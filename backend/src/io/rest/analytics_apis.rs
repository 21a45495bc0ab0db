//! # REST API for Monthly Analytics
//!
//! Read-only endpoints; every call recomputes from stored records.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::{error_response, PeriodQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_monthly_analytics))
        .route("/comparison", get(get_month_comparison))
}

/// Analytics for one month
pub async fn get_monthly_analytics(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/analytics - query: {:?}", query);

    let period = match query.required() {
        Ok(period) => period,
        Err(e) => return error_response(e, "Invalid analytics request"),
    };

    match state.analytics_service.monthly_analytics(period).await {
        Ok(analytics) => (StatusCode::OK, Json(analytics)).into_response(),
        Err(e) => error_response(e, "Failed to fetch analytics"),
    }
}

/// Analytics for one month next to the month before it
pub async fn get_month_comparison(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/analytics/comparison - query: {:?}", query);

    let period = match query.required() {
        Ok(period) => period,
        Err(e) => return error_response(e, "Invalid comparison request"),
    };

    match state.analytics_service.month_comparison(period).await {
        Ok(comparison) => (StatusCode::OK, Json(comparison)).into_response(),
        Err(e) => error_response(e, "Failed to compare months"),
    }
}
