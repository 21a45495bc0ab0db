//! # REST API for Settings
//!
//! Currently just the monthly global budget.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::GlobalBudgetRequest;
use tracing::info;

use crate::io::rest::mappers::GlobalBudgetMapper;
use crate::io::rest::{error_response, json_body, PeriodQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/global-budget", get(get_global_budget).post(set_global_budget))
}

/// The stored global budget for a month, or `null` when none was set
pub async fn get_global_budget(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/settings/global-budget - query: {:?}", query);

    let period = match query.required() {
        Ok(period) => period,
        Err(e) => return error_response(e, "Invalid global budget query"),
    };

    match state.global_budget_service.get_global_budget(period).await {
        Ok(global_budget) => {
            let response = global_budget.map(GlobalBudgetMapper::to_dto);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e, "Failed to fetch global budget"),
    }
}

pub async fn set_global_budget(
    State(state): State<AppState>,
    payload: Result<Json<GlobalBudgetRequest>, JsonRejection>,
) -> impl IntoResponse {
    let command = match json_body(payload).and_then(|request| {
        info!("POST /api/settings/global-budget - request: {:?}", request);
        GlobalBudgetMapper::to_command(request)
    }) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid global budget"),
    };

    match state.global_budget_service.set_global_budget(command).await {
        Ok(global_budget) => {
            (StatusCode::OK, Json(GlobalBudgetMapper::to_dto(global_budget))).into_response()
        }
        Err(e) => error_response(e, "Failed to save global budget"),
    }
}
