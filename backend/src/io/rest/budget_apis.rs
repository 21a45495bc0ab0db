//! # REST API for Per-Category Budgets

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use shared::{BudgetListResponse, BudgetRequest, MessageResponse};
use tracing::info;

use crate::domain::commands::budgets::{BudgetListQuery, BudgetWriteOutcome};
use crate::io::rest::mappers::BudgetMapper;
use crate::io::rest::{error_response, json_body, PeriodQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route("/:id", put(update_budget).delete(delete_budget))
}

/// List budgets, filtered to one month when both month and year are given
pub async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/budgets - query: {:?}", query);

    let period = match query.optional() {
        Ok(period) => period,
        Err(e) => return error_response(e, "Invalid budget query"),
    };

    match state.budget_service.list_budgets(BudgetListQuery { period }).await {
        Ok(budgets) => {
            let response = BudgetListResponse {
                budgets: budgets.iter().map(BudgetMapper::to_view).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e, "Failed to fetch budgets"),
    }
}

/// Create a budget, or overwrite the amount of the existing one for the same slot
pub async fn create_budget(
    State(state): State<AppState>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> impl IntoResponse {
    let command = match json_body(payload).and_then(|request| {
        info!("POST /api/budgets - request: {:?}", request);
        BudgetMapper::to_command(request)
    }) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid budget"),
    };

    match state.budget_service.create_budget(command).await {
        Ok(outcome) => {
            let status = match &outcome {
                BudgetWriteOutcome::Created(_) => StatusCode::CREATED,
                BudgetWriteOutcome::Updated(_) => StatusCode::OK,
            };
            (status, Json(BudgetMapper::to_view(outcome.details()))).into_response()
        }
        Err(e) => error_response(e, "Failed to create budget"),
    }
}

pub async fn update_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("PUT /api/budgets/{}", budget_id);

    let command = match json_body(payload).and_then(BudgetMapper::to_command) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid budget"),
    };

    match state.budget_service.update_budget(&budget_id, command).await {
        Ok(details) => (StatusCode::OK, Json(BudgetMapper::to_view(&details))).into_response(),
        Err(e) => error_response(e, "Failed to update budget"),
    }
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/budgets/{}", budget_id);

    match state.budget_service.delete_budget(&budget_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Budget deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Failed to delete budget"),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{send, test_app};
    use axum::http::StatusCode;
    use axum::Router;
    use serde_json::{json, Value};

    async fn create_category(app: &Router, name: &str) -> String {
        let (status, body) = send(app, "POST", "/api/categories", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    fn budget(category: &str, amount: f64, month: u32) -> Value {
        json!({ "category": category, "amount": amount, "month": month, "year": 2024 })
    }

    #[tokio::test]
    async fn test_create_then_upsert() {
        let app = test_app().await;
        let food = create_category(&app, "Food").await;

        let (status, created) = send(&app, "POST", "/api/budgets", Some(budget(&food, 200.0, 3))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["category"], json!("Food"));
        assert_eq!(created["categoryId"], json!(food));
        assert_eq!(created["color"], json!("#6366f1"));

        let (status, updated) = send(&app, "POST", "/api/budgets", Some(budget(&food, 300.0, 3))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["amount"], json!(300.0));

        let (_, listed) = send(&app, "GET", "/api/budgets?month=3&year=2024", None).await;
        assert_eq!(listed["budgets"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_missing_fields_or_unknown_category() {
        let app = test_app().await;

        let (status, body) =
            send(&app, "POST", "/api/budgets", Some(json!({ "category": "x", "amount": 5.0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required fields" }));

        let (status, _) = send(&app, "POST", "/api/budgets", Some(budget("ghost", 5.0, 3))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_collision_is_conflict() {
        let app = test_app().await;
        let food = create_category(&app, "Food").await;
        let rent = create_category(&app, "Rent").await;
        send(&app, "POST", "/api/budgets", Some(budget(&food, 200.0, 3))).await;
        let (_, rent_budget) = send(&app, "POST", "/api/budgets", Some(budget(&rent, 900.0, 3))).await;

        let uri = format!("/api/budgets/{}", rent_budget["id"].as_str().unwrap());
        let (status, _) = send(&app, "PUT", &uri, Some(budget(&food, 1.0, 3))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, moved) = send(&app, "PUT", &uri, Some(budget(&rent, 950.0, 4))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["month"], json!(4));
    }

    #[tokio::test]
    async fn test_delete_budget() {
        let app = test_app().await;
        let food = create_category(&app, "Food").await;
        let (_, created) = send(&app, "POST", "/api/budgets", Some(budget(&food, 200.0, 3))).await;
        let uri = format!("/api/budgets/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Budget deleted successfully"));

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_without_full_period_returns_everything() {
        let app = test_app().await;
        let food = create_category(&app, "Food").await;
        send(&app, "POST", "/api/budgets", Some(budget(&food, 200.0, 3))).await;
        send(&app, "POST", "/api/budgets", Some(budget(&food, 200.0, 4))).await;

        let (_, listed) = send(&app, "GET", "/api/budgets?month=3", None).await;

        assert_eq!(listed["budgets"].as_array().unwrap().len(), 2);
    }
}
