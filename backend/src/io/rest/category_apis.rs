//! # REST API for Categories

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use shared::{Category, CategoryRequest, MessageResponse};
use tracing::info;

use crate::io::rest::mappers::CategoryMapper;
use crate::io::rest::{error_response, json_body};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.category_service.list_categories().await {
        Ok(categories) => {
            let response: Vec<Category> = categories.into_iter().map(CategoryMapper::to_dto).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e, "Failed to fetch categories"),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let command = match json_body(payload).and_then(|request| {
        info!("POST /api/categories - request: {:?}", request);
        CategoryMapper::to_command(request)
    }) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid category"),
    };

    match state.category_service.create_category(command).await {
        Ok(category) => (StatusCode::CREATED, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => error_response(e, "Failed to create category"),
    }
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("PUT /api/categories/{}", category_id);

    let command = match json_body(payload).and_then(CategoryMapper::to_command) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid category"),
    };

    match state.category_service.update_category(&category_id, command).await {
        Ok(category) => (StatusCode::OK, Json(CategoryMapper::to_dto(category))).into_response(),
        Err(e) => error_response(e, "Failed to update category"),
    }
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/categories/{}", category_id);

    match state.category_service.delete_category(&category_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Category deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Failed to delete category"),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_category_lifecycle() {
        let app = test_app().await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({ "name": "Travel", "color": "#ff0000", "icon": "✈️" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["color"], json!("#ff0000"));
        let uri = format!("/api/categories/{}", created["id"].as_str().unwrap());

        send(&app, "POST", "/api/categories", Some(json!({ "name": "Bills" }))).await;
        let (status, listed) = send(&app, "GET", "/api/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["name"], json!("Bills"));
        assert_eq!(listed[1]["name"], json!("Travel"));

        let (status, renamed) = send(&app, "PUT", &uri, Some(json!({ "name": "Trips" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["name"], json!("Trips"));
        assert_eq!(renamed["color"], json!("#6366f1"));

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let app = test_app().await;
        send(&app, "POST", "/api/categories", Some(json!({ "name": "Food" }))).await;

        let (status, body) = send(&app, "POST", "/api/categories", Some(json!({ "name": "Food" }))).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("Food"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test_app().await;

        let (status, body) = send(&app, "POST", "/api/categories", Some(json!({ "name": 42 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
