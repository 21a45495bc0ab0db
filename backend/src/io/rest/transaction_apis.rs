//! # REST API for Transactions

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use shared::{MessageResponse, Transaction, TransactionRequest};
use tracing::info;

use crate::domain::commands::transactions::TransactionListQuery;
use crate::io::rest::mappers::TransactionMapper;
use crate::io::rest::{error_response, json_body, PeriodQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:id", put(update_transaction).delete(delete_transaction))
}

/// Most recent first; restricted to one month when both month and year are given
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    let period = match query.optional() {
        Ok(period) => period,
        Err(e) => return error_response(e, "Invalid transaction query"),
    };

    match state
        .transaction_service
        .list_transactions(TransactionListQuery { period })
        .await
    {
        Ok(transactions) => {
            let response: Vec<Transaction> =
                transactions.into_iter().map(TransactionMapper::to_dto).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e, "Failed to fetch transactions"),
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let command = match json_body(payload).and_then(|request| {
        info!("POST /api/transactions - request: {:?}", request);
        TransactionMapper::to_command(request)
    }) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid transaction"),
    };

    match state.transaction_service.create_transaction(command).await {
        Ok(transaction) => {
            (StatusCode::CREATED, Json(TransactionMapper::to_dto(transaction))).into_response()
        }
        Err(e) => error_response(e, "Failed to create transaction"),
    }
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("PUT /api/transactions/{}", transaction_id);

    let command = match json_body(payload).and_then(TransactionMapper::to_command) {
        Ok(command) => command,
        Err(e) => return error_response(e, "Invalid transaction"),
    };

    match state
        .transaction_service
        .update_transaction(&transaction_id, command)
        .await
    {
        Ok(transaction) => (StatusCode::OK, Json(TransactionMapper::to_dto(transaction))).into_response(),
        Err(e) => error_response(e, "Failed to update transaction"),
    }
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/transactions/{}", transaction_id);

    match state.transaction_service.delete_transaction(&transaction_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Transaction deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Failed to delete transaction"),
    }
}
