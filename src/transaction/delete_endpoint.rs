//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    database_id::parse_id,
    payload::non_blank,
    transaction::{TransactionState, delete_transaction},
};

/// The query parameters for deleting a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTransactionParams {
    pub id: Option<String>,
}

const DELETE_FAILED: &str = "Failed to delete transaction";

/// A route handler for deleting a transaction, responds with `{"success": true}`.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    params: Result<Query<DeleteTransactionParams>, QueryRejection>,
) -> Response {
    let id = match params
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Query(params)| non_blank(params.id).ok_or(Error::MissingTransactionId))
        .and_then(|id| parse_id(&id))
    {
        Ok(id) => id,
        Err(error) => return error.into_json_response(DELETE_FAILED),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(DELETE_FAILED);
        }
    };

    match delete_transaction(id, &connection) {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(error) => error.into_json_response(DELETE_FAILED),
    }
}
