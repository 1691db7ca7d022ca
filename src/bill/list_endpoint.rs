//! Defines the endpoint for listing a user's bills.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    bill::{BillState, list_bills_for_user},
    payload::non_blank,
};

/// The query parameters for listing bills.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBillsParams {
    pub user_id: Option<String>,
}

const LIST_FAILED: &str = "Failed to fetch bills";

/// A route handler that responds with the user's bills, soonest due date first.
pub async fn list_bills_endpoint(
    State(state): State<BillState>,
    params: Result<Query<ListBillsParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return Error::InvalidRequest(rejection.body_text()).into_json_response(LIST_FAILED);
        }
    };

    let Some(user_id) = non_blank(params.user_id) else {
        return Error::MissingUserId.into_json_response(LIST_FAILED);
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(LIST_FAILED);
        }
    };

    match list_bills_for_user(&user_id, &connection) {
        Ok(bills) => Json(bills).into_response(),
        Err(error) => error.into_json_response(LIST_FAILED),
    }
}
