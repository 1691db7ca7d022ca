//! Defines the endpoint for deleting a bill.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    bill::{BillState, delete_bill},
    database_id::parse_id,
    payload::non_blank,
};

/// The query parameters for deleting a bill.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteBillParams {
    pub id: Option<String>,
}

const DELETE_FAILED: &str = "Failed to delete bill";

/// A route handler for deleting a bill, responds with `{"success": true}`.
pub async fn delete_bill_endpoint(
    State(state): State<BillState>,
    params: Result<Query<DeleteBillParams>, QueryRejection>,
) -> Response {
    let id = match params
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Query(params)| non_blank(params.id).ok_or(Error::MissingBillId))
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

    match delete_bill(id, &connection) {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(error) => error.into_json_response(DELETE_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };

    use crate::{
        Error, Frequency, Timestamp,
        bill::{BillState, NewBill, create_bill, get_bill},
        test_utils::{must_create_test_connection, parse_json_body},
    };

    use super::{DeleteBillParams, delete_bill_endpoint};

    fn get_test_state() -> BillState {
        BillState {
            db_connection: Arc::new(Mutex::new(must_create_test_connection())),
        }
    }

    fn params(id: &str) -> Query<DeleteBillParams> {
        Query(DeleteBillParams {
            id: Some(id.to_owned()),
        })
    }

    #[tokio::test]
    async fn deletes_bill() {
        let state = get_test_state();
        let bill = create_bill(
            NewBill::new(
                "u1",
                "Water",
                30.0,
                Timestamp::parse("2024-01-01").unwrap(),
                Frequency::Quarterly,
            ),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response =
            delete_bill_endpoint(State(state.clone()), Ok(params(&bill.id.to_string()))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            get_bill(bill.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let response =
            delete_bill_endpoint(State(get_test_state()), Ok(Query(DeleteBillParams::default())))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Bill ID required");
    }

    #[tokio::test]
    async fn unknown_id_is_internal_error() {
        let response = delete_bill_endpoint(State(get_test_state()), Ok(params("404"))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Failed to delete bill");
    }

    #[tokio::test]
    async fn non_numeric_id_is_internal_error() {
        let response = delete_bill_endpoint(State(get_test_state()), Ok(params("abc"))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
