//! Defines the endpoint for updating an existing transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    category::CategoryId,
    database_id::TransactionId,
    frequency::Frequency,
    payload::{AmountInput, Patch},
    timestamp::Timestamp,
    transaction::{TransactionChanges, TransactionState, TransactionType, update_transaction},
};

/// The request body for updating a transaction.
///
/// Fields left out of the body are not changed. The amount, type, date and
/// recurring flag cannot be set to `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub id: Option<TransactionId>,
    #[serde(default)]
    pub category_id: Patch<CategoryId>,
    #[serde(default)]
    pub amount: Patch<AmountInput>,
    #[serde(default, rename = "type")]
    pub transaction_type: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub date: Patch<String>,
    #[serde(default)]
    pub payment_method: Patch<String>,
    #[serde(default)]
    pub bank: Patch<String>,
    #[serde(default)]
    pub notes: Patch<String>,
    #[serde(default)]
    pub is_recurring: Patch<bool>,
    #[serde(default)]
    pub recurring_frequency: Patch<String>,
}

impl UpdateTransactionRequest {
    /// Validate the request and split it into the transaction ID and the changes to make.
    ///
    /// A blank amount, date or recurring frequency is ignored, the same as leaving it out.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingTransactionId] if there is no ID,
    /// - [Error::ClearedRequiredField] if the amount, type, date or recurring flag is `null`,
    /// - [Error::InvalidTransactionType] if the type is not recognised,
    /// - [Error::InvalidFrequency] if the recurring frequency is not recognised,
    /// - [Error::NegativeAmount] or [Error::InvalidAmount] if the amount is not a valid amount,
    /// - or [Error::InvalidDate] if the date cannot be parsed.
    fn into_changes(self) -> Result<(TransactionId, TransactionChanges), Error> {
        let id = self.id.ok_or(Error::MissingTransactionId)?;

        let amount = self
            .amount
            .required("amount")?
            .filter(|amount| !amount.is_blank())
            .map(|amount| amount.parse())
            .transpose()?;

        let transaction_type = self
            .transaction_type
            .required("type")?
            .map(|transaction_type| transaction_type.parse::<TransactionType>())
            .transpose()?;

        let date = self
            .date
            .required("date")?
            .filter(|date| !date.trim().is_empty())
            .map(|date| Timestamp::parse(&date))
            .transpose()?;

        let recurring_frequency = match self.recurring_frequency {
            Patch::Set(frequency) if frequency.trim().is_empty() => Patch::Unchanged,
            frequency => frequency,
        }
        .try_map(|frequency| frequency.parse::<Frequency>())?;

        let changes = TransactionChanges {
            category_id: self.category_id,
            amount,
            transaction_type,
            description: self.description,
            date,
            payment_method: self.payment_method,
            bank: self.bank,
            notes: self.notes,
            is_recurring: self.is_recurring.required("isRecurring")?,
            recurring_frequency,
        };

        Ok((id, changes))
    }
}

const UPDATE_FAILED: &str = "Failed to update transaction";

/// A route handler for updating a transaction, responds with the updated
/// transaction and its category.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Response {
    let (id, changes) = match payload
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Json(request)| request.into_changes())
    {
        Ok(update) => update,
        Err(error) => return error.into_json_response(UPDATE_FAILED),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(UPDATE_FAILED);
        }
    };

    match update_transaction(id, changes, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response(UPDATE_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};
    use serde_json::json;

    use crate::{
        Frequency, Timestamp,
        test_utils::{must_create_test_connection, parse_json_body},
        transaction::{Transaction, TransactionState, TransactionType, create_transaction, get_transaction},
    };

    use super::{UpdateTransactionRequest, update_transaction_endpoint};

    fn get_test_state_with_transaction() -> TransactionState {
        let connection = must_create_test_connection();
        create_transaction(
            Transaction::build("u1", 4.5, TransactionType::Expense)
                .description(Some("Coffee".to_owned()))
                .date(Timestamp::parse("2024-03-01").unwrap())
                .bank(Some("Sampath Bank".to_owned()))
                .recurring(true, Some(Frequency::Daily)),
            &connection,
        )
        .unwrap();

        TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn request_from(value: serde_json::Value) -> UpdateTransactionRequest {
        serde_json::from_value(value).expect("invalid test request")
    }

    #[tokio::test]
    async fn can_update_subset_of_fields() {
        let state = get_test_state_with_transaction();

        let response = update_transaction_endpoint(
            State(state),
            Ok(Json(request_from(json!({
                "id": 1,
                "amount": "5.25",
                "type": "income",
                "date": "2024-03-02T07:45:00Z"
            })))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["amount"], 5.25);
        assert_eq!(body["type"], "income");
        assert_eq!(body["date"], "2024-03-02T07:45:00.000Z");
        assert_eq!(body["description"], "Coffee");
        assert_eq!(body["bank"], "Sampath Bank");
    }

    #[tokio::test]
    async fn null_clears_optional_fields() {
        let state = get_test_state_with_transaction();

        let response = update_transaction_endpoint(
            State(state.clone()),
            Ok(Json(request_from(json!({
                "id": 1,
                "description": null,
                "bank": null,
                "recurringFrequency": null,
                "isRecurring": false
            })))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.description, None);
        assert_eq!(transaction.bank, None);
        assert_eq!(transaction.recurring_frequency, None);
        assert!(!transaction.is_recurring);
    }

    #[tokio::test]
    async fn blank_recurring_frequency_is_ignored() {
        let state = get_test_state_with_transaction();

        let response = update_transaction_endpoint(
            State(state.clone()),
            Ok(Json(request_from(json!({ "id": 1, "recurringFrequency": " " })))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["recurringFrequency"], "daily");
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.recurring_frequency, Some(Frequency::Daily));
    }

    #[tokio::test]
    async fn null_amount_is_bad_request() {
        let state = get_test_state_with_transaction();

        let response = update_transaction_endpoint(
            State(state.clone()),
            Ok(Json(request_from(json!({ "id": 1, "amount": null })))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Required fields cannot be cleared");
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.amount, 4.5);
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let response = update_transaction_endpoint(
            State(get_test_state_with_transaction()),
            Ok(Json(request_from(json!({ "amount": 1 })))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Transaction ID required");
    }

    #[tokio::test]
    async fn unknown_id_is_internal_error() {
        let response = update_transaction_endpoint(
            State(get_test_state_with_transaction()),
            Ok(Json(request_from(json!({ "id": 404, "amount": 1 })))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Failed to update transaction");
    }
}
