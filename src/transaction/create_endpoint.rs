//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    category::CategoryId,
    frequency::Frequency,
    payload::{AmountInput, non_blank},
    timestamp::Timestamp,
    transaction::{Transaction, TransactionBuilder, TransactionState, TransactionType, create_transaction},
};

/// The request body for creating a transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub user_id: Option<String>,
    pub amount: Option<AmountInput>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub bank: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurring_frequency: Option<String>,
}

impl CreateTransactionRequest {
    /// Validate the request and convert it to a [TransactionBuilder].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if any of the user ID, amount or type are missing,
    /// - [Error::InvalidTransactionType] if the type is not recognised,
    /// - [Error::InvalidFrequency] if the recurring frequency is not recognised,
    /// - [Error::NegativeAmount] or [Error::InvalidAmount] if the amount is not a valid amount,
    /// - or [Error::InvalidDate] if the date cannot be parsed.
    fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let amount = self.amount.filter(|amount| !amount.is_blank());

        let (Some(user_id), Some(amount), Some(transaction_type)) =
            (non_blank(self.user_id), amount, non_blank(self.transaction_type))
        else {
            return Err(Error::MissingFields);
        };

        let transaction_type: TransactionType = transaction_type.parse()?;
        let recurring_frequency = non_blank(self.recurring_frequency)
            .map(|frequency| frequency.parse::<Frequency>())
            .transpose()?;
        let amount = amount.parse()?;

        let mut builder = Transaction::build(&user_id, amount, transaction_type)
            .category_id(self.category_id)
            .description(self.description)
            .payment_method(self.payment_method)
            .bank(self.bank)
            .notes(self.notes)
            .recurring(self.is_recurring.unwrap_or(false), recurring_frequency);

        if let Some(date) = non_blank(self.date) {
            builder = builder.date(Timestamp::parse(&date)?);
        }

        Ok(builder)
    }
}

const CREATE_FAILED: &str = "Failed to create transaction";

/// A route handler for creating a new transaction, responds with the
/// transaction and its category.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    let builder = match payload
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Json(request)| request.into_builder())
    {
        Ok(builder) => builder,
        Err(error) => return error.into_json_response(CREATE_FAILED),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(CREATE_FAILED);
        }
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => {
            tracing::debug!(
                "Created {} transaction {} for user {}",
                transaction.transaction_type,
                transaction.id,
                transaction.user_id
            );
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => error.into_json_response(CREATE_FAILED),
    }
}
