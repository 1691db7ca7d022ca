//! Defines the endpoint for listing a user's transactions.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    payload::non_blank,
    timestamp::Timestamp,
    transaction::{DateRange, TransactionFilter, TransactionState, TransactionType, list_transactions},
};

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl ListTransactionsParams {
    /// Validate the parameters and convert them to a [TransactionFilter].
    ///
    /// The date range only applies when both ends are given.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingUserId] if there is no user ID,
    /// - [Error::InvalidTransactionType] if the type is not recognised,
    /// - or [Error::InvalidDate] if either date cannot be parsed.
    fn into_filter(self) -> Result<TransactionFilter, Error> {
        let user_id = non_blank(self.user_id).ok_or(Error::MissingUserId)?;

        let date_range = match (non_blank(self.start_date), non_blank(self.end_date)) {
            (Some(start), Some(end)) => Some(DateRange {
                start: Timestamp::parse(&start)?,
                end: Timestamp::parse_end_of_range(&end)?,
            }),
            (None, None) => None,
            (start, end) => {
                tracing::debug!(
                    "Ignoring incomplete date range (start: {start:?}, end: {end:?}) for user {user_id}"
                );
                None
            }
        };

        let transaction_type = non_blank(self.transaction_type)
            .map(|transaction_type| transaction_type.parse::<TransactionType>())
            .transpose()?;

        Ok(TransactionFilter {
            date_range,
            transaction_type,
            ..TransactionFilter::for_user(&user_id)
        })
    }
}

const LIST_FAILED: &str = "Failed to fetch transactions";

/// A route handler that responds with the user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    params: Result<Query<ListTransactionsParams>, QueryRejection>,
) -> Response {
    let filter = match params
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Query(params)| params.into_filter())
    {
        Ok(filter) => filter,
        Err(error) => return error.into_json_response(LIST_FAILED),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(LIST_FAILED);
        }
    };

    match list_transactions(&filter, &connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response(LIST_FAILED),
    }
}
