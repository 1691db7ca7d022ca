//! Finance Tracker is a web service for keeping track of bills and
//! transactions.
//!
//! This library provides a JSON REST API backed by a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod bill;
mod category;
mod database_id;
mod db;
mod endpoints;
mod frequency;
mod logging;
mod payload;
mod routing;
mod statement;
mod timestamp;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use bill::{Bill, NewBill, create_bill};
pub use category::{Category, CategoryId, CategoryName, create_category};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use frequency::Frequency;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timestamp::Timestamp;
pub use transaction::{Transaction, TransactionBuilder, TransactionType, create_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not include a user ID.
    #[error("User ID required")]
    MissingUserId,

    /// The request body did not include one or more of the required fields.
    #[error("Missing required fields")]
    MissingFields,

    /// The request did not include the ID of the bill to update or delete.
    #[error("Bill ID required")]
    MissingBillId,

    /// The request did not include the ID of the transaction to update or delete.
    #[error("Transaction ID required")]
    MissingTransactionId,

    /// An update tried to set a required field to null.
    ///
    /// The string is the name of the offending field and is only used for logging.
    #[error("the field \"{0}\" is required and cannot be cleared")]
    ClearedRequiredField(&'static str),

    /// A bill or transaction amount was less than zero.
    #[error("Amount must not be negative")]
    NegativeAmount,

    /// A recurrence frequency that is not one of the known variants.
    #[error("invalid frequency \"{0}\"")]
    InvalidFrequency(String),

    /// A transaction type that is not one of the known variants.
    #[error("invalid transaction type \"{0}\"")]
    InvalidTransactionType(String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An amount could not be converted to a number.
    #[error("could not parse \"{0}\" as an amount")]
    InvalidAmount(String),

    /// A date could not be parsed as an RFC 3339 date-time or a calendar date.
    #[error("could not parse \"{0}\" as a date")]
    InvalidDate(String),

    /// A record ID could not be parsed as an integer.
    #[error("could not parse \"{0}\" as an ID")]
    InvalidId(String),

    /// The category ID used to create or update a record did not match a valid category.
    #[error("the category ID {0:?} does not refer to a valid category")]
    InvalidCategory(Option<i64>),

    /// The request body or query string could not be deserialized.
    #[error("could not parse the request: {0}")]
    InvalidRequest(String),

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a bill that does not exist
    #[error("tried to update a bill that is not in the database")]
    UpdateMissingBill,

    /// Tried to delete a bill that does not exist
    #[error("tried to delete a bill that is not in the database")]
    DeleteMissingBill,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl Error {
    /// The message shown to the client when the error is caused by bad input.
    ///
    /// Returns `None` for errors that should be reported as internal server errors.
    fn client_message(&self) -> Option<&'static str> {
        match self {
            Error::MissingUserId => Some("User ID required"),
            Error::MissingFields => Some("Missing required fields"),
            Error::MissingBillId => Some("Bill ID required"),
            Error::MissingTransactionId => Some("Transaction ID required"),
            Error::ClearedRequiredField(_) => Some("Required fields cannot be cleared"),
            Error::NegativeAmount => Some("Amount must not be negative"),
            Error::InvalidFrequency(_) => Some("Invalid frequency"),
            Error::InvalidTransactionType(_) => Some("Invalid transaction type"),
            Error::EmptyCategoryName => Some("Category name required"),
            _ => None,
        }
    }

    /// Convert the error into a JSON error response.
    ///
    /// Validation errors become a 400 response with a static message. Any
    /// other error is logged and becomes a 500 response with
    /// `failure_message`, so internal details never reach the client.
    pub(crate) fn into_json_response(self, failure_message: &str) -> Response {
        match self.client_message() {
            Some(message) => {
                tracing::debug!("Rejected request: {self}");
                error_response(StatusCode::BAD_REQUEST, message)
            }
            None => {
                tracing::error!("{failure_message}: {self}");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

/// Build a response with the body `{"error": message}`.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use crate::{Error, test_utils::parse_json_body};

    #[tokio::test]
    async fn validation_error_is_bad_request() {
        let response = Error::MissingFields.into_json_response("Failed to create bill");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn store_error_is_internal_server_error_with_generic_message() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery)
            .into_json_response("Failed to fetch bills");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch bills");
    }

    #[tokio::test]
    async fn missing_record_is_internal_server_error() {
        let response = Error::DeleteMissingBill.into_json_response("Failed to delete bill");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
