//! Transaction management: money that was earned or spent.
//!
//! This module contains:
//! - The `Transaction` model, its builder and the database functions for storing transactions
//! - Filtered listing of a user's transactions by date range and type
//! - The JSON endpoints for listing, creating, updating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod query;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

#[cfg(test)]
pub use core::count_transactions;
pub use core::{
    Transaction, TransactionBuilder, TransactionChanges, TransactionType, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{DateRange, TransactionFilter, list_transactions};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
