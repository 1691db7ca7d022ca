//! Bill management: recurring payments that fall due on a known date.
//!
//! This module contains:
//! - The `Bill` model and the database functions for storing and querying bills
//! - The JSON endpoints for listing, creating, updating and deleting bills

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use core::{
    Bill, BillChanges, NewBill, create_bill, create_bill_table, delete_bill, get_bill,
    list_bills_for_user, update_bill,
};
pub use create_endpoint::create_bill_endpoint;
pub use delete_endpoint::delete_bill_endpoint;
pub use edit_endpoint::update_bill_endpoint;
pub use list_endpoint::list_bills_endpoint;

/// The state needed by the bill endpoints.
#[derive(Debug, Clone)]
pub struct BillState {
    /// The database connection for managing bills.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
