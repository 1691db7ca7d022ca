//! Bank statement uploads.
//!
//! This module contains:
//! - The catalog of supported banks and the column layout of their statements
//! - The endpoint that accepts a statement upload for a user and bank
//! - The endpoint that lists the supported banks

mod bank;
mod upload_endpoint;

pub use bank::{BankLayout, find_bank, supported_banks};
pub use upload_endpoint::{list_banks_endpoint, upload_statement_endpoint};
