//! Categories for grouping bills and transactions.

mod db;
mod domain;
mod endpoints;

pub(crate) use db::map_category_error;
#[cfg(test)]
pub use db::get_category;
pub use db::{create_category, create_category_table, get_all_categories};
pub use domain::{Category, CategoryId, CategoryName};
pub use endpoints::{CategoryState, create_category_endpoint, list_categories_endpoint};
