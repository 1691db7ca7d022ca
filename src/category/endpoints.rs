//! Endpoints for listing and creating categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{CategoryName, create_category, get_all_categories},
    payload::non_blank,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}

const LIST_FAILED: &str = "Failed to fetch categories";
const CREATE_FAILED: &str = "Failed to create category";

/// A route handler that responds with all categories ordered by name.
pub async fn list_categories_endpoint(State(state): State<CategoryState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(LIST_FAILED);
        }
    };

    match get_all_categories(&connection) {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_json_response(LIST_FAILED),
    }
}

/// A route handler for creating a category, responds with the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Error::InvalidRequest(rejection.body_text()).into_json_response(CREATE_FAILED);
        }
    };

    let name = match non_blank(request.name) {
        Some(name) => CategoryName::new_unchecked(&name),
        None => return Error::EmptyCategoryName.into_json_response(CREATE_FAILED),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(CREATE_FAILED);
        }
    };

    match create_category(name, &connection) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => error.into_json_response(CREATE_FAILED),
    }
}
