//! Defines the endpoint for creating a new bill.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    bill::{BillState, NewBill, create_bill},
    category::CategoryId,
    frequency::Frequency,
    payload::{AmountInput, non_blank},
    timestamp::Timestamp,
};

/// The request body for creating a bill.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub amount: Option<AmountInput>,
    pub due_date: Option<String>,
    pub frequency: Option<String>,
    pub category_id: Option<CategoryId>,
    pub reminder_enabled: Option<bool>,
    pub reminder_days_before: Option<u32>,
    pub notes: Option<String>,
}

impl CreateBillRequest {
    /// Validate the request and convert it to a [NewBill].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if any of the user ID, name, amount, due date or frequency are missing,
    /// - [Error::InvalidFrequency] if the frequency is not recognised,
    /// - [Error::NegativeAmount] or [Error::InvalidAmount] if the amount is not a valid amount,
    /// - or [Error::InvalidDate] if the due date cannot be parsed.
    fn into_new_bill(self) -> Result<NewBill, Error> {
        let amount = self.amount.filter(|amount| !amount.is_blank());

        let (Some(user_id), Some(name), Some(amount), Some(due_date), Some(frequency)) = (
            non_blank(self.user_id),
            non_blank(self.name),
            amount,
            non_blank(self.due_date),
            non_blank(self.frequency),
        ) else {
            return Err(Error::MissingFields);
        };

        let frequency: Frequency = frequency.parse()?;
        let amount = amount.parse()?;
        let due_date = Timestamp::parse(&due_date)?;

        let mut bill = NewBill::new(&user_id, &name, amount, due_date, frequency)
            .category_id(self.category_id)
            .notes(self.notes);

        if let Some(reminder_enabled) = self.reminder_enabled {
            bill = bill.reminder_enabled(reminder_enabled);
        }

        if let Some(days) = self.reminder_days_before {
            bill = bill.reminder_days_before(days);
        }

        Ok(bill)
    }
}

const CREATE_FAILED: &str = "Failed to create bill";

/// A route handler for creating a new bill, responds with the bill and its category.
pub async fn create_bill_endpoint(
    State(state): State<BillState>,
    payload: Result<Json<CreateBillRequest>, JsonRejection>,
) -> Response {
    let new_bill = match payload
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Json(request)| request.into_new_bill())
    {
        Ok(new_bill) => new_bill,
        Err(error) => return error.into_json_response(CREATE_FAILED),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response(CREATE_FAILED);
        }
    };

    match create_bill(new_bill, &connection) {
        Ok(bill) => {
            tracing::debug!("Created bill {} for user {}", bill.id, bill.user_id);
            (StatusCode::CREATED, Json(bill)).into_response()
        }
        Err(error) => error.into_json_response(CREATE_FAILED),
    }
}
