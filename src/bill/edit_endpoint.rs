//! Defines the endpoint for updating an existing bill.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    bill::{BillChanges, BillState, update_bill},
    category::CategoryId,
    database_id::BillId,
    frequency::Frequency,
    payload::{AmountInput, Patch},
    timestamp::Timestamp,
};

/// The request body for updating a bill.
///
/// Fields left out of the body are not changed. Only `categoryId` and `notes`
/// may be set to `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    pub id: Option<BillId>,
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub amount: Patch<AmountInput>,
    #[serde(default)]
    pub due_date: Patch<String>,
    #[serde(default)]
    pub frequency: Patch<String>,
    #[serde(default)]
    pub category_id: Patch<CategoryId>,
    #[serde(default)]
    pub reminder_enabled: Patch<bool>,
    #[serde(default)]
    pub reminder_days_before: Patch<u32>,
    #[serde(default)]
    pub notes: Patch<String>,
}

impl UpdateBillRequest {
    /// Validate the request and split it into the bill ID and the changes to make.
    ///
    /// A blank amount, due date or frequency is ignored, the same as leaving it out.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingBillId] if there is no ID,
    /// - [Error::ClearedRequiredField] if a field other than the category or notes is `null`,
    /// - [Error::InvalidFrequency] if the frequency is not recognised,
    /// - [Error::NegativeAmount] or [Error::InvalidAmount] if the amount is not a valid amount,
    /// - or [Error::InvalidDate] if the due date cannot be parsed.
    fn into_changes(self) -> Result<(BillId, BillChanges), Error> {
        let id = self.id.ok_or(Error::MissingBillId)?;

        let name = match self.name.required("name")? {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::ClearedRequiredField("name"));
            }
            name => name,
        };

        let amount = self
            .amount
            .required("amount")?
            .filter(|amount| !amount.is_blank())
            .map(|amount| amount.parse())
            .transpose()?;

        let due_date = self
            .due_date
            .required("dueDate")?
            .filter(|due_date| !due_date.trim().is_empty())
            .map(|due_date| Timestamp::parse(&due_date))
            .transpose()?;

        let frequency = self
            .frequency
            .required("frequency")?
            .filter(|frequency| !frequency.trim().is_empty())
            .map(|frequency| frequency.parse::<Frequency>())
            .transpose()?;

        let changes = BillChanges {
            name: name.map(|name| name.trim().to_owned()),
            amount,
            due_date,
            frequency,
            category_id: self.category_id,
            reminder_enabled: self.reminder_enabled.required("reminderEnabled")?,
            reminder_days_before: self.reminder_days_before.required("reminderDaysBefore")?,
            notes: self.notes,
        };

        Ok((id, changes))
    }
}

const UPDATE_FAILED: &str = "Failed to update bill";

/// A route handler for updating a bill, responds with the updated bill and its category.
pub async fn update_bill_endpoint(
    State(state): State<BillState>,
    payload: Result<Json<UpdateBillRequest>, JsonRejection>,
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

    match update_bill(id, changes, &connection) {
        Ok(bill) => Json(bill).into_response(),
        Err(error) => error.into_json_response(UPDATE_FAILED),
    }
}
