//! Defines the core data model and database queries for bills.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, map_category_error},
    database_id::BillId,
    db::UpdateQuery,
    frequency::Frequency,
    payload::Patch,
    timestamp::Timestamp,
};

// ============================================================================
// MODELS
// ============================================================================

/// The number of days before the due date that a reminder is sent, unless
/// the user picks something else.
pub const DEFAULT_REMINDER_DAYS_BEFORE: u32 = 3;

/// A payment that falls due on a known date and repeats, e.g. rent or a
/// phone plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// The ID of the bill.
    pub id: BillId,
    /// The user that the bill belongs to.
    pub user_id: String,
    /// What the bill is for, e.g. "Electricity".
    pub name: String,
    /// How much has to be paid each time the bill falls due.
    pub amount: f64,
    /// When the bill next has to be paid.
    pub due_date: Timestamp,
    /// How often the bill repeats.
    pub frequency: Frequency,
    /// The ID of the category the bill belongs to.
    pub category_id: Option<CategoryId>,
    /// The category the bill belongs to.
    pub category: Option<Category>,
    /// Whether the user wants to be reminded before the due date.
    pub reminder_enabled: bool,
    /// How many days before the due date the reminder goes out.
    pub reminder_days_before: u32,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// The data needed to create a [Bill].
///
/// Use [NewBill::new] for the required fields and the setters for the rest,
/// which default to no category, reminders on, a 3 day lead time, and no notes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    /// The user that the bill belongs to.
    pub user_id: String,
    /// What the bill is for.
    pub name: String,
    /// How much has to be paid each time, zero or more.
    pub amount: f64,
    /// When the bill first falls due.
    pub due_date: Timestamp,
    /// How often the bill repeats.
    pub frequency: Frequency,
    /// The category of the bill, e.g. "Utilities".
    pub category_id: Option<CategoryId>,
    /// Whether the user wants to be reminded before the due date.
    pub reminder_enabled: bool,
    /// How many days before the due date the reminder goes out.
    pub reminder_days_before: u32,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl NewBill {
    /// Create a new bill with the default reminder settings.
    pub fn new(
        user_id: &str,
        name: &str,
        amount: f64,
        due_date: Timestamp,
        frequency: Frequency,
    ) -> Self {
        Self {
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            amount,
            due_date,
            frequency,
            category_id: None,
            reminder_enabled: true,
            reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
            notes: None,
        }
    }

    /// Set the category for the bill.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Turn reminders on or off.
    pub fn reminder_enabled(mut self, reminder_enabled: bool) -> Self {
        self.reminder_enabled = reminder_enabled;
        self
    }

    /// Set how many days before the due date the reminder goes out.
    pub fn reminder_days_before(mut self, days: u32) -> Self {
        self.reminder_days_before = days;
        self
    }

    /// Set the notes for the bill.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// The changes to make to an existing [Bill].
///
/// Fields that must always have a value are `Option`s where `None` means no
/// change. Fields that may be removed are [Patch]es.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillChanges {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub frequency: Option<Frequency>,
    pub category_id: Patch<CategoryId>,
    pub reminder_enabled: Option<bool>,
    pub reminder_days_before: Option<u32>,
    pub notes: Patch<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_BILL: &str = "SELECT bill.id, bill.user_id, bill.name, bill.amount, bill.due_date, \
    bill.frequency, bill.category_id, category.name, bill.reminder_enabled, \
    bill.reminder_days_before, bill.notes \
    FROM bill LEFT JOIN category ON bill.category_id = category.id";

/// Create a new bill in the database and return it with its category.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_bill(bill: NewBill, connection: &Connection) -> Result<Bill, Error> {
    connection
        .execute(
            "INSERT INTO bill (user_id, name, amount, due_date, frequency, category_id, \
            reminder_enabled, reminder_days_before, notes) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            (
                &bill.user_id,
                &bill.name,
                bill.amount,
                bill.due_date,
                bill.frequency,
                bill.category_id,
                bill.reminder_enabled,
                bill.reminder_days_before,
                &bill.notes,
            ),
        )
        .map_err(|error| map_category_error(error, bill.category_id))?;

    get_bill(connection.last_insert_rowid(), connection)
}

/// Retrieve a bill and its category by the bill's `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid bill,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_bill(id: BillId, connection: &Connection) -> Result<Bill, Error> {
    connection
        .prepare(&format!("{SELECT_BILL} WHERE bill.id = :id"))?
        .query_row(&[(":id", &id)], map_bill_row)
        .map_err(|error| error.into())
}

/// Retrieve the bills of `user_id` ordered by due date, soonest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_bills_for_user(user_id: &str, connection: &Connection) -> Result<Vec<Bill>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BILL} WHERE bill.user_id = :user_id ORDER BY bill.due_date ASC, bill.id ASC"
        ))?
        .query_map(&[(":user_id", &user_id)], map_bill_row)?
        .map(|maybe_bill| maybe_bill.map_err(Error::from))
        .collect()
}

/// Apply `changes` to the bill `id` and return the updated bill.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBill] if `id` does not refer to a valid bill,
/// - [Error::InvalidCategory] if the new category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_bill(id: BillId, changes: BillChanges, connection: &Connection) -> Result<Bill, Error> {
    let category_id = match changes.category_id {
        Patch::Set(category_id) => Some(category_id),
        _ => None,
    };

    let mut query = UpdateQuery::new("bill");
    query.set_some("name", changes.name);
    query.set_some("amount", changes.amount);
    query.set_some("due_date", changes.due_date);
    query.set_some("frequency", changes.frequency);
    query.set_patch("category_id", changes.category_id);
    query.set_some("reminder_enabled", changes.reminder_enabled);
    query.set_some("reminder_days_before", changes.reminder_days_before);
    query.set_patch("notes", changes.notes);

    if !query.is_empty() {
        let rows_affected = query
            .execute(id, connection)
            .map_err(|error| map_category_error(error, category_id))?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingBill);
        }
    }

    get_bill(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingBill,
        error => error,
    })
}

/// Delete the bill `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBill] if `id` does not refer to a valid bill,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_bill(id: BillId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM bill WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBill);
    }

    Ok(())
}

/// Create the bill table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_bill_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS bill (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            due_date TEXT NOT NULL,
            frequency TEXT NOT NULL,
            category_id INTEGER,
            reminder_enabled INTEGER NOT NULL DEFAULT 1,
            reminder_days_before INTEGER NOT NULL DEFAULT 3,
            notes TEXT,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_bill_user_due_date ON bill(user_id, due_date);",
    )?;

    Ok(())
}

/// Map a database row from [SELECT_BILL] to a Bill.
fn map_bill_row(row: &Row) -> Result<Bill, rusqlite::Error> {
    let category_id: Option<CategoryId> = row.get(6)?;
    let category_name: Option<String> = row.get(7)?;
    let category = category_id
        .zip(category_name)
        .map(|(id, name)| Category {
            id,
            name: CategoryName::new_unchecked(&name),
        });

    Ok(Bill {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
        due_date: row.get(4)?,
        frequency: row.get(5)?,
        category_id,
        category,
        reminder_enabled: row.get(8)?,
        reminder_days_before: row.get(9)?,
        notes: row.get(10)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
