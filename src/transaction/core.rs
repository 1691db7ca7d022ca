//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, map_category_error},
    database_id::TransactionId,
    db::UpdateQuery,
    frequency::Frequency,
    payload::Patch,
    timestamp::Timestamp,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that the transaction belongs to.
    pub user_id: String,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// The category the transaction belongs to.
    pub category: Option<Category>,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Timestamp,
    /// How the transaction was paid, e.g. "card" or "cash".
    pub payment_method: Option<String>,
    /// The bank the transaction went through.
    pub bank: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Whether the transaction happens on a regular schedule.
    pub is_recurring: bool,
    /// How often a recurring transaction happens.
    pub recurring_frequency: Option<Frequency>,
}

impl Transaction {
    /// Create a new transaction dated now.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: &str,
        amount: f64,
        transaction_type: TransactionType,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id: user_id.to_owned(),
            amount,
            transaction_type,
            category_id: None,
            description: None,
            date: Timestamp::now(),
            payment_method: None,
            bank: None,
            notes: None,
            is_recurring: false,
            recurring_frequency: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use crate::{Timestamp, transaction::{Transaction, TransactionType}};
///
/// let transaction = Transaction::build("u1", 45.99, TransactionType::Expense)
///     .description(Some("Coffee beans".to_owned()))
///     .date(Timestamp::parse("2025-01-15").unwrap());
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that the transaction belongs to.
    pub user_id: String,

    /// The amount of money, always zero or more.
    ///
    /// Whether the money came in or went out is given by `transaction_type`.
    pub amount: f64,

    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category_id: Option<CategoryId>,

    /// A human-readable description of the transaction.
    ///
    /// # Examples
    /// - `"Salary - January 2025"`
    /// - `"Keells Super - Colombo 03"`
    pub description: Option<String>,

    /// When the transaction happened. Defaults to the time the builder was created.
    pub date: Timestamp,

    /// How the transaction was paid.
    pub payment_method: Option<String>,

    /// The bank the transaction went through.
    pub bank: Option<String>,

    /// Free-text notes.
    pub notes: Option<String>,

    /// Whether the transaction happens on a regular schedule.
    pub is_recurring: bool,

    /// How often a recurring transaction happens.
    pub recurring_frequency: Option<Frequency>,
}

impl TransactionBuilder {
    /// Set the category ID for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the date of the transaction.
    pub fn date(mut self, date: Timestamp) -> Self {
        self.date = date;
        self
    }

    /// Set the payment method for the transaction.
    pub fn payment_method(mut self, payment_method: Option<String>) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Set the bank for the transaction.
    pub fn bank(mut self, bank: Option<String>) -> Self {
        self.bank = bank;
        self
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Mark the transaction as recurring with an optional frequency.
    pub fn recurring(mut self, is_recurring: bool, frequency: Option<Frequency>) -> Self {
        self.is_recurring = is_recurring;
        self.recurring_frequency = frequency;
        self
    }
}

/// The changes to make to an existing [Transaction].
///
/// Fields that must always have a value are `Option`s where `None` means no
/// change. Fields that may be removed are [Patch]es.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub category_id: Patch<CategoryId>,
    pub amount: Option<f64>,
    pub transaction_type: Option<TransactionType>,
    pub description: Patch<String>,
    pub date: Option<Timestamp>,
    pub payment_method: Patch<String>,
    pub bank: Patch<String>,
    pub notes: Patch<String>,
    pub is_recurring: Option<bool>,
    pub recurring_frequency: Patch<Frequency>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Selects every transaction column plus the category name, in the order
/// expected by [map_transaction_row].
pub(crate) const SELECT_TRANSACTION: &str = "SELECT \"transaction\".id, \"transaction\".user_id, \
    \"transaction\".category_id, category.name, \"transaction\".amount, \"transaction\".type, \
    \"transaction\".description, \"transaction\".date, \"transaction\".payment_method, \
    \"transaction\".bank, \"transaction\".notes, \"transaction\".is_recurring, \
    \"transaction\".recurring_frequency \
    FROM \"transaction\" LEFT JOIN category ON \"transaction\".category_id = category.id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .execute(
            "INSERT INTO \"transaction\" (user_id, category_id, amount, type, description, date, \
            payment_method, bank, notes, is_recurring, recurring_frequency) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            (
                &builder.user_id,
                builder.category_id,
                builder.amount,
                builder.transaction_type,
                &builder.description,
                builder.date,
                &builder.payment_method,
                &builder.bank,
                &builder.notes,
                builder.is_recurring,
                builder.recurring_frequency,
            ),
        )
        .map_err(|error| map_category_error(error, builder.category_id))?;

    get_transaction(connection.last_insert_rowid(), connection)
}

/// Retrieve a transaction and its category by the transaction's `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE \"transaction\".id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Apply `changes` to the transaction `id` and return the updated transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::InvalidCategory] if the new category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category_id = match changes.category_id {
        Patch::Set(category_id) => Some(category_id),
        _ => None,
    };

    let mut query = UpdateQuery::new("\"transaction\"");
    query.set_patch("category_id", changes.category_id);
    query.set_some("amount", changes.amount);
    query.set_some("type", changes.transaction_type);
    query.set_patch("description", changes.description);
    query.set_some("date", changes.date);
    query.set_patch("payment_method", changes.payment_method);
    query.set_patch("bank", changes.bank);
    query.set_patch("notes", changes.notes);
    query.set_some("is_recurring", changes.is_recurring);
    query.set_patch("recurring_frequency", changes.recurring_frequency);

    if !query.is_empty() {
        let rows_affected = query
            .execute(id, connection)
            .map_err(|error| map_category_error(error, category_id))?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction);
        }
    }

    get_transaction(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                category_id INTEGER,
                amount REAL NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL,
                description TEXT,
                date TEXT NOT NULL,
                payment_method TEXT,
                bank TEXT,
                notes TEXT,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                recurring_frequency TEXT,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Listing filters by user and sorts by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row from [SELECT_TRANSACTION] to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let category_id: Option<CategoryId> = row.get(2)?;
    let category_name: Option<String> = row.get(3)?;
    let category = category_id
        .zip(category_name)
        .map(|(id, name)| Category {
            id,
            name: CategoryName::new_unchecked(&name),
        });

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id,
        category,
        amount: row.get(4)?,
        transaction_type: row.get(5)?,
        description: row.get(6)?,
        date: row.get(7)?,
        payment_method: row.get(8)?,
        bank: row.get(9)?,
        notes: row.get(10)?,
        is_recurring: row.get(11)?,
        recurring_frequency: row.get(12)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
