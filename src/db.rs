//! Database setup shared by all of the domain models.

use rusqlite::{
    Connection, ToSql, Transaction as SqlTransaction, TransactionBehavior, params_from_iter,
};

use crate::{
    Error, bill::create_bill_table, category::create_category_table,
    database_id::DatabaseId, payload::Patch, transaction::create_transaction_table,
};

/// Create the tables for all of the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection` before the tables
/// are created, since SQLite ignores the pragma inside a transaction.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_bill_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

type RowsAffected = usize;

/// Builds an `UPDATE` statement that only touches the columns that were changed.
pub(crate) struct UpdateQuery {
    table: &'static str,
    assignments: Vec<String>,
    values: Vec<Box<dyn ToSql>>,
}

impl UpdateQuery {
    /// Start an update on `table`, which must already be quoted if needed.
    pub(crate) fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Set `column` to `value`.
    pub(crate) fn set(&mut self, column: &str, value: impl ToSql + 'static) {
        self.assignments.push(format!("{column} = ?"));
        self.values.push(Box::new(value));
    }

    /// Set `column` to `value` if there is one.
    pub(crate) fn set_some<T: ToSql + 'static>(&mut self, column: &str, value: Option<T>) {
        if let Some(value) = value {
            self.set(column, value);
        }
    }

    /// Set or clear `column` according to `patch`.
    pub(crate) fn set_patch<T: ToSql + 'static>(&mut self, column: &str, patch: Patch<T>) {
        match patch {
            Patch::Unchanged => {}
            Patch::Clear => self.set(column, Option::<T>::None),
            Patch::Set(value) => self.set(column, value),
        }
    }

    /// Whether no columns have been changed.
    pub(crate) fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Run the update for the row with the given `id`.
    ///
    /// An update with no changes does not touch the database and reports zero rows.
    pub(crate) fn execute(
        mut self,
        id: DatabaseId,
        connection: &Connection,
    ) -> Result<RowsAffected, rusqlite::Error> {
        if self.is_empty() {
            return Ok(0);
        }

        let query = format!(
            "UPDATE {} SET {} WHERE id = ?",
            self.table,
            self.assignments.join(", ")
        );
        self.values.push(Box::new(id));

        connection.execute(&query, params_from_iter(self.values.iter()))
    }
}

#[cfg(test)]
mod update_query_tests {
    use rusqlite::Connection;

    use crate::payload::Patch;

    use super::UpdateQuery;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE item (id INTEGER PRIMARY KEY, name TEXT NOT NULL, notes TEXT);
                INSERT INTO item (name, notes) VALUES ('foo', 'bar');",
            )
            .unwrap();
        connection
    }

    fn get_item(connection: &Connection) -> (String, Option<String>) {
        connection
            .query_row("SELECT name, notes FROM item WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap()
    }

    #[test]
    fn updates_only_changed_columns() {
        let connection = get_test_connection();
        let mut query = UpdateQuery::new("item");
        query.set_some("name", Some("baz".to_owned()));
        query.set_patch("notes", Patch::<String>::Unchanged);

        let rows_affected = query.execute(1, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_item(&connection), ("baz".to_owned(), Some("bar".to_owned())));
    }

    #[test]
    fn clear_sets_null() {
        let connection = get_test_connection();
        let mut query = UpdateQuery::new("item");
        query.set_patch("notes", Patch::<String>::Clear);

        query.execute(1, &connection).unwrap();

        assert_eq!(get_item(&connection), ("foo".to_owned(), None));
    }

    #[test]
    fn missing_row_affects_nothing() {
        let connection = get_test_connection();
        let mut query = UpdateQuery::new("item");
        query.set("name", "baz".to_owned());

        assert_eq!(query.execute(42, &connection), Ok(0));
    }
}
