//! Database query helpers for listing a user's transactions.

use rusqlite::{Connection, ToSql, params_from_iter};

use crate::{Error, timestamp::Timestamp};

use super::core::{SELECT_TRANSACTION, Transaction, TransactionType, map_transaction_row};

/// An inclusive range of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Which of a user's transactions to list.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// The user whose transactions to list.
    pub user_id: String,
    /// Only list transactions dated inside this range.
    pub date_range: Option<DateRange>,
    /// Only list transactions of this type.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    /// A filter that matches every transaction of `user_id`.
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            date_range: None,
            transaction_type: None,
        }
    }
}

/// Get the transactions matching `filter`, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn list_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions = vec!["\"transaction\".user_id = ?"];
    let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(filter.user_id.clone())];

    if let Some(range) = filter.date_range {
        conditions.push("\"transaction\".date BETWEEN ? AND ?");
        values.push(Box::new(range.start));
        values.push(Box::new(range.end));
    }

    if let Some(transaction_type) = filter.transaction_type {
        conditions.push("\"transaction\".type = ?");
        values.push(Box::new(transaction_type));
    }

    // Sort by date, and then ID to keep transaction order stable after updates
    let query = format!(
        "{SELECT_TRANSACTION} WHERE {} \
        ORDER BY \"transaction\".date DESC, \"transaction\".id DESC",
        conditions.join(" AND ")
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(values.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Timestamp,
        test_utils::must_create_test_connection,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{DateRange, TransactionFilter, list_transactions};

    fn insert(
        user_id: &str,
        date: &str,
        transaction_type: TransactionType,
        connection: &Connection,
    ) -> Transaction {
        create_transaction(
            Transaction::build(user_id, 10.0, transaction_type)
                .date(Timestamp::parse(date).unwrap()),
            connection,
        )
        .expect("Could not create transaction")
    }

    #[test]
    fn lists_newest_first() {
        let conn = must_create_test_connection();
        let old = insert("u1", "2024-01-01", TransactionType::Expense, &conn);
        let new = insert("u1", "2024-03-01", TransactionType::Expense, &conn);
        let middle = insert("u1", "2024-02-01", TransactionType::Income, &conn);

        let got = list_transactions(&TransactionFilter::for_user("u1"), &conn).unwrap();

        assert_eq!(got, [new, middle, old]);
    }

    #[test]
    fn same_date_orders_by_id_descending() {
        let conn = must_create_test_connection();
        let first = insert("u1", "2024-01-01", TransactionType::Expense, &conn);
        let second = insert("u1", "2024-01-01", TransactionType::Expense, &conn);

        let got = list_transactions(&TransactionFilter::for_user("u1"), &conn).unwrap();

        assert_eq!(got, [second, first]);
    }

    #[test]
    fn only_lists_transactions_of_user() {
        let conn = must_create_test_connection();
        let mine = insert("u1", "2024-01-01", TransactionType::Expense, &conn);
        insert("u2", "2024-01-01", TransactionType::Expense, &conn);

        let got = list_transactions(&TransactionFilter::for_user("u1"), &conn).unwrap();

        assert_eq!(got, [mine]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let conn = must_create_test_connection();
        insert("u1", "2024-01-31T23:00:00Z", TransactionType::Expense, &conn);
        let start = insert("u1", "2024-02-01", TransactionType::Expense, &conn);
        let end = insert("u1", "2024-02-29T18:30:00Z", TransactionType::Expense, &conn);
        insert("u1", "2024-03-01", TransactionType::Expense, &conn);

        let filter = TransactionFilter {
            date_range: Some(DateRange {
                start: Timestamp::parse("2024-02-01").unwrap(),
                end: Timestamp::parse_end_of_range("2024-02-29").unwrap(),
            }),
            ..TransactionFilter::for_user("u1")
        };
        let got = list_transactions(&filter, &conn).unwrap();

        assert_eq!(got, [end, start]);
    }

    #[test]
    fn filters_by_type() {
        let conn = must_create_test_connection();
        insert("u1", "2024-01-01", TransactionType::Expense, &conn);
        let income = insert("u1", "2024-01-02", TransactionType::Income, &conn);

        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Income),
            ..TransactionFilter::for_user("u1")
        };
        let got = list_transactions(&filter, &conn).unwrap();

        assert_eq!(got, [income]);
    }
}
