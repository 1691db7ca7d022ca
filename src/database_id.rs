//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a bill.
pub type BillId = DatabaseId;

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Parse a record ID received as text, e.g. from a query string.
///
/// # Errors
///
/// Returns [crate::Error::InvalidId] if `text` is not an integer.
pub fn parse_id(text: &str) -> Result<DatabaseId, crate::Error> {
    text.trim()
        .parse()
        .map_err(|_| crate::Error::InvalidId(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::parse_id;

    #[test]
    fn parses_integer_with_whitespace() {
        assert_eq!(parse_id(" 42 "), Ok(42));
    }

    #[test]
    fn rejects_non_integer() {
        assert_eq!(parse_id("abc"), Err(Error::InvalidId("abc".to_owned())));
    }
}
