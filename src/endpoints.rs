//! The API endpoints URIs.

/// The route to list, create, update and delete bills.
pub const BILLS: &str = "/bills";
/// The route to list, create, update and delete transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/categories";
/// The route to upload bank statements.
pub const UPLOAD: &str = "/upload";
/// The route to list the banks that statements can be uploaded for.
pub const UPLOAD_BANKS: &str = "/upload/banks";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::BILLS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::UPLOAD);
        assert_endpoint_is_valid_uri(endpoints::UPLOAD_BANKS);
    }
}
