//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use crate::{
    AppState,
    bill::{create_bill_endpoint, delete_bill_endpoint, list_bills_endpoint, update_bill_endpoint},
    category::{create_category_endpoint, list_categories_endpoint},
    endpoints, error_response,
    statement::{list_banks_endpoint, upload_statement_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::BILLS,
            get(list_bills_endpoint)
                .post(create_bill_endpoint)
                .put(update_bill_endpoint)
                .delete(delete_bill_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint)
                .post(create_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::UPLOAD, post(upload_statement_endpoint))
        .route(endpoints::UPLOAD_BANKS, get(list_banks_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, test_utils::must_create_test_connection};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(must_create_test_connection())
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server")
    }

    #[tokio::test]
    async fn bill_lifecycle() {
        let server = get_test_server();

        let created = server
            .post(endpoints::BILLS)
            .json(&json!({
                "userId": "u1",
                "name": "Rent",
                "amount": 1200,
                "dueDate": "2024-02-01",
                "frequency": "monthly"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["id"].clone();

        server
            .put(endpoints::BILLS)
            .json(&json!({ "id": id, "amount": "1250" }))
            .await
            .assert_status_ok();

        let bills = server
            .get(endpoints::BILLS)
            .add_query_param("userId", "u1")
            .await
            .json::<Value>();
        assert_eq!(bills[0]["amount"], 1250.0);

        server
            .delete(endpoints::BILLS)
            .add_query_param("id", &id)
            .await
            .assert_json(&json!({ "success": true }));

        let bills = server
            .get(endpoints::BILLS)
            .add_query_param("userId", "u1")
            .await
            .json::<Value>();
        assert_eq!(bills, json!([]));
    }

    #[tokio::test]
    async fn deleting_missing_bill_is_internal_error() {
        let server = get_test_server();

        let response = server
            .delete(endpoints::BILLS)
            .add_query_param("id", "99")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Failed to delete bill" }));
    }

    #[tokio::test]
    async fn malformed_json_is_internal_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .content_type("application/json")
            .bytes("{not json".into())
            .expect_failure()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Failed to create transaction" }));
    }

    #[tokio::test]
    async fn create_transaction_with_string_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "userId": "u1", "amount": "150.50", "type": "expense" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["amount"], 150.5);
        assert_eq!(body["isRecurring"], false);
    }

    #[tokio::test]
    async fn lists_filtered_transactions_newest_first() {
        let server = get_test_server();
        for (date, transaction_type) in [
            ("2024-01-03", "expense"),
            ("2024-01-10", "income"),
            ("2024-01-20", "expense"),
            ("2024-02-05", "expense"),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .json(&json!({
                    "userId": "u1",
                    "amount": 10,
                    "type": transaction_type,
                    "date": date,
                    "description": date
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let filtered = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("userId", "u1")
            .add_query_param("startDate", "2024-01-01")
            .add_query_param("endDate", "2024-01-31")
            .add_query_param("type", "expense")
            .await
            .json::<Value>();
        let descriptions = filtered
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["description"].clone())
            .collect::<Vec<_>>();
        assert_eq!(descriptions, [json!("2024-01-20"), json!("2024-01-03")]);

        let only_start = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("userId", "u1")
            .add_query_param("startDate", "2024-02-01")
            .await
            .json::<Value>();
        assert_eq!(only_start.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn categories_can_be_attached_to_bills() {
        let server = get_test_server();

        let category = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "Utilities" }))
            .await
            .json::<Value>();

        let bill = server
            .post(endpoints::BILLS)
            .json(&json!({
                "userId": "u1",
                "name": "Power",
                "amount": 80,
                "dueDate": "2024-02-01",
                "frequency": "monthly",
                "categoryId": category["id"]
            }))
            .await
            .json::<Value>();

        assert_eq!(bill["category"], category);
    }

    #[tokio::test]
    async fn upload_statement() {
        let server = get_test_server();
        let form = MultipartForm::new()
            .add_part(
                "file",
                Part::bytes("Date,Description,Amount,Balance\n".as_bytes())
                    .file_name("statement.csv")
                    .mime_type("text/csv"),
            )
            .add_text("userId", "u1")
            .add_text("bank", "Commercial Bank");

        let response = server.post(endpoints::UPLOAD).multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({
            "success": true,
            "message": "File uploaded successfully. Processing bank statements...",
            "transactions": []
        }));
    }

    #[tokio::test]
    async fn upload_statement_for_any_named_bank() {
        let server = get_test_server();
        let form = MultipartForm::new()
            .add_part(
                "file",
                Part::bytes("Date,Narration,Debit,Credit\n".as_bytes())
                    .file_name("statement.csv")
                    .mime_type("text/csv"),
            )
            .add_text("userId", "u1")
            .add_text("bank", "Bank of Ceylon");

        let response = server.post(endpoints::UPLOAD).multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({
            "success": true,
            "message": "File uploaded successfully. Processing bank statements...",
            "transactions": []
        }));
    }

    #[tokio::test]
    async fn upload_without_multipart_body_is_internal_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::UPLOAD)
            .json(&json!({ "userId": "u1" }))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Failed to upload file" }));
    }

    #[tokio::test]
    async fn lists_banks() {
        let server = get_test_server();

        let banks = server.get(endpoints::UPLOAD_BANKS).await.json::<Value>();

        assert_eq!(banks[0]["name"], "Commercial Bank");
        assert_eq!(banks[1]["name"], "Sampath Bank");
        assert_eq!(banks[1]["dateColumn"], "Transaction Date");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/budgets").expect_failure().await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Not found" }));
    }
}
