//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

use crate::error_response;

/// The number of bytes of a request or response body that are logged at the
/// `info` level. Longer bodies are truncated, and logged in full at `debug`.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged in full at the `debug` level. Multipart bodies
/// (statement uploads) are never read, only their headers are logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request = if is_multipart(&request) {
        tracing::info!("Received request: {request:#?}\nbody: <multipart form>");
        request
    } else {
        let (headers, body) = request.into_parts();
        let body = match read_body(body).await {
            Ok(body) => body,
            Err(error) => {
                tracing::error!("Could not read request body: {error}");
                return error_response(StatusCode::BAD_REQUEST, "Could not read request body");
            }
        };
        log_request(&headers, &String::from_utf8_lossy(&body));

        Request::from_parts(headers, Body::from(body))
    };

    let response = next.run(request).await;

    let (headers, body) = response.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };
    log_response(&headers, &String::from_utf8_lossy(&body));

    Response::from_parts(headers, Body::from(body))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("multipart/form-data"))
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

/// The first [LOG_BODY_LENGTH_LIMIT] bytes of `body`, cut back to a character
/// boundary, or `None` if the body fits.
fn truncate(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let end = (0..=LOG_BODY_LENGTH_LIMIT)
        .rev()
        .find(|&index| body.is_char_boundary(index))
        .unwrap_or(0);

    Some(&body[..end])
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(preview) => {
            tracing::info!("Received request: {headers:#?}\nbody: {preview}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {headers:#?}\nbody: {body:?}"),
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(preview) => {
            tracing::info!("Sending response: {headers:#?}\nbody: {preview}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {headers:#?}\nbody: {body:?}"),
    }
}
