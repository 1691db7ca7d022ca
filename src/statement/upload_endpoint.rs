//! Defines the endpoints for uploading a bank statement and listing the
//! supported banks.

use axum::{
    Json,
    extract::{
        Multipart,
        multipart::{Field, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    payload::non_blank,
    statement::{BankLayout, find_bank, supported_banks},
};

/// A statement file sent by a client.
#[derive(Debug)]
struct StatementFile {
    file_name: Option<String>,
    size: usize,
}

/// The fields of a statement upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<StatementFile>,
    user_id: Option<String>,
    bank: Option<String>,
}

const UPLOAD_FAILED: &str = "Failed to upload file";
const UPLOAD_ACCEPTED: &str = "File uploaded successfully. Processing bank statements...";

/// A route handler for uploading a bank statement.
///
/// The form must contain the fields `file`, `userId` and `bank`. Any bank name
/// is accepted, including banks without a known statement layout. Statements
/// are not parsed yet, so a valid upload always responds with an empty list of
/// transactions.
pub async fn upload_statement_endpoint(
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => read_upload_form(multipart).await,
        Err(rejection) => Err(Error::MultipartError(rejection.body_text())),
    };

    let (file, user_id, bank) = match form.and_then(validate_form) {
        Ok(upload) => upload,
        Err(error) => return error.into_json_response(UPLOAD_FAILED),
    };

    if find_bank(&bank).is_none() {
        tracing::warn!("No statement layout for bank '{bank}', accepting upload anyway");
    }

    tracing::info!(
        "Received {bank} statement '{}' ({} bytes) for user {user_id}",
        file.file_name.as_deref().unwrap_or("<unnamed>"),
        file.size
    );

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": UPLOAD_ACCEPTED,
            "transactions": [],
        })),
    )
        .into_response()
}

/// A route handler that responds with the supported banks and the column
/// layout of their statements.
pub async fn list_banks_endpoint() -> Json<&'static [BankLayout]> {
    Json(supported_banks())
}

fn validate_form(form: UploadForm) -> Result<(StatementFile, String, String), Error> {
    match (form.file, non_blank(form.user_id), non_blank(form.bank)) {
        (Some(file), Some(user_id), Some(bank)) => Ok((file, user_id, bank)),
        _ => Err(Error::MissingFields),
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Error> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            tracing::debug!("Skipping multipart field without a name");
            continue;
        };

        match name.as_str() {
            "file" => form.file = Some(read_file_field(field).await?),
            "userId" => form.user_id = Some(read_text_field(field).await?),
            "bank" => form.bank = Some(read_text_field(field).await?),
            other => tracing::debug!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    Ok(form)
}

async fn read_file_field(field: Field<'_>) -> Result<StatementFile, Error> {
    let file_name = field.file_name().map(str::to_owned);
    let data = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError(error.body_text())
    })?;

    Ok(StatementFile {
        file_name,
        size: data.len(),
    })
}

async fn read_text_field(field: Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))
}
