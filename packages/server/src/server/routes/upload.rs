//! Upload form and handler.

use axum::{
    body::Bytes,
    extract::{Extension, Multipart},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use hostname_extraction::process_file;
use serde::Serialize;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::staging::{StagedUpload, FALLBACK_FILENAME};

const UPLOAD_FORM: &str = r#"<!doctype html>
<html>
  <head><title>Scanner hostname extraction</title></head>
  <body>
    <h1>Upload a scanner CSV export</h1>
    <form action="/upload" method="post" enctype="multipart/form-data">
      <p><input type="file" name="file" accept=".csv,text/csv" required></p>
      <p><label><input type="checkbox" name="download" value="true" checked> Download the result file</label></p>
      <p><button type="submit">Upload</button></p>
    </form>
  </body>
</html>
"#;

/// Response body for store-only uploads.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
    pub extracted: usize,
    pub inserted: usize,
    pub skipped: usize,
}

pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

/// Checkbox semantics: present means checked unless explicitly falsy.
fn is_checked(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "off" | "0" | "no"
    )
}

struct UploadForm {
    filename: String,
    contents: Bytes,
    download: bool,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut download = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or(FALLBACK_FILENAME).to_string();
                let contents = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Multipart(e.to_string()))?;
                file = Some((filename, contents));
            }
            Some("download") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Multipart(e.to_string()))?;
                download = is_checked(&value);
            }
            _ => {}
        }
    }

    match file {
        Some((filename, contents)) if !contents.is_empty() => Ok(UploadForm {
            filename,
            contents,
            download,
        }),
        _ => Err(ApiError::MissingFile),
    }
}

/// Stage, extract, and merge an uploaded scan export.
///
/// With `download` checked the result CSV is returned as an attachment;
/// otherwise a JSON summary of the merge.
pub async fn upload_handler(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;

    // Removed on drop, including on the error returns below
    let staged =
        StagedUpload::write(state.temp_dir.as_deref(), &form.filename, &form.contents).await?;

    let processed = process_file(
        staged.path(),
        staged.filename(),
        None,
        state.store.as_ref(),
        &state.extraction,
    )
    .await?;

    tracing::info!(
        filename = staged.filename(),
        extracted = processed.prepared.rows.len(),
        inserted = processed.merge.inserted,
        download = form.download,
        "Upload processed"
    );

    if !form.download {
        let body = UploadResponse {
            status: "stored".to_string(),
            filename: staged.filename().to_string(),
            extracted: processed.prepared.rows.len(),
            inserted: processed.merge.inserted,
            skipped: processed.merge.skipped,
        };
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    let csv = processed.prepared.to_csv()?;
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    let disposition = format!("attachment; filename=output_{}", staged.filename());
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=output.csv")),
    );

    Ok((StatusCode::OK, headers, csv).into_response())
}
