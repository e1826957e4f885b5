//! Image analysis handler.
//!
//! Accepts `multipart/form-data` with an optional `prompt` text field and
//! file fields named `file0`, `file1`, and so on. Unknown fields are
//! ignored. Empty file fields (an unused browser file input) are skipped.

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Field, Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use singularity_core::ImageUpload;
use tracing::debug;

use crate::dto::AnalyzeImageResponse;
use crate::error::HttpError;
use crate::state::AppState;

/// Analyze up to four uploaded images.
/// POST /analyze-image/
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeImageResponse>, HttpError> {
    let mut multipart = multipart.map_err(|e| HttpError::BadRequest(e.body_text()))?;

    let mut prompt = String::new();
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "prompt" {
            prompt = field.text().await.map_err(map_multipart_error)?;
        } else if is_file_field(&name) {
            if let Some(upload) = read_upload(field).await? {
                images.push(upload);
            }
        } else {
            debug!(field = %name, "Ignoring unknown multipart field");
        }
    }

    let outcome = state
        .orchestrator
        .handle_analyze_image(&prompt, images)
        .await?;
    Ok(Json(outcome.into()))
}

async fn read_upload(field: Field<'_>) -> Result<Option<ImageUpload>, HttpError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(map_multipart_error)?;

    if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
        return Ok(None);
    }
    Ok(Some(ImageUpload::new(file_name, content_type, bytes.to_vec())))
}

/// `file` followed by one or more digits.
fn is_file_field(name: &str) -> bool {
    name.strip_prefix("file")
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

fn map_multipart_error(err: MultipartError) -> HttpError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::PayloadTooLarge(err.body_text())
    } else {
        HttpError::BadRequest(err.body_text())
    }
}
