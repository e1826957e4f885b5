//! Prompt and continuation handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::debug;

use crate::dto::{ContinueResponse, PromptRequest, PromptResponse};
use crate::error::HttpError;
use crate::state::AppState;

/// Send a new top-level prompt.
/// POST /prompt
pub async fn prompt(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<PromptResponse>, HttpError> {
    let Json(req) = payload.map_err(|e| HttpError::BadRequest(e.body_text()))?;
    let outcome = state.orchestrator.handle_prompt(&req.prompt).await?;
    Ok(Json(outcome.into()))
}

/// Continue the last reply.
/// GET /continue
///
/// A refused continuation is a normal 200 response carrying `{error}`.
pub async fn continue_reply(
    State(state): State<AppState>,
) -> Result<Json<ContinueResponse>, HttpError> {
    match state.orchestrator.handle_continue().await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(err) if err.is_soft() => {
            debug!(reason = %err, "Continuation refused");
            Ok(Json(ContinueResponse::Refused {
                error: err.to_string(),
            }))
        }
        Err(err) => Err(err.into()),
    }
}
