//! Read-only conversation view.

use axum::Json;
use axum::extract::State;

use crate::dto::HistoryResponse;
use crate::state::AppState;

/// Snapshot of the shared conversation.
/// GET /history
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(state.orchestrator.conversation().await.into())
}
