//! Service description handler.

use axum::Json;

use crate::dto::ServiceInfoDto;

/// GET / (API-only mode)
pub async fn service_info() -> Json<ServiceInfoDto> {
    Json(ServiceInfoDto::current())
}
