//! Service description DTO.

use serde::{Deserialize, Serialize};

/// Body of `GET /` when no static landing page is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfoDto {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl ServiceInfoDto {
    pub fn current() -> Self {
        Self {
            status: "ok".to_string(),
            service: "singularity".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
