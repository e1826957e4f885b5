//! HTTP handlers, grouped by endpoint family.
//!
//! Handlers only translate between HTTP and the orchestrator; every rule
//! about conversation state lives in `singularity-core`.

pub mod chat;
pub mod history;
pub mod system;
pub mod vision;
