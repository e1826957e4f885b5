//! Data Transfer Objects (DTOs) for the HTTP API contract.
//!
//! These types define the wire shapes with explicit serialization control,
//! decoupled from the core outcome types.

pub mod conversation;
pub mod system;

pub use conversation::{
    AnalyzeImageResponse, ContinueResponse, HistoryMessageDto, HistoryResponse, PromptRequest,
    PromptResponse,
};
pub use system::ServiceInfoDto;
