//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No HTTP client or image library types in any signature
//! - Failures are typed; adapters map their internal errors at the boundary
//! - Ports are stateless from the caller's point of view

pub mod image_compositor;
pub mod model_gateway;

pub use image_compositor::ImageCompositorPort;
pub use model_gateway::{
    Completion, CompletionKind, CompletionOptions, GatewayError, ModelGateway,
    TextCompletionRequest, VisionCompletionRequest, render_gateway_failure,
};

#[cfg(test)]
pub use model_gateway::MockModelGateway;
