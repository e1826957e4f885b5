//! Domain types for singularity.
//!
//! These types represent the core domain model, independent of
//! any infrastructure concerns (HTTP framework, upstream client, image library).

pub mod chat;
pub mod classifier;
pub mod vision;

pub use chat::{ChatMessage, ContentPart, MessageContent, MessageRole};
pub use classifier::classify_prompt;
pub use vision::{DEFAULT_VISION_PROMPT, ImageUpload, MAX_IMAGES};
