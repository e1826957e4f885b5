#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod compositor;
mod error;

// ============================================================================
// Public API
// ============================================================================

pub use compositor::VerticalCompositor;
pub use error::{CompositionError, CompositionResult};
