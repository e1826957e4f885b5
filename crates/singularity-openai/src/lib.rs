#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// OpenAiGateway is used through the ModelGateway port, not its generic structure
#![allow(private_interfaces, private_bounds)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::OpenAiGateway;

// Configuration
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenAiClientConfig};

// Errors raised while building the client
pub use error::{OpenAiError, OpenAiResult};
