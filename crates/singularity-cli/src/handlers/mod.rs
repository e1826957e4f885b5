//! Command handlers.

pub mod check_env;
pub mod serve;
