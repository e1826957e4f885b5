//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the tutor web service
    Serve(ServeArgs),

    /// Report whether a .env file was loaded and the API key is set
    CheckEnv,
}

/// Flags for `serve`. Each one overrides its environment variable.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory with the static landing page
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Answer with the offline simulated model instead of calling OpenAI
    #[arg(long, env = "SINGULARITY_SIMULATE")]
    pub simulate: bool,

    /// Allowed CORS origin (repeatable)
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,
}
