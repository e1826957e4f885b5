//! Serve command handler.

use anyhow::Result;
use tracing::info;

use crate::commands::ServeArgs;
use crate::config::EnvConfig;

/// Execute the serve command.
///
/// Resolves configuration from the environment and `args`, then runs the
/// web server until it fails or the process is stopped.
pub async fn execute(env: EnvConfig, args: &ServeArgs) -> Result<()> {
    let config = env.into_server_config(args)?;
    info!(
        port = config.port,
        simulate = args.simulate,
        static_dir = ?config.static_dir,
        "Starting singularity"
    );
    singularity_axum::start_server(config).await
}
