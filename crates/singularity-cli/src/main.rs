//! CLI entry point.

use clap::Parser;

use singularity_cli::{Cli, Commands, EnvConfig, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from the file reaches the subscriber
    let dotenv_path = dotenvy::dotenv().ok();

    let cli = Cli::parse();
    singularity_cli::init_tracing(cli.verbose);
    if let Some(ref path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    match cli.into_command() {
        Commands::CheckEnv => {
            handlers::check_env::execute(dotenv_path.as_deref());
            Ok(())
        }
        Commands::Serve(args) => handlers::serve::execute(EnvConfig::from_env()?, &args).await,
    }
}
