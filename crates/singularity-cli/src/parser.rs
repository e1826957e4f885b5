//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::{Commands, ServeArgs};

/// Command-line interface for the singularity tutor service.
#[derive(Parser, Debug)]
#[command(name = "singularity")]
#[command(about = "AI tutor service relaying prompts and images to a chat-completion model")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// `serve` flags accepted without the subcommand
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to run. No subcommand means `serve` with the top-level flags.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve(self.serve))
    }
}
