//! CLI modules for the texanno binary.
//!
//! Kept in the library so commands can be tested without spawning the binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands, OutputFormat};

use clap::CommandFactory;
use clap_complete::generate;

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = utils::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Export(args) => commands::export::run(args, &config),
        Commands::Diff(args) => commands::diff::run(args, &config),
        Commands::Score(args) => commands::score::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "texanno", &mut std::io::stdout());
            Ok(())
        }
    }
}
