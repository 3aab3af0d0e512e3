//! texanno - annotation export, diff and scoring CLI
//!
//! # Usage
//!
//! ```bash
//! # IOB tags of an annotator's window
//! texanno export -t paper.tex -a ana.json
//!
//! # Annotations the annotators disagree on
//! texanno diff -t paper.tex -a ana.json -a ben.json --tag definition --tag theorem
//!
//! # Score a system against a reference
//! texanno score -t paper.tex --system sys.json --reference gold.json --format json
//! ```

use std::process::ExitCode;

use clap::Parser;

use texanno::cli::output::format_error;
use texanno::cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .target(env_logger::Target::Stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error("texanno", &e));
            ExitCode::FAILURE
        }
    }
}
