//! Config command: print the effective configuration

use clap::Parser;

use super::super::output::{to_json, write_output};
use super::super::parser::OutputFormat;
use crate::config::Config;

/// Show the effective configuration
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Output format (human prints TOML)
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Run the config command
pub fn run(args: ConfigArgs, config: &Config) -> Result<(), String> {
    let rendered = match args.format {
        OutputFormat::Human => config.to_toml().map_err(|e| e.to_string())?,
        OutputFormat::Json => to_json(config)?,
    };
    write_output(&rendered, None)
}
