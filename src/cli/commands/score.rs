//! Score command: system annotations against a reference

use clap::Parser;

use super::super::output::{to_json, write_output};
use super::super::parser::{BoundaryArg, OutputFormat, TokensArg};
use super::super::utils::{build_tokenizer, read_annotations, read_input_file, warn_invalid};
use crate::config::Config;
use crate::eval::report::Report;
use crate::export::resolve_window;
use texanno_core::Annotation;

/// Score a system annotation set against a reference
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Document text file
    #[arg(short, long, value_name = "PATH")]
    pub text: String,

    /// System annotation JSON file
    #[arg(short, long, value_name = "PATH")]
    pub system: String,

    /// Reference annotation JSON file
    #[arg(short, long, value_name = "PATH")]
    pub reference: String,

    /// Tags to score (repeatable; defaults to configured tags)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Segmentation of the scored text
    #[arg(long, value_enum, default_value = "chars")]
    pub tokens: TokensArg,

    /// Score the whole document instead of the reference window
    #[arg(long)]
    pub whole_file: bool,

    /// Override the configured span end convention
    #[arg(long, value_enum)]
    pub boundary: Option<BoundaryArg>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Build the report described by `args`.
///
/// Both sides are exported over the reference's window so their
/// segmentations line up.
pub fn build(args: &ScoreArgs, config: &Config) -> Result<Report, String> {
    let text = read_input_file(&args.text)?;
    let system = read_annotations(&args.system)?;
    let reference = read_annotations(&args.reference)?;
    warn_invalid(&system, &text, &args.system);
    warn_invalid(&reference, &text, &args.reference);

    let mut config = config.clone();
    if !args.tags.is_empty() {
        config.tags = args.tags.clone();
    }
    if let Some(boundary) = args.boundary {
        config.boundary = boundary.into();
    }
    config.whole_file |= args.whole_file;

    let (begin, end) = resolve_window(&reference, None, None).map_err(|e| e.to_string())?;
    let exporter = config.exporter();
    let tokenizer = build_tokenizer(args.tokens, &config)?;

    let export = |annotations: &[Annotation]| match &tokenizer {
        Some(tok) => exporter.export_with(annotations, &text, tok.as_ref(), Some(&begin), Some(&end)),
        None => exporter.export(annotations, &text, None, Some(&begin), Some(&end)),
    };
    let sys = export(&system).map_err(|e| e.to_string())?;
    let gold = export(&reference).map_err(|e| e.to_string())?;

    config
        .score_engine()
        .score_and_diff(&sys, &gold, &config.tags)
        .map_err(|e| e.to_string())
}

/// Run the score command
pub fn run(args: ScoreArgs, config: &Config) -> Result<(), String> {
    let report = build(&args, config)?;
    let rendered = match args.format {
        OutputFormat::Human => report.summary(),
        OutputFormat::Json => to_json(&report)?,
    };
    write_output(&rendered, args.output.as_deref())
}
