//! Diff command: annotations not shared by every set

use clap::Parser;

use super::super::output::{format_diff, to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{read_annotations, read_input_file, warn_invalid};
use crate::config::Config;
use crate::eval::diff::diff;

/// Show annotations not shared by all given sets
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Document text file
    #[arg(short, long, value_name = "PATH")]
    pub text: String,

    /// Annotation JSON files (repeat for each set, at least two)
    #[arg(short, long = "annotations", value_name = "PATH", num_args = 1, required = true)]
    pub annotations: Vec<String>,

    /// Tags of interest (repeatable; defaults to configured tags)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// First character of the window (inclusive)
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Last character of the window (inclusive; defaults to the text end)
    #[arg(long)]
    pub end: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Run the diff command
pub fn run(args: DiffArgs, config: &Config) -> Result<(), String> {
    if args.annotations.len() < 2 {
        return Err("diff needs at least two annotation files".to_string());
    }
    let text = read_input_file(&args.text)?;
    let sets = args
        .annotations
        .iter()
        .map(|p| read_annotations(p))
        .collect::<Result<Vec<_>, _>>()?;
    for (set, path) in sets.iter().zip(&args.annotations) {
        warn_invalid(set, &text, path);
    }
    let tags = if args.tags.is_empty() {
        &config.tags
    } else {
        &args.tags
    };

    let unique = diff(&text, &sets, tags, args.start, args.end.unwrap_or(usize::MAX));

    let rendered = match args.format {
        OutputFormat::Human => format_diff(&args.annotations, &unique, config.preview_width),
        OutputFormat::Json => to_json(&unique)?,
    };
    write_output(&rendered, args.output.as_deref())
}
