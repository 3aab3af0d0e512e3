//! Export command: annotations to IOB tags

use clap::Parser;

use super::super::output::{format_export, to_json, write_output};
use super::super::parser::{BoundaryArg, OutputFormat, TokensArg};
use super::super::utils::{build_tokenizer, read_annotations, read_input_file, warn_invalid};
use crate::config::Config;
use crate::export::ExportResult;
use texanno_core::Annotation;

/// Export annotations as character or token IOB tags
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Document text file
    #[arg(short, long, value_name = "PATH")]
    pub text: String,

    /// Annotation JSON file
    #[arg(short, long, value_name = "PATH")]
    pub annotations: String,

    /// Tag the whole document instead of the annotated window
    #[arg(long)]
    pub whole_file: bool,

    /// Override the configured span end convention
    #[arg(long, value_enum)]
    pub boundary: Option<BoundaryArg>,

    /// Tag the begin/end annotation sentinels like other classes
    #[arg(long)]
    pub keep_endpoints: bool,

    /// Segmentation of the tagged text
    #[arg(long, value_enum, default_value = "chars")]
    pub tokens: TokensArg,

    /// Id of the annotation to use as window begin
    #[arg(long, value_name = "ID")]
    pub begin_id: Option<String>,

    /// Id of the annotation to use as window end
    #[arg(long, value_name = "ID")]
    pub end_id: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

fn find_by_id<'a>(annotations: &'a [Annotation], id: Option<&str>) -> Result<Option<&'a Annotation>, String> {
    match id {
        None => Ok(None),
        Some(id) => annotations
            .iter()
            .find(|a| a.id == id)
            .map(Some)
            .ok_or_else(|| format!("no annotation with id '{}'", id)),
    }
}

/// Build the export described by `args`
pub fn build(args: &ExportArgs, config: &Config) -> Result<ExportResult, String> {
    let text = read_input_file(&args.text)?;
    let annotations = read_annotations(&args.annotations)?;
    warn_invalid(&annotations, &text, &args.annotations);

    let mut config = config.clone();
    if let Some(boundary) = args.boundary {
        config.boundary = boundary.into();
    }
    config.ignore_endpoints &= !args.keep_endpoints;
    config.whole_file |= args.whole_file;

    let begin = find_by_id(&annotations, args.begin_id.as_deref())?;
    let end = find_by_id(&annotations, args.end_id.as_deref())?;

    let exporter = config.exporter();
    let result = match build_tokenizer(args.tokens, &config)? {
        Some(tokenizer) => exporter.export_with(&annotations, &text, tokenizer.as_ref(), begin, end),
        None => exporter.export(&annotations, &text, None, begin, end),
    };
    result.map_err(|e| e.to_string())
}

/// Run the export command
pub fn run(args: ExportArgs, config: &Config) -> Result<(), String> {
    let result = build(&args, config)?;
    let rendered = match args.format {
        OutputFormat::Human => format_export(&result),
        OutputFormat::Json => to_json(&result)?,
    };
    write_output(&rendered, args.output.as_deref())
}
