//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::tagging::SpanBoundary;

/// Annotation export, diff and scoring for LaTeX sources
#[derive(Parser, Debug)]
#[command(name = "texanno")]
#[command(
    author,
    version,
    about = "Annotation export, diff and scoring for LaTeX sources",
    long_about = r#"
texanno - turn span annotations into IOB tag sequences and compare annotators

INPUTS:
  Annotation files are JSON: either an array of annotation objects
  ({"id","start","end","tag","text",...}) or an export object with an
  "annotations" field. Offsets are character offsets into the text file.

EXAMPLES:
  texanno export -t paper.tex -a ana.json --format json
  texanno diff -t paper.tex -a ana.json -a ben.json --tag definition
  texanno score -t paper.tex --system ana.json --reference ben.json
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter implied by the verbosity flags.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export annotations as character or token IOB tags
    #[command(visible_alias = "x")]
    Export(super::commands::ExportArgs),

    /// Show annotations not shared by all given sets
    #[command(visible_alias = "d")]
    Diff(super::commands::DiffArgs),

    /// Score a system annotation set against a reference
    #[command(visible_alias = "s")]
    Score(super::commands::ScoreArgs),

    /// Show the effective configuration
    Config(super::commands::ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Span end convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoundaryArg {
    /// `end` is exclusive
    HalfOpen,
    /// `end` is the last covered character
    Inclusive,
}

impl From<BoundaryArg> for SpanBoundary {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::HalfOpen => SpanBoundary::HalfOpen,
            BoundaryArg::Inclusive => SpanBoundary::Inclusive,
        }
    }
}

/// How to segment text before tagging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TokensArg {
    /// One position per character
    #[default]
    Chars,
    /// Unicode word boundaries
    Words,
    /// HuggingFace tokenizer from the configured `tokenizer` path
    Hf,
}
