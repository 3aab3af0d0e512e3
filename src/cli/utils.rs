//! Utility functions for CLI commands

use log::warn;
use serde::Deserialize;

use super::parser::TokensArg;
use crate::config::Config;
use crate::offset::char_len;
use crate::tokenize::{Tokenizer, WordTokenizer};
use texanno_core::Annotation;

/// Configuration from `path`, or defaults plus environment overrides
pub fn load_config(path: Option<&str>) -> Result<Config, String> {
    match path {
        Some(p) => Config::from_file(p),
        None => Config::from_env(),
    }
    .map_err(|e| e.to_string())
}

/// Read input from file
pub fn read_input_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read file {}: {}", path, e))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationFile {
    List(Vec<Annotation>),
    Wrapped { annotations: Vec<Annotation> },
}

/// Parse annotations from JSON: a bare array, or any object with an
/// `annotations` array (such as a previous export)
pub fn parse_annotations(json: &str) -> Result<Vec<Annotation>, String> {
    match serde_json::from_str::<AnnotationFile>(json) {
        Ok(AnnotationFile::List(list)) => Ok(list),
        Ok(AnnotationFile::Wrapped { annotations }) => Ok(annotations),
        Err(e) => Err(format!("Failed to parse annotation JSON: {}", e)),
    }
}

/// Read and parse an annotation file
pub fn read_annotations(path: &str) -> Result<Vec<Annotation>, String> {
    parse_annotations(&read_input_file(path)?).map_err(|e| format!("{}: {}", path, e))
}

/// Log every validation issue of `annotations` against `text`; returns the
/// number of issues. Out-of-range spans are still exported (clipped).
pub fn warn_invalid(annotations: &[Annotation], text: &str, source: &str) -> usize {
    let len = char_len(text);
    let mut count = 0;
    for anno in annotations {
        for issue in anno.validate(len) {
            warn!("{}: annotation '{}': {}", source, anno.id, issue);
            count += 1;
        }
    }
    count
}

/// Build the tokenizer selected on the command line
pub fn build_tokenizer(
    tokens: TokensArg,
    config: &Config,
) -> Result<Option<Box<dyn Tokenizer>>, String> {
    match tokens {
        TokensArg::Chars => Ok(None),
        TokensArg::Words => Ok(Some(Box::new(WordTokenizer))),
        TokensArg::Hf => hf_tokenizer(config),
    }
}

#[cfg(feature = "hf-tokenizer")]
fn hf_tokenizer(config: &Config) -> Result<Option<Box<dyn Tokenizer>>, String> {
    let path = config
        .tokenizer
        .as_ref()
        .ok_or("--tokens hf needs `tokenizer` in the config or TEXANNO_TOKENIZER")?;
    let tokenizer = crate::tokenize::HfTokenizer::from_file(path).map_err(|e| e.to_string())?;
    Ok(Some(Box::new(tokenizer)))
}

#[cfg(not(feature = "hf-tokenizer"))]
fn hf_tokenizer(_config: &Config) -> Result<Option<Box<dyn Tokenizer>>, String> {
    Err("--tokens hf requires the `hf-tokenizer` feature".to_string())
}
