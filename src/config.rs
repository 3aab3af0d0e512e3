//! Runtime configuration.
//!
//! Loaded from TOML, then overridden by `TEXANNO_*` environment variables,
//! then validated. Every key is optional:
//!
//! ```toml
//! tags = ["definition", "theorem", "proof", "example", "reference", "name"]
//! boundary = "half_open"      # or "inclusive"
//! ignore_endpoints = true
//! whole_file = false
//! preview_width = 75
//! tokenizer = "models/tokenizer.json"
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::eval::score::{ScoreEngine, DEFAULT_PREVIEW_WIDTH};
use crate::export::AnnotationExporter;
use crate::tagging::{SpanBoundary, SpanIndex};
use crate::{Error, Result};

/// Tags scored and diffed when none are configured.
pub const DEFAULT_TAGS: &[&str] = &["definition", "theorem", "proof", "example", "reference", "name"];

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tags of interest for scoring and diffing, in report order.
    pub tags: Vec<String>,
    /// How annotation ends are read when tagging.
    pub boundary: SpanBoundary,
    /// Leave the window sentinel rows out of tag sequences.
    pub ignore_endpoints: bool,
    /// Tag the whole document instead of the annotated window.
    pub whole_file: bool,
    /// Characters of annotation text shown per diff line.
    pub preview_width: usize,
    /// Path to a HuggingFace `tokenizer.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: default_tags(),
            boundary: SpanBoundary::HalfOpen,
            ignore_endpoints: true,
            whole_file: false,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            tokenizer: None,
        }
    }
}

impl Config {
    /// Load from a TOML file, apply environment overrides, validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::parse_toml(&contents)
    }

    /// Parse a TOML string, apply environment overrides, validate.
    pub fn parse_toml(toml_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(toml_str)
            .map_err(|e| Error::config(format!("failed to parse TOML config: {}", e)))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `TEXANNO_*` environment variables.
    ///
    /// - `TEXANNO_TAGS` → `tags` (`,` or `;` separated)
    /// - `TEXANNO_BOUNDARY` → `boundary`
    /// - `TEXANNO_IGNORE_ENDPOINTS` → `ignore_endpoints`
    /// - `TEXANNO_WHOLE_FILE` → `whole_file`
    /// - `TEXANNO_PREVIEW_WIDTH` → `preview_width`
    /// - `TEXANNO_TOKENIZER` → `tokenizer`
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TEXANNO_TAGS") {
            self.tags = v
                .split([',', ';'])
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("TEXANNO_BOUNDARY") {
            match v.parse() {
                Ok(b) => self.boundary = b,
                Err(e) => warn!("config: ignoring TEXANNO_BOUNDARY: {}", e),
            }
        }
        if let Some(v) = lookup("TEXANNO_IGNORE_ENDPOINTS") {
            match parse_bool(&v) {
                Some(b) => self.ignore_endpoints = b,
                None => warn!("config: ignoring TEXANNO_IGNORE_ENDPOINTS={}", v),
            }
        }
        if let Some(v) = lookup("TEXANNO_WHOLE_FILE") {
            match parse_bool(&v) {
                Some(b) => self.whole_file = b,
                None => warn!("config: ignoring TEXANNO_WHOLE_FILE={}", v),
            }
        }
        if let Some(v) = lookup("TEXANNO_PREVIEW_WIDTH") {
            match v.trim().parse::<usize>() {
                Ok(w) => self.preview_width = w,
                Err(_) => warn!("config: ignoring TEXANNO_PREVIEW_WIDTH={}", v),
            }
        }
        if let Some(v) = lookup("TEXANNO_TOKENIZER") {
            self.tokenizer = if v.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(v))
            };
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.tags.is_empty() {
            return Err(Error::config("tags must not be empty"));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::config("tags must not contain blank entries"));
        }
        if self.preview_width == 0 {
            return Err(Error::config("preview_width must be > 0"));
        }
        Ok(())
    }

    /// Character tagger for this configuration.
    #[must_use]
    pub fn span_index(&self) -> SpanIndex {
        SpanIndex::new(self.boundary).with_skip_endpoints(self.ignore_endpoints)
    }

    /// Exporter for this configuration.
    #[must_use]
    pub fn exporter(&self) -> AnnotationExporter {
        AnnotationExporter::new(self.span_index()).with_whole_file(self.whole_file)
    }

    /// Score engine for this configuration.
    #[must_use]
    pub fn score_engine(&self) -> ScoreEngine {
        ScoreEngine::new(self.preview_width)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(format!("failed to render config: {}", e)))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
