//! # texanno-core
//!
//! Core types for the texanno toolbox: shared records used across all crates.
//!
//! This crate provides:
//! - **Annotations**: `Annotation`, `Link`, `SpanKey`, sentinel tag constants
//! - **Saves**: `Save`, `SaveKey`, `SaveSummary`, `SaveFilter`
//! - **Validation**: `ValidationIssue`
//!
//! The algorithm crate (`texanno`) and any storage layer exchange these plain
//! records; nothing here performs I/O.

pub mod annotation;
pub mod error;
pub mod save;

pub use annotation::{
    Annotation, Link, SpanKey, ValidationIssue, BEGIN_ANNOTATION, DEFAULT_COLOR, END_ANNOTATION,
};
pub use error::{Error, Result};
pub use save::{format_timestamp, parse_timestamp, Save, SaveFilter, SaveKey, SaveSummary};
