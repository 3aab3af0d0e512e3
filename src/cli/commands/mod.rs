//! Command implementations for the texanno CLI
//!
//! Each command has its own module.

pub mod config;
pub mod diff;
pub mod export;
pub mod score;

// Re-export argument types for parser
pub use config::ConfigArgs;
pub use diff::DiffArgs;
pub use export::ExportArgs;
pub use score::ScoreArgs;
