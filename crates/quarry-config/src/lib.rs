//! Runtime configuration for the quarry tools.
//!
//! Settings persist to disk as `quarry.ron`. Every section is `#[serde(default)]`
//! so older and newer files keep loading, and CLI flags override whatever was
//! read from disk.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, parse_identifier};
pub use config::{CONFIG_FILE_NAME, Config, ConversionConfig, DebugConfig, DefinitionsConfig};
pub use error::ConfigError;
