//! Command-line arguments shared by the quarry binaries.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Global flags. Values given here override `quarry.ron`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fallback identifier for unmatched blocks, as `primary:variant`.
    #[arg(long, global = true, value_parser = parse_identifier)]
    pub fallback: Option<(u16, u8)>,

    /// Directory of `<edition>.ron` definition documents.
    #[arg(long, global = true)]
    pub definitions: Option<PathBuf>,
}

/// Parses `"primary:variant"` or a bare `"primary"` (variant 0).
pub fn parse_identifier(s: &str) -> Result<(u16, u8), String> {
    let (primary, variant) = match s.split_once(':') {
        Some((p, v)) => (p, v),
        None => (s, "0"),
    };
    let primary = primary
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid primary id {primary:?}: {e}"))?;
    let variant = variant
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid variant {variant:?}: {e}"))?;
    Ok((primary, variant))
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some((primary, variant)) = args.fallback {
            self.conversion.fallback_primary = primary;
            self.conversion.fallback_variant = variant;
        }
        if let Some(ref dir) = args.definitions {
            self.definitions.directory = Some(dir.clone());
        }
    }
}
