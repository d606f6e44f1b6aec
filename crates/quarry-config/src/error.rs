//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while reading, writing or checking `quarry.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid config file", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("cannot serialize config")]
    Serialize(#[source] ron::Error),

    /// Fallback outside the 4096 x 16 identifier space.
    #[error("fallback {primary}:{variant} is outside the identifier space")]
    FallbackOutOfRange { primary: u16, variant: u8 },
}
