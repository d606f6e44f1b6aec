//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "quarry.ron";

/// Identifier space bounds checked by [`Config::validate`].
const PRIMARY_LIMIT: u16 = 4096;
const VARIANT_LIMIT: u8 = 16;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub conversion: ConversionConfig,
    pub definitions: DefinitionsConfig,
    pub debug: DebugConfig,
}

/// Cross-edition conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversionConfig {
    /// Primary id substituted for blocks with no counterpart.
    pub fallback_primary: u16,
    /// Variant substituted for blocks with no counterpart.
    pub fallback_variant: u8,
    /// Build every edition-to-edition table at startup instead of on first use.
    pub prewarm: bool,
}

/// Where block definition documents come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Directory whose `<edition>.ron` files replace the built-in documents.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter, e.g. "debug" or "info,quarry_materials=trace".
    pub log_level: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            fallback_primary: 35,
            fallback_variant: 0,
            prewarm: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: String::from("info"),
        }
    }
}

impl ConversionConfig {
    /// The fallback as a `(primary, variant)` pair.
    pub fn fallback(&self) -> (u16, u8) {
        (self.fallback_primary, self.fallback_variant)
    }
}

impl Config {
    /// Platform config directory for quarry, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quarry"))
    }

    /// Location of `quarry.ron` inside `config_dir`.
    pub fn file_path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads `quarry.ron` from `config_dir`, writing the defaults first if the
    /// file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::file_path(config_dir);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes `self` to `config_dir/quarry.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::file_path(config_dir);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .struct_names(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Re-reads the file; `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&Self::file_path(config_dir))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (primary, variant) = self.conversion.fallback();
        if primary >= PRIMARY_LIMIT || variant >= VARIANT_LIMIT {
            return Err(ConfigError::FallbackOutOfRange { primary, variant });
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.conversion.fallback(), (35, 0));
        assert!(!config.conversion.prewarm);
        assert_eq!(config.definitions.directory, None);
        assert_eq!(config.debug.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = ron::from_str("(conversion: (prewarm: true))").unwrap();
        assert!(config.conversion.prewarm);
        assert_eq!(config.conversion.fallback(), (35, 0));
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: Config = ron::from_str("(cache_size: 12, debug: (log_level: \"warn\"))").unwrap();
        assert_eq!(config.debug.log_level, "warn");
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        let written = std::fs::read_to_string(Config::file_path(dir.path())).unwrap();
        assert!(written.contains("fallback_primary: 35"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.conversion.fallback_primary = 1;
        config.definitions.directory = Some(PathBuf::from("/srv/blocks"));
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load_or_create(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_reload() {
        let dir = tempfile::tempdir().unwrap();
        let original = Config::default();
        original.save(dir.path()).unwrap();
        assert!(original.reload(dir.path()).unwrap().is_none());

        let mut changed = original.clone();
        changed.conversion.fallback_variant = 4;
        changed.save(dir.path()).unwrap();
        let reloaded = original.reload(dir.path()).unwrap();
        assert_eq!(reloaded.map(|c| c.conversion.fallback()), Some((35, 4)));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::file_path(dir.path()), "(conversion: [").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_out_of_range_fallback_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            Config::file_path(dir.path()),
            "(conversion: (fallback_primary: 4096))",
        )
        .unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::FallbackOutOfRange {
                primary: 4096,
                variant: 0
            })
        ));
    }
}
