//! File and environment configuration sources

use crate::config::{parser, ConfigSource};
use crate::error::{LuapackError, Result};
use crate::models::{OutputFormat, PartialSettings};
use std::path::PathBuf;

/// Configuration loaded from a TOML file
pub struct FileConfig {
    path: Option<PathBuf>,
}

impl FileConfig {
    /// Use the default lookup (`.luapack.toml` in cwd, then home directory)
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Read a specific configuration file
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        match &self.path {
            Some(path) => parser::parse_config_file(path),
            None => Ok(parser::find_default_config()?.unwrap_or_default()),
        }
    }

    fn is_available(&self) -> bool {
        match &self.path {
            Some(path) => path.exists(),
            None => matches!(parser::find_default_config(), Ok(Some(_))),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Configuration loaded from `<PREFIX>_*` environment variables
pub struct EnvConfig {
    prefix: String,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, name)).ok()
    }

    fn parse_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.var(name) {
            None => Ok(None),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(Some(true)),
                "0" | "false" | "no" | "off" => Ok(Some(false)),
                other => Err(LuapackError::config_error(format!(
                    "invalid boolean '{}' in {}_{}",
                    other, self.prefix, name
                ))),
            },
        }
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let max_dependencies = match self.var("MAX_DEPENDENCIES") {
            None => None,
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                LuapackError::config_error(format!(
                    "invalid number '{}' in {}_MAX_DEPENDENCIES",
                    raw, self.prefix
                ))
            })?),
        };

        let output_format = match self.var("OUTPUT_FORMAT") {
            None => None,
            Some(raw) => Some(raw.parse::<OutputFormat>().map_err(|_| {
                LuapackError::InvalidOutputFormat {
                    format: raw.clone(),
                    #[cfg(not(tarpaulin_include))]
                    backtrace: std::backtrace::Backtrace::capture(),
                }
            })?),
        };

        Ok(PartialSettings {
            max_dependencies,
            output_format,
            output_file: self.var("OUTPUT_FILE").map(PathBuf::from),
            use_colors: self.parse_bool("USE_COLORS")?,
            quiet: self.parse_bool("QUIET")?,
            verbose: self.parse_bool("VERBOSE")?,
        })
    }

    fn is_available(&self) -> bool {
        [
            "MAX_DEPENDENCIES",
            "OUTPUT_FORMAT",
            "OUTPUT_FILE",
            "USE_COLORS",
            "QUIET",
            "VERBOSE",
        ]
        .iter()
        .any(|name| self.var(name).is_some())
    }

    fn name(&self) -> &str {
        "environment"
    }
}
