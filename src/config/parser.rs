//! Configuration file parsing and default config creation

use crate::error::{LuapackError, Result};
use crate::models::PartialSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the home directory
pub const CONFIG_FILE_NAME: &str = ".luapack.toml";

/// Parse configuration content into partial settings
pub fn parse_config_content(content: &str, path: &Path) -> Result<PartialSettings> {
    toml::from_str(content).map_err(|source| LuapackError::ConfigParse {
        path: path.to_path_buf(),
        source,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })
}

/// Read and parse a configuration file
pub fn parse_config_file(path: &Path) -> Result<PartialSettings> {
    if !path.exists() {
        return Err(LuapackError::ConfigNotFound {
            path: path.to_path_buf(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LuapackError::ConfigRead {
        path: path.to_path_buf(),
        source,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    parse_config_content(&content, path)
}

/// Locate and parse the default configuration file, if any exists
///
/// The working directory is checked first, then the user's home directory.
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return parse_config_file(&local).map(Some);
    }

    if let Some(home) = dirs::home_dir() {
        let in_home = home.join(CONFIG_FILE_NAME);
        if in_home.exists() {
            return parse_config_file(&in_home).map(Some);
        }
    }

    Ok(None)
}

/// Write a commented default configuration file
pub fn create_default_config(path: &Path) -> Result<()> {
    let content = r#"# luapack configuration
#
# All values are optional; command line options override everything here.

# Cap on the number of distinct dependencies one analysis may visit
max_dependencies = 36

# Output format: "text" or "json"
output_format = "text"

# Write reports to a file instead of stdout
# output_file = "report.json"

# Colored terminal output
use_colors = true

# Suppress non-essential output
quiet = false

# Show detailed progress information
verbose = false
"#;

    fs::write(path, content).map_err(|source| LuapackError::OutputWrite {
        path: path.to_path_buf(),
        source,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })
}
