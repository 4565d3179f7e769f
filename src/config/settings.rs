//! Settings validation

use crate::error::{LuapackError, Result};
use crate::models::Settings;

/// Validates final settings before they are used
pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<()> {
        if settings.max_dependencies == 0 {
            return Err(LuapackError::config_error(
                "max_dependencies must be a positive integer",
            ));
        }

        if settings.quiet && settings.verbose {
            return Err(LuapackError::config_error(
                "quiet and verbose are mutually exclusive",
            ));
        }

        if let Some(output_file) = &settings.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(LuapackError::config_error(format!(
                        "output directory '{}' does not exist",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }
}
