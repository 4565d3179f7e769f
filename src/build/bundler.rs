//! The external bundler collaborator
//!
//! luapack itself only produces the manifest; turning it into a standalone
//! executable is delegated to `luastatic` plus a C compiler. The `Bundler`
//! trait is the seam: the CLI uses `LuastaticBundler`, tests substitute a
//! recording stub.

use crate::build::BuildPlan;
use crate::error::{LuapackError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Turns a finished build plan into an executable
pub trait Bundler {
    /// Name of the underlying tool for diagnostics
    fn name(&self) -> &str;

    /// Bundle the plan, returning the path of the produced binary
    fn bundle(&self, plan: &BuildPlan) -> Result<PathBuf>;
}

/// Availability of the external tools a build needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentStatus {
    /// `luastatic` is on PATH
    pub luastatic: bool,
    /// a C compiler (cc, gcc or clang) is on PATH
    pub c_compiler: bool,
}

impl EnvironmentStatus {
    pub fn ready(&self) -> bool {
        self.luastatic && self.c_compiler
    }
}

/// Probe PATH for the external tools
pub fn environment_status() -> EnvironmentStatus {
    EnvironmentStatus {
        luastatic: tool_on_path("luastatic"),
        c_compiler: ["cc", "gcc", "clang"].iter().any(|tool| tool_on_path(tool)),
    }
}

fn tool_on_path(tool: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return true;
        }
        if cfg!(windows) {
            dir.join(format!("{}.exe", tool)).is_file()
        } else {
            false
        }
    })
}

/// Bundles via the `luastatic` command-line tool
pub struct LuastaticBundler {
    tool: String,
}

impl LuastaticBundler {
    pub fn new() -> Self {
        Self {
            tool: "luastatic".to_string(),
        }
    }

    /// Use a different tool name, e.g. a wrapper script
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// luastatic names its output after the entry script and writes it to
    /// the working directory it runs in.
    fn default_output(entry: &Path) -> PathBuf {
        let stem = entry.file_stem().unwrap_or(entry.as_os_str());
        let dir = entry.parent().unwrap_or(Path::new("."));
        let mut output = dir.join(stem);
        if cfg!(windows) {
            output.set_extension("exe");
        }
        output
    }
}

impl Default for LuastaticBundler {
    fn default() -> Self {
        Self::new()
    }
}

impl Bundler for LuastaticBundler {
    fn name(&self) -> &str {
        &self.tool
    }

    fn bundle(&self, plan: &BuildPlan) -> Result<PathBuf> {
        if !tool_on_path(&self.tool) {
            return Err(LuapackError::BundlerNotFound {
                tool: self.tool.clone(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }

        let work_dir = plan.entry.parent().unwrap_or(Path::new("."));
        let mut command = Command::new(&self.tool);
        command.current_dir(work_dir).arg(&plan.entry);
        for script in &plan.scripts {
            command.arg(script);
        }
        for library in &plan.libraries {
            command.arg(library);
        }

        let output = command.output().map_err(LuapackError::io_error)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LuapackError::bundle_failed(format!(
                "{} exited with {}: {}",
                self.tool,
                output.status,
                stderr.trim()
            )));
        }

        let produced = Self::default_output(&plan.entry);
        if !produced.is_file() {
            return Err(LuapackError::OutputMissing {
                path: produced,
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }

        match &plan.output {
            Some(requested) if *requested != produced => {
                std::fs::rename(&produced, requested).map_err(|source| {
                    LuapackError::OutputWrite {
                        path: requested.clone(),
                        source,
                        #[cfg(not(tarpaulin_include))]
                        backtrace: std::backtrace::Backtrace::capture(),
                    }
                })?;
                Ok(requested.clone())
            }
            _ => Ok(produced),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_reported() {
        let bundler = LuastaticBundler::with_tool("luapack-no-such-tool");
        let plan = BuildPlan {
            entry: PathBuf::from("/tmp/main.lua"),
            scripts: vec![],
            libraries: vec![],
            output: None,
        };
        match bundler.bundle(&plan) {
            Err(LuapackError::BundlerNotFound { tool, .. }) => {
                assert_eq!(tool, "luapack-no-such-tool");
            }
            other => panic!("expected BundlerNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_default_output_strips_extension() {
        let output = LuastaticBundler::default_output(Path::new("/proj/app.lua"));
        if cfg!(windows) {
            assert_eq!(output, PathBuf::from("/proj/app.exe"));
        } else {
            assert_eq!(output, PathBuf::from("/proj/app"));
        }
    }

    #[test]
    fn test_environment_status_probe() {
        // just exercise the probe; the result depends on the host
        let status = environment_status();
        let _ = status.ready();
        assert!(!tool_on_path("luapack-no-such-tool"));
    }
}
