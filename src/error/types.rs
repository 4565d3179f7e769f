//! Error types and definitions for luapack
//!
//! Every failure raised by the dependency engine or the build orchestrator is
//! a `LuapackError` variant carrying the data a caller needs to report it:
//! the offending path, the call-site line, the searched locations, or the
//! cycle chain.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - the current analysis fails
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for luapack operations
#[derive(Debug, Error)]
pub enum LuapackError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Entry script or a resolved dependency is unreadable
    #[error("Script not found or unreadable: {}", path.display())]
    MissingFile {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// A require argument that cannot be resolved statically
    #[error("Dynamic require in {} at line {line}: {statement}", file.display())]
    DynamicRequire {
        file: PathBuf,
        line: usize,
        statement: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// A module reference that matched no search location
    #[error("Module '{reference}' required by {} not found ({} locations searched)", requester.display(), searched.len())]
    ModuleNotFound {
        reference: String,
        requester: PathBuf,
        searched: Vec<PathBuf>,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// A file transitively requires itself
    #[error("Circular dependency: {}", format_chain(chain))]
    CircularDependency {
        chain: Vec<PathBuf>,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// The distinct dependency count exceeded the configured cap
    #[error("Dependency limit exceeded: {count} dependencies, limit is {limit}")]
    DependencyLimitExceeded {
        count: usize,
        limit: usize,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// External bundler/compiler binary not found on PATH
    #[error("Required tool '{tool}' not found on PATH")]
    BundlerNotFound {
        tool: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// External bundler exited with a failure status
    #[error("Bundling failed: {message}")]
    BundleFailed {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Bundler reported success but the expected binary is missing
    #[error("Bundler produced no output at {}", path.display())]
    OutputMissing {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file read errors
    #[error("Error reading configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Invalid path errors
    #[error("Invalid path: {}", path.display())]
    InvalidPath {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat {
        format: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Output file write errors
    #[error("Error writing to output file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl LuapackError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical errors - the process cannot do anything useful
            LuapackError::Config { .. } => ErrorSeverity::Critical,
            LuapackError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            LuapackError::ConfigRead { .. } => ErrorSeverity::Critical,
            LuapackError::ConfigParse { .. } => ErrorSeverity::Critical,
            LuapackError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            LuapackError::StdoutWrite { .. } => ErrorSeverity::Critical,
            LuapackError::BundlerNotFound { .. } => ErrorSeverity::Critical,

            // Everything else fails the current analysis or build
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Stable machine-readable discriminant for this error
    pub fn kind(&self) -> &'static str {
        match self {
            LuapackError::Io { .. } => "io",
            LuapackError::MissingFile { .. } => "missing_file",
            LuapackError::DynamicRequire { .. } => "dynamic_require",
            LuapackError::ModuleNotFound { .. } => "module_not_found",
            LuapackError::CircularDependency { .. } => "circular_dependency",
            LuapackError::DependencyLimitExceeded { .. } => "dependency_limit_exceeded",
            LuapackError::BundlerNotFound { .. } => "bundler_not_found",
            LuapackError::BundleFailed { .. } => "bundle_failed",
            LuapackError::OutputMissing { .. } => "output_missing",
            LuapackError::Config { .. } => "config",
            LuapackError::ConfigNotFound { .. } => "config_not_found",
            LuapackError::ConfigRead { .. } => "config_read",
            LuapackError::ConfigParse { .. } => "config_parse",
            LuapackError::InvalidPath { .. } => "invalid_path",
            LuapackError::InvalidOutputFormat { .. } => "invalid_output_format",
            LuapackError::OutputWrite { .. } => "output_write",
            LuapackError::StdoutWrite { .. } => "stdout_write",
            LuapackError::JsonSerialize { .. } => "json_serialize",
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LuapackError::MissingFile { path, .. } => {
                format!(
                    "Cannot read '{}'. Check that the file exists and is readable.",
                    path.display()
                )
            }
            LuapackError::DynamicRequire { file, line, statement, .. } => {
                format!(
                    "'{}' line {}: require argument is not a string literal: {}. \
                     Only literal module names can be resolved at build time.",
                    file.display(),
                    line,
                    statement
                )
            }
            LuapackError::ModuleNotFound { reference, requester, searched, .. } => {
                let mut msg = format!(
                    "Module '{}' required by '{}' was not found. Searched:\n",
                    reference,
                    requester.display()
                );
                for location in searched {
                    msg.push_str(&format!("  - {}\n", location.display()));
                }
                msg
            }
            LuapackError::CircularDependency { chain, .. } => {
                format!(
                    "Circular dependency detected:\n  {}",
                    chain
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join("\n  -> ")
                )
            }
            LuapackError::DependencyLimitExceeded { count, limit, .. } => {
                format!(
                    "Analysis stopped after {} dependencies (limit: {}). \
                     Raise the limit with --max-deps if the tree is legitimately this large.",
                    count, limit
                )
            }
            LuapackError::BundlerNotFound { tool, .. } => {
                format!(
                    "'{}' was not found on PATH. Install it and make sure it is reachable \
                     from your shell.",
                    tool
                )
            }
            LuapackError::ConfigNotFound { path, .. } => {
                format!(
                    "Configuration file not found at '{}'. Create one with 'luapack init' \
                     or use command line options.",
                    path.display()
                )
            }
            LuapackError::Io { source, .. } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            LuapackError::InvalidPath { path, .. } => {
                format!("Invalid path: '{}'. Please provide a valid file path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        LuapackError::Io {
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a missing-file error
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        LuapackError::MissingFile {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a dynamic-require error
    pub fn dynamic_require(
        file: impl Into<PathBuf>,
        line: usize,
        statement: impl Into<String>,
    ) -> Self {
        LuapackError::DynamicRequire {
            file: file.into(),
            line,
            statement: statement.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a module-not-found error
    pub fn module_not_found(
        reference: impl Into<String>,
        requester: impl Into<PathBuf>,
        searched: Vec<PathBuf>,
    ) -> Self {
        LuapackError::ModuleNotFound {
            reference: reference.into(),
            requester: requester.into(),
            searched,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a circular-dependency error
    pub fn circular_dependency(chain: Vec<PathBuf>) -> Self {
        LuapackError::CircularDependency {
            chain,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a dependency-limit error
    pub fn dependency_limit_exceeded(count: usize, limit: usize) -> Self {
        LuapackError::DependencyLimitExceeded {
            count,
            limit,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        LuapackError::Config {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a bundle-failed error
    pub fn bundle_failed(message: impl Into<String>) -> Self {
        LuapackError::BundleFailed {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for LuapackError {
    fn from(err: std::io::Error) -> Self {
        LuapackError::io_error(err)
    }
}

impl From<toml::de::Error> for LuapackError {
    fn from(err: toml::de::Error) -> Self {
        LuapackError::Config {
            message: err.to_string(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<serde_json::Error> for LuapackError {
    fn from(err: serde_json::Error) -> Self {
        LuapackError::JsonSerialize {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

/// Result type alias for luapack operations
pub type Result<T> = std::result::Result<T, LuapackError>;
