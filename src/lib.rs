#![feature(error_generic_member_access)]
//! luapack - package Lua scripts into standalone executables
//!
//! This library statically resolves the `require` graph of a Lua entry
//! script, produces the ordered manifest of source files and native
//! libraries the program needs, and drives an external bundler (luastatic)
//! to turn that manifest into a standalone executable.

pub mod analyzer;
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use analyzer::{analyze, DependencyAnalyzer};
pub use build::{plan, BuildPlan, BuildRequest, Bundler, LuastaticBundler};
pub use error::{ErrorSeverity, LuapackError, OptionExt, Result, ResultExt};
pub use models::{
    analysis::{AnalysisReport, ImportSite, ModuleReference},
    config::Settings,
    graph::DependencyGraph,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
