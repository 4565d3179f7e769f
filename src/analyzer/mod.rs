//! Static dependency analysis for Lua entry scripts
//!
//! The pipeline: the lexer extracts `require` call-sites, the resolver maps
//! each reference to a filesystem artifact, the graph builder assembles the
//! acyclic dependency graph, and the manifest generator linearizes it into
//! the build order the bundler consumes.

pub mod graph;
pub mod lexer;
pub mod manifest;
pub mod resolver;

pub use graph::{DependencyGraphBuilder, GraphResult};
pub use lexer::SourceLexer;
pub use manifest::ManifestGenerator;
pub use resolver::{
    Discovery, LuaRocksDiscovery, ModulePathResolver, SearchPathDiscovery, StaticDiscovery,
    LUA_BUILTINS, NATIVE_EXTENSIONS, SOURCE_EXTENSION,
};

use crate::error::{LuapackError, Result};
use crate::models::config::DEFAULT_MAX_DEPENDENCIES;
use crate::models::AnalysisReport;
use chrono::Utc;
use std::path::Path;

/// One-shot dependency analyzer for a single entry script
///
/// All traversal state is constructed fresh inside `analyze`, and `analyze`
/// takes the analyzer by value, so an instance can neither be shared between
/// threads mid-run nor reused for a second invocation.
pub struct DependencyAnalyzer {
    max_dependencies: usize,
    discovery: Box<dyn SearchPathDiscovery>,
}

impl DependencyAnalyzer {
    pub fn new(max_dependencies: usize) -> Self {
        Self {
            max_dependencies,
            discovery: Box::new(LuaRocksDiscovery::new()),
        }
    }

    /// Replace the package-manager discovery step, e.g. with a static stub
    pub fn with_discovery(mut self, discovery: Box<dyn SearchPathDiscovery>) -> Self {
        self.discovery = discovery;
        self
    }

    /// Analyze one entry script into a build manifest
    pub fn analyze(self, entry: &Path) -> Result<AnalysisReport> {
        if !entry.is_file() {
            return Err(LuapackError::missing_file(entry));
        }
        let entry = entry
            .canonicalize()
            .map_err(|_| LuapackError::missing_file(entry))?;
        let root = entry.parent().unwrap_or(Path::new("."));

        let resolver = ModulePathResolver::new(root, self.discovery.as_ref());
        let result = DependencyGraphBuilder::new(&resolver, &entry, self.max_dependencies).build()?;
        let scripts = ManifestGenerator::new(&result.graph).build_order();

        Ok(AnalysisReport {
            entry,
            scripts,
            libraries: result.libraries,
            analyzed_at: Utc::now(),
        })
    }
}

impl Default for DependencyAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPENDENCIES)
    }
}

/// Analyze `entry` with the given dependency cap
///
/// Convenience wrapper constructing a fresh `DependencyAnalyzer` per call.
pub fn analyze(entry: &Path, max_dependencies: usize) -> Result<AnalysisReport> {
    DependencyAnalyzer::new(max_dependencies).analyze(entry)
}
