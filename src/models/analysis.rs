//! Analysis data structures: call-sites, resolution results, and the final report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One textual `require` call-site extracted from a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSite {
    /// The module reference exactly as written in the source
    pub reference: String,
    /// 1-based line of the call-site
    pub line: usize,
    /// File the call-site was found in
    pub origin: PathBuf,
}

impl ImportSite {
    pub fn new(reference: impl Into<String>, line: usize, origin: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            line,
            origin: origin.into(),
        }
    }
}

/// The filesystem classification of one resolved module reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleReference {
    /// Satisfied by the Lua runtime itself; no file involved
    Builtin,
    /// A Lua source file that is analyzed further
    SourceFile(PathBuf),
    /// A precompiled library; bundled as-is, never recursed into
    NativeArtifact(PathBuf),
}

/// The finished manifest for one entry script
///
/// `scripts` is the bundler's build order: every file precedes all files that
/// depend on it, and the entry itself is excluded. `libraries` is the
/// deduplicated set of native artifacts the build must link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Absolute path of the analyzed entry script
    pub entry: PathBuf,
    /// Dependency scripts in build order, excluding the entry
    pub scripts: Vec<PathBuf>,
    /// Native artifacts, deduplicated, in first-encountered order
    pub libraries: Vec<PathBuf>,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Create a report for an entry with no dependencies at all
    pub fn empty(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            scripts: Vec::new(),
            libraries: Vec::new(),
            analyzed_at: Utc::now(),
        }
    }

    /// Total number of files the bundler will receive besides the entry
    pub fn artifact_count(&self) -> usize {
        self.scripts.len() + self.libraries.len()
    }
}
