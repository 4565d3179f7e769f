//! Build orchestration
//!
//! Turns a build request into the final `{scripts, libraries}` pair handed to
//! the external bundler: runs (or skips) the dependency analysis, removes
//! manual exclusions, and appends manual inclusions without duplicates.
//! The manifest ordering produced by the analyzer is never reordered here.

pub mod bundler;

pub use bundler::{environment_status, Bundler, EnvironmentStatus, LuastaticBundler};

use crate::analyzer::DependencyAnalyzer;
use crate::error::{LuapackError, Result};
use crate::models::config::DEFAULT_MAX_DEPENDENCIES;
use crate::models::AnalysisReport;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Everything the caller may specify for one build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// The entry script to package
    pub entry: PathBuf,
    /// Scripts to bundle in addition to the analysis result
    pub include: Vec<PathBuf>,
    /// Scripts to remove from the analysis result
    pub exclude: Vec<PathBuf>,
    /// Skip analysis entirely; the manifest starts empty
    pub skip_analysis: bool,
    /// Dependency cap forwarded to the analyzer
    pub max_dependencies: usize,
    /// Requested output binary path; a default is derived when absent
    pub output: Option<PathBuf>,
}

impl BuildRequest {
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            include: Vec::new(),
            exclude: Vec::new(),
            skip_analysis: false,
            max_dependencies: DEFAULT_MAX_DEPENDENCIES,
            output: None,
        }
    }
}

/// The fully resolved input for one bundler invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Absolute path of the entry script
    pub entry: PathBuf,
    /// Dependency scripts in build order, entry excluded
    pub scripts: Vec<PathBuf>,
    /// Native artifacts to link
    pub libraries: Vec<PathBuf>,
    /// Requested output path, if any
    pub output: Option<PathBuf>,
}

/// Resolve a build request into a bundler-ready plan
pub fn plan(request: &BuildRequest) -> Result<BuildPlan> {
    if !request.entry.is_file() {
        return Err(LuapackError::missing_file(&request.entry));
    }
    let entry = request
        .entry
        .canonicalize()
        .map_err(|_| LuapackError::missing_file(&request.entry))?;

    let report = if request.skip_analysis {
        AnalysisReport::empty(entry.clone())
    } else {
        DependencyAnalyzer::new(request.max_dependencies).analyze(&entry)?
    };

    let mut scripts = report.scripts;
    let libraries = report.libraries;

    // exclusions are matched by resolved absolute path; entries that match
    // nothing are ignored
    if !request.exclude.is_empty() {
        let excluded: HashSet<PathBuf> = request
            .exclude
            .iter()
            .map(|path| resolve_loose(path))
            .collect();
        scripts.retain(|script| !excluded.contains(script));
    }

    // manual inclusions must exist, and are deduplicated against what the
    // analysis already produced
    let mut present: HashSet<PathBuf> = scripts.iter().cloned().collect();
    present.insert(entry.clone());
    for include in &request.include {
        if !include.is_file() {
            return Err(LuapackError::missing_file(include));
        }
        let resolved = include
            .canonicalize()
            .map_err(|_| LuapackError::missing_file(include))?;
        if present.insert(resolved.clone()) {
            scripts.push(resolved);
        }
    }

    Ok(BuildPlan {
        entry,
        scripts,
        libraries,
        output: request.output.clone(),
    })
}

/// Best-effort absolute form for paths that may not exist
fn resolve_loose(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_skip_analysis_starts_empty() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'a'\n");
        write_script(&dir, "a.lua", "return {}\n");

        let mut request = BuildRequest::new(&entry);
        request.skip_analysis = true;

        let plan = plan(&request).unwrap();
        assert!(plan.scripts.is_empty());
        assert!(plan.libraries.is_empty());
    }

    #[test]
    fn test_manual_include_must_exist() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "return 0\n");

        let mut request = BuildRequest::new(&entry);
        request.include = vec![dir.path().join("ghost.lua")];

        match plan(&request) {
            Err(LuapackError::MissingFile { path, .. }) => {
                assert!(path.ends_with("ghost.lua"));
            }
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn test_manual_include_appends_and_deduplicates() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'a'\n");
        let a = write_script(&dir, "a.lua", "return {}\n");
        let extra = write_script(&dir, "extra.lua", "return {}\n");

        let mut request = BuildRequest::new(&entry);
        // `a` is already in the analyzed manifest; `extra` is new
        request.include = vec![a.clone(), extra.clone()];

        let plan = plan(&request).unwrap();
        let a_canon = a.canonicalize().unwrap();
        assert_eq!(
            plan.scripts.iter().filter(|p| **p == a_canon).count(),
            1
        );
        assert_eq!(plan.scripts.last().unwrap(), &extra.canonicalize().unwrap());
    }

    #[test]
    fn test_manual_exclude_removes_scripts() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'a'\nrequire 'b'\n");
        let a = write_script(&dir, "a.lua", "return {}\n");
        write_script(&dir, "b.lua", "return {}\n");

        let mut request = BuildRequest::new(&entry);
        request.exclude = vec![a];

        let plan = plan(&request).unwrap();
        assert_eq!(plan.scripts.len(), 1);
        assert!(plan.scripts[0].ends_with("b.lua"));
    }

    #[test]
    fn test_include_of_entry_is_ignored() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "return 0\n");

        let mut request = BuildRequest::new(&entry);
        request.include = vec![entry.clone()];

        let plan = plan(&request).unwrap();
        assert!(plan.scripts.is_empty());
    }
}
