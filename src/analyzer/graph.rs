//! Dependency graph construction
//!
//! Recursive depth-first traversal from the entry script. Cycle detection
//! uses an explicit active stack (the files currently mid-resolution), so a
//! cycle is reported as the precise chain of requires that closed it rather
//! than a host stack trace. Fully resolved files go into a visited set so a
//! diamond-shared dependency is processed exactly once.

use crate::analyzer::lexer::SourceLexer;
use crate::analyzer::resolver::ModulePathResolver;
use crate::error::{LuapackError, Result};
use crate::models::{DependencyGraph, ModuleReference};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the dependency graph for one entry script
///
/// One builder handles exactly one traversal; `build` consumes it.
pub struct DependencyGraphBuilder<'a> {
    resolver: &'a ModulePathResolver,
    max_dependencies: usize,
    graph: DependencyGraph,
    active_stack: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
    libraries: Vec<PathBuf>,
    library_seen: HashSet<PathBuf>,
    dependency_count: usize,
}

/// Everything a finished traversal produced
#[derive(Debug)]
pub struct GraphResult {
    pub graph: DependencyGraph,
    /// Native artifacts, deduplicated, in first-encountered order
    pub libraries: Vec<PathBuf>,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(resolver: &'a ModulePathResolver, entry: &Path, max_dependencies: usize) -> Self {
        Self {
            resolver,
            max_dependencies,
            graph: DependencyGraph::new(entry),
            active_stack: Vec::new(),
            visited: HashSet::new(),
            libraries: Vec::new(),
            library_seen: HashSet::new(),
            dependency_count: 0,
        }
    }

    /// Traverse from the entry and return the finished graph plus libraries
    pub fn build(mut self) -> Result<GraphResult> {
        let entry = self.graph.entry.clone();
        self.visit(&entry)?;
        Ok(GraphResult {
            graph: self.graph,
            libraries: self.libraries,
        })
    }

    fn visit(&mut self, file: &Path) -> Result<()> {
        // a file already mid-resolution closes a cycle
        if let Some(first) = self.active_stack.iter().position(|p| p == file) {
            let mut chain: Vec<PathBuf> = self.active_stack[first..].to_vec();
            chain.push(file.to_path_buf());
            return Err(LuapackError::circular_dependency(chain));
        }

        if self.visited.contains(file) {
            return Ok(());
        }

        // the cap bounds work performed, so it is enforced before the file
        // is ever read
        if file != self.graph.entry {
            self.dependency_count += 1;
            if self.dependency_count > self.max_dependencies {
                return Err(LuapackError::dependency_limit_exceeded(
                    self.dependency_count,
                    self.max_dependencies,
                ));
            }
        }

        let text = fs::read_to_string(file)
            .map_err(|_| LuapackError::missing_file(file))?;

        self.active_stack.push(file.to_path_buf());

        let sites = SourceLexer::new(&text, file).scan()?;

        let mut children: Vec<PathBuf> = Vec::new();
        for site in &sites {
            match self.resolver.resolve(&site.reference, file)? {
                ModuleReference::Builtin => {}
                ModuleReference::NativeArtifact(path) => {
                    if self.library_seen.insert(path.clone()) {
                        self.libraries.push(path);
                    }
                }
                ModuleReference::SourceFile(path) => {
                    if !children.contains(&path) {
                        children.push(path.clone());
                    }
                    self.visit(&path)?;
                }
            }
        }

        self.graph.add_node(file.to_path_buf(), children);
        self.visited.insert(file.to_path_buf());
        self.active_stack.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::resolver::StaticDiscovery;
    use std::fs;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path.canonicalize().unwrap()
    }

    fn build(dir: &TempDir, entry: &Path, max: usize) -> Result<GraphResult> {
        let resolver = ModulePathResolver::new(dir.path(), &StaticDiscovery::unavailable());
        DependencyGraphBuilder::new(&resolver, entry, max).build()
    }

    #[test]
    fn test_leaf_entry_has_empty_graph_node() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "print('hi')\n");

        let result = build(&dir, &entry, 36).unwrap();
        assert_eq!(result.graph.len(), 1);
        assert!(result.graph.children(&entry).is_empty());
        assert!(result.libraries.is_empty());
    }

    #[test]
    fn test_chain_is_followed() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'a'\n");
        let a = write_script(&dir, "a.lua", "require 'b'\n");
        let b = write_script(&dir, "b.lua", "return {}\n");

        let result = build(&dir, &entry, 36).unwrap();
        assert_eq!(result.graph.len(), 3);
        assert_eq!(result.graph.children(&entry), &[a.clone()]);
        assert_eq!(result.graph.children(&a), &[b.clone()]);
        assert!(result.graph.children(&b).is_empty());
    }

    #[test]
    fn test_diamond_is_visited_once() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'a'\nrequire 'b'\n");
        let a = write_script(&dir, "a.lua", "require 'c'\n");
        let b = write_script(&dir, "b.lua", "require 'c'\n");
        let c = write_script(&dir, "c.lua", "return {}\n");

        let result = build(&dir, &entry, 36).unwrap();
        assert_eq!(result.graph.len(), 4);
        assert_eq!(result.graph.children(&a), &[c.clone()]);
        assert_eq!(result.graph.children(&b), &[c.clone()]);
    }

    #[test]
    fn test_self_require_cycle_chain() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "loop.lua", "require 'loop'\n");

        match build(&dir, &entry, 36) {
            Err(LuapackError::CircularDependency { chain, .. }) => {
                assert_eq!(chain.len(), 2);
                assert_eq!(chain[0], entry);
                assert_eq!(chain[1], entry);
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_three_step_cycle_chain_order() {
        let dir = TempDir::new().unwrap();
        let a = write_script(&dir, "a.lua", "require 'b'\n");
        let b = write_script(&dir, "b.lua", "require 'c'\n");
        let c = write_script(&dir, "c.lua", "require 'a'\n");

        match build(&dir, &a, 36) {
            Err(LuapackError::CircularDependency { chain, .. }) => {
                assert_eq!(chain, vec![a.clone(), b, c, a]);
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_limit_stops_before_reading_next_file() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'a'\n");
        write_script(&dir, "a.lua", "require 'b'\n");
        // b.lua's content would itself raise a dynamic-require error, which
        // proves the limit fires before the file is read
        write_script(&dir, "b.lua", "require(variable)\n");

        match build(&dir, &entry, 1) {
            Err(LuapackError::DependencyLimitExceeded { count, limit, .. }) => {
                assert_eq!(count, 2);
                assert_eq!(limit, 1);
            }
            other => panic!("expected DependencyLimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_native_artifacts_collected_not_counted() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'turbo'\nrequire 'a'\n");
        write_script(&dir, "a.lua", "require 'turbo'\n");
        fs::write(dir.path().join("turbo.so"), "").unwrap();

        // limit of 1 still passes: the native artifact is not a dependency
        let result = build(&dir, &entry, 1).unwrap();
        assert_eq!(result.libraries.len(), 1);
        assert!(result.libraries[0].ends_with("turbo.so"));
        assert_eq!(result.graph.len(), 2);
    }

    #[test]
    fn test_builtins_are_dropped() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'os'\nrequire 'string'\n");

        let result = build(&dir, &entry, 36).unwrap();
        assert_eq!(result.graph.len(), 1);
        assert!(result.graph.children(&entry).is_empty());
        assert!(result.libraries.is_empty());
    }

    #[test]
    fn test_missing_entry_is_reported() {
        let dir = TempDir::new().unwrap();
        let ghost = dir.path().join("ghost.lua");

        match build(&dir, &ghost, 36) {
            Err(LuapackError::MissingFile { path, .. }) => assert_eq!(path, ghost),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn test_lexer_errors_bubble_with_origin() {
        let dir = TempDir::new().unwrap();
        let entry = write_script(&dir, "main.lua", "require 'bad'\n");
        let bad = write_script(&dir, "bad.lua", "local m = require(pick())\n");

        match build(&dir, &entry, 36) {
            Err(LuapackError::DynamicRequire { file, line, .. }) => {
                assert_eq!(file, bad);
                assert_eq!(line, 1);
            }
            other => panic!("expected DynamicRequire, got {other:?}"),
        }
    }
}
