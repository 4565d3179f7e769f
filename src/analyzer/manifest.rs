//! Build-order manifest generation
//!
//! Post-order depth-first traversal of the finished graph: a file is emitted
//! only after everything it depends on, which is exactly the ordering the
//! downstream bundler requires. The entry script itself is never emitted.

use crate::models::DependencyGraph;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Produces the linear build order from an acyclic dependency graph
pub struct ManifestGenerator<'a> {
    graph: &'a DependencyGraph,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(graph: &'a DependencyGraph) -> Self {
        Self { graph }
    }

    /// Every reachable file except the entry, dependencies first.
    ///
    /// A diamond-shared dependency appears exactly once, at the position of
    /// its first completed visit.
    pub fn build_order(&self) -> Vec<PathBuf> {
        let mut order = Vec::new();
        let mut emitted = HashSet::new();
        self.append_post_order(&self.graph.entry, &mut order, &mut emitted);
        order
    }

    fn append_post_order(
        &self,
        node: &Path,
        order: &mut Vec<PathBuf>,
        emitted: &mut HashSet<PathBuf>,
    ) {
        if emitted.contains(node) {
            return;
        }
        for child in self.graph.children(node) {
            self.append_post_order(child, order, emitted);
        }
        emitted.insert(node.to_path_buf());
        if node != self.graph.entry {
            order.push(node.to_path_buf());
        }
    }
}
