//! Dependency graph data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A node in the dependency graph representing one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Direct source-file children, in first-encountered order
    pub children: Vec<PathBuf>,
}

/// The dependency graph for one entry script
///
/// Invariant: acyclic. The entry is present as a node but is excluded from
/// the generated manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// The entry script the traversal started from
    pub entry: PathBuf,
    /// Adjacency: every fully resolved file and its direct children
    pub nodes: HashMap<PathBuf, DependencyNode>,
}

impl DependencyGraph {
    /// Create an empty graph rooted at the given entry
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            nodes: HashMap::new(),
        }
    }

    /// Record a fully resolved file and its ordered children
    pub fn add_node(&mut self, path: PathBuf, children: Vec<PathBuf>) {
        self.nodes.insert(path.clone(), DependencyNode { path, children });
    }

    /// The ordered children of a file, or an empty slice for unknown paths
    pub fn children(&self, path: &Path) -> &[PathBuf] {
        self.nodes
            .get(path)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a file was resolved into the graph
    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    /// Number of resolved files, entry included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_query_nodes() {
        let mut graph = DependencyGraph::new("/proj/main.lua");
        graph.add_node(
            PathBuf::from("/proj/main.lua"),
            vec![PathBuf::from("/proj/util.lua")],
        );
        graph.add_node(PathBuf::from("/proj/util.lua"), vec![]);

        assert_eq!(graph.len(), 2);
        assert!(graph.contains(Path::new("/proj/main.lua")));
        assert_eq!(
            graph.children(Path::new("/proj/main.lua")),
            &[PathBuf::from("/proj/util.lua")]
        );
        assert!(graph.children(Path::new("/proj/unknown.lua")).is_empty());
    }
}
