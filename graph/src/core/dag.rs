use super::node::GraphNode;
use gitdeps_core::{ObjectHash, ObjectKind};
use std::collections::HashMap;

/// Object graph reachable from one starting object.
///
/// Nodes live in a table keyed by hash, so an object shared by many commits
/// or trees is stored once. Child references to objects that were pruned by
/// the cutoff are kept on the node but have no entry in the table.
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    root: ObjectHash,
    nodes: HashMap<ObjectHash, GraphNode>,
}

impl ObjectGraph {
    pub fn new(root: ObjectHash) -> Self {
        Self {
            root,
            nodes: HashMap::new(),
        }
    }

    /// Add a node. Returns false if a node with that hash was already present.
    pub fn insert(&mut self, node: GraphNode) -> bool {
        if self.nodes.contains_key(&node.hash) {
            return false;
        }
        self.nodes.insert(node.hash.clone(), node);
        true
    }

    /// The starting node, if it made it into the graph
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.get(&self.root)
    }

    pub fn get(&self, hash: &ObjectHash) -> Option<&GraphNode> {
        self.nodes.get(hash)
    }

    pub fn contains(&self, hash: &ObjectHash) -> bool {
        self.nodes.contains_key(hash)
    }

    /// Children of `node` that are present in the graph, in stored order
    pub fn children<'a>(&'a self, node: &'a GraphNode) -> impl Iterator<Item = &'a GraphNode> + 'a {
        node.children.iter().filter_map(move |hash| self.nodes.get(hash))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Count of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Count of edges between nodes present in the graph
    pub fn edge_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| self.children(node).count())
            .sum()
    }

    fn count_kind(&self, kind: ObjectKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_nodes: self.nodes.len(),
            total_edges: self.edge_count(),
            commits: self.count_kind(ObjectKind::Commit),
            trees: self.count_kind(ObjectKind::Tree),
            blobs: self.count_kind(ObjectKind::Blob),
            merge_commits: self.nodes.values().filter(|n| n.is_merge()).count(),
            root_commits: self.nodes.values().filter(|n| n.is_root()).count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub commits: usize,
    pub trees: usize,
    pub blobs: usize,
    pub merge_commits: usize,
    pub root_commits: usize,
}
