use chrono::{DateTime, Utc};
use gitdeps_core::{ObjectHash, ObjectKind};

/// An object in the dependency graph: a commit, tree or blob
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub kind: ObjectKind,
    pub hash: ObjectHash,
    /// Display label, e.g. `[commit] Initial commit` or `[blob] README.md`
    pub label: String,
    /// Author time (commits only)
    pub timestamp: Option<DateTime<Utc>>,
    /// Parent commit IDs, in recorded order (commits only)
    pub parent_hashes: Vec<ObjectHash>,
    /// Outgoing references in order: for a commit its tree then its parents,
    /// for a tree its entries. Resolved through the owning `ObjectGraph`.
    pub children: Vec<ObjectHash>,
}

impl GraphNode {
    pub fn is_commit(&self) -> bool {
        self.kind == ObjectKind::Commit
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.is_commit() && self.parent_hashes.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }

    /// True for commits dated strictly after `cutoff`. Undated commits never are.
    pub fn is_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_commit() && self.timestamp.map_or(false, |ts| ts > cutoff)
    }
}

/// A child reference produced while decoding, before it is looked up.
/// `name` is the tree entry name, when the child came from a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    pub hash: ObjectHash,
    pub name: Option<String>,
}
