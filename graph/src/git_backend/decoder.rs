use gitdeps_core::{parse_commit, parse_tree, ObjectHash, ObjectKind, RawObject, Repository, Result};

use crate::core::{ChildRef, GraphNode};

/// Turn a raw object into a shallow graph node plus the references it makes.
///
/// `description` is the name of the tree entry the object was reached
/// through; only blob labels use it.
pub fn decode_object(
    hash: &ObjectHash,
    raw: &RawObject,
    description: Option<&str>,
) -> Result<(GraphNode, Vec<ChildRef>)> {
    let mut node = GraphNode {
        kind: raw.kind,
        hash: hash.clone(),
        label: String::new(),
        timestamp: None,
        parent_hashes: Vec::new(),
        children: Vec::new(),
    };
    let mut refs = Vec::new();

    match raw.kind {
        ObjectKind::Commit => {
            let commit = parse_commit(hash, &raw.body)?;
            node.label = format!("[commit] {}", commit.message);
            node.timestamp = commit.timestamp;

            if let Some(tree) = commit.tree {
                refs.push(ChildRef { hash: tree, name: None });
            }
            refs.extend(commit.parents.iter().map(|p| ChildRef {
                hash: p.clone(),
                name: None,
            }));
            node.parent_hashes = commit.parents;
        }
        ObjectKind::Tree => {
            node.label = format!("[tree] {}", hash.short());
            for entry in parse_tree(hash, &raw.body)? {
                if entry.is_submodule() {
                    tracing::debug!(tree = %hash, name = entry.name.as_str(), "skipping submodule entry");
                    continue;
                }
                refs.push(ChildRef {
                    hash: entry.child,
                    name: Some(entry.name),
                });
            }
        }
        ObjectKind::Blob => {
            node.label = format!("[blob] {}", description.unwrap_or_else(|| hash.short()));
        }
    }

    node.children = refs.iter().map(|r| r.hash.clone()).collect();
    Ok((node, refs))
}

/// Reads and decodes objects on demand. No caching between calls.
pub struct ObjectDecoder<'repo> {
    repo: &'repo Repository,
}

impl<'repo> ObjectDecoder<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self { repo }
    }

    pub fn load(&self, hash: &ObjectHash, description: Option<&str>) -> Result<(GraphNode, Vec<ChildRef>)> {
        let raw = self.repo.read_object(hash)?;
        decode_object(hash, &raw, description)
    }
}
