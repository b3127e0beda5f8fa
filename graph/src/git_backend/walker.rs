use chrono::{DateTime, Utc};
use gitdeps_core::{Error, ObjectHash, Repository, Result};
use std::collections::HashSet;

use super::decoder::ObjectDecoder;
use crate::core::ObjectGraph;

/// Builds the commit/tree/blob graph reachable from a starting object
pub struct GraphBuilder<'repo> {
    decoder: ObjectDecoder<'repo>,
}

impl<'repo> GraphBuilder<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self {
            decoder: ObjectDecoder::new(repo),
        }
    }

    /// Walk everything reachable from `start`, dropping commits dated after
    /// `cutoff` together with whatever is only reachable through them.
    ///
    /// Every distinct object is read at most once. `start` itself must pass the
    /// cutoff; pick it with `AncestorResolver` first.
    pub fn build(&self, start: &ObjectHash, cutoff: DateTime<Utc>) -> Result<ObjectGraph> {
        let mut graph = ObjectGraph::new(start.clone());
        let mut visited: HashSet<ObjectHash> = HashSet::new();
        let mut pending: Vec<(ObjectHash, Option<String>)> = vec![(start.clone(), None)];
        let mut pruned = 0usize;

        while let Some((hash, name)) = pending.pop() {
            if !visited.insert(hash.clone()) {
                continue;
            }

            let (node, refs) = self.decoder.load(&hash, name.as_deref())?;
            if node.is_after(cutoff) {
                tracing::debug!(%hash, "pruned commit after cutoff");
                pruned += 1;
                continue;
            }

            // Reversed so the first child is expanded next
            pending.extend(
                refs.into_iter()
                    .rev()
                    .filter(|r| !visited.contains(&r.hash))
                    .map(|r| (r.hash, r.name)),
            );
            graph.insert(node);
        }

        if graph.root().is_none() {
            return Err(Error::NoQualifyingAncestor {
                start: start.clone(),
                cutoff,
            });
        }

        let stats = graph.stats();
        tracing::info!(
            %start,
            commits = stats.commits,
            trees = stats.trees,
            blobs = stats.blobs,
            pruned,
            "built object graph"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, hash, Fixture, DIR_MODE, FILE_MODE};
    use anyhow::Result;
    use git2::ObjectType;
    use gitdeps_core::{ErrorKind, ObjectKind};

    #[test]
    fn test_single_commit_graph() -> Result<()> {
        let fx = Fixture::new()?;
        let blob = fx.blob("")?;
        let tree = fx.tree(&[("first.txt", blob, FILE_MODE)])?;
        let c1 = fx.commit("add first.txt in branch master", tree, &[], 1_000)?;

        let graph = GraphBuilder::new(&fx.repo).build(&hash(c1), at(2_000))?;
        let root = graph.root().unwrap();
        assert_eq!(root.label, "[commit] add first.txt in branch master");

        let children: Vec<_> = graph.children(root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].label, format!("[tree] {}", &tree.to_string()[..6]));

        let leaves: Vec<_> = graph.children(children[0]).collect();
        assert_eq!(leaves[0].hash, hash(blob));
        assert_eq!(leaves[0].label, "[blob] first.txt");
        assert_eq!(graph.node_count(), 3);
        Ok(())
    }

    #[test]
    fn test_shared_tree_built_once() -> Result<()> {
        let fx = Fixture::new()?;
        let blob = fx.blob("same")?;
        let tree = fx.tree(&[("a.txt", blob, FILE_MODE)])?;
        let c1 = fx.commit("c1", tree, &[], 1_000)?;
        let c2 = fx.commit("c2 same tree", tree, &[c1], 2_000)?;

        let graph = GraphBuilder::new(&fx.repo).build(&hash(c2), at(3_000))?;
        let stats = graph.stats();
        assert_eq!(stats.commits, 2);
        assert_eq!(stats.trees, 1);
        assert_eq!(stats.blobs, 1);

        // Both commits point at the single tree node
        let c1_node = graph.get(&hash(c1)).unwrap();
        let c2_node = graph.get(&hash(c2)).unwrap();
        assert_eq!(c1_node.children[0], hash(tree));
        assert_eq!(c2_node.children[0], hash(tree));
        Ok(())
    }

    #[test]
    fn test_shared_blob_in_nested_trees() -> Result<()> {
        let fx = Fixture::new()?;
        let blob = fx.blob("dup")?;
        let sub = fx.tree(&[("inner.txt", blob, FILE_MODE)])?;
        let top = fx.tree(&[("outer.txt", blob, FILE_MODE), ("sub", sub, DIR_MODE)])?;
        let c1 = fx.commit("nested", top, &[], 1_000)?;

        let graph = GraphBuilder::new(&fx.repo).build(&hash(c1), at(1_000))?;
        assert_eq!(graph.stats().blobs, 1);
        assert_eq!(graph.stats().trees, 2);
        // Named after the first entry reached
        assert_eq!(graph.get(&hash(blob)).unwrap().label, "[blob] outer.txt");
        Ok(())
    }

    #[test]
    fn test_merge_parent_after_cutoff_is_pruned() -> Result<()> {
        let fx = Fixture::new()?;
        let old_file = fx.blob("old")?;
        let new_file = fx.blob("only on the late branch")?;
        let base_tree = fx.tree(&[("a.txt", old_file, FILE_MODE)])?;
        let late_tree = fx.tree(&[("b.txt", new_file, FILE_MODE)])?;

        let base = fx.commit("base", base_tree, &[], 1_000)?;
        let late = fx.commit("late", late_tree, &[base], 9_000)?;
        let merge = fx.commit("merge", base_tree, &[base, late], 2_000)?;

        let cutoff = at(5_000);
        let graph = GraphBuilder::new(&fx.repo).build(&hash(merge), cutoff)?;

        assert!(graph.contains(&hash(base)));
        assert!(!graph.contains(&hash(late)));
        assert!(!graph.contains(&hash(late_tree)));
        assert!(!graph.contains(&hash(new_file)));
        for node in graph.nodes().filter(|n| n.kind == ObjectKind::Commit) {
            assert!(node.timestamp.unwrap() <= cutoff);
        }

        // The pruned parent stays referenced but has no node
        let root = graph.root().unwrap();
        assert_eq!(root.parent_hashes, vec![hash(base), hash(late)]);
        assert_eq!(graph.children(root).count(), 2);
        Ok(())
    }

    #[test]
    fn test_start_after_cutoff() -> Result<()> {
        let fx = Fixture::new()?;
        let tree = fx.tree(&[])?;
        let c1 = fx.commit("future", tree, &[], 10_000)?;

        let err = GraphBuilder::new(&fx.repo).build(&hash(c1), at(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoQualifyingAncestor);
        Ok(())
    }

    #[test]
    fn test_missing_object_aborts_build() -> Result<()> {
        let fx = Fixture::new()?;
        let blob = fx.blob("gone")?;
        let tree = fx.tree(&[("gone.txt", blob, FILE_MODE)])?;
        let c1 = fx.commit("c1", tree, &[], 1_000)?;
        std::fs::remove_file(fx.repo.object_path(&hash(blob)))?;

        let err = GraphBuilder::new(&fx.repo).build(&hash(c1), at(2_000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_long_history_does_not_recurse() -> Result<()> {
        let fx = Fixture::new()?;
        let tree = fx.tree(&[])?;
        let mut head = fx.commit("c0", tree, &[], 1)?;
        for i in 1..2_000 {
            head = fx.commit(&format!("c{}", i), tree, &[head], 1 + i)?;
        }

        let graph = GraphBuilder::new(&fx.repo).build(&hash(head), at(1_000_000))?;
        assert_eq!(graph.stats().commits, 2_000);
        assert_eq!(graph.stats().root_commits, 1);
        Ok(())
    }

    #[test]
    fn test_commit_without_author_is_kept() -> Result<()> {
        let fx = Fixture::new()?;
        let tree = fx.tree(&[])?;
        let c1 = fx.commit("dated", tree, &[], 1_000)?;
        let undated = fx.write_raw(
            ObjectType::Commit,
            &format!("tree {}\nparent {}\n\nno author\n", tree, c1),
        )?;

        let graph = GraphBuilder::new(&fx.repo).build(&undated, at(1_500))?;
        let node = graph.get(&undated).unwrap();
        assert_eq!(node.timestamp, None);
        assert_eq!(node.label, "[commit] no author");
        assert!(graph.contains(&hash(c1)));
        // undated commit, shared empty tree, dated parent
        assert_eq!(graph.node_count(), 3);
        Ok(())
    }
}
