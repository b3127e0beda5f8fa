use chrono::{DateTime, Utc};
use gitdeps_core::{ObjectHash, Repository, Result};
use std::collections::HashSet;

use super::decoder::ObjectDecoder;

/// Finds the commit to start a graph from for a given cutoff.
///
/// The walk is depth-first over parents in recorded order and returns the
/// first commit dated at or before the cutoff. Across merges this is the
/// first hit along the first-listed branches, which is not necessarily the
/// most recent qualifying commit overall.
///
/// Recursion depth grows with history length; very deep histories need a
/// correspondingly large stack.
pub struct AncestorResolver<'repo> {
    decoder: ObjectDecoder<'repo>,
}

impl<'repo> AncestorResolver<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self {
            decoder: ObjectDecoder::new(repo),
        }
    }

    /// Nearest qualifying commit reachable from `start`, or `None` if there is none
    pub fn resolve(&self, start: &ObjectHash, cutoff: DateTime<Utc>) -> Result<Option<ObjectHash>> {
        let mut state = WalkState::default();
        let found = self.visit(start, cutoff, &mut state)?;

        match &found {
            Some(hash) => tracing::info!(%start, %cutoff, found = %hash, "resolved starting commit"),
            None => tracing::info!(%start, %cutoff, "no commit at or before cutoff"),
        }
        Ok(found)
    }

    fn visit(
        &self,
        hash: &ObjectHash,
        cutoff: DateTime<Utc>,
        state: &mut WalkState,
    ) -> Result<Option<ObjectHash>> {
        if state.exhausted.contains(hash) {
            return Ok(None);
        }
        if !state.in_progress.insert(hash.clone()) {
            tracing::warn!(%hash, "commit is its own ancestor; not following the cycle");
            return Ok(None);
        }

        let found = self.visit_commit(hash, cutoff, state)?;

        state.in_progress.remove(hash);
        if found.is_none() {
            state.exhausted.insert(hash.clone());
        }
        Ok(found)
    }

    fn visit_commit(
        &self,
        hash: &ObjectHash,
        cutoff: DateTime<Utc>,
        state: &mut WalkState,
    ) -> Result<Option<ObjectHash>> {
        let (node, _) = self.decoder.load(hash, None)?;
        if !node.is_commit() {
            return Ok(None);
        }

        if let Some(ts) = node.timestamp {
            if ts <= cutoff {
                return Ok(Some(hash.clone()));
            }
        }

        for parent in &node.parent_hashes {
            if let Some(found) = self.visit(parent, cutoff, state)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

/// Per-call bookkeeping for `AncestorResolver::visit`
#[derive(Default)]
struct WalkState {
    /// Commits already known to lead nowhere
    exhausted: HashSet<ObjectHash>,
    /// Commits on the current path, to stop at parent cycles in a corrupted store
    in_progress: HashSet<ObjectHash>,
}
