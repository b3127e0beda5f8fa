use std::fs;
use std::io;
use std::path::{Component, Path};

use crate::error::{Error, Result};
use crate::object::ObjectHash;
use crate::repository::Repository;

/// Symbolic refs are followed at most this many times
const MAX_SYMREF_DEPTH: usize = 5;

/// Resolve a ref name (or a full hex id) to the object it points at.
///
/// Tries `HEAD`-style files in the git dir, then `refs/heads`, `refs/tags`,
/// `refs/remotes`, and finally `packed-refs`.
pub fn resolve_ref(repo: &Repository, name: &str) -> Result<ObjectHash> {
    if let Ok(hash) = name.parse::<ObjectHash>() {
        return Ok(hash);
    }
    resolve_symbolic(repo, name, 0)
}

fn resolve_symbolic(repo: &Repository, name: &str, depth: usize) -> Result<ObjectHash> {
    if depth > MAX_SYMREF_DEPTH || !is_inside_git_dir(name) {
        return Err(Error::RefNotFound(name.to_string()));
    }

    let candidates = [
        name.to_string(),
        format!("refs/{}", name),
        format!("refs/heads/{}", name),
        format!("refs/tags/{}", name),
        format!("refs/remotes/{}", name),
    ];

    for candidate in &candidates {
        let Some(content) = read_ref_file(repo.git_dir(), candidate)? else {
            continue;
        };
        let content = content.trim();

        if let Some(target) = content.strip_prefix("ref:") {
            return resolve_symbolic(repo, target.trim(), depth + 1);
        }
        tracing::debug!(name, candidate = candidate.as_str(), "resolved loose ref");
        return content
            .parse()
            .map_err(|_| Error::RefNotFound(name.to_string()));
    }

    for candidate in &candidates {
        if let Some(hash) = find_packed_ref(repo.git_dir(), candidate)? {
            tracing::debug!(name, candidate = candidate.as_str(), "resolved packed ref");
            return Ok(hash);
        }
    }

    Err(Error::RefNotFound(name.to_string()))
}

/// Ref names are relative paths that stay below the git dir
fn is_inside_git_dir(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn read_ref_file(git_dir: &Path, name: &str) -> Result<Option<String>> {
    let path = git_dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }
    match fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `packed-refs` lines are `<hash> <refname>`; `#` headers and `^` peeled lines are skipped
fn find_packed_ref(git_dir: &Path, name: &str) -> Result<Option<ObjectHash>> {
    let Some(content) = read_ref_file(git_dir, "packed-refs")? else {
        return Ok(None);
    };

    for line in content.lines() {
        if line.starts_with('#') || line.starts_with('^') {
            continue;
        }
        if let Some((hash, refname)) = line.split_once(' ') {
            if refname.trim() == name {
                return hash.parse().map(Some);
            }
        }
    }
    Ok(None)
}
