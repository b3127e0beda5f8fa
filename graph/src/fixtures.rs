//! Throwaway repositories with controlled commit times, written through libgit2.

use anyhow::Result;
use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use git2::{Commit, ObjectType, Oid, Signature, Time};
use gitdeps_core::{ObjectHash, Repository};
use std::fs;
use std::io::Write;
use tempfile::TempDir;

pub const FILE_MODE: i32 = 0o100644;
pub const DIR_MODE: i32 = 0o040000;

pub struct Fixture {
    _dir: TempDir,
    pub git: git2::Repository,
    pub repo: Repository,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let git = git2::Repository::init(dir.path())?;
        let repo = Repository::open(dir.path())?;
        Ok(Self { _dir: dir, git, repo })
    }

    pub fn blob(&self, content: &str) -> Result<Oid> {
        Ok(self.git.blob(content.as_bytes())?)
    }

    /// Write a tree from `(name, id, mode)` entries
    pub fn tree(&self, entries: &[(&str, Oid, i32)]) -> Result<Oid> {
        let mut builder = self.git.treebuilder(None)?;
        for (name, oid, mode) in entries {
            builder.insert(name, *oid, *mode)?;
        }
        Ok(builder.write()?)
    }

    /// Commit `tree` with author and committer time `seconds`
    pub fn commit(&self, message: &str, tree: Oid, parents: &[Oid], seconds: i64) -> Result<Oid> {
        let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))?;
        let tree = self.git.find_tree(tree)?;
        let parents: Vec<Commit> = parents
            .iter()
            .map(|oid| self.git.find_commit(*oid))
            .collect::<std::result::Result<_, _>>()?;
        let parent_refs: Vec<&Commit> = parents.iter().collect();
        Ok(self.git.commit(None, &sig, &sig, message, &tree, &parent_refs)?)
    }

    /// Frame and store an object body by hand, bypassing libgit2's validation
    pub fn write_raw(&self, kind: ObjectType, body: &str) -> Result<ObjectHash> {
        let target = hash(Oid::hash_object(kind, body.as_bytes())?);
        self.write_raw_at(&target, kind, body)?;
        Ok(target)
    }

    /// Store `body` under an arbitrary id, whether or not it matches the content
    pub fn write_raw_at(&self, target: &ObjectHash, kind: ObjectType, body: &str) -> Result<()> {
        let mut framed = format!("{} {}\0", kind.str(), body.len()).into_bytes();
        framed.extend_from_slice(body.as_bytes());

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&framed)?;

        let path = self.repo.object_path(target);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, encoder.finish()?)?;
        Ok(())
    }
}

pub fn hash(oid: Oid) -> ObjectHash {
    oid.to_string().parse().unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap()
}
