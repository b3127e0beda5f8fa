use flate2::read::ZlibDecoder;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::object::{ObjectHash, ObjectKind, RawObject};

/// Read-only handle on a repository's object store.
///
/// Holds nothing but the resolved git directory; every component that reads
/// objects borrows it.
#[derive(Debug, Clone)]
pub struct Repository {
    git_dir: PathBuf,
}

impl Repository {
    /// Open a repository from a work tree (`<path>/.git`) or a bare git directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dot_git = path.join(".git");

        let git_dir = if dot_git.is_dir() {
            dot_git
        } else if path.join("objects").is_dir() {
            path.to_path_buf()
        } else {
            return Err(Error::RepositoryNotFound(path.to_path_buf()));
        };

        tracing::debug!(git_dir = %git_dir.display(), "opened repository");
        Ok(Repository { git_dir })
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Loose object location: `objects/<2 hex>/<38 hex>`
    pub fn object_path(&self, hash: &ObjectHash) -> PathBuf {
        let (dir, file) = hash.split_path();
        self.git_dir.join("objects").join(dir).join(file)
    }

    /// Locate, decompress and split a loose object
    pub fn read_object(&self, hash: &ObjectHash) -> Result<RawObject> {
        let path = self.object_path(hash);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound {
                    hash: hash.clone(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut data)
            .map_err(|source| Error::Decompression {
                hash: hash.clone(),
                source,
            })?;

        let raw = parse_loose_object(hash, &data)?;
        tracing::debug!(%hash, kind = %raw.kind, size = raw.body.len(), "read object");
        Ok(raw)
    }
}

/// Split decompressed `"<type> <size>\0<body>"` into its parts
pub fn parse_loose_object(hash: &ObjectHash, data: &[u8]) -> Result<RawObject> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::format(hash, "missing NUL after header"))?;
    let (header, body) = (&data[..nul], &data[nul + 1..]);

    let header = std::str::from_utf8(header)
        .map_err(|_| Error::format(hash, "header is not valid UTF-8"))?;
    let (tag, size) = header
        .split_once(' ')
        .ok_or_else(|| Error::format(hash, format!("missing space in header '{}'", header)))?;

    let kind = ObjectKind::from_tag(tag)
        .ok_or_else(|| Error::format(hash, format!("unsupported object type '{}'", tag)))?;
    let size: usize = size
        .parse()
        .map_err(|_| Error::format(hash, format!("invalid object size '{}'", size)))?;

    if size != body.len() {
        tracing::warn!(%hash, declared = size, actual = body.len(), "object size mismatch");
    }

    Ok(RawObject {
        kind,
        body: body.to_vec(),
    })
}
