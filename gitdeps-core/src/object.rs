use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of a raw SHA-1 object id in bytes
pub const RAW_HASH_LEN: usize = 20;

/// Hex-encoded SHA-1 object id: always 40 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHash(String);

impl ObjectHash {
    /// Build from the 20 raw bytes stored in tree entries
    pub fn from_raw(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != RAW_HASH_LEN {
            return None;
        }
        Some(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in labels
    pub fn short(&self) -> &str {
        &self.0[..6]
    }

    /// Two-character shard directory and remaining file name
    pub fn split_path(&self) -> (&str, &str) {
        self.0.split_at(2)
    }
}

impl FromStr for ObjectHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != RAW_HASH_LEN * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHash(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for ObjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Object types this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
        }
    }

    /// Parse a type tag from an object header. Tags and other kinds are unsupported.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "commit" => Some(ObjectKind::Commit),
            "tree" => Some(ObjectKind::Tree),
            "blob" => Some(ObjectKind::Blob),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decompressed loose object, split into type and body
#[derive(Debug, Clone)]
pub struct RawObject {
    pub kind: ObjectKind,
    pub body: Vec<u8>,
}
