use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::object::ObjectHash;

/// Header fields and message of a commit object
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub hash: ObjectHash,
    pub tree: Option<ObjectHash>,
    pub parents: Vec<ObjectHash>,
    /// Author time, UTC
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
}

/// Parse a commit body.
///
/// Missing `tree`, `parent` or `author` lines leave the field unset rather
/// than failing, so history walks can step over sparse commits. Lines that are
/// present must be well-formed.
pub fn parse_commit(hash: &ObjectHash, body: &[u8]) -> Result<CommitRecord> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::format(hash, "commit body is not valid UTF-8"))?;

    let mut record = CommitRecord {
        hash: hash.clone(),
        tree: None,
        parents: Vec::new(),
        timestamp: None,
        message: String::new(),
    };

    let mut lines = text.split('\n');
    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix("tree ") {
            record.tree = Some(header_hash(hash, rest)?);
        } else if let Some(rest) = line.strip_prefix("parent ") {
            record.parents.push(header_hash(hash, rest)?);
        } else if line.starts_with("author ") {
            record.timestamp = Some(author_time(hash, line)?);
        } else if line.trim().is_empty() {
            record.message = lines.by_ref().collect::<Vec<_>>().join("\n").trim().to_string();
            break;
        }
    }

    Ok(record)
}

fn header_hash(commit: &ObjectHash, value: &str) -> Result<ObjectHash> {
    let token = value.split_whitespace().next().unwrap_or_default();
    token
        .parse()
        .map_err(|_| Error::format(commit, format!("bad object reference '{}'", token)))
}

/// `author <name> <email> <unix-seconds> <tz>`: the timestamp is second to last
fn author_time(commit: &ObjectHash, line: &str) -> Result<DateTime<Utc>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let seconds: i64 = parts
        .len()
        .checked_sub(2)
        .and_then(|i| parts[i].parse().ok())
        .ok_or_else(|| Error::format(commit, format!("bad author line '{}'", line)))?;

    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| Error::format(commit, format!("author time {} out of range", seconds)))
}
