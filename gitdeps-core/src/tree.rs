use crate::error::{Error, Result};
use crate::object::{ObjectHash, RAW_HASH_LEN};

/// One `<mode> <name>\0<20-byte id>` record of a tree object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String, // e.g. "100644" or "40000"
    pub name: String,
    pub child: ObjectHash,
}

impl TreeEntry {
    /// Entry is a gitlink; the commit it names lives in another repository
    pub fn is_submodule(&self) -> bool {
        self.mode == "160000"
    }
}

/// Parse a tree body into its entries, in stored order.
///
/// `hash` is the tree's own id and only used for error context.
pub fn parse_tree(hash: &ObjectHash, body: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let (mode, after_mode) = split_at_byte(rest, b' ')
            .ok_or_else(|| Error::format(hash, "tree entry missing space after mode"))?;
        let (name, after_name) = split_at_byte(after_mode, 0)
            .ok_or_else(|| Error::format(hash, "tree entry missing NUL after name"))?;

        if after_name.len() < RAW_HASH_LEN {
            return Err(Error::format(
                hash,
                format!("truncated tree entry id: {} of {} bytes", after_name.len(), RAW_HASH_LEN),
            ));
        }
        let (raw, remaining) = after_name.split_at(RAW_HASH_LEN);

        let mode = std::str::from_utf8(mode)
            .map_err(|_| Error::format(hash, "tree entry mode is not valid UTF-8"))?;
        let name = std::str::from_utf8(name)
            .map_err(|_| Error::format(hash, "tree entry name is not valid UTF-8"))?;
        let child = ObjectHash::from_raw(raw)
            .ok_or_else(|| Error::format(hash, "tree entry id has wrong length"))?;

        entries.push(TreeEntry {
            mode: mode.to_string(),
            name: name.to_string(),
            child,
        });
        rest = remaining;
    }

    Ok(entries)
}

fn split_at_byte(data: &[u8], sep: u8) -> Option<(&[u8], &[u8])> {
    let pos = data.iter().position(|&b| b == sep)?;
    Some((&data[..pos], &data[pos + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const EMPTY_BLOB: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";

    fn tree_hash() -> ObjectHash {
        "66dac8d5243886b9ef0ce5c9bc912f86056fed8b".parse().unwrap()
    }

    fn entry_bytes(mode: &str, name: &str, raw: &[u8]) -> Vec<u8> {
        let mut entry = Vec::new();
        entry.extend_from_slice(mode.as_bytes());
        entry.push(b' ');
        entry.extend_from_slice(name.as_bytes());
        entry.push(0);
        entry.extend_from_slice(raw);
        entry
    }

    #[test]
    fn test_parse_tree() {
        let body = b"100644 first.txt\x00\xe6\x9d\xe2\x9b\xb2\xd1\xd6CK\x8b)\xaewZ\xd8\xc2\xe4\x8cS\x91100644 third.txt\x00\xe6\x9d\xe2\x9b\xb2\xd1\xd6CK\x8b)\xaewZ\xd8\xc2\xe4\x8cS\x91";

        let entries = parse_tree(&tree_hash(), body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "first.txt");
        assert_eq!(entries[1].name, "third.txt");
        assert!(entries.iter().all(|e| e.child.as_str() == EMPTY_BLOB));
        assert!(entries.iter().all(|e| e.mode == "100644"));
    }

    #[test]
    fn test_entries_keep_order_and_raw_ids() {
        let raws: Vec<[u8; RAW_HASH_LEN]> = (0u8..4).map(|i| [i * 17; RAW_HASH_LEN]).collect();
        let names = ["zeta", "alpha", "sub dir", "ünïcode"];
        let mut body = Vec::new();
        for (name, raw) in names.iter().zip(&raws) {
            let mode = if *name == "sub dir" { "40000" } else { "100644" };
            body.extend(entry_bytes(mode, name, raw));
        }

        let entries = parse_tree(&tree_hash(), &body).unwrap();
        let got: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(got, names);
        for (entry, raw) in entries.iter().zip(&raws) {
            assert_eq!(entry.child.as_str(), hex::encode(raw));
        }
        assert_eq!(entries[2].mode, "40000");
        assert_eq!(entries[0].mode, "100644");
    }

    #[test]
    fn test_empty_tree() {
        assert!(parse_tree(&tree_hash(), b"").unwrap().is_empty());
    }

    #[test]
    fn test_submodule_entry() {
        let body = entry_bytes("160000", "vendor", &[1u8; RAW_HASH_LEN]);
        let entries = parse_tree(&tree_hash(), &body).unwrap();
        assert!(entries[0].is_submodule());
    }

    #[test]
    fn test_malformed_trees() {
        let mut truncated = entry_bytes("100644", "a.txt", &[7u8; RAW_HASH_LEN]);
        truncated.truncate(truncated.len() - 1);

        let cases: Vec<Vec<u8>> = vec![
            b"100644".to_vec(),
            b"100644 no-terminator".to_vec(),
            truncated,
            entry_bytes("100644", "bad\u{fffd}", &[1u8; 3]),
        ];
        for body in cases {
            let err = parse_tree(&tree_hash(), &body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format);
        }
    }

    #[test]
    fn test_invalid_utf8_name() {
        let body = entry_bytes("100644", "", &[1u8; RAW_HASH_LEN]);
        let mut body_with_bad_name = b"100644 \xff".to_vec();
        body_with_bad_name.extend_from_slice(&body[7..]);
        let err = parse_tree(&tree_hash(), &body_with_bad_name).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
