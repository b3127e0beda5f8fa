pub mod error;
pub mod object;
pub mod repository;
pub mod commit;
pub mod tree;
pub mod refs;

pub use error::{Error, ErrorKind, Result};
pub use object::{ObjectHash, ObjectKind, RawObject};
pub use repository::Repository;
pub use commit::{parse_commit, CommitRecord};
pub use tree::{parse_tree, TreeEntry};
pub use refs::resolve_ref;
