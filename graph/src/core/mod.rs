pub mod node;
pub mod dag;

pub use node::{ChildRef, GraphNode};
pub use dag::{GraphStats, ObjectGraph};
