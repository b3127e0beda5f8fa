pub mod core;
pub mod git_backend;
pub mod render;

#[cfg(test)]
mod fixtures;

pub use crate::core::{ChildRef, GraphNode, GraphStats, ObjectGraph};
pub use crate::git_backend::{decode_object, AncestorResolver, GraphBuilder, ObjectDecoder};
pub use crate::render::{escape_label, PlantUmlRenderer};
