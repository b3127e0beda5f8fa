pub mod decoder;
pub mod resolver;
pub mod walker;

pub use decoder::{decode_object, ObjectDecoder};
pub use resolver::AncestorResolver;
pub use walker::GraphBuilder;
