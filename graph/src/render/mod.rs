pub mod plantuml;

pub use plantuml::{escape_label, PlantUmlRenderer};
