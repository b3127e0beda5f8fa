use std::collections::HashSet;

use crate::core::{GraphNode, ObjectGraph};

/// Renders an object graph as a PlantUML edge list
pub struct PlantUmlRenderer;

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One `"parent" --> "child"` line per edge, in pre-order from the root.
    ///
    /// A node's edges are written the first time it is reached; shared
    /// subgraphs are not repeated. Output is identical for identical graphs.
    pub fn render(&self, graph: &ObjectGraph) -> String {
        let mut out = String::from("@startuml\nskinparam linetype ortho\n");

        let mut emitted: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&GraphNode> = graph.root().into_iter().collect();

        while let Some(node) = stack.pop() {
            if !emitted.insert(node.hash.as_str()) {
                continue;
            }

            let children: Vec<&GraphNode> = graph.children(node).collect();
            for child in &children {
                out.push_str(&format!(
                    "\"{}\" --> \"{}\"\n",
                    escape_label(&node.label),
                    escape_label(&child.label)
                ));
            }
            stack.extend(children.into_iter().rev());
        }

        out.push_str("@enduml\n");
        out
    }
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Make a label safe inside a quoted PlantUML name
pub fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for ch in label.chars() {
        match ch {
            '"' => escaped.push('\''),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}
