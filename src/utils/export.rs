use anyhow::Result;
use serde::Serialize;

use crate::graph::ProductGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Dot,
    Json,
    EdgeList,
}

#[derive(Debug, Serialize)]
struct JsonEdge<'a> {
    source: &'a str,
    target: &'a str,
    label: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<&'a str>,
    edges: Vec<JsonEdge<'a>>,
}

/// Serializes the final graph for the rendering collaborator: nodes plus
/// labeled `(source, target, label)` edges.
pub struct GraphExporter;

impl GraphExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize(&self, graph: &ProductGraph, format: GraphFormat) -> Result<String> {
        match format {
            GraphFormat::Dot => Ok(self.serialize_dot(graph)),
            GraphFormat::Json => self.serialize_json(graph),
            GraphFormat::EdgeList => Ok(self.serialize_edge_list(graph)),
        }
    }

    fn serialize_dot(&self, graph: &ProductGraph) -> String {
        let mut output = String::from("graph product_knowledge {\n");
        output.push_str("  node [shape=ellipse, style=filled, fillcolor=lightblue];\n");

        for node in graph.nodes() {
            output.push_str(&format!("  \"{}\";\n", escape_dot(node)));
        }
        for (a, b, label) in graph.edges() {
            output.push_str(&format!(
                "  \"{}\" -- \"{}\" [label=\"{}\"];\n",
                escape_dot(a),
                escape_dot(b),
                escape_dot(label)
            ));
        }

        output.push_str("}\n");
        output
    }

    fn serialize_json(&self, graph: &ProductGraph) -> Result<String> {
        let json_graph = JsonGraph {
            nodes: graph.nodes().collect(),
            edges: graph
                .edges()
                .map(|(a, b, label)| JsonEdge { source: a, target: b, label })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&json_graph)?)
    }

    fn serialize_edge_list(&self, graph: &ProductGraph) -> String {
        let mut output = String::new();
        for (a, b, label) in graph.edges() {
            output.push_str(&format!("{}\t{}\t{}\n", a, b, label));
        }
        output
    }
}

impl Default for GraphExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_dot(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
