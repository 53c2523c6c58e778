use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::core::ExtractedRelation;

/// How to resolve conflicting relation labels between the same node pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStrategy {
    /// Keep a single label per pair; a later record replaces the earlier
    /// label (last write wins).
    #[default]
    Overwrite,
    /// Keep the set of all labels seen for the pair.
    Accumulate,
}

/// Undirected labeled graph over entity-mention strings. Nodes are the
/// head/tail texts of extracted relations; edges carry relation labels.
///
/// The graph is built incrementally by folding record batches; the graph
/// exclusively owns its mutation, callers never write concurrently.
#[derive(Debug, Clone)]
pub struct ProductGraph {
    strategy: EdgeStrategy,
    nodes: BTreeSet<String>,
    edges: BTreeMap<(String, String), BTreeSet<String>>,
}

impl ProductGraph {
    pub fn new(strategy: EdgeStrategy) -> Self {
        Self {
            strategy,
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Merge a batch of records into the graph. Both endpoints become nodes
    /// on first mention; the edge between them is labeled according to the
    /// configured strategy.
    pub fn fold(&mut self, records: &[ExtractedRelation]) {
        for record in records {
            self.nodes.insert(record.head.clone());
            self.nodes.insert(record.tail.clone());

            let key = edge_key(&record.head, &record.tail);
            let labels = self.edges.entry(key).or_default();
            if self.strategy == EdgeStrategy::Overwrite && !labels.is_empty() {
                debug!(
                    "Replacing edge label between '{}' and '{}' with '{}'",
                    record.head, record.tail, record.relation
                );
                labels.clear();
            }
            labels.insert(record.relation.clone());
        }
    }

    pub fn strategy(&self) -> EdgeStrategy {
        self.strategy
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of connected node pairs, independent of how many labels each
    /// pair carries.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Labeled edges as `(a, b, label)` tuples, one per label.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.edges.iter().flat_map(|((a, b), labels)| {
            labels
                .iter()
                .map(move |label| (a.as_str(), b.as_str(), label.as_str()))
        })
    }

    pub fn labels_between(&self, a: &str, b: &str) -> Vec<&str> {
        self.edges
            .get(&edge_key(a, b))
            .map(|labels| labels.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> GraphStats {
        let distinct_labels = self
            .edges
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len();

        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            distinct_labels,
        }
    }
}

// Undirected edges: normalize the key so (a, b) and (b, a) address the same
// entry.
fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub distinct_labels: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph Statistics:\n\
             Nodes: {}\n\
             Edges: {}\n\
             Distinct Labels: {}",
            self.nodes, self.edges, self.distinct_labels
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(head: &str, relation: &str, tail: &str) -> ExtractedRelation {
        ExtractedRelation {
            head: head.to_string(),
            head_type: "product".to_string(),
            relation: relation.to_string(),
            tail: tail.to_string(),
            tail_type: "characteristic".to_string(),
        }
    }

    #[test]
    fn test_fold_is_idempotent_on_nodes() {
        let mut graph = ProductGraph::new(EdgeStrategy::Overwrite);
        let records = vec![record("Acme Widget", "hasColor", "red")];

        graph.fold(&records);
        graph.fold(&records);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.labels_between("Acme Widget", "red"), vec!["hasColor"]);
    }

    #[test]
    fn test_overwrite_keeps_last_label() {
        let mut graph = ProductGraph::new(EdgeStrategy::Overwrite);

        graph.fold(&[record("Acme Widget", "hasColor", "red")]);
        graph.fold(&[record("Acme Widget", "hasCharacteristic", "red")]);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.labels_between("Acme Widget", "red"),
            vec!["hasCharacteristic"]
        );
    }

    #[test]
    fn test_accumulate_keeps_all_labels() {
        let mut graph = ProductGraph::new(EdgeStrategy::Accumulate);

        graph.fold(&[record("Acme Widget", "hasColor", "red")]);
        graph.fold(&[record("Acme Widget", "hasCharacteristic", "red")]);

        assert_eq!(graph.edge_count(), 1);
        let labels = graph.labels_between("Acme Widget", "red");
        assert_eq!(labels, vec!["hasCharacteristic", "hasColor"]);
    }

    #[test]
    fn test_edges_are_undirected() {
        let mut graph = ProductGraph::new(EdgeStrategy::Overwrite);

        graph.fold(&[record("red", "hasColor", "Acme Widget")]);
        graph.fold(&[record("Acme Widget", "hasColor", "red")]);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.labels_between("red", "Acme Widget"), vec!["hasColor"]);
    }

    #[test]
    fn test_stats() {
        let mut graph = ProductGraph::new(EdgeStrategy::Overwrite);
        graph.fold(&[
            record("Acme Widget", "hasColor", "red"),
            record("Acme Widget", "hasCharacteristic", "waterproof"),
        ]);

        let stats = graph.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.distinct_labels, 2);
    }
}
