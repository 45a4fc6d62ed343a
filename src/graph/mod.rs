//! Relationship graph: construction and validation of parent -> child edges.
//!
//! The graph is a petgraph `DiGraph` with the full person payload as the node
//! weight, plus an id -> `NodeIndex` map for O(1) lookups. Construction is
//! total: malformed input produces an empty or partial graph, never an error.
//! Anomalies (missing parents, cycles) are the validator's job, not the
//! builder's.

mod cycles;
mod validate;

pub use cycles::{simple_cycles, simple_cycles_bounded, CycleError};
pub use validate::validate;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::person::Person;

/// Directed relationship graph over one batch of person records.
///
/// Nodes are keyed by person id; edges run parent -> child and exist only
/// when both endpoints have nodes.
pub struct FamilyGraph {
    graph: DiGraph<Person, ()>,
    nodes: HashMap<String, NodeIndex>,
}

/// Build the relationship graph for a batch of persons.
///
/// Two passes: every person gets a node before any edge is added, so input
/// order (parent before child or not) never affects the result. A duplicate
/// id overwrites the earlier node's payload, last write wins. An edge whose
/// parent id has no node is silently omitted; the validator reports it.
pub fn build_graph(persons: &[Person]) -> FamilyGraph {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    for person in persons {
        match nodes.get(&person.id) {
            Some(&index) => graph[index] = person.clone(),
            None => {
                let index = graph.add_node(person.clone());
                nodes.insert(person.id.clone(), index);
            }
        }
    }

    for person in persons {
        // Defensive: skip if the node map is somehow inconsistent
        let Some(&child) = nodes.get(&person.id) else {
            continue;
        };
        for parent in &person.parents {
            if let Some(&parent_index) = nodes.get(parent) {
                // update_edge collapses parallel edges from duplicate records
                graph.update_edge(parent_index, child, ());
            }
        }
    }

    FamilyGraph { graph, nodes }
}

impl FamilyGraph {
    /// Whether a node with this person id exists.
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// The person payload stored on a node, if present.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.nodes.get(id).map(|&index| &self.graph[index])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn inner(&self) -> &DiGraph<Person, ()> {
        &self.graph
    }

    pub(crate) fn id_at(&self, index: NodeIndex) -> &str {
        &self.graph[index].id
    }
}
