// src/dag/validator.rs

//! Pipeline validation: node-id dedup, edge filtering, Kahn cycle check.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::graph::{NodeIdSet, PipelineGraph};
use super::payload::{EdgeRow, NodeId, NodeRow, classify_edge, classify_node, split_payload};
use crate::types::IdPolicy;

/// Counts and acyclicity of a submitted pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
}

/// Per-call counters describing what the validator dropped and why the graph
/// is (not) a DAG.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Node rows that were not records or had no usable id.
    pub skipped_nodes: usize,
    /// Node rows whose id was already seen.
    pub duplicate_nodes: usize,
    /// Edge rows that were not records.
    pub skipped_edges: usize,
    /// Edge records with an endpoint outside the node-id set.
    pub dangling_edges: usize,
    /// Valid edges whose source equals their target.
    pub self_loops: usize,
    /// Nodes never dequeued by Kahn's algorithm.
    pub unresolved_nodes: usize,
    /// A node id lying on a directed cycle, when the graph is not a DAG.
    pub cycle_witness: Option<NodeId>,
}

/// [`ValidationResult`] together with its [`Diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub result: ValidationResult,
    pub diagnostics: Diagnostics,
}

/// Validates pipeline payloads under a fixed [`IdPolicy`].
///
/// Never fails: malformed rows are filtered out, not reported as errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphValidator {
    policy: IdPolicy,
}

impl GraphValidator {
    pub fn new(policy: IdPolicy) -> Self {
        Self { policy }
    }

    pub fn validate(&self, nodes: &[Value], edges: &[Value]) -> ValidationResult {
        self.analyse(nodes, edges).result()
    }

    /// Like [`validate`](Self::validate), plus diagnostics and a cycle witness.
    pub fn validate_with_report(&self, nodes: &[Value], edges: &[Value]) -> ValidationReport {
        let analysis = self.analyse(nodes, edges);
        let result = analysis.result();

        let cycle_witness = if result.is_dag {
            None
        } else {
            analysis
                .graph
                .cycle_witness()
                .and_then(|node| analysis.ids.get(node).cloned())
        };

        ValidationReport {
            result,
            diagnostics: Diagnostics {
                unresolved_nodes: result.num_nodes - analysis.visited,
                cycle_witness,
                ..analysis.counters
            },
        }
    }

    /// Validate a whole payload object (`{"nodes": [...], "edges": [...]}`).
    pub fn validate_payload(&self, payload: &Value) -> ValidationResult {
        let (nodes, edges) = split_payload(payload);
        self.validate(nodes, edges)
    }

    pub fn report_payload(&self, payload: &Value) -> ValidationReport {
        let (nodes, edges) = split_payload(payload);
        self.validate_with_report(nodes, edges)
    }

    fn analyse(&self, nodes: &[Value], edges: &[Value]) -> Analysis {
        let mut counters = Diagnostics::default();

        let mut ids = NodeIdSet::new();
        for row in nodes {
            match classify_node(row, self.policy) {
                NodeRow::Valid(id) => {
                    if !ids.insert(id) {
                        counters.duplicate_nodes += 1;
                    }
                }
                NodeRow::Skipped(reason) => {
                    debug!(?reason, "skipping node row");
                    counters.skipped_nodes += 1;
                }
            }
        }

        let mut graph = PipelineGraph::with_nodes(ids.len());
        for row in edges {
            let (source, target) = match classify_edge(row) {
                EdgeRow::Record { source, target } => (source, target),
                EdgeRow::Skipped(reason) => {
                    debug!(?reason, "skipping edge row");
                    counters.skipped_edges += 1;
                    continue;
                }
            };

            let from = source.as_ref().and_then(|id| ids.position(id));
            let to = target.as_ref().and_then(|id| ids.position(id));
            match (from, to) {
                (Some(from), Some(to)) => {
                    if from == to {
                        counters.self_loops += 1;
                    }
                    graph.add_edge(from, to);
                }
                _ => counters.dangling_edges += 1,
            }
        }

        let visited = graph.kahn_visit_count();

        debug!(
            num_nodes = ids.len(),
            num_edges = graph.edge_count(),
            visited,
            skipped_nodes = counters.skipped_nodes,
            dangling_edges = counters.dangling_edges,
            "validated pipeline graph"
        );

        Analysis {
            ids,
            graph,
            visited,
            counters,
        }
    }
}

/// Validate with the default [`IdPolicy`].
pub fn validate(nodes: &[Value], edges: &[Value]) -> ValidationResult {
    GraphValidator::default().validate(nodes, edges)
}

struct Analysis {
    ids: NodeIdSet,
    graph: PipelineGraph,
    visited: usize,
    counters: Diagnostics,
}

impl Analysis {
    fn result(&self) -> ValidationResult {
        ValidationResult {
            num_nodes: self.ids.len(),
            num_edges: self.graph.edge_count(),
            is_dag: self.visited == self.ids.len(),
        }
    }
}
