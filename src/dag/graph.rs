// src/dag/graph.rs

use std::collections::{HashMap, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use super::payload::NodeId;

/// Deduplicated node ids in first-seen order.
///
/// Positions in this set are the node indices used by [`PipelineGraph`].
#[derive(Debug, Clone, Default)]
pub struct NodeIdSet {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl NodeIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id; returns `false` if it was already present.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.ids.len());
        self.ids.push(id);
        true
    }

    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, position: usize) -> Option<&NodeId> {
        self.ids.get(position)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }
}

/// Adjacency + indegree view of a pipeline, keyed by [`NodeIdSet`] position.
///
/// Every node has an entry, so isolated nodes show up with no successors and
/// zero indegree. Parallel edges and self-loops are kept as separate entries.
#[derive(Debug, Clone)]
pub struct PipelineGraph {
    successors: Vec<Vec<usize>>,
    indegree: Vec<usize>,
    edge_count: usize,
}

impl PipelineGraph {
    /// Graph with `node_count` nodes and no edges.
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            successors: vec![Vec::new(); node_count],
            indegree: vec![0; node_count],
            edge_count: 0,
        }
    }

    /// Add `from -> to`. Both must be `< node_count()`.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.successors[from].push(to);
        self.indegree[to] += 1;
        self.edge_count += 1;
    }

    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Successors of a node in edge encounter order.
    pub fn successors_of(&self, node: usize) -> &[usize] {
        self.successors
            .get(node)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    pub fn indegree_of(&self, node: usize) -> usize {
        self.indegree.get(node).copied().unwrap_or(0)
    }

    /// Run Kahn's algorithm and return how many nodes were dequeued.
    ///
    /// The worklist is a FIFO seeded with every zero-indegree node in index
    /// order. All nodes are dequeued iff the graph has no directed cycle.
    pub fn kahn_visit_count(&self) -> usize {
        let mut indegree = self.indegree.clone();
        let mut queue: VecDeque<usize> = indegree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(node, _)| node)
            .collect();

        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            for &next in &self.successors[node] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        visited
    }

    /// Lowest-index node lying on a directed cycle, if any.
    ///
    /// A node is on a cycle when it has a self-loop or belongs to a strongly
    /// connected component with more than one member.
    pub fn cycle_witness(&self) -> Option<usize> {
        let mut graph: DiGraphMap<usize, ()> =
            DiGraphMap::with_capacity(self.node_count(), self.edge_count);
        for node in 0..self.node_count() {
            graph.add_node(node);
        }
        for (from, targets) in self.successors.iter().enumerate() {
            for &to in targets {
                graph.add_edge(from, to, ());
            }
        }

        tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| graph.contains_edge(node, node))
            })
            .filter_map(|component| component.into_iter().min())
            .min()
    }
}
