// tests/pipeline_graph.rs

use pipedag::dag::{NodeId, NodeIdSet, PipelineGraph};

#[test]
fn test_node_id_set_keeps_first_seen_order() {
    let mut ids = NodeIdSet::new();
    assert!(ids.insert(NodeId::from("b")));
    assert!(ids.insert(NodeId::from("a")));
    assert!(!ids.insert(NodeId::from("b")));

    assert_eq!(ids.len(), 2);
    assert_eq!(ids.position(&NodeId::from("a")), Some(1));
    assert_eq!(ids.get(0), Some(&NodeId::from("b")));
    assert!(ids.contains(&NodeId::from("a")));
    assert!(!ids.contains(&NodeId::from("c")));
    let collected: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    assert_eq!(collected, vec!["b", "a"]);
}

#[test]
fn test_isolated_nodes_have_empty_entries() {
    let graph = PipelineGraph::with_nodes(3);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 0);
    for node in 0..3 {
        assert!(graph.successors_of(node).is_empty());
        assert_eq!(graph.indegree_of(node), 0);
    }
    assert_eq!(graph.kahn_visit_count(), 3);
    assert_eq!(graph.cycle_witness(), None);
}

#[test]
fn test_parallel_edges_keep_encounter_order() {
    let mut graph = PipelineGraph::with_nodes(3);
    graph.add_edge(0, 2);
    graph.add_edge(0, 1);
    graph.add_edge(0, 2);

    assert_eq!(graph.successors_of(0), &[2, 1, 2]);
    assert_eq!(graph.indegree_of(2), 2);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.kahn_visit_count(), 3);
}

#[test]
fn test_kahn_stops_at_cycle() {
    // 0 -> 1 -> 2 -> 1, 3 isolated
    let mut graph = PipelineGraph::with_nodes(4);
    graph.add_edge(0, 1);
    graph.add_edge(1, 2);
    graph.add_edge(2, 1);

    assert_eq!(graph.kahn_visit_count(), 2);
    assert_eq!(graph.cycle_witness(), Some(1));
}

#[test]
fn test_self_loop_witness() {
    let mut graph = PipelineGraph::with_nodes(2);
    graph.add_edge(0, 1);
    graph.add_edge(1, 1);

    assert_eq!(graph.kahn_visit_count(), 1);
    assert_eq!(graph.cycle_witness(), Some(1));
}
