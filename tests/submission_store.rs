// tests/submission_store.rs

use std::sync::Arc;
use std::thread;

use serde_json::json;

use pipedag::api::{Submission, SubmissionStore};

#[test]
fn test_new_store_is_empty() {
    let store = SubmissionStore::new();

    assert_eq!(store.snapshot(), Submission::default());
    assert_eq!(store.snapshot().nodes, json!([]));
}

#[test]
fn test_record_replaces_snapshot() {
    let store = SubmissionStore::new();
    store.record(Submission::from_payload(&json!({ "nodes": [{ "id": 1 }] })));
    store.record(Submission::from_payload(&json!({ "edges": [{ "source": 1, "target": 2 }] })));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.nodes, json!([]));
    assert_eq!(snapshot.edges, json!([{ "source": 1, "target": 2 }]));
}

#[test]
fn test_from_payload_keeps_raw_fields() {
    let submission = Submission::from_payload(&json!({ "nodes": "abc", "edges": null }));

    assert_eq!(submission.nodes, json!("abc"));
    assert_eq!(submission.edges, json!(null));
}

#[test]
fn test_from_payload_non_object() {
    assert_eq!(Submission::from_payload(&json!(42)), Submission::default());
}

#[test]
fn test_concurrent_records_leave_one_whole_snapshot() {
    let store = Arc::new(SubmissionStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..50 {
                    store.record(Submission {
                        nodes: json!([{ "id": i }]),
                        edges: json!([{ "source": i, "target": i }]),
                    });
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.nodes[0]["id"], snapshot.edges[0]["source"]);
}
