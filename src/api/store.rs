// src/api/store.rs

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;

/// The `nodes` / `edges` of a submitted payload, kept as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub nodes: Value,
    pub edges: Value,
}

impl Submission {
    /// Take `nodes` and `edges` from a payload object.
    ///
    /// A missing field, or a payload that is not an object, becomes `[]`.
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| {
            payload
                .as_object()
                .and_then(|obj| obj.get(name))
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()))
        };

        Self {
            nodes: field("nodes"),
            edges: field("edges"),
        }
    }
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            nodes: Value::Array(Vec::new()),
            edges: Value::Array(Vec::new()),
        }
    }
}

/// Last accepted submission.
///
/// Created empty at startup, written only by the submission endpoint and read
/// by the informational endpoint. One mutex guards the whole snapshot; it is
/// held only long enough to swap or clone it.
#[derive(Debug, Default)]
pub struct SubmissionStore {
    last: Mutex<Submission>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, submission: Submission) {
        *self.lock() = submission;
    }

    pub fn snapshot(&self) -> Submission {
        self.lock().clone()
    }

    // Poisoning is ignored; the snapshot is best-effort.
    fn lock(&self) -> MutexGuard<'_, Submission> {
        self.last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
