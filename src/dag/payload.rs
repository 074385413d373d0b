// src/dag/payload.rs

//! Row-level classification of loosely typed pipeline payloads.
//!
//! Every JSON row is mapped to a tagged variant instead of raising an error,
//! so the validation pass stays total: malformed rows become
//! `Skipped(reason)` and are simply left out of the graph.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::IdPolicy;

/// Integral floats in `[-2^127, 2^127)` are folded into an integer id.
const INTEGRAL_FLOAT_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127

/// Hashable node identifier extracted from a JSON scalar.
///
/// Integral numbers share one representation, so `1` and `1.0` name the same
/// node. Strings never compare equal to numbers (`"1"` is not `1`).
#[derive(Debug, Clone)]
pub enum NodeId {
    Int(i128),
    /// Non-integral number, stored as raw `f64` bits.
    Float(u64),
    Text(String),
}

impl NodeId {
    /// Convert a JSON value into an id.
    ///
    /// Returns `None` for `null`, booleans, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(NodeId::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(NodeId::Int(i128::from(i)))
                } else if let Some(u) = n.as_u64() {
                    Some(NodeId::Int(i128::from(u)))
                } else {
                    n.as_f64().map(Self::from_f64)
                }
            }
            _ => None,
        }
    }

    fn from_f64(f: f64) -> Self {
        if f.fract() == 0.0 && (-INTEGRAL_FLOAT_LIMIT..INTEGRAL_FLOAT_LIMIT).contains(&f) {
            NodeId::Int(f as i128)
        } else {
            NodeId::Float(f.to_bits())
        }
    }

    /// `0`, `0.0` and `""`.
    pub fn is_falsy(&self) -> bool {
        match self {
            NodeId::Int(i) => *i == 0,
            NodeId::Float(_) => false,
            NodeId::Text(s) => s.is_empty(),
        }
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeId::Int(a), NodeId::Int(b)) => a == b,
            (NodeId::Float(a), NodeId::Float(b)) => a == b,
            (NodeId::Text(a), NodeId::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            NodeId::Int(i) => i.hash(state),
            NodeId::Float(bits) => bits.hash(state),
            NodeId::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(i) => write!(f, "{i}"),
            NodeId::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeId::Int(i) => match (i64::try_from(*i), u64::try_from(*i)) {
                (Ok(small), _) => serializer.serialize_i64(small),
                (_, Ok(large)) => serializer.serialize_u64(large),
                _ => serializer.serialize_i128(*i),
            },
            NodeId::Float(bits) => serializer.serialize_f64(f64::from_bits(*bits)),
            NodeId::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<i64> for NodeId {
    fn from(i: i64) -> Self {
        NodeId::Int(i128::from(i))
    }
}

/// Why a row was left out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The row is not a JSON object.
    NotARecord,
    /// The `id` field is absent or `null`.
    MissingId,
    /// The `id` is falsy and the policy is [`IdPolicy::Truthy`].
    FalsyId,
    /// The `id` is a boolean, array or object.
    UnsupportedId,
}

/// Classification of a single node row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRow {
    Valid(NodeId),
    Skipped(SkipReason),
}

/// Classification of a single edge row.
///
/// Endpoints that are not usable ids are `None`; such an edge can never
/// reference a known node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeRow {
    Record {
        source: Option<NodeId>,
        target: Option<NodeId>,
    },
    Skipped(SkipReason),
}

pub fn classify_node(row: &Value, policy: IdPolicy) -> NodeRow {
    let Some(record) = row.as_object() else {
        return NodeRow::Skipped(SkipReason::NotARecord);
    };

    match record.get("id") {
        None | Some(Value::Null) => NodeRow::Skipped(SkipReason::MissingId),
        Some(value) => match NodeId::from_value(value) {
            None => NodeRow::Skipped(SkipReason::UnsupportedId),
            Some(id) if policy == IdPolicy::Truthy && id.is_falsy() => {
                NodeRow::Skipped(SkipReason::FalsyId)
            }
            Some(id) => NodeRow::Valid(id),
        },
    }
}

pub fn classify_edge(row: &Value) -> EdgeRow {
    let Some(record) = row.as_object() else {
        return EdgeRow::Skipped(SkipReason::NotARecord);
    };

    EdgeRow::Record {
        source: endpoint(record, "source"),
        target: endpoint(record, "target"),
    }
}

fn endpoint(record: &Map<String, Value>, field: &str) -> Option<NodeId> {
    record.get(field).and_then(NodeId::from_value)
}

/// Split a top-level payload into its `nodes` and `edges` sequences.
///
/// A payload that is not an object, a missing field, or a field that is not
/// an array all yield an empty slice.
pub fn split_payload(payload: &Value) -> (&[Value], &[Value]) {
    (array_field(payload, "nodes"), array_field(payload, "edges"))
}

fn array_field<'a>(payload: &'a Value, field: &str) -> &'a [Value] {
    payload
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
