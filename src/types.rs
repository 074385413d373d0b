// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which node `id` values count as present.
///
/// - `Present`: any `id` field that exists and is not `null` is accepted,
///   including `0`, `0.0` and `""` (default).
/// - `Truthy`: additionally rejects the falsy scalars `0`, `0.0` and `""`.
///   Only this falsy-scalar rule is shared with a plain truthiness check;
///   booleans are still not ids under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    Present,
    Truthy,
}

impl Default for IdPolicy {
    fn default() -> Self {
        IdPolicy::Present
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(IdPolicy::Present),
            "truthy" => Ok(IdPolicy::Truthy),
            other => Err(format!(
                "invalid id_policy: {other} (expected \"present\" or \"truthy\")"
            )),
        }
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::Present => f.write_str("present"),
            IdPolicy::Truthy => f.write_str("truthy"),
        }
    }
}
