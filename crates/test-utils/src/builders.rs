#![allow(dead_code)]

use pipedag::config::{ConfigFile, RawConfigFile};
use pipedag::types::IdPolicy;
use serde_json::{Value, json};

/// Builder for pipeline payloads (`{"nodes": [...], "edges": [...]}`).
///
/// Rows are raw JSON so tests can mix well-formed and malformed entries.
#[derive(Debug, Default, Clone)]
pub struct PipelineBuilder {
    nodes: Vec<Value>,
    edges: Vec<Value>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node `{"id": <id>}`.
    pub fn node(mut self, id: impl Into<Value>) -> Self {
        self.nodes.push(json!({ "id": id.into() }));
        self
    }

    /// Add several string-id nodes.
    pub fn nodes(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.nodes.push(json!({ "id": id }));
        }
        self
    }

    /// Add an arbitrary node row.
    pub fn raw_node(mut self, row: Value) -> Self {
        self.nodes.push(row);
        self
    }

    /// Add an edge `{"source": <source>, "target": <target>}`.
    pub fn edge(mut self, source: impl Into<Value>, target: impl Into<Value>) -> Self {
        self.edges
            .push(json!({ "source": source.into(), "target": target.into() }));
        self
    }

    /// Add a chain of string-id edges `a -> b -> c ...`.
    pub fn chain(mut self, ids: &[&str]) -> Self {
        for pair in ids.windows(2) {
            self.edges
                .push(json!({ "source": pair[0], "target": pair[1] }));
        }
        self
    }

    /// Add an arbitrary edge row.
    pub fn raw_edge(mut self, row: Value) -> Self {
        self.edges.push(row);
        self
    }

    pub fn node_rows(&self) -> &[Value] {
        &self.nodes
    }

    pub fn edge_rows(&self) -> &[Value] {
        &self.edges
    }

    pub fn build(self) -> Value {
        json!({ "nodes": self.nodes, "edges": self.edges })
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.config.server.bind = addr.to_string();
        self
    }

    pub fn cors_origins(mut self, origins: &[&str]) -> Self {
        self.config.server.cors_allow_origins = origins.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.config.server.max_body_bytes = limit;
        self
    }

    pub fn id_policy(mut self, policy: IdPolicy) -> Self {
        self.config.validation.id_policy = policy;
        self
    }

    pub fn include_diagnostics(mut self, val: bool) -> Self {
        self.config.validation.include_diagnostics = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
