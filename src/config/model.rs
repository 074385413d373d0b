// src/config/model.rs

use std::net::SocketAddr;

use serde::Deserialize;

use crate::types::IdPolicy;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [server]
/// bind = "127.0.0.1:8000"
/// cors_allow_origins = ["*"]
/// max_body_bytes = 2097152
///
/// [validation]
/// id_policy = "present"
/// include_diagnostics = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: RawServerSection,

    #[serde(default)]
    pub validation: ValidationSection,
}

/// `[server]` section as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawServerSection {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Origins allowed by CORS. `["*"]` allows any origin.
    #[serde(default = "default_cors_allow_origins")]
    pub cors_allow_origins: Vec<String>,

    /// Upper bound on a request body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_cors_allow_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for RawServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_allow_origins: default_cors_allow_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// `[validation]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSection {
    /// `"present"` (default) or `"truthy"`.
    #[serde(default)]
    pub id_policy: IdPolicy,

    /// Attach a `diagnostics` object to submission responses.
    #[serde(default)]
    pub include_diagnostics: bool,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on the bind address and CORS list being well-formed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub validation: ValidationSection,
}

#[derive(Debug, Clone)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors: CorsOrigins,
    pub max_body_bytes: usize,
}

/// CORS origin policy derived from `cors_allow_origins`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl ConfigFile {
    pub(crate) fn new_unchecked(server: ServerSection, validation: ValidationSection) -> Self {
        Self { server, validation }
    }

    /// Built-in defaults, used when no config file is present.
    pub fn defaults() -> Self {
        Self {
            server: ServerSection {
                bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
                cors: CorsOrigins::Any,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            validation: ValidationSection::default(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::defaults()
    }
}
