// src/config/validate.rs

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::model::{ConfigFile, CorsOrigins, RawConfigFile, RawServerSection, ServerSection};
use crate::errors::{PipedagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PipedagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let server = validate_server(&raw.server)?;
        // id_policy is strongly typed and checked during deserialization.
        Ok(ConfigFile::new_unchecked(server, raw.validation))
    }
}

fn validate_server(raw: &RawServerSection) -> Result<ServerSection> {
    let bind = parse_bind(&raw.bind)?;
    let cors = parse_cors_origins(&raw.cors_allow_origins)?;

    if raw.max_body_bytes == 0 {
        return Err(PipedagError::ConfigError(
            "[server].max_body_bytes must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(ServerSection {
        bind,
        cors,
        max_body_bytes: raw.max_body_bytes,
    })
}

pub(crate) fn parse_bind(bind: &str) -> Result<SocketAddr> {
    bind.trim().parse::<SocketAddr>().map_err(|e| {
        PipedagError::ConfigError(format!(
            "[server].bind '{}' is not a socket address: {}",
            bind, e
        ))
    })
}

fn parse_cors_origins(origins: &[String]) -> Result<CorsOrigins> {
    if origins.is_empty() {
        return Err(PipedagError::ConfigError(
            "[server].cors_allow_origins must list at least one origin (use [\"*\"] for any)"
                .to_string(),
        ));
    }

    let has_wildcard = origins.iter().any(|o| o.trim() == "*");
    if has_wildcard {
        if origins.len() > 1 {
            return Err(PipedagError::ConfigError(
                "[server].cors_allow_origins cannot mix \"*\" with explicit origins".to_string(),
            ));
        }
        return Ok(CorsOrigins::Any);
    }

    for origin in origins {
        if HeaderValue::from_str(origin).is_err() {
            return Err(PipedagError::ConfigError(format!(
                "[server].cors_allow_origins entry '{}' is not a valid header value",
                origin
            )));
        }
    }

    Ok(CorsOrigins::List(origins.to_vec()))
}
