//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, timeouts and proxy rule shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Layer structure is checked by the route tree builder, which owns
//!   those invariants
//! - Pure function: ConsoleConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ConsoleConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("proxy rule #{index} has an empty name")]
    EmptyRuleName { index: usize },

    #[error("proxy rule '{name}' is declared twice")]
    DuplicateRule { name: String },

    #[error("proxy rule '{name}': prefix '{prefix}' must start with '/'")]
    InvalidPrefix { name: String, prefix: String },

    #[error("proxy rule '{name}': target '{target}' must be an http:// URL")]
    InvalidTarget { name: String, target: String },
}

pub fn validate_config(config: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (field, value) in [
        ("server.request_timeout_secs", config.server.request_timeout_secs),
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.forward_secs", config.timeouts.forward_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    let mut names = HashSet::new();
    for (index, rule) in config.proxy.rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRuleName { index });
        } else if !names.insert(rule.name.as_str()) {
            errors.push(ValidationError::DuplicateRule {
                name: rule.name.clone(),
            });
        }

        if !rule.prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                name: rule.name.clone(),
                prefix: rule.prefix.clone(),
            });
        }

        let http = Url::parse(&rule.target)
            .map(|u| u.scheme() == "http" && u.has_host())
            .unwrap_or(false);
        if !http {
            errors.push(ValidationError::InvalidTarget {
                name: rule.name.clone(),
                target: rule.target.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
