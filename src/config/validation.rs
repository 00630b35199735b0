//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default network names an existing chain)
//! - Validate value ranges (chain ids nonzero, timeouts > 0)
//! - Validate RPC and node endpoint URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::AppConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.client_id.trim().is_empty() {
        errors.push(error("client_id", "must not be empty"));
    }

    if config.rpc_timeout_secs == 0 {
        errors.push(error("rpc_timeout_secs", "must be greater than zero"));
    }

    if config.chains.is_empty() {
        errors.push(error("chains", "at least one chain entry is required"));
    }

    if !config.chains.contains_key(&config.default_network) {
        errors.push(error(
            "default_network",
            format!("no chain entry named '{}'", config.default_network),
        ));
    }

    for (name, chain) in &config.chains {
        let field = format!("chains.{name}");
        if chain.chain_id == 0 {
            errors.push(error(&format!("{field}.chain_id"), "must be nonzero"));
        }
        if let Err(e) = chain.rpc_url.parse::<url::Url>() {
            errors.push(error(
                &format!("{field}.rpc_url"),
                format!("invalid URL '{}': {}", chain.rpc_url, e),
            ));
        }
    }

    for (channel, login) in [
        ("google", &config.embedded.google),
        ("facebook", &config.embedded.facebook),
    ] {
        if login.key_env.trim().is_empty() && login.dev_key.is_none() {
            errors.push(error(
                &format!("embedded.{channel}.key_env"),
                "either key_env or dev_key must be set",
            ));
        }
    }

    if let Err(e) = config.node.endpoint.parse::<url::Url>() {
        errors.push(error(
            "node.endpoint",
            format!("invalid URL '{}': {}", config.node.endpoint, e),
        ));
    }

    if config.node.connect_timeout_secs == 0 {
        errors.push(error("node.connect_timeout_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
