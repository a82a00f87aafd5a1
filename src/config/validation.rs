//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and upstream origins
//! - Validate value ranges (body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address: {}", e),
        ));
    }

    check_origin("upstream.primary_origin", &config.upstream.primary_origin, &mut errors);
    check_origin("upstream.asset_origin", &config.upstream.asset_origin, &mut errors);

    let cookie = &config.upstream.session_cookie;
    if cookie.is_empty() || cookie.contains(|c: char| c == ';' || c == '=' || c.is_whitespace()) {
        errors.push(ValidationError::new(
            "upstream.session_cookie",
            "must be a non-empty cookie name",
        ));
    }

    if config.shell.path.trim().is_empty() {
        errors.push(ValidationError::new("shell.path", "must not be empty"));
    }

    if config.api.max_body_bytes == 0 {
        errors.push(ValidationError::new("api.max_body_bytes", "must be greater than zero"));
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!("invalid socket address: {}", e),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::new(field, format!("invalid URL: {}", e)));
            return;
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        errors.push(ValidationError::new(field, "scheme must be http or https"));
    }
    if url.host_str().is_none() {
        errors.push(ValidationError::new(field, "missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::new(field, "must be a bare origin without path or query"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "nope".into();
        config.upstream.primary_origin = "ftp://grok.com".into();
        config.upstream.asset_origin = "https://assets.grok.com/cdn".into();
        config.upstream.session_cookie = "".into();
        config.api.max_body_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "upstream.primary_origin",
                "upstream.asset_origin",
                "upstream.session_cookie",
                "api.max_body_bytes",
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_origin_with_port_and_trailing_slash() {
        let mut config = RelayConfig::default();
        config.upstream.primary_origin = "http://127.0.0.1:3000/".into();
        assert!(validate_config(&config).is_ok());
    }
}
