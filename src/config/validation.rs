//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting mount prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' must start with '/'")]
    RelativePrefix { field: &'static str, value: String },

    #[error("routing.admin_prefix must not be the site root")]
    RootAdminPrefix,

    #[error("routing.api_prefix and routing.admin_prefix are both '{0}'")]
    PrefixConflict(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("admin.api_key must not be empty")]
    EmptyApiKey,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        &mut errors,
        "listener.bind_address",
        &config.listener.bind_address,
    );
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let routing = &config.routing;
    check_prefix(&mut errors, "routing.api_prefix", &routing.api_prefix);
    check_prefix(&mut errors, "routing.admin_prefix", &routing.admin_prefix);

    let api = routing.api_prefix.trim_end_matches('/');
    let admin = routing.admin_prefix.trim_end_matches('/');
    if routing.admin_prefix.starts_with('/') && admin.is_empty() {
        errors.push(ValidationError::RootAdminPrefix);
    }
    if !admin.is_empty() && api == admin {
        errors.push(ValidationError::PrefixConflict(admin.to_string()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::EmptyApiKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_prefix(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePrefix {
            field,
            value: value.to_string(),
        });
    }
}
