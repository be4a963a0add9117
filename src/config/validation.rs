//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a configuration, collecting every violation.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "listener.host",
            message: "must not be empty".to_string(),
        });
    }

    if config.listener.port.parse::<u16>().is_err() {
        errors.push(ValidationError {
            field: "listener.port",
            message: format!("'{}' is not a valid port", config.listener.port),
        });
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError {
            field: "database.max_connections",
            message: "must be greater than zero".to_string(),
        });
    }

    let positive = [
        ("database.connect_timeout_secs", config.database.connect_timeout_secs),
        ("database.query_timeout_secs", config.database.query_timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.health_check_secs", config.timeouts.health_check_secs),
        ("timeouts.shutdown_grace_secs", config.timeouts.shutdown_grace_secs),
        ("observability.metrics_upkeep_secs", config.observability.metrics_upkeep_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError {
                field,
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
