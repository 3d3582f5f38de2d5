//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page size within explorer limits)
//! - Keep the trace deadline inside the request timeout
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::tracer::types::{FETCH_LIMIT, MAX_HOPS, MIN_HOPS};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{field}: unknown value '{value}'")]
    UnknownValue { field: &'static str, value: String },

    #[error("tracer.deadline_secs: {deadline_secs}s must be shorter than timeouts.request_secs ({request_secs}s)")]
    DeadlineNotBelowTimeout { deadline_secs: u64, request_secs: u64 },
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    if url::Url::parse(&config.explorer.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "explorer.base_url",
            value: config.explorer.base_url.clone(),
        });
    }

    let page_size = config.explorer.page_size as u64;
    if page_size == 0 || page_size > FETCH_LIMIT as u64 {
        errors.push(ValidationError::OutOfRange {
            field: "explorer.page_size",
            value: page_size,
            min: 1,
            max: FETCH_LIMIT as u64,
        });
    }

    if config.explorer.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "explorer.request_timeout_secs" });
    }

    if config.retries.enabled && config.retries.max_attempts == 0 {
        errors.push(ValidationError::Zero { field: "retries.max_attempts" });
    }

    let hops = config.tracer.default_max_hops as u64;
    if !(MIN_HOPS as u64..=MAX_HOPS as u64).contains(&hops) {
        errors.push(ValidationError::OutOfRange {
            field: "tracer.default_max_hops",
            value: hops,
            min: MIN_HOPS as u64,
            max: MAX_HOPS as u64,
        });
    }

    // Traces must hit their own deadline before the request timeout fires.
    if config.tracer.deadline_secs == 0 {
        errors.push(ValidationError::Zero { field: "tracer.deadline_secs" });
    } else if config.timeouts.request_secs > 0
        && config.tracer.deadline_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::DeadlineNotBelowTimeout {
            deadline_secs: config.tracer.deadline_secs,
            request_secs: config.timeouts.request_secs,
        });
    }

    if config.history.capacity == 0 {
        errors.push(ValidationError::Zero { field: "history.capacity" });
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownValue {
            field: "observability.log_format",
            value: other.to_string(),
        }),
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
