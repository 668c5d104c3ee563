//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Validation is a pure
//! function over `ClientConfig` and runs before a client is constructed.

use std::fmt;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const BROADCAST_MODES: [&str; 3] = ["block", "sync", "async"];

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain_id.trim().is_empty() {
        errors.push(ValidationError::new("chain_id", "must not be empty"));
    }

    match url::Url::parse(&config.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "endpoint",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "endpoint",
            format!("invalid URL '{}': {}", config.endpoint, e),
        )),
    }

    if config.http_timeout_secs == 0 {
        errors.push(ValidationError::new("http_timeout_secs", "must be greater than 0"));
    }

    if config.fee.denom.trim().is_empty() {
        errors.push(ValidationError::new("fee.denom", "must not be empty"));
    }
    if config.fee.gas == 0 {
        errors.push(ValidationError::new("fee.gas", "must be greater than 0"));
    }

    if config.request.client_id.trim().is_empty() {
        errors.push(ValidationError::new("request.client_id", "must not be empty"));
    }
    if !BROADCAST_MODES.contains(&config.request.broadcast_mode.as_str()) {
        errors.push(ValidationError::new(
            "request.broadcast_mode",
            format!(
                "'{}' is not one of {:?}",
                config.request.broadcast_mode, BROADCAST_MODES
            ),
        ));
    }

    if config.keys.address_prefix.trim().is_empty() {
        errors.push(ValidationError::new("keys.address_prefix", "must not be empty"));
    }
    if !config.keys.derivation_path.starts_with("m/") {
        errors.push(ValidationError::new(
            "keys.derivation_path",
            "must start with 'm/'",
        ));
    }
    match hex::decode(&config.keys.pubkey_prefix_hex) {
        Ok(bytes) if !bytes.is_empty() => {}
        Ok(_) => errors.push(ValidationError::new("keys.pubkey_prefix_hex", "must not be empty")),
        Err(e) => errors.push(ValidationError::new(
            "keys.pubkey_prefix_hex",
            format!("invalid hex: {}", e),
        )),
    }

    let polling = &config.polling;
    if polling.interval_ms == 0 {
        errors.push(ValidationError::new("polling.interval_ms", "must be greater than 0"));
    }
    if polling.max_interval_ms < polling.interval_ms {
        errors.push(ValidationError::new(
            "polling.max_interval_ms",
            "must be at least polling.interval_ms",
        ));
    }
    if polling.max_attempts == Some(0) {
        errors.push(ValidationError::new("polling.max_attempts", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
