use crate::config::types::{Config, FetchConfig, RetryConfig, ServerConfig, SiteConfig};
use crate::ConfigError;
use std::net::SocketAddr;

/// Largest attempt ceiling a configuration may set
pub const ATTEMPT_CEILING: u32 = 3;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_retry_config(&config.retry)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates marker lists
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_markers("host-markers", &config.host_markers)?;
    validate_markers("short-link-markers", &config.short_link_markers)?;
    validate_markers("challenge-markers", &config.challenge_markers)?;
    Ok(())
}

fn validate_markers(name: &str, markers: &[String]) -> Result<(), ConfigError> {
    if markers.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} must contain at least one entry",
            name
        )));
    }

    if markers.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain empty entries",
            name
        )));
    }

    Ok(())
}

/// Validates timeouts
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    let timeouts = [
        ("request-timeout-secs", config.request_timeout_secs),
        ("resolve-timeout-secs", config.resolve_timeout_secs),
        ("connect-timeout-secs", config.connect_timeout_secs),
    ];

    for (name, value) in timeouts {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1s, got {}s",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates retry and pacing bounds
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > ATTEMPT_CEILING {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and {}, got {}",
            ATTEMPT_CEILING, config.max_attempts
        )));
    }

    if config.default_attempts < 1 || config.default_attempts > config.max_attempts {
        return Err(ConfigError::Validation(format!(
            "default-attempts must be between 1 and max-attempts ({}), got {}",
            config.max_attempts, config.default_attempts
        )));
    }

    if config.pacing_min_ms > config.pacing_max_ms {
        return Err(ConfigError::Validation(format!(
            "pacing-min-ms ({}) cannot exceed pacing-max-ms ({})",
            config.pacing_min_ms, config.pacing_max_ms
        )));
    }

    Ok(())
}

/// Validates API settings
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_addr.parse::<SocketAddr>().map_err(|e| {
        ConfigError::InvalidAddress(format!("Invalid bind-addr '{}': {}", config.bind_addr, e))
    })?;

    if config.store_capacity < 1 {
        return Err(ConfigError::Validation(
            "store-capacity must be >= 1".to_string(),
        ));
    }

    if config.request_deadline_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-deadline-secs must be >= 1s, got {}s",
            config.request_deadline_secs
        )));
    }

    Ok(())
}
