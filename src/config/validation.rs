use crate::config::types::{Config, FetchConfig, LimitsConfig, ServerConfig, SiteConfig};
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_server_config(&config.server)?;
    validate_fetch_config(&config.fetch)?;
    validate_limits_config(&config.limits)?;
    validate_site_config(&config.site)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> ConfigResult<()> {
    if config.bind.trim().is_empty() {
        return Err(ConfigError::Validation("bind cannot be empty".to_string()));
    }

    if config.debug_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "debug_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetch client configuration
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.retry_times > 10 {
        return Err(ConfigError::Validation(format!(
            "retry_times must be <= 10, got {}",
            config.retry_times
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates default limits
fn validate_limits_config(config: &LimitsConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.crawl_deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "crawl_deadline_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the allowed host list
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    if config.allowed_hosts.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_hosts must contain at least one host pattern".to_string(),
        ));
    }

    for pattern in &config.allowed_hosts {
        validate_host_pattern(pattern)?;
    }

    Ok(())
}

/// Validates a host pattern (supports a leading "*." wildcard)
fn validate_host_pattern(pattern: &str) -> ConfigResult<()> {
    let host = pattern.strip_prefix("*.").unwrap_or(pattern);

    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' has a misplaced dot",
            host
        )));
    }

    Ok(())
}
