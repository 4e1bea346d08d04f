use crate::config::types::{Config, CrawlConfig, StoreConfig};
use crate::storage::is_valid_table_name;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed-domains cannot be empty".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_hostname(domain)?;
    }

    let seed = Url::parse(&config.seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed, e)))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use the http or https scheme",
            config.seed
        )));
    }

    // The engine only fetches in-scope URLs, so a seed outside the
    // allow-list would never be visited at all.
    let seed_host = seed
        .host_str()
        .ok_or_else(|| {
            ConfigError::Validation(format!("Seed URL '{}' has no hostname", config.seed))
        })?
        .to_lowercase();
    let seed_in_scope = config
        .allowed_domains
        .iter()
        .any(|domain| domain.to_lowercase() == seed_host);
    if !seed_in_scope {
        return Err(ConfigError::Validation(format!(
            "Seed host '{}' is not on the allowed-domains list",
            seed_host
        )));
    }

    if config.parallelism < 1 || config.parallelism > 64 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and 64, got {}",
            config.parallelism
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if !is_valid_table_name(&config.table) {
        return Err(ConfigError::Validation(format!(
            "table must be a plain SQL identifier, got '{}'",
            config.table
        )));
    }

    Ok(())
}

/// Validates a hostname from the allow-list
///
/// Bare names and IP literals are accepted so local test servers work;
/// a trailing dot, scheme, port, or path is not.
fn validate_hostname(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Hostname cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Hostname '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Hostname '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Hostname '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
