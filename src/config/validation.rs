use crate::config::types::{
    Config, CrawlerConfig, ServerConfig, SessionConfig, SummarizerConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_crawler_config(&config.crawler)?;
    validate_session_config(&config.sessions)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_summarizer_config(&config.summarizer)?;
    Ok(())
}

/// Validates listener configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("bind must be a socket address, got '{}': {}", config.bind, e))
    })?;

    for origin in &config.allowed_origins {
        Url::parse(origin).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid allowed origin '{}': {}", origin, e))
        })?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_limit must be >= 1, got {}",
            config.max_pages_limit
        )));
    }

    if config.default_max_pages < 1 || config.default_max_pages > config.max_pages_limit {
        return Err(ConfigError::Validation(format!(
            "default_max_pages must be between 1 and {}, got {}",
            config.max_pages_limit, config.default_max_pages
        )));
    }

    if config.page_timeout < 1000 {
        return Err(ConfigError::Validation(format!(
            "page_timeout must be >= 1000ms, got {}ms",
            config.page_timeout
        )));
    }

    if config.content_limit < 1 {
        return Err(ConfigError::Validation(
            "content_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates session cache configuration
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.ttl_minutes < 1 {
        return Err(ConfigError::Validation(format!(
            "ttl_minutes must be >= 1, got {}",
            config.ttl_minutes
        )));
    }

    if config.sweep_interval_minutes < 1 {
        return Err(ConfigError::Validation(format!(
            "sweep_interval_minutes must be >= 1, got {}",
            config.sweep_interval_minutes
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates text-generation provider configuration
fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    let base = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base: {}", e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "api_base must use http or https, got '{}'",
            config.api_base
        )));
    }

    if config.summary_max_tokens < 1 || config.answer_max_tokens < 1 {
        return Err(ConfigError::Validation(
            "summary_max_tokens and answer_max_tokens must be >= 1".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0.0 and 1.0, got {}",
            config.temperature
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| {
        ConfigError::Validation(format!("Invalid email format: '{}'", email))
    })?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
