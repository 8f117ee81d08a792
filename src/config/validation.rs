use crate::config::types::{Config, ExecutionConfig, ScrapingConfig, SiteConfig, Target};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_roster(&config.roster)?;
    validate_scraping_config(&config.scraping)?;
    validate_execution_config(&config.execution)?;
    validate_site_config(&config.site)?;
    Ok(())
}

/// Validates the roster: non-empty, unique and file-name-safe identifiers
fn validate_roster(roster: &[Target]) -> Result<(), ConfigError> {
    if roster.is_empty() {
        return Err(ConfigError::Validation(
            "roster must contain at least one target".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for target in roster {
        validate_target_id(&target.id)?;

        if target.query.is_empty() {
            return Err(ConfigError::InvalidTarget(format!(
                "target '{}' has an empty query value",
                target.id
            )));
        }

        if !seen.insert(target.id.as_str()) {
            return Err(ConfigError::InvalidTarget(format!(
                "duplicate target '{}'",
                target.id
            )));
        }
    }

    Ok(())
}

/// Target ids end up in file names, so only word characters and hyphens pass
fn validate_target_id(id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::InvalidTarget(
            "target id cannot be empty".to_string(),
        ));
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ConfigError::InvalidTarget(format!(
            "target id must contain only alphanumeric characters, '_' and '-', got '{}'",
            id
        )));
    }

    Ok(())
}

fn validate_scraping_config(config: &ScrapingConfig) -> Result<(), ConfigError> {
    if config.job_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "job_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.save_logs && config.log_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_file cannot be empty when save_logs is enabled".to_string(),
        ));
    }

    Ok(())
}

fn validate_execution_config(config: &ExecutionConfig) -> Result<(), ConfigError> {
    if config.state_file.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "state_file cannot be empty".to_string(),
        ));
    }

    if config.script_extension.starts_with('.') {
        return Err(ConfigError::Validation(format!(
            "script_extension must not start with '.', got '{}'",
            config.script_extension
        )));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.page_param.is_empty() || config.target_param.is_empty() {
        return Err(ConfigError::Validation(
            "page_param and target_param cannot be empty".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation("max_pages must be >= 1".to_string()));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(
            "checkpoint_interval must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    for selector in [
        &config.row_selector,
        &config.link_selector,
        &config.content_selector,
        &config.meta_row_selector,
    ] {
        validate_selector(selector)?;
    }

    for (key, template) in [
        ("links_file", &config.links_file),
        ("texts_file", &config.texts_file),
    ] {
        if !template.contains("{target}") {
            return Err(ConfigError::Validation(format!(
                "{} must contain the '{{target}}' placeholder, got '{}'",
                key, template
            )));
        }
    }

    if config.links_file == config.texts_file {
        return Err(ConfigError::Validation(
            "links_file and texts_file must differ".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(format!("Invalid selector '{}': {:?}", selector, e)))
}
