use crate::config::types::{Config, ExtractorConfig, FetcherConfig, OutputConfig, SiteConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_extractor_config(&config.extractor)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the documentation tree description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = config
        .base_url()
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    validate_slug_list("courses", &config.courses)?;
    validate_slug_list("formats", &config.formats)?;

    if config.first_year < config.last_year {
        return Err(ConfigError::Validation(format!(
            "first-year ({}) must not be earlier than last-year ({})",
            config.first_year, config.last_year
        )));
    }

    Ok(())
}

/// Validates fetcher limits
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(
            "max-attempts must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request and connect timeouts must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction heuristics
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.section_headings.is_empty() {
        return Err(ConfigError::Validation(
            "section-headings must name at least one heading".to_string(),
        ));
    }

    if config.section_headings.iter().any(|h| h.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "section-headings cannot contain blank entries".to_string(),
        ));
    }

    if config.command_prefixes.is_empty() {
        return Err(ConfigError::Validation(
            "command-prefixes must name at least one prefix".to_string(),
        ));
    }

    // Prefixes keep their trailing space ("rm "), so only reject empty ones
    if config.command_prefixes.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "command-prefixes cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.catalog_path.is_empty() {
        return Err(ConfigError::Validation(
            "catalog-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a list of URL path segments (course slugs, format names)
fn validate_slug_list(name: &str, slugs: &[String]) -> Result<(), ConfigError> {
    if slugs.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} must contain at least one entry",
            name
        )));
    }

    for slug in slugs {
        if slug.is_empty() || slug.contains('/') || slug.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "{} entry '{}' must be a single non-empty path segment",
                name, slug
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_slug_list() {
        assert!(validate_slug_list("courses", &["x".to_string(), "ai".to_string()]).is_ok());

        assert!(validate_slug_list("courses", &[]).is_err());
        assert!(validate_slug_list("courses", &["".to_string()]).is_err());
        assert!(validate_slug_list("courses", &["x/y".to_string()]).is_err());
        assert!(validate_slug_list("formats", &["p sets".to_string()]).is_err());
    }

    #[test]
    fn test_reject_inverted_year_range() {
        let mut config = Config::default();
        config.site.first_year = 2010;
        config.site.last_year = 2020;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_reject_non_http_base_url() {
        let mut config = Config::default();
        config.site.base_url = "ftp://docs.example.edu/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_reject_zero_attempts() {
        let mut config = Config::default();
        config.fetcher.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_reject_excessive_concurrency() {
        let mut config = Config::default();
        config.fetcher.max_concurrent_requests = 101;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_reject_empty_heuristics() {
        let mut config = Config::default();
        config.extractor.section_headings.clear();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.extractor.command_prefixes = vec!["wget ".to_string(), String::new()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_reject_empty_catalog_path() {
        let mut config = Config::default();
        config.output.catalog_path = String::new();
        assert!(validate(&config).is_err());
    }
}
