use crate::config::types::{
    Config, ReaderConfig, SelectorConfig, SessionConfig, TargetConfig, TimingConfig,
};
use crate::timing::DelayPolicy;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_session_config(&config.session)?;
    validate_timing_config(&config.timing)?;
    validate_reader_config(&config.reader)?;
    validate_selector_config(&config.selectors)?;

    if config.crawler.title_limit == 0 {
        return Err(ConfigError::Validation(
            "title_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the listing URL
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid target url '{}': {}", config.url, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "Target url '{}' must use http or https",
            config.url
        )));
    }

    Ok(())
}

/// Validates cookie source settings
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.cookie_env_var.is_empty() {
        return Err(ConfigError::Validation(
            "cookie_env_var cannot be empty".to_string(),
        ));
    }

    if config.cookie_env_var.contains('=') {
        return Err(ConfigError::Validation(format!(
            "cookie_env_var '{}' cannot contain '='",
            config.cookie_env_var
        )));
    }

    if config.cookie_store.is_empty() {
        return Err(ConfigError::Validation(
            "cookie_store cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates randomized delay bounds
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    validate_delay("inter_episode", &config.inter_episode)?;
    validate_delay("scroll_pause", &config.scroll_pause)?;
    validate_delay("page_turn", &config.page_turn)?;
    Ok(())
}

fn validate_delay(name: &str, policy: &DelayPolicy) -> Result<(), ConfigError> {
    if policy.min() > policy.max() {
        return Err(ConfigError::Validation(format!(
            "{} min ({:?}) must not exceed max ({:?})",
            name,
            policy.min(),
            policy.max()
        )));
    }
    Ok(())
}

/// Validates reading simulation parameters
fn validate_reader_config(config: &ReaderConfig) -> Result<(), ConfigError> {
    // A zero step could stall the vertical scroll loop forever
    if config.scroll_step_min == 0 {
        return Err(ConfigError::Validation(
            "scroll_step_min must be >= 1".to_string(),
        ));
    }

    if config.scroll_step_min > config.scroll_step_max {
        return Err(ConfigError::Validation(format!(
            "scroll_step_min ({}) must not exceed scroll_step_max ({})",
            config.scroll_step_min, config.scroll_step_max
        )));
    }

    let tap = config.tap_point;
    if !(0.0..=1.0).contains(&tap.x_ratio) || !(0.0..=1.0).contains(&tap.y_ratio) {
        return Err(ConfigError::Validation(format!(
            "tap_point ratios must be within [0, 1], got ({}, {})",
            tap.x_ratio, tap.y_ratio
        )));
    }

    if config.vertical_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "vertical_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector parses as CSS
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("viewer", &config.viewer),
        ("page_item", &config.page_item),
        ("next_page", &config.next_page),
        ("unread_link", &config.unread_link),
    ] {
        validate_selector(name, selector)?;
    }
    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "{} selector cannot be empty",
            name
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} selector '{}': {}", name, selector, e))
    })?;

    Ok(())
}
