//! Configuration loader: merges env vars, .env file, and config.toml.

use common::config::{WatchConfig, MAX_RESULT_LIMIT, MAX_SEARCH_RADIUS_M};
use common::Error;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn parse_positive_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number > 0")))?;
    if !(parsed > 0.0) {
        return Err(Error::Config(format!("{env_name} must be a number > 0")));
    }
    Ok(parsed)
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_non_negative_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer >= 0")))
}

pub fn validate_config(config: &WatchConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
        issues.push("api_url must be an http(s) URL".into());
    }
    if !config.article_url_template.contains("{id}") {
        issues.push("article_url_template must contain {id}".into());
    }
    if config.user_agent.trim().is_empty() {
        issues.push("user_agent must not be empty".into());
    }
    if config.namespace.trim().is_empty() {
        issues.push("namespace must not be empty".into());
    }

    if !(config.search.ring_radius_km.is_finite() && config.search.ring_radius_km > 0.0) {
        issues.push("search.ring_radius_km must be > 0".into());
    }
    if config.search.search_radius_m == 0 || config.search.search_radius_m > MAX_SEARCH_RADIUS_M {
        issues.push(format!(
            "search.search_radius_m must be in 1..={MAX_SEARCH_RADIUS_M}"
        ));
    }
    if config.search.result_limit == 0 || config.search.result_limit > MAX_RESULT_LIMIT {
        issues.push(format!(
            "search.result_limit must be in 1..={MAX_RESULT_LIMIT}"
        ));
    }

    if config.timing.poll_interval_secs == 0 {
        issues.push("timing.poll_interval_secs must be > 0".into());
    }
    if config.timing.request_timeout_secs == 0 {
        issues.push("timing.request_timeout_secs must be > 0".into());
    }
    if config.timing.heartbeat_secs == 0 {
        issues.push("timing.heartbeat_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply `POI_WATCH_*` overrides from any key/value lookup.
fn apply_env_overrides<F>(config: &mut WatchConfig, lookup: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("POI_WATCH_API_URL") {
        config.api_url = url.trim().to_string();
    }
    if let Some(agent) = lookup("POI_WATCH_USER_AGENT") {
        config.user_agent = agent;
    }
    if let Some(namespace) = lookup("POI_WATCH_NAMESPACE") {
        config.namespace = namespace.trim().to_string();
    }
    if let Some(raw) = lookup("POI_WATCH_RING_RADIUS_KM") {
        config.search.ring_radius_km = parse_positive_f64(&raw, "POI_WATCH_RING_RADIUS_KM")?;
    }
    if let Some(raw) = lookup("POI_WATCH_POLL_INTERVAL_SECS") {
        config.timing.poll_interval_secs =
            parse_positive_u64(&raw, "POI_WATCH_POLL_INTERVAL_SECS")?;
    }
    if let Some(raw) = lookup("POI_WATCH_STARTUP_DELAY_SECS") {
        config.timing.startup_delay_secs =
            parse_non_negative_u64(&raw, "POI_WATCH_STARTUP_DELAY_SECS")?;
    }
    if let Some(raw) = lookup("POI_WATCH_REQUEST_TIMEOUT_SECS") {
        config.timing.request_timeout_secs =
            parse_positive_u64(&raw, "POI_WATCH_REQUEST_TIMEOUT_SECS")?;
    }
    Ok(())
}

/// Load configuration from environment and an optional config file.
///
/// An explicit `path` must exist; without one, `config.toml` in the working
/// directory is used when present.
pub fn load_config(path: Option<&Path>) -> Result<WatchConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = WatchConfig::default();

    // 3. Config file, if any.
    let config_path = match path {
        Some(p) => Some(p),
        None => Some(Path::new(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
    };
    if let Some(config_path) = config_path {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
        tracing::info!("Loaded config from {}", config_path.display());
    }

    // 4. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    validate_config(&config)?;
    Ok(config)
}
