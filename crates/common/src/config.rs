//! Watcher configuration types.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// MediaWiki action API endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Article link template; `{id}` is replaced with the page id.
    #[serde(default = "default_article_url_template")]
    pub article_url_template: String,

    /// User-Agent sent on every upstream request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Key prefix for published values (`<namespace>.<id>`).
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Source label attached to each delta update.
    #[serde(default = "default_source_label")]
    pub source_label: String,

    /// Search geometry.
    #[serde(default)]
    pub search: SearchConfig,

    /// Timing parameters (seconds).
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Ring and geosearch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Distance of the 8 satellite points from the center (km).
    #[serde(default = "default_ring_radius_km")]
    pub ring_radius_km: f64,

    /// Per-call geosearch radius in meters. The upstream caps this at 10 km.
    #[serde(default = "default_search_radius_m")]
    pub search_radius_m: u32,

    /// Max results per geosearch call.
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
}

/// Timing configuration (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay before the first poll, while the position source warms up.
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,

    /// Poll interval.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Heartbeat log interval.
    #[serde(default = "default_heartbeat")]
    pub heartbeat_secs: u64,
}

/// Hard upper bound the upstream accepts for `gsradius`.
pub const MAX_SEARCH_RADIUS_M: u32 = 10_000;

/// Hard upper bound the upstream accepts for `gslimit`.
pub const MAX_RESULT_LIMIT: u32 = 500;

// ── Defaults ──────────────────────────────────────────────────────────

fn default_api_url() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}
fn default_article_url_template() -> String {
    "https://en.wikipedia.org/wiki?curid={id}".into()
}
fn default_user_agent() -> String {
    "poi-watch/0.1 (Wikipedia points of interest)".into()
}
fn default_namespace() -> String {
    "pointsOfInterest.wikipedia".into()
}
fn default_source_label() -> String {
    "wikipedia".into()
}

fn default_ring_radius_km() -> f64 {
    20.0
}
fn default_search_radius_m() -> u32 {
    MAX_SEARCH_RADIUS_M
}
fn default_result_limit() -> u32 {
    100
}

fn default_startup_delay() -> u64 {
    8
}
fn default_poll_interval() -> u64 {
    15 * 60
}
fn default_request_timeout() -> u64 {
    20
}
fn default_heartbeat() -> u64 {
    60
}

/// Expand an article URL template for a page id.
pub fn article_url(template: &str, page_id: u64) -> String {
    template.replace("{id}", &page_id.to_string())
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ring_radius_km: default_ring_radius_km(),
            search_radius_m: default_search_radius_m(),
            result_limit: default_result_limit(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            startup_delay_secs: default_startup_delay(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            heartbeat_secs: default_heartbeat(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            article_url_template: default_article_url_template(),
            user_agent: default_user_agent(),
            namespace: default_namespace(),
            source_label: default_source_label(),
            search: SearchConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}
