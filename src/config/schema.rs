use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DEBOUNCE: &str = "500ms";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "20s";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the analysis service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Quiet period before a faculty search is sent (humantime, e.g. "500ms")
    #[serde(default = "default_debounce")]
    pub debounce: String,

    /// Upper bound on every HTTP call (humantime, e.g. "20s")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    #[serde(default)]
    pub scale: ScaleConfig,

    /// tracing filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            debounce: default_debounce(),
            request_timeout: default_request_timeout(),
            scale: ScaleConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Padding around plotted values, in service score units.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleConfig {
    #[serde(default = "default_grant_pad")]
    pub grant_pad: f64,
    #[serde(default = "default_enrollment_pad")]
    pub enrollment_pad: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            grant_pad: default_grant_pad(),
            enrollment_pad: default_enrollment_pad(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_debounce() -> String {
    DEFAULT_DEBOUNCE.to_string()
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_grant_pad() -> f64 {
    crate::scoring::GRANT_SCALE_PAD
}

fn default_enrollment_pad() -> f64 {
    crate::scoring::ENROLLMENT_SCALE_PAD
}
