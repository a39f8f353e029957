mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{Config, ScaleConfig, DEFAULT_API_URL};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `api_url`
pub const API_URL_ENV: &str = "QBIT_API_URL";

/// Get the config directory path (~/.config/qbit-calc/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("qbit-calc"))
}

/// Get the default config file path (~/.config/qbit-calc/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// With no explicit path, a missing file at the default location yields the
/// defaults. An explicit path must exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed or has unknown fields
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!("no config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    if config_content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Apply `QBIT_API_URL` and then the command-line flag; the flag wins.
pub fn apply_overrides(config: &mut Config, env_url: Option<String>, flag_url: Option<String>) {
    if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
        config.api_url = url;
    }
    if let Some(url) = flag_url {
        config.api_url = url;
    }
}

impl Config {
    pub fn debounce(&self) -> Result<Duration> {
        humantime::parse_duration(&self.debounce)
            .with_context(|| format!("Invalid debounce '{}'", self.debounce))
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.request_timeout)
            .with_context(|| format!("Invalid request_timeout '{}'", self.request_timeout))
    }
}

/// Validate a loaded config. Returns all problems at once.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match reqwest::Url::parse(&config.api_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "api_url: unsupported scheme '{}' (expected http or https)",
            url.scheme()
        )),
        Err(e) => errors.push(format!("api_url: '{}' is not a valid URL: {}", config.api_url, e)),
    }

    if let Err(e) = humantime::parse_duration(&config.debounce) {
        errors.push(format!("debounce: '{}': {}", config.debounce, e));
    }

    match humantime::parse_duration(&config.request_timeout) {
        Ok(d) if d.is_zero() => errors.push("request_timeout: must be greater than zero".to_string()),
        Ok(_) => {}
        Err(e) => errors.push(format!("request_timeout: '{}': {}", config.request_timeout, e)),
    }

    for (name, pad) in [
        ("scale.grant_pad", config.scale.grant_pad),
        ("scale.enrollment_pad", config.scale.enrollment_pad),
    ] {
        if !pad.is_finite() || pad < 0.0 {
            errors.push(format!("{}: must be a non-negative number, got {}", name, pad));
        }
    }

    if tracing_subscriber::EnvFilter::try_new(&config.log_level).is_err() {
        errors.push(format!("log_level: '{}' is not a valid filter", config.log_level));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("qbit-calc-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.debounce().unwrap(), Duration::from_millis(500));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(20));
        assert_eq!(config.scale.grant_pad, 300.0);
        assert_eq!(config.scale.enrollment_pad, 150.0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "api_url: https://qbit.example\nscale:\n  grant_pad: 250\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.api_url, "https://qbit.example");
        assert_eq!(config.scale.grant_pad, 250.0);
        assert_eq!(config.scale.enrollment_pad, 150.0);
        assert_eq!(config.debounce, "500ms");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "api_url: http://x\nrefresh: 10\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = Config {
            api_url: "ftp://example".to_string(),
            debounce: "soon".to_string(),
            request_timeout: "0s".to_string(),
            scale: ScaleConfig {
                grant_pad: -1.0,
                enrollment_pad: f64::NAN,
            },
            log_level: "warn".to_string(),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].starts_with("api_url"));
        assert!(errors[1].starts_with("debounce"));
        assert!(errors[2].starts_with("request_timeout"));
    }

    #[test]
    fn test_overrides_flag_wins() {
        let mut config = Config::default();
        apply_overrides(&mut config, Some("http://env".to_string()), None);
        assert_eq!(config.api_url, "http://env");

        apply_overrides(
            &mut config,
            Some("http://env".to_string()),
            Some("http://flag".to_string()),
        );
        assert_eq!(config.api_url, "http://flag");

        let mut config = Config::default();
        apply_overrides(&mut config, Some("  ".to_string()), None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let path = temp_path("missing.yaml");
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_path("load.yaml");
        fs::write(&path, "debounce: 250ms\nlog_level: debug\n").unwrap();
        let config = load_config(Some(path.clone())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.debounce().unwrap(), Duration::from_millis(250));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_empty_file_is_default() {
        let path = temp_path("empty.yaml");
        fs::write(&path, "\n").unwrap();
        let config = load_config(Some(path.clone())).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config, Config::default());
    }
}
