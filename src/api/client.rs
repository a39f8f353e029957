use reqwest::{StatusCode, Url};
use std::time::Duration;

/// Failure talking to the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Connection-level failures worth retrying on idempotent calls.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// HTTP client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qbit-calc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client",
                source: e,
            })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn endpoint_url(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }
}

/// Treat anything but 200 as a failed call.
pub(crate) fn check_status(endpoint: &'static str, status: StatusCode) -> Result<(), ApiError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        let url = client.endpoint_url("/analysis", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/analysis");
    }

    #[test]
    fn test_endpoint_url_encodes_params() {
        let client = ApiClient::new("http://api.example/v1", Duration::from_secs(1)).unwrap();
        let url = client
            .endpoint_url(
                "faculties",
                &[("page", "1".to_string()), ("faculty", "law & order".to_string())],
            )
            .unwrap();
        assert_eq!(url.path(), "/v1/faculties");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "1".to_string()),
                ("faculty".to_string(), "law & order".to_string())
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_only_200_is_success() {
        assert!(check_status("/analysis", StatusCode::OK).is_ok());
        let err = check_status("/analysis", StatusCode::CREATED).unwrap_err();
        assert_eq!(err.to_string(), "/analysis returned HTTP 201");
        assert!(!err.is_transport());
    }
}
