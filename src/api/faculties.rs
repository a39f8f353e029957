use super::client::{check_status, ApiClient, ApiError};
use super::types::FacultyPage;
use crate::search::{FacultySource, QueryParams};
use futures::future::{BoxFuture, FutureExt};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

const ENDPOINT: &str = "/faculties";

impl ApiClient {
    /// `GET /faculties`, retried on connection failures.
    pub async fn search_faculties(&self, params: &QueryParams) -> Result<FacultyPage, ApiError> {
        let url = self.endpoint_url(ENDPOINT, &params.to_pairs())?;

        // Retry strategy: exponential backoff with 3 attempts
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        RetryIf::spawn(
            retry_strategy,
            || {
                let url = url.clone();
                async move {
                    tracing::debug!(%url, "fetching faculties");
                    let response = self.http().get(url).send().await.map_err(|e| {
                        ApiError::Transport {
                            endpoint: ENDPOINT,
                            source: e,
                        }
                    })?;

                    check_status(ENDPOINT, response.status())?;

                    response
                        .json::<FacultyPage>()
                        .await
                        .map_err(|e| ApiError::Decode {
                            endpoint: ENDPOINT,
                            source: e,
                        })
                }
            },
            |e: &ApiError| {
                let retry = e.is_transport();
                if retry {
                    tracing::debug!("retrying faculty search: {}", e);
                }
                retry
            },
        )
        .await
    }
}

impl FacultySource for ApiClient {
    fn fetch(&self, params: QueryParams) -> BoxFuture<'static, Result<FacultyPage, ApiError>> {
        let client = self.clone();
        async move { client.search_faculties(&params).await }.boxed()
    }
}
