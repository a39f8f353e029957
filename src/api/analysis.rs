use super::client::{check_status, ApiClient, ApiError};
use super::types::AnalysisResponse;
use crate::scoring::NormalizedPayload;

const ENDPOINT: &str = "/analysis";

impl ApiClient {
    /// `POST /analysis`. Sent once; submissions are never retried.
    pub async fn analyze(&self, payload: &NormalizedPayload) -> Result<AnalysisResponse, ApiError> {
        let url = self.endpoint_url(ENDPOINT, &[])?;
        tracing::debug!(
            subjects = payload.points.len(),
            faculties = payload.faculties.len(),
            "submitting analysis"
        );

        let response = self
            .http()
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: ENDPOINT,
                source: e,
            })?;

        check_status(ENDPOINT, response.status())?;

        response
            .json::<AnalysisResponse>()
            .await
            .map_err(|e| ApiError::Decode {
                endpoint: ENDPOINT,
                source: e,
            })
    }
}
