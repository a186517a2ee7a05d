//! Prediction service seam.
//!
//! The controller only talks to a [`PredictionService`]. Production code uses
//! [`HttpPredictionService`]; tests substitute an in-memory double.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::PredictionError;
use crate::types::{MaterialRecommendation, PredictRequest};

/// Something that turns requirement scores into ranked recommendations.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Issue one prediction. Exactly one attempt; no retries.
    async fn predict(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<MaterialRecommendation>, PredictionError>;
}

/// `POST {base_url}/predict` over reqwest.
pub struct HttpPredictionService {
    client: reqwest::Client,
    predict_url: String,
    timeout: Duration,
}

impl HttpPredictionService {
    pub fn from_config(config: &ClientConfig) -> Result<Self, PredictionError> {
        config.validate().map_err(PredictionError::Configuration)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PredictionError::Configuration(format!("http client: {e}")))?;
        Ok(Self {
            client,
            predict_url: config.predict_url(),
            timeout: config.request_timeout,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    fn map_transport_error(&self, err: reqwest::Error) -> PredictionError {
        if err.is_timeout() {
            PredictionError::Timeout(self.timeout)
        } else if err.is_decode() {
            PredictionError::Decode(err.to_string())
        } else {
            PredictionError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<MaterialRecommendation>, PredictionError> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.predict_url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %self.predict_url, "Prediction service error");
            return Err(PredictionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let recommendations: Vec<MaterialRecommendation> =
            serde_json::from_slice(&bytes).map_err(|e| PredictionError::Decode(e.to_string()))?;

        debug!(
            count = recommendations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Prediction response received"
        );

        if recommendations.is_empty() {
            return Err(PredictionError::EmptyResult);
        }
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_predict_url() {
        let cfg = ClientConfig::default().with_base_url("http://models.internal:5000/");
        let svc = HttpPredictionService::from_config(&cfg).unwrap();
        assert_eq!(svc.predict_url(), "http://models.internal:5000/predict");
    }

    #[test]
    fn from_config_rejects_invalid_url() {
        let cfg = ClientConfig::default().with_base_url("models.internal");
        let err = HttpPredictionService::from_config(&cfg).err().unwrap();
        assert_eq!(err.kind(), "configuration");
    }
}
