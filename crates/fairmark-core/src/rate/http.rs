//! HTTP-backed rate source.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;

use crate::rate::source::{RateError, RateObservation, RateSource};
use crate::rate::RateSourceId;
use crate::UtcDateTime;

/// Expected payload of the rate endpoint.
#[derive(Debug, Deserialize)]
struct RatePayload {
    annual_rate: f64,
    as_of: String,
}

/// Rate source backed by a central-bank style JSON endpoint.
///
/// The endpoint is expected to answer
/// `GET {base_url}?series=<series>&format=json` with
/// `{"annual_rate": 0.16, "as_of": "2025-06-01T00:00:00Z"}`.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    base_url: String,
    series: String,
    timeout: Duration,
}

impl HttpRateSource {
    pub fn new(base_url: impl Into<String>, series: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            series: series.into(),
            timeout: Duration::from_secs(3),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a preconfigured `reqwest::Client` instead of the default one.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}?series={}&format=json",
            self.base_url,
            urlencoding::encode(&self.series)
        )
    }

    async fn fetch_payload(&self) -> Result<RateObservation, RateError> {
        let response = self
            .client
            .get(self.request_url())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    RateError::timeout(format!("rate endpoint timed out: {error}"))
                } else {
                    RateError::unavailable(format!("rate endpoint unreachable: {error}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::unavailable(format!(
                "rate endpoint returned status {status}"
            )));
        }

        let payload: RatePayload = response.json().await.map_err(|error| {
            RateError::malformed_response(format!("rate payload did not parse: {error}"))
        })?;

        let as_of = UtcDateTime::parse(&payload.as_of).map_err(|error| {
            RateError::malformed_response(format!("rate as_of is not RFC3339 UTC: {error}"))
        })?;

        RateObservation::new(payload.annual_rate, as_of)
    }
}

impl RateSource for HttpRateSource {
    fn id(&self) -> RateSourceId {
        RateSourceId::CentralBank
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RateObservation, RateError>> + Send + 'a>> {
        Box::pin(self.fetch_payload())
    }
}
