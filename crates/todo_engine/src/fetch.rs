use std::time::Duration;

use bytes::BytesMut;
use engine_logging::{engine_debug, engine_error};
use futures_util::StreamExt;
use reqwest::StatusCode;
use todo_core::{FetchTarget, RunConfig};
use tokio_util::sync::CancellationToken;

use crate::{FailureKind, FetchError, FetchOutput};

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: MAX_CONNECT_TIMEOUT,
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl FetchSettings {
    /// The run's http timeout bounds the whole request; connecting gets at
    /// most ten seconds of it.
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            connect_timeout: config.http_timeout.min(MAX_CONNECT_TIMEOUT),
            request_timeout: config.http_timeout,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a single GET. Resolves to `Cancelled` as soon as `cancel`
    /// fires, whether or not the request was already sent.
    async fn fetch(
        &self,
        target: &FetchTarget,
        cancel: &CancellationToken,
    ) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    async fn get(&self, url: reqwest::Url, target: &FetchTarget) -> Result<FetchOutput, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            engine_error!("Response endpoint={} status={}", target, status.as_u16());
            return Err(FetchError::new(
                FailureKind::NonSuccessStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchOutput {
            bytes: body.freeze(),
            status: status.as_u16(),
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        target: &FetchTarget,
        cancel: &CancellationToken,
    ) -> Result<FetchOutput, FetchError> {
        let url = reqwest::Url::parse(target.as_str())
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        engine_debug!("GET endpoint={}", target);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(FetchError::new(FailureKind::Cancelled, "context cancelled"))
            }
            result = self.get(url, target) => result,
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
