//! HTTP client with built-in retry logic and error handling.

use log::debug;
use reqwest::Url;
use std::path::Path;

use super::error::{ApiError, RequestFailure, ResultKind, classify};
use super::request::ApiRequest;
use super::retry::{RetryPolicy, with_retry};
use super::transport::Transport;

/// Wraps a [`Transport`] with the retry policy.
#[derive(Clone)]
pub struct HttpClient<T: Transport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends `request`, retrying transient failures.
    ///
    /// The raw failure of the last attempt is returned; callers classify it.
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn send_json(
        &self,
        operation_name: &str,
        request: &ApiRequest,
    ) -> Result<serde_json::Value, RequestFailure> {
        with_retry(&self.policy, operation_name, || self.transport.execute(request)).await
    }

    /// Downloads `url` into `path`, retrying transient failures.
    /// Returns the number of bytes written.
    #[tracing::instrument(skip(self))]
    pub async fn download_file(&self, url: &Url, path: &Path) -> Result<u64, ApiError> {
        let bytes = with_retry(&self.policy, "Downloading image", || self.transport.fetch(url))
            .await
            .map_err(|e| classify(&e, ResultKind::Output))?;

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| ApiError::Save(format!("{}: {}", path.display(), e)))?;

        debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(bytes.len() as u64)
    }
}
