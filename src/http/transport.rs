//! The seam between request descriptors and the network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use super::error::RequestFailure;
use super::request::{ApiRequest, RequestBody};
use crate::config::Config;

const USER_AGENT: &str = concat!("toonify/", env!("TOONIFY_VERSION"));

/// Sends a single request, without retrying.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and decodes a successful response as JSON.
    async fn execute(&self, request: &ApiRequest) -> Result<serde_json::Value, RequestFailure>;

    /// Fetches the raw bytes behind `url`.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, RequestFailure>;
}

/// [`Transport`] backed by a reqwest [`Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client whose per-request timeout comes from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    fn build(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart {
                field,
                file_name,
                mime_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                let part = match part.mime_str(mime_type) {
                    Ok(part) => part,
                    Err(e) => {
                        debug!("Sending part without content type ({})", e);
                        Part::bytes(bytes.clone()).file_name(file_name.clone())
                    }
                };
                builder.multipart(Form::new().part(field.clone(), part))
            }
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: &ApiRequest) -> Result<serde_json::Value, RequestFailure> {
        debug!("{} {}...", request.method, request.url);

        let response = self.build(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} {} returned {}: {}", request.method, request.url, status, body);
            return Err(RequestFailure::Status { status, body });
        }

        let value = response.json::<serde_json::Value>().await?;
        Ok(value)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, RequestFailure> {
        debug!("Downloading {}...", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestFailure::Status { status, body });
        }

        let bytes = response.bytes().await?;
        debug!(
            "Downloaded {:.2} MB",
            bytes.len() as f64 / (1024.0 * 1024.0)
        );
        Ok(bytes.to_vec())
    }
}
