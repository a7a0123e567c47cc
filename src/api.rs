//! Entry point that ties the configuration to the HTTP client.

use anyhow::Result;
use reqwest::Url;
use std::path::Path;

use crate::avatar::{self, Avatar};
use crate::cartoon::{self, Cartoon};
use crate::config::{Config, FeatureStatus};
use crate::http::{ApiError, HttpClient, ReqwestTransport, RetryPolicy, Transport};
use crate::validate::ImageFile;

/// Client for both services, built once from a [`Config`].
pub struct Toonify<T: Transport = ReqwestTransport> {
    config: Config,
    http: HttpClient<T>,
}

impl Toonify<ReqwestTransport> {
    pub fn new(config: Config) -> Result<Self> {
        config.check()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Toonify<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        let http = HttpClient::new(transport, RetryPolicy::from_config(&config));
        Self { config, http }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    pub fn feature_status(&self) -> Vec<FeatureStatus> {
        self.config.feature_status()
    }

    pub async fn cartoonify(&self, image: &ImageFile) -> Result<Cartoon, ApiError> {
        cartoon::cartoonify(&self.config, &self.http, image).await
    }

    pub async fn create_avatar(&self, avatar_id: &str, style_id: &str) -> Result<Avatar, ApiError> {
        avatar::create_avatar(&self.config, &self.http, avatar_id, style_id).await
    }

    pub async fn get_avatar(&self, avatar_id: &str) -> Result<Avatar, ApiError> {
        avatar::get_avatar(&self.config, &self.http, avatar_id).await
    }

    /// Saves the image behind a result URL to `path`.
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64, ApiError> {
        let url = Url::parse(url)
            .map_err(|e| ApiError::Save(format!("invalid image URL '{}': {}", url, e)))?;
        self.http.download_file(&url, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::service::Service;

    #[test]
    fn test_new_rejects_zero_retries() {
        let config = Config {
            max_retries: 0,
            ..Config::default()
        };
        assert!(Toonify::new(config).is_err());
    }

    #[test]
    fn test_policy_follows_config() {
        let config = Config {
            max_retries: 7,
            ..Config::default()
        };
        let client = Toonify::with_transport(config, MockTransport::new());
        assert_eq!(client.http().policy().max_attempts, 7);
    }

    #[tokio::test]
    async fn test_unconfigured_client_reports_missing_keys() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);
        let client = Toonify::with_transport(Config::default(), transport);

        assert!(client.feature_status().iter().all(|s| !s.enabled));

        let image = ImageFile::new("a.png", "image/png", vec![1, 2, 3]);
        assert_eq!(
            client.cartoonify(&image).await.unwrap_err(),
            ApiError::MissingCredential(Service::Cartoonify)
        );
        assert_eq!(
            client.create_avatar("DM1", "59").await.unwrap_err(),
            ApiError::MissingCredential(Service::Avatar)
        );
        assert_eq!(
            client.get_avatar("DM1").await.unwrap_err(),
            ApiError::MissingCredential(Service::Avatar)
        );
    }

    #[tokio::test]
    async fn test_download_rejects_unparseable_url() {
        let mut transport = MockTransport::new();
        transport.expect_fetch().times(0);
        let client = Toonify::with_transport(Config::default(), transport);

        let dir = tempfile::tempdir().unwrap();
        let err = client
            .download("not a url", &dir.path().join("x.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Save(_)));
    }
}
