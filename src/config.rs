//! Static configuration and credential checks.
//!
//! A [`Config`] is built once at startup and passed by reference to every
//! component that needs it. Nothing in the crate reads the environment after
//! that point.

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

use crate::service::Service;

pub const DEFAULT_CARTOONIFY_ENDPOINT: &str = "https://api.deepai.org/api/toonify";
pub const DEFAULT_AVATAR_ENDPOINT: &str = "https://doppelme-avatars.p.rapidapi.com/avatar";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Keys shorter than or equal to this are rejected outright.
const MIN_KEY_LEN: usize = 10;

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cartoonify_endpoint: Url,
    pub cartoonify_key: Option<String>,
    pub avatar_endpoint: Url,
    /// Value of the `x-rapidapi-host` header.
    pub avatar_host: String,
    pub avatar_key: Option<String>,
    pub max_file_size: u64,
    pub allowed_types: Vec<String>,
    /// Per-attempt transport timeout.
    pub timeout: Duration,
    /// Total number of attempts, including the first one.
    pub max_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        let avatar_endpoint =
            Url::parse(DEFAULT_AVATAR_ENDPOINT).expect("default avatar endpoint is a valid URL");
        let avatar_host = avatar_endpoint.host_str().unwrap_or_default().to_string();

        Self {
            cartoonify_endpoint: Url::parse(DEFAULT_CARTOONIFY_ENDPOINT)
                .expect("default cartoonify endpoint is a valid URL"),
            cartoonify_key: None,
            avatar_endpoint,
            avatar_host,
            avatar_key: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(e).context("Failed to read .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Each variable is also looked up with a `VITE_` prefix, which is how
    /// the web front end's `.env` files spell them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("VITE_{}", key)))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        config.cartoonify_key = get(Service::Cartoonify.key_var());
        config.avatar_key = get(Service::Avatar.key_var());

        if let Some(endpoint) = get("DEEPAI_API_ENDPOINT") {
            config.cartoonify_endpoint = parse_endpoint("DEEPAI_API_ENDPOINT", &endpoint)?;
        }

        if let Some(endpoint) = get("DOPPELME_API_ENDPOINT") {
            config.avatar_endpoint = parse_endpoint("DOPPELME_API_ENDPOINT", &endpoint)?;
            config.avatar_host = config
                .avatar_endpoint
                .host_str()
                .unwrap_or_default()
                .to_string();
        }

        if let Some(host) = get("DOPPELME_API_HOST") {
            config.avatar_host = host;
        }

        if let Some(timeout) = get("API_TIMEOUT") {
            let ms: u64 = timeout
                .parse()
                .with_context(|| format!("API_TIMEOUT must be milliseconds, got '{}'", timeout))?;
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(retries) = get("MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .with_context(|| format!("MAX_RETRIES must be a number, got '{}'", retries))?;
        }

        if let Some(size) = get("MAX_FILE_SIZE") {
            config.max_file_size = size
                .parse()
                .with_context(|| format!("MAX_FILE_SIZE must be bytes, got '{}'", size))?;
        }

        config.check()?;
        Ok(config)
    }

    /// Rejects settings no request could succeed with.
    pub fn check(&self) -> Result<()> {
        if self.max_retries == 0 {
            bail!("MAX_RETRIES must be at least 1");
        }
        if self.timeout.is_zero() {
            bail!("API_TIMEOUT must be greater than zero");
        }
        Ok(())
    }

    /// Returns the key configured for `service`, if any.
    pub fn key(&self, service: Service) -> Option<&str> {
        match service {
            Service::Cartoonify => self.cartoonify_key.as_deref(),
            Service::Avatar => self.avatar_key.as_deref(),
        }
    }

    pub fn is_cartoonify_key_valid(&self) -> bool {
        is_credential_valid(Service::Cartoonify, self.cartoonify_key.as_deref())
    }

    pub fn is_avatar_key_valid(&self) -> bool {
        is_credential_valid(Service::Avatar, self.avatar_key.as_deref())
    }

    /// Whether each feature is usable with the current keys.
    pub fn feature_status(&self) -> Vec<FeatureStatus> {
        Service::ALL
            .into_iter()
            .map(|service| FeatureStatus {
                service,
                enabled: is_credential_valid(service, self.key(service)),
            })
            .collect()
    }
}

fn parse_endpoint(var: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", var, value))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        bail!("{} must be an http(s) URL, got '{}'", var, value);
    }
    Ok(url)
}

/// Decides whether a credential looks usable for `service`.
///
/// Valid keys are longer than ten characters, are not one of the service's
/// known sample values and do not follow the `your_*_key_here` template.
/// No network call is made.
pub fn is_credential_valid(service: Service, key: Option<&str>) -> bool {
    match key {
        Some(key) => {
            key.chars().count() > MIN_KEY_LEN
                && !service.placeholders().contains(&key)
                && !is_template_placeholder(key)
        }
        None => false,
    }
}

/// Matches `your_..._key_here` in any letter case.
fn is_template_placeholder(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("your_") && key.ends_with("key_here")
}

/// Masks a secret for log output, keeping only its first and last characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

/// Availability of one feature, derived from the configured key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureStatus {
    pub service: Service,
    pub enabled: bool,
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "{}: API key configured", self.service)
        } else {
            write!(
                f,
                "{}: API key is missing or invalid. Get one at {} and set {} in your .env file.",
                self.service,
                self.service.signup_url(),
                self.service.key_var()
            )
        }
    }
}
