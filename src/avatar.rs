//! Avatar creation and lookup.

use log::debug;
use reqwest::Method;
use serde::Deserialize;

use crate::config::{Config, mask_key};
use crate::http::{
    ApiError, ApiRequest, HttpClient, RequestBody, ResultKind, Transport, classify, join_segments,
};
use crate::service::Service;

pub const KEY_HEADER: &str = "x-rapidapi-key";
pub const HOST_HEADER: &str = "x-rapidapi-host";

pub const DEFAULT_STYLE_ID: &str = "59";

/// A named avatar style offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarStyle {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const STYLES: &[AvatarStyle] = &[
    AvatarStyle {
        id: "59",
        name: "Classic Cartoon",
        description: "Traditional cartoon style",
    },
    AvatarStyle {
        id: "60",
        name: "Anime Style",
        description: "Japanese anime aesthetic",
    },
    AvatarStyle {
        id: "61",
        name: "Pixel Art",
        description: "Retro pixelated look",
    },
    AvatarStyle {
        id: "62",
        name: "Watercolor",
        description: "Soft watercolor painting",
    },
    AvatarStyle {
        id: "63",
        name: "Oil Painting",
        description: "Classic oil painting style",
    },
    AvatarStyle {
        id: "64",
        name: "Sketch",
        description: "Hand-drawn sketch style",
    },
    AvatarStyle {
        id: "65",
        name: "Pop Art",
        description: "Bold pop art colors",
    },
    AvatarStyle {
        id: "66",
        name: "Gothic",
        description: "Dark gothic aesthetic",
    },
];

/// Looks up a catalog style. Unknown ids are still valid to send.
pub fn find_style(id: &str) -> Option<&'static AvatarStyle> {
    STYLES.iter().find(|s| s.id == id)
}

/// An avatar as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub avatar_id: String,
    pub avatar_url: String,
}

/// Body of a create or get response.
#[derive(Debug, Deserialize)]
struct AvatarResponse {
    avatar_url: String,
}

fn avatar_key(config: &Config) -> Result<&str, ApiError> {
    match config.avatar_key.as_deref() {
        Some(key) if config.is_avatar_key_valid() => Ok(key),
        _ => Err(ApiError::MissingCredential(Service::Avatar)),
    }
}

fn avatar_id(avatar_id: &str) -> Result<&str, ApiError> {
    let trimmed = avatar_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::EmptyAvatarId);
    }
    Ok(trimmed)
}

fn with_auth(request: ApiRequest, config: &Config, key: &str) -> ApiRequest {
    request
        .header(KEY_HEADER, key)
        .header(HOST_HEADER, config.avatar_host.as_str())
}

/// Builds `PUT {endpoint}/{avatar_id}/{style_id}` with an empty JSON body.
pub fn build_create_request(
    config: &Config,
    avatar_id_raw: &str,
    style_id: &str,
) -> Result<ApiRequest, ApiError> {
    let key = avatar_key(config)?;
    let id = avatar_id(avatar_id_raw)?;

    debug!(
        "Creating avatar {} in style {} with key {}",
        id,
        style_id,
        mask_key(key)
    );

    let url = join_segments(&config.avatar_endpoint, &[id, style_id]);
    Ok(with_auth(ApiRequest::new(Method::PUT, url), config, key)
        .header("Content-Type", "application/json")
        .body(RequestBody::Json(serde_json::json!({}))))
}

/// Builds `GET {endpoint}/{avatar_id}`.
pub fn build_get_request(config: &Config, avatar_id_raw: &str) -> Result<ApiRequest, ApiError> {
    let key = avatar_key(config)?;
    let id = avatar_id(avatar_id_raw)?;

    debug!("Fetching avatar {} with key {}", id, mask_key(key));

    let url = join_segments(&config.avatar_endpoint, &[id]);
    Ok(with_auth(ApiRequest::new(Method::GET, url), config, key))
}

/// Creates (or restyles) the avatar `avatar_id`.
#[tracing::instrument(skip(config, http))]
pub async fn create_avatar<T: Transport>(
    config: &Config,
    http: &HttpClient<T>,
    avatar_id: &str,
    style_id: &str,
) -> Result<Avatar, ApiError> {
    let request = build_create_request(config, avatar_id, style_id)?;
    send(http, "Creating avatar", &request, avatar_id).await
}

/// Retrieves the existing avatar `avatar_id`.
#[tracing::instrument(skip(config, http))]
pub async fn get_avatar<T: Transport>(
    config: &Config,
    http: &HttpClient<T>,
    avatar_id: &str,
) -> Result<Avatar, ApiError> {
    let request = build_get_request(config, avatar_id)?;
    send(http, "Fetching avatar", &request, avatar_id).await
}

async fn send<T: Transport>(
    http: &HttpClient<T>,
    operation_name: &str,
    request: &ApiRequest,
    avatar_id: &str,
) -> Result<Avatar, ApiError> {
    let value = http
        .send_json(operation_name, request)
        .await
        .map_err(|e| classify(&e, ResultKind::Avatar))?;

    let response = serde_json::from_value::<AvatarResponse>(value)
        .inspect_err(|e| debug!("Unexpected avatar response: {}", e))
        .ok()
        .filter(|response| !response.avatar_url.is_empty())
        .ok_or(ApiError::MissingUrl(ResultKind::Avatar))?;

    Ok(Avatar {
        avatar_id: avatar_id.trim().to_string(),
        avatar_url: response.avatar_url,
    })
}
