//! Photo to cartoon transformation.

use log::debug;
use reqwest::Method;
use serde::Deserialize;

use crate::config::{Config, mask_key};
use crate::http::{ApiError, ApiRequest, HttpClient, RequestBody, ResultKind, Transport, classify};
use crate::service::Service;
use crate::validate::{ImageFile, validate_file};

pub const API_KEY_HEADER: &str = "Api-Key";
pub const IMAGE_FIELD: &str = "image";

/// A finished transformation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cartoon {
    #[serde(default)]
    pub id: Option<String>,
    pub output_url: String,
}

/// Builds the upload request for `image`.
///
/// Fails without building anything when the key is unusable or the image
/// breaks a local rule.
pub fn build_request(config: &Config, image: &ImageFile) -> Result<ApiRequest, ApiError> {
    let key = match config.cartoonify_key.as_deref() {
        Some(key) if config.is_cartoonify_key_valid() => key,
        _ => return Err(ApiError::MissingCredential(Service::Cartoonify)),
    };

    let errors = validate_file(Some(image), config);
    if !errors.is_empty() {
        return Err(ApiError::InvalidFile(errors));
    }

    debug!(
        "Uploading {} ({} bytes) with key {}",
        image.name,
        image.size(),
        mask_key(key)
    );

    Ok(
        ApiRequest::new(Method::POST, config.cartoonify_endpoint.clone())
            .header(API_KEY_HEADER, key)
            .body(RequestBody::Multipart {
                field: IMAGE_FIELD.to_string(),
                file_name: image.name.clone(),
                mime_type: image.mime_type.clone(),
                bytes: image.bytes.clone(),
            }),
    )
}

/// Uploads `image` and returns the URL of the cartoonified result.
#[tracing::instrument(skip(config, http, image), fields(image = %image.name))]
pub async fn cartoonify<T: Transport>(
    config: &Config,
    http: &HttpClient<T>,
    image: &ImageFile,
) -> Result<Cartoon, ApiError> {
    let request = build_request(config, image)?;

    let value = http
        .send_json("Cartoonifying image", &request)
        .await
        .map_err(|e| classify(&e, ResultKind::Output))?;

    parse_response(value)
}

fn parse_response(value: serde_json::Value) -> Result<Cartoon, ApiError> {
    serde_json::from_value::<Cartoon>(value)
        .inspect_err(|e| debug!("Unexpected cartoonify response: {}", e))
        .ok()
        .filter(|cartoon| !cartoon.output_url.is_empty())
        .ok_or(ApiError::MissingUrl(ResultKind::Output))
}
