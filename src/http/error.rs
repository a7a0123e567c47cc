//! Failure outcomes and their user-facing classification.

use reqwest::StatusCode;

use crate::service::Service;

/// Raw outcome of one failed attempt.
///
/// This is what the retry loop sees. It is converted into an [`ApiError`]
/// exactly once, after retrying has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// The server answered with a non-success status.
    Status { status: StatusCode, body: String },
    /// No response arrived within the transport timeout.
    Timeout,
    /// No response at all (DNS, refused connection, reset, TLS...).
    Network(String),
    /// A success status whose body could not be decoded as JSON.
    InvalidBody(String),
}

impl RequestFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Client errors are permanent, except 429 which clears with time.
    /// An undecodable success body will not change on retry either.
    pub fn is_retryable(&self) -> bool {
        match self {
            RequestFailure::Status { status, .. } => {
                !status.is_client_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            RequestFailure::Timeout | RequestFailure::Network(_) => true,
            RequestFailure::InvalidBody(_) => false,
        }
    }
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestFailure::Status { status, .. } => write!(f, "HTTP {}", status),
            RequestFailure::Timeout => write!(f, "request timed out"),
            RequestFailure::Network(msg) => write!(f, "network failure: {}", msg),
            RequestFailure::InvalidBody(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

impl std::error::Error for RequestFailure {}

impl From<reqwest::Error> for RequestFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RequestFailure::Timeout
        } else if error.is_decode() {
            RequestFailure::InvalidBody(error.to_string())
        } else if let Some(status) = error.status() {
            RequestFailure::Status {
                status,
                body: String::new(),
            }
        } else {
            RequestFailure::Network(error.to_string())
        }
    }
}

/// Which result field a flow expected but did not receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Output,
    Avatar,
}

/// Every error a caller of this crate can observe.
///
/// All variants are recoverable by the user; the message is meant to be
/// shown as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service key is absent or is a known placeholder.
    MissingCredential(Service),
    /// The upload failed local validation.
    InvalidFile(Vec<String>),
    /// The avatar identifier is empty.
    EmptyAvatarId,
    /// HTTP 400.
    UnsupportedImage,
    /// HTTP 401.
    InvalidKey,
    /// HTTP 403.
    AccessDenied,
    /// HTTP 404.
    NotFound,
    /// HTTP 429.
    RateLimited,
    /// HTTP 500, 502, 503.
    ServerError(u16),
    /// HTTP 504.
    Timeout,
    /// No response from the server, including a transport timeout.
    Network,
    /// Any other status.
    Unexpected(u16),
    /// A success response without the expected URL.
    MissingUrl(ResultKind),
    /// A file operation while saving a result failed.
    Save(String),
}

impl ApiError {
    /// Whether this error came from a local check, before any request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::MissingCredential(_) | ApiError::InvalidFile(_) | ApiError::EmptyAvatarId
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MissingCredential(service) => write!(
                f,
                "No {} API key configured. Please add your key to the .env file ({}).",
                service,
                service.key_var()
            ),
            ApiError::InvalidFile(errors) => write!(f, "{}", errors.join(" ")),
            ApiError::EmptyAvatarId => write!(f, "Please enter a valid Avatar ID."),
            ApiError::UnsupportedImage => {
                write!(f, "Unsupported image format. Please try a different image.")
            }
            ApiError::InvalidKey => write!(f, "API key is invalid or expired."),
            ApiError::AccessDenied => write!(f, "Access denied. Please check your API key."),
            ApiError::NotFound => {
                write!(f, "Service not found. Please check the API endpoint.")
            }
            ApiError::RateLimited => {
                write!(f, "Rate limit exceeded. Please wait a moment and try again.")
            }
            ApiError::ServerError(_) => write!(f, "Server error. Please try again later."),
            ApiError::Timeout => write!(f, "Request timed out. Please try again."),
            ApiError::Network => {
                write!(f, "Network error. Please check your internet connection.")
            }
            ApiError::Unexpected(status) => {
                write!(f, "Request failed (HTTP {}). Please try again.", status)
            }
            ApiError::MissingUrl(ResultKind::Output) => {
                write!(f, "No output URL received from API.")
            }
            ApiError::MissingUrl(ResultKind::Avatar) => {
                write!(f, "No avatar URL received from API.")
            }
            ApiError::Save(msg) => write!(f, "Failed to save image: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Maps a failed attempt to exactly one user-facing error.
///
/// Only a gateway 504 is reported as a timeout; a request that got no
/// response at all, timed out or not, is a network error.
///
/// `kind` only matters for [`RequestFailure::InvalidBody`], which is reported
/// like a success that lacked its URL.
pub fn classify(failure: &RequestFailure, kind: ResultKind) -> ApiError {
    match failure {
        RequestFailure::Status { status, .. } => classify_status(*status),
        RequestFailure::Timeout | RequestFailure::Network(_) => ApiError::Network,
        RequestFailure::InvalidBody(_) => ApiError::MissingUrl(kind),
    }
}

/// Maps an HTTP status to its user-facing error.
pub fn classify_status(status: StatusCode) -> ApiError {
    match status.as_u16() {
        400 => ApiError::UnsupportedImage,
        401 => ApiError::InvalidKey,
        403 => ApiError::AccessDenied,
        404 => ApiError::NotFound,
        429 => ApiError::RateLimited,
        code @ (500 | 502 | 503) => ApiError::ServerError(code),
        504 => ApiError::Timeout,
        code => ApiError::Unexpected(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn status(code: u16) -> RequestFailure {
        RequestFailure::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_classify_documented_codes() {
        let cases = [
            (400, ApiError::UnsupportedImage),
            (401, ApiError::InvalidKey),
            (403, ApiError::AccessDenied),
            (404, ApiError::NotFound),
            (429, ApiError::RateLimited),
            (500, ApiError::ServerError(500)),
            (502, ApiError::ServerError(502)),
            (503, ApiError::ServerError(503)),
            (504, ApiError::Timeout),
        ];

        for (code, expected) in cases {
            let err = classify(&status(code), ResultKind::Output);
            assert_eq!(err, expected, "HTTP {}", code);
            assert!(!matches!(err, ApiError::Unexpected(_)));
        }
    }

    #[test]
    fn test_classifier_is_total_with_distinct_messages() {
        let mut failures: Vec<RequestFailure> = [400, 401, 403, 404, 429, 500, 502, 503, 504, 418]
            .into_iter()
            .map(status)
            .collect();
        failures.push(RequestFailure::Network("connection refused".to_string()));

        let messages: Vec<String> = failures
            .iter()
            .map(|f| classify(f, ResultKind::Output).to_string())
            .collect();

        for message in &messages {
            assert!(!message.is_empty());
        }

        // 500/502/503 share a message on purpose; everything else is distinct.
        let distinct: HashSet<&String> = messages.iter().collect();
        assert_eq!(distinct.len(), messages.len() - 2);
    }

    #[test]
    fn test_classify_unrecognized_status() {
        let err = classify(&status(418), ResultKind::Avatar);
        assert_eq!(err, ApiError::Unexpected(418));
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_classify_transport_failures() {
        assert_eq!(
            classify(&RequestFailure::Network("dns".into()), ResultKind::Output),
            ApiError::Network
        );
        assert_eq!(
            classify(&RequestFailure::Timeout, ResultKind::Output),
            ApiError::Network
        );
        assert!(RequestFailure::Timeout.is_retryable());
        assert_eq!(
            classify(&RequestFailure::InvalidBody("eof".into()), ResultKind::Avatar),
            ApiError::MissingUrl(ResultKind::Avatar)
        );
    }

    #[test]
    fn test_retryable_failures() {
        for code in [429, 500, 502, 503, 504] {
            assert!(status(code).is_retryable(), "HTTP {}", code);
        }
        for code in [400, 401, 403, 404, 418] {
            assert!(!status(code).is_retryable(), "HTTP {}", code);
        }
        assert!(RequestFailure::Timeout.is_retryable());
        assert!(RequestFailure::Network("reset".into()).is_retryable());
        assert!(!RequestFailure::InvalidBody("eof".into()).is_retryable());
    }

    #[test]
    fn test_validation_errors() {
        assert!(ApiError::MissingCredential(Service::Avatar).is_validation());
        assert!(ApiError::EmptyAvatarId.is_validation());
        assert!(ApiError::InvalidFile(vec![]).is_validation());
        assert!(!ApiError::RateLimited.is_validation());
    }

    #[test]
    fn test_missing_credential_message_names_variable() {
        let msg = ApiError::MissingCredential(Service::Cartoonify).to_string();
        assert!(msg.contains("DeepAI"));
        assert!(msg.contains("DEEPAI_API_KEY"));
    }
}
