//! HTTP client module with retry logic and error handling.

mod client;
mod error;
mod request;
mod retry;
mod transport;

pub use client::HttpClient;
pub use error::{ApiError, RequestFailure, ResultKind, classify, classify_status};
pub use request::{ApiRequest, RequestBody, join_segments};
pub use retry::{BASE_DELAY_MS, MAX_DELAY_MS, RetryPolicy, with_retry};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{ReqwestTransport, Transport};
