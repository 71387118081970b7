//! API client for the QuickBite login endpoint.
//!
//! Authentication is a single GET against `/api/login` with the email and
//! password as query parameters; the server answers with a JSON session
//! payload. The client returns the raw body and leaves decoding to the
//! caller.

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use super::ApiError;

/// Base URL for the authentication endpoint
const AUTH_BASE_URL: &str = "https://api.quickbite.dev";

/// Login endpoint path
const LOGIN_PATH: &str = "/api/login";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Issues the login request. The login flow is generic over this trait so
/// scenario tests can count calls and stub responses.
pub trait AuthService {
    /// Send one login request. No retries; errors surface to the caller.
    async fn login(&self, email: &str, password: &str) -> Result<Vec<u8>, ApiError>;
}

/// API client for QuickBite.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client against the production endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(AUTH_BASE_URL)
    }

    /// Create a client against a custom base URL (staging, local server)
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }
}

impl AuthService for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Vec<u8>, ApiError> {
        let url = self
            .base_url
            .join(LOGIN_PATH)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", LOGIN_PATH, e)))?;

        debug!(%url, "Sending login request");

        let response = self
            .client
            .get(url)
            .query(&[("email", email), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "Login request rejected");
            return Err(ApiError::InvalidStatusCode(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::NoData);
        }

        Ok(bytes.to_vec())
    }
}
