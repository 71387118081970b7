use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response body was empty")]
    NoData,

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("unexpected status code: {0}")]
    InvalidStatusCode(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether the server rejected the credentials themselves, as opposed
    /// to the request failing for infrastructure reasons.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::InvalidStatusCode(401 | 403))
    }
}
