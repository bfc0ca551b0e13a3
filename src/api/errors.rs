use thiserror::Error;

/// Message shown when the backend gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401 or 403 from the backend; the session is no longer valid.
    #[error("session is not authorized")]
    Unauthorized,

    /// Record does not exist.
    #[error("record not found")]
    NotFound,

    /// The backend answered with `status: false`.
    #[error("backend rejected the request: {}", .0.as_deref().unwrap_or("no message"))]
    Application(Option<String>),

    /// Non-2xx status without a parseable error envelope.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not match any known response shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Text safe to show to the dashboard user.
    ///
    /// Server-provided messages are shown verbatim; everything else collapses
    /// to [`GENERIC_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Application(Some(message)) if !message.trim().is_empty() => message.clone(),
            ApiError::NotFound => "Record not found.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
