use thiserror::Error;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again in a moment.";
pub const QUOTA_MESSAGE: &str = "AI credits exhausted. Please add credits to continue.";

#[derive(Debug, Error)]
pub enum SiteGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,
    #[error("{}", QUOTA_MESSAGE)]
    QuotaExhausted,
    #[error("AI Gateway error: {status} {message}")]
    UpstreamError { status: u16, message: String },
    #[error("Invalid response format from AI: {0}")]
    MalformedResponse(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SiteGenError {
    /// HTTP status reported to the caller for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SiteGenError::RateLimited => 429,
            SiteGenError::QuotaExhausted => 402,
            SiteGenError::InvalidRequest(_) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteGenError>;

#[cfg(feature = "server")]
impl actix_web::ResponseError for SiteGenError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(SiteGenError::status_code(self))
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(actix_web::ResponseError::status_code(self))
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
