//! LLM error types.

/// Errors from the text generation layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The provider answered HTTP 429.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The provider returned a non-2xx status other than 429.
    #[error("LLM API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response did not contain generated text.
    #[error("Invalid response from LLM: {0}")]
    InvalidResponse(String),

    /// No API key was configured.
    #[error("LLM API key is not configured")]
    MissingApiKey,
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limited_is_rate_limit() {
        assert!(LlmError::RateLimited.is_rate_limit());
        assert!(!LlmError::ApiError {
            status: 500,
            body: String::new()
        }
        .is_rate_limit());
        assert!(!LlmError::InvalidResponse("x".into()).is_rate_limit());
    }

    #[test]
    fn rate_limit_message_is_user_facing() {
        assert_eq!(
            LlmError::RateLimited.to_string(),
            "Rate limit exceeded. Please try again later."
        );
    }
}
