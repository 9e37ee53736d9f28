use thiserror::Error;

/// Every way a client action can fail.
///
/// The variants follow the three failure classes the UI distinguishes:
/// validation (blocked before any request), transport (network, HTTP status,
/// timeout, undecodable body) and application (`success: false`).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("endpoint not configured: {0}")]
    MissingEndpoint(&'static str),

    #[error("network error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    #[error("request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("rejected by server: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Text for the toast shown to the user.
    ///
    /// Server messages are shown verbatim; otherwise the caller's fallback
    /// for the failure class is used.
    pub fn user_message(&self, rejected_fallback: &str, transport_fallback: &str) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Rejected { message: Some(msg) } => msg.clone(),
            ClientError::Rejected { message: None } => rejected_fallback.to_owned(),
            _ => transport_fallback.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::Rejected {
            message: Some("Out of stock".into()),
        };
        assert_eq!(err.user_message("Failed", "An error occurred"), "Out of stock");
    }

    #[test]
    fn transport_failures_use_the_generic_fallback() {
        let err = ClientError::Timeout { after_ms: 15_000 };
        assert_eq!(err.user_message("Failed", "An error occurred"), "An error occurred");

        let err = ClientError::Rejected { message: None };
        assert_eq!(err.user_message("Failed", "An error occurred"), "Failed");
    }
}
