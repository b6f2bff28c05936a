//! Error taxonomy for the provider capability boundary.
//!
//! Raw transport errors (reqwest, serde) never cross this boundary; every
//! failure is re-wrapped into one of the variants below with a readable
//! message. Callers match on the kind, not on backend-specific detail.

/// A failure surfaced by an LLM provider adapter.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The backend did not respond within its configured deadline.
    #[error("{0}")]
    Timeout(String),

    /// The backend was unreachable.
    #[error("{0}")]
    ConnectionFailed(String),

    /// The backend was reachable but returned a failure status or a payload
    /// that could not be interpreted.
    #[error("{0}")]
    Backend(String),

    /// The caller violated the capability contract; detected before any
    /// network call is made.
    #[error("{0}")]
    InvalidInput(String),
}

impl LlmError {
    /// Classify a reqwest transport error into the capability taxonomy.
    ///
    /// `backend` names the provider for the human-readable message
    /// (e.g. `"Ollama"`).
    pub(crate) fn from_transport(backend: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(format!("{backend} timed out while generating a response."))
        } else if err.is_connect() {
            LlmError::ConnectionFailed(format!(
                "Could not connect to {backend}. Is it running and reachable?"
            ))
        } else {
            LlmError::Backend(format!("{backend} request failed: {err}"))
        }
    }
}
