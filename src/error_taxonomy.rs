//! Shared error taxonomy across client, engine, and UI.

use thiserror::Error;

/// Generic message surfaced to the user when a submission fails.
///
/// The display layer never sees the underlying cause; the typed error and
/// its category stay internal for logs and tests.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Could not get a response from the analysis service. Try again.";

/// Message surfaced when the prompt is rejected before any network call.
pub const PROMPT_REQUIRED_MESSAGE: &str = "prompt required";

/// Broad category for typed error handling and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidInput,
    Network,
    Status,
    Decode,
}

/// Failure of a single analysis attempt.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Prompt was empty or whitespace-only; detected locally.
    #[error("prompt is empty")]
    InvalidPrompt,

    /// Network-level failure: connection refused, timeout, DNS.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response arrived with a non-success status.
    #[error("service returned HTTP {status}")]
    Status { status: u16 },

    /// 2xx response whose body did not match the expected shape.
    #[error("failed to decode service response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl AnalysisError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::InvalidPrompt => ErrorCategory::InvalidInput,
            AnalysisError::Transport(_) => ErrorCategory::Network,
            AnalysisError::Status { .. } => ErrorCategory::Status,
            AnalysisError::Decode(_) => ErrorCategory::Decode,
        }
    }

    /// Whether retrying the identical request can plausibly succeed.
    ///
    /// Transport and status failures are transient; an invalid prompt or a
    /// decode mismatch will fail the same way every time.
    #[must_use]
    pub fn recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Transport(_) | AnalysisError::Status { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_status_are_recoverable() {
        let status = AnalysisError::Status { status: 503 };
        assert!(status.recoverable());
        assert_eq!(status.category(), ErrorCategory::Status);
    }

    #[test]
    fn decode_and_invalid_prompt_are_not_recoverable() {
        let decode = AnalysisError::Decode(
            serde_json::from_str::<serde_json::Value>("not json").unwrap_err(),
        );
        assert!(!decode.recoverable());
        assert_eq!(decode.category(), ErrorCategory::Decode);

        let invalid = AnalysisError::InvalidPrompt;
        assert!(!invalid.recoverable());
        assert_eq!(invalid.category(), ErrorCategory::InvalidInput);
    }
}
