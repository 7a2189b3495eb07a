//! Events emitted by the engine to the UI.
//!
//! These events flow from the engine to the display layer via a channel.
//! Subscribers fold them through [`crate::core::state::advance`] to
//! reconstruct the current request state.

use crate::error_taxonomy::ErrorCategory;
use crate::models::AnalysisResult;
use crate::presenter::PresentationModel;

/// Events emitted by the engine during a submission's lifecycle.
#[derive(Debug, Clone)]
pub enum Event {
    /// The prompt failed validation; no network call was made.
    SubmitRejected { message: String },

    /// A submission passed validation and is now in flight.
    SubmitAccepted,

    /// A request attempt is being issued (0-based index).
    AttemptStarted { attempt: u32 },

    /// An attempt failed and a retry will follow after the backoff delay.
    ///
    /// The category is internal detail for logs and tests; it never reaches
    /// the published state.
    AttemptFailed { attempt: u32, category: ErrorCategory },

    /// The submission succeeded.
    Completed {
        result: AnalysisResult,
        view: PresentationModel,
    },

    /// The submission failed for good; `message` is the generic
    /// user-visible string, `category` the last internal cause.
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

impl Event {
    /// Whether this event settles the submission.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SubmitRejected { .. } | Event::Completed { .. } | Event::Failed { .. }
        )
    }
}
