//! Request lifecycle state machine.
//!
//! One [`RequestState`] value is live per engine. It is owned exclusively by
//! the engine and replaced wholesale on every transition; subscribers fold
//! the event stream through the same pure [`advance`] function to keep an
//! identical copy.

use crate::core::events::Event;
use crate::models::AnalysisResult;
use crate::presenter::PresentationModel;

// === Types ===

/// Observable request state published by the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    /// No submission yet, or the session is between submissions.
    #[default]
    Idle,
    /// A submission is in flight; `attempt` is the 0-based attempt index.
    Loading { attempt: u32 },
    /// The last submission succeeded.
    Success {
        result: AnalysisResult,
        view: PresentationModel,
    },
    /// The last submission failed; `message` is user-visible.
    Error { message: String },
}

impl RequestState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    /// Short label for status lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading { .. } => "analyzing",
            RequestState::Success { .. } => "done",
            RequestState::Error { .. } => "error",
        }
    }
}

// === Transition ===

/// Fold one engine event into the state. Pure; the previous state is
/// consumed and a replacement returned.
#[must_use]
pub fn advance(state: RequestState, event: &Event) -> RequestState {
    match event {
        Event::SubmitRejected { message } => RequestState::Error {
            message: message.clone(),
        },
        Event::SubmitAccepted => RequestState::Loading { attempt: 0 },
        Event::AttemptStarted { attempt } => RequestState::Loading { attempt: *attempt },
        // The submission stays in flight across a failed attempt; the next
        // AttemptStarted bumps the index.
        Event::AttemptFailed { .. } => state,
        Event::Completed { result, view } => RequestState::Success {
            result: result.clone(),
            view: view.clone(),
        },
        Event::Failed { message, .. } => RequestState::Error {
            message: message.clone(),
        },
    }
}
