//! Request engine for ecoprompt.
//!
//! The engine drives the analysis client in a background task,
//! communicating with the UI via channels. This keeps the UI responsive
//! during network calls and backoff sleeps, and guarantees that attempts
//! for one submission are strictly sequential.

use tokio::sync::mpsc;

use crate::client::AnalysisClient;
use crate::config::RetryPolicy;
use crate::error_taxonomy::{GENERIC_FAILURE_MESSAGE, PROMPT_REQUIRED_MESSAGE};
use crate::presenter;

use super::events::Event;
use super::ops::Op;
use super::state::{self, RequestState};

const OP_CHANNEL_CAPACITY: usize = 16;
const EVENT_CHANNEL_CAPACITY: usize = 64;

// === Types ===

/// Handle to communicate with the engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx_op: mpsc::Sender<Op>,
}

impl EngineHandle {
    /// Submit a prompt for analysis.
    pub async fn submit(&self, prompt: impl Into<String>) -> anyhow::Result<()> {
        self.tx_op
            .send(Op::Submit {
                prompt: prompt.into(),
            })
            .await?;
        Ok(())
    }

    /// Ask the engine task to stop after the current submission settles.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.tx_op.send(Op::Shutdown).await?;
        Ok(())
    }
}

/// Spawn the engine task.
///
/// Returns the op handle and the event stream. The caller owns the receiver
/// and folds events through [`state::advance`] for rendering.
pub fn spawn_engine(
    client: AnalysisClient,
    retry: RetryPolicy,
) -> (EngineHandle, mpsc::Receiver<Event>) {
    let (tx_op, rx_op) = mpsc::channel(OP_CHANNEL_CAPACITY);
    let (tx_event, rx_event) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let engine = Engine {
        client,
        retry,
        state: RequestState::Idle,
        tx_event,
    };
    tokio::spawn(engine.run(rx_op));

    (EngineHandle { tx_op }, rx_event)
}

// === Engine ===

struct Engine {
    client: AnalysisClient,
    retry: RetryPolicy,
    state: RequestState,
    tx_event: mpsc::Sender<Event>,
}

impl Engine {
    async fn run(mut self, mut rx_op: mpsc::Receiver<Op>) {
        while let Some(op) = rx_op.recv().await {
            match op {
                Op::Submit { prompt } => self.handle_submit(&prompt).await,
                Op::Shutdown => break,
            }
        }
        tracing::debug!("engine task stopped");
    }

    async fn handle_submit(&mut self, prompt: &str) {
        if prompt.trim().is_empty() {
            tracing::info!("submission rejected: empty prompt");
            self.apply(Event::SubmitRejected {
                message: PROMPT_REQUIRED_MESSAGE.to_string(),
            })
            .await;
            return;
        }

        self.apply(Event::SubmitAccepted).await;

        let mut attempt: u32 = 0;
        loop {
            self.apply(Event::AttemptStarted { attempt }).await;

            match self.client.send(prompt).await {
                Ok(result) => {
                    let view = presenter::transform(&result);
                    self.apply(Event::Completed { result, view }).await;
                    return;
                }
                Err(err) => {
                    let category = err.category();
                    let attempts_left = attempt + 1 < self.retry.max_attempts;

                    if !err.recoverable() || !attempts_left {
                        tracing::warn!(
                            "analysis failed after {} attempt(s): {err}",
                            attempt + 1
                        );
                        self.apply(Event::Failed {
                            category,
                            message: GENERIC_FAILURE_MESSAGE.to_string(),
                        })
                        .await;
                        return;
                    }

                    tracing::warn!(
                        "attempt {} of {} failed: {err}",
                        attempt + 1,
                        self.retry.max_attempts
                    );
                    self.apply(Event::AttemptFailed { attempt, category }).await;

                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::info!("retrying after {:.2}s", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Replace the state through the pure transition and forward the event.
    async fn apply(&mut self, event: Event) {
        self.state = state::advance(std::mem::take(&mut self.state), &event);
        // A dropped receiver only means no one is watching anymore.
        let _ = self.tx_event.send(event).await;
    }
}
