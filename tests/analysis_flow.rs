//! End-to-end engine behavior against a mock analysis service.
//!
//! Exercises the submission lifecycle: validation fast-fail, first-try
//! success, retry spacing, and retry exhaustion, counting the requests the
//! service actually receives.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "../src/client.rs"]
#[allow(dead_code)]
mod client;
#[path = "../src/config.rs"]
#[allow(dead_code)]
mod config;
#[path = "../src/core/mod.rs"]
#[allow(dead_code)]
mod core;
#[path = "../src/error_taxonomy.rs"]
#[allow(dead_code)]
mod error_taxonomy;
#[path = "../src/models.rs"]
#[allow(dead_code)]
mod models;
#[path = "../src/presenter.rs"]
#[allow(dead_code)]
mod presenter;
#[path = "../src/utils.rs"]
#[allow(dead_code)]
mod utils;

use crate::client::AnalysisClient;
use crate::config::{Config, RetryPolicy};
use crate::core::engine::spawn_engine;
use crate::core::events::Event;
use crate::core::state::{self, RequestState};
use crate::error_taxonomy::{AnalysisError, ErrorCategory};

const PROMPT: &str = "Hello, could you please explain what an atom is?";

// === Helpers ===

fn analysis_response() -> serde_json::Value {
    json!({
        "prompt_original": PROMPT,
        "prompt_otimizado": "Explain what an atom is.",
        "partes_desnecessarias": ["Hello,", "could you please"],
        "consumo": {
            "antes":    { "agua_ml": 500.0, "energia_wh": 1.5 },
            "depois":   { "agua_ml": 100.0, "energia_wh": 0.3 },
            "economia": { "agua_ml": 400.0, "energia_wh": 1.2 }
        }
    })
}

fn client_for(server_uri: &str) -> AnalysisClient {
    let config = Config {
        endpoint_url: Some(format!("{server_uri}/analise")),
        request_timeout_secs: Some(5),
        retry: None,
    };
    AnalysisClient::new(&config).expect("client should build")
}

/// Retry policy with short delays so exhaustion tests stay fast.
fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: 0.05,
        max_delay: 60.0,
        exponential_base: 2.0,
    }
}

/// Drain events until the submission settles, folding the state machine the
/// way a display layer would. Returns the event log and the folded state.
async fn drain_until_terminal(
    rx_event: &mut mpsc::Receiver<Event>,
) -> (Vec<(Event, Instant)>, RequestState) {
    let mut log = Vec::new();
    let mut folded = RequestState::Idle;
    loop {
        let event = tokio::time::timeout(Duration::from_secs(30), rx_event.recv())
            .await
            .expect("engine should settle within 30s")
            .expect("engine should not drop the event channel mid-submission");
        folded = state::advance(folded, &event);
        let terminal = event.is_terminal();
        log.push((event, Instant::now()));
        if terminal {
            return (log, folded);
        }
    }
}

// === Validation ===

#[tokio::test]
async fn empty_and_whitespace_prompts_never_reach_the_network() {
    let server = MockServer::start().await;
    let (engine, mut rx_event) = spawn_engine(client_for(&server.uri()), fast_retry());

    for prompt in ["", "   "] {
        engine.submit(prompt).await.unwrap();
        let (_, folded) = drain_until_terminal(&mut rx_event).await;
        assert_eq!(
            folded,
            RequestState::Error {
                message: "prompt required".to_string()
            }
        );
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

// === Success Paths ===

#[tokio::test]
async fn first_try_success_issues_exactly_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .and(body_json(json!({ "texto": PROMPT })))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_response()))
        .expect(1)
        .mount(&server)
        .await;

    let (engine, mut rx_event) = spawn_engine(client_for(&server.uri()), fast_retry());
    engine.submit(PROMPT).await.unwrap();

    let (_, folded) = drain_until_terminal(&mut rx_event).await;
    match folded {
        RequestState::Success { result, view } => {
            assert_eq!(result.optimized_prompt, "Explain what an atom is.");
            assert_eq!(view.removed_segments, vec!["Hello,", "could you please"]);
            assert!(view.has_redundant_parts);
        }
        other => panic!("expected Success, got {other:?}"),
    }

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn two_failures_then_success_retries_with_exponential_spacing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_response()))
        .expect(1)
        .mount(&server)
        .await;

    // Default policy: 1s after the first failure, 2s after the second.
    let (engine, mut rx_event) =
        spawn_engine(client_for(&server.uri()), RetryPolicy::default());
    engine.submit(PROMPT).await.unwrap();

    let (log, folded) = drain_until_terminal(&mut rx_event).await;
    assert!(matches!(folded, RequestState::Success { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    let starts: Vec<Instant> = log
        .iter()
        .filter(|(event, _)| matches!(event, Event::AttemptStarted { .. }))
        .map(|(_, at)| *at)
        .collect();
    assert_eq!(starts.len(), 3);

    let first_gap = starts[1].duration_since(starts[0]);
    let second_gap = starts[2].duration_since(starts[1]);
    assert!(
        first_gap >= Duration::from_millis(950) && first_gap < Duration::from_millis(1900),
        "first retry should wait ~1s, waited {first_gap:?}"
    );
    assert!(
        second_gap >= Duration::from_millis(1950) && second_gap < Duration::from_millis(3500),
        "second retry should wait ~2s, waited {second_gap:?}"
    );
}

// === Failure Paths ===

#[tokio::test]
async fn exhausted_retries_stop_at_three_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let (engine, mut rx_event) = spawn_engine(client_for(&server.uri()), fast_retry());
    engine.submit(PROMPT).await.unwrap();

    let (log, folded) = drain_until_terminal(&mut rx_event).await;
    assert!(matches!(folded, RequestState::Error { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    let last_category = log.iter().rev().find_map(|(event, _)| match event {
        Event::Failed { category, .. } => Some(*category),
        _ => None,
    });
    assert_eq!(last_category, Some(ErrorCategory::Status));
}

#[tokio::test]
async fn malformed_success_body_fails_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
        .expect(1)
        .mount(&server)
        .await;

    let (engine, mut rx_event) = spawn_engine(client_for(&server.uri()), fast_retry());
    engine.submit(PROMPT).await.unwrap();

    let (log, folded) = drain_until_terminal(&mut rx_event).await;
    assert!(matches!(folded, RequestState::Error { .. }));
    // Contract mismatch is not transient; one request, no retries.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let failed = log.iter().any(|(event, _)| {
        matches!(
            event,
            Event::Failed {
                category: ErrorCategory::Decode,
                ..
            }
        )
    });
    assert!(failed, "expected a Failed event with the Decode category");
}

#[tokio::test]
async fn queued_submission_runs_after_the_inflight_one_settles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(analysis_response())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let (engine, mut rx_event) = spawn_engine(client_for(&server.uri()), fast_retry());
    engine.submit(PROMPT).await.unwrap();
    engine.submit(PROMPT).await.unwrap();

    let (_, first) = drain_until_terminal(&mut rx_event).await;
    assert!(matches!(first, RequestState::Success { .. }));
    let (_, second) = drain_until_terminal(&mut rx_event).await;
    assert!(matches!(second, RequestState::Success { .. }));

    // Attempts never interleave: both submissions completed sequentially.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

// === Client-Level Errors ===

#[tokio::test]
async fn connection_refused_maps_to_a_transport_error() {
    // Port 1 is reserved and closed on any sane host.
    let config = Config {
        endpoint_url: Some("http://127.0.0.1:1/analise".to_string()),
        request_timeout_secs: Some(2),
        retry: None,
    };
    let client = AnalysisClient::new(&config).unwrap();

    let err = client.send(PROMPT).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
    assert!(err.recoverable());
}

#[tokio::test]
async fn non_success_status_maps_to_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analise"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server.uri()).send(PROMPT).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Status { status: 404 }));
}
