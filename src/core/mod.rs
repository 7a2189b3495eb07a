//! Core request orchestration: engine task, operations, events, and the
//! request lifecycle state machine.

// === Submodules ===

pub mod engine;
pub mod events;
pub mod ops;
pub mod state;

// === Re-exports ===

pub use engine::{EngineHandle, spawn_engine};
pub use events::Event;
pub use ops::Op;
pub use state::RequestState;
