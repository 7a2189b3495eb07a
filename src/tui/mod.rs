//! Terminal UI for ecoprompt.

// === Submodules ===

pub mod app;
pub mod ui;

// === Re-exports ===

pub use ui::run_tui;
