//! Operations sent from the UI to the engine.

/// Operations the engine accepts over its op channel.
///
/// Ops are processed strictly sequentially: a `Submit` arriving while a
/// request is in flight waits until that request settles, then replaces the
/// previous result wholesale.
#[derive(Debug, Clone)]
pub enum Op {
    /// Submit a prompt for analysis.
    Submit { prompt: String },
    /// Stop the engine task.
    Shutdown,
}
