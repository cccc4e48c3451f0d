use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error taxonomy for the membership engine.
///
/// Most protocol-level "errors" (a NULL `src`, a duplicate insert, a
/// redundant delete) are not represented here — they are handled silently
/// per the drop/no-op rules described alongside each handler. This enum
/// covers the handful of genuinely fallible operations: transport I/O,
/// wire decoding, bootstrap, and defensive invariant checks.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
