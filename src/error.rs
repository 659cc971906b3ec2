use thiserror::Error;

/// Failures surfaced by collaborator calls (session store, config dir).
///
/// Nothing in the engine core itself is fatal: operations addressed at
/// unknown window/tab/bubble handles no-op, and placement always returns a
/// position. These variants exist so collaborator failures can be reported
/// as a single user-visible notice without corrupting in-memory state.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("session store i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("session encode/decode: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no such session: {0:?}")]
    UnknownSession(String),

    #[error("invalid session name: {0:?}")]
    InvalidSessionName(String),

    #[error("no config directory available on this platform")]
    NoConfigDir,
}
