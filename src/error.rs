use thiserror::Error;

/// Failures surfaced by a [`crate::session::ClipboardSession`] and passed
/// through the cache unchanged.
///
/// Steady-state fetch failures are fatal for that call and are not retried:
/// a dead or misbehaving helper process points at an environment problem the
/// caller should see, so the session never restarts itself.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The helper executable could not be launched (after the retry budget).
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An operation was attempted on a session with no live process.
    #[error("session is not running")]
    NotRunning,

    /// The output stream closed before a complete value arrived.
    #[error("helper process output ended before a payload was read")]
    UnexpectedEof,

    /// A value decoded cleanly but is not the expected history array shape.
    #[error("invalid payload from helper process: {0}")]
    InvalidPayload(String),

    /// Reading or writing a pipe failed mid-protocol.
    #[error("pipe error talking to helper process")]
    Pipe(#[from] std::io::Error),
}

impl SessionError {
    pub(crate) fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn { program: program.into(), source }
    }
}
