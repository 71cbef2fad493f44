//! Managed session around the long-lived helper process.
//!
//! The helper speaks a strict line-triggered protocol: every empty line on
//! its stdin runs one capture-and-emit cycle, every cycle answers with one
//! newline-delimited JSON array, and responses are matched to triggers purely
//! by arrival order. That last point is why only one fetch may ever be in
//! flight per session; [`crate::cache::HistoryCache`] enforces it upstream
//! and `&mut self` enforces it here.

pub mod command;

use std::collections::VecDeque;
use std::io;
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

pub use command::{CommandSpec, DEFAULT_PWSH, history_server_command};

use crate::error::SessionError;
use crate::models::HistoryItem;
use crate::parsers::JsonStreamDecoder;

/// One spawn retry beyond the first attempt.
const SPAWN_ATTEMPTS: u32 = 2;

/// Any non-empty line ends the helper's read loop.
pub const TERMINATE_TOKEN: &str = "quit";

/// How long dispose waits for a cooperative exit before killing.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Session lifecycle. `Failed` is terminal and only reachable from a start
/// that exhausted its retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Starting,
    Ready,
    Closing,
    Closed,
    Failed,
}

/// Owns one helper process and its pipes.
///
/// Exactly one process is associated with a session in `Starting`/`Ready`.
/// A fetch failure does not restart the process: a helper that died or wrote
/// garbage indicates an environment problem the caller should see, so errors
/// surface as-is and the session stays down until disposed.
pub struct ClipboardSession {
    spec: CommandSpec,
    state: SessionState,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    decoder: JsonStreamDecoder,
    pending: VecDeque<Value>,
}

impl ClipboardSession {
    pub fn new(spec: CommandSpec) -> Self {
        Self {
            spec,
            state: SessionState::Uninitialized,
            child: None,
            stdin: None,
            stdout: None,
            decoder: JsonStreamDecoder::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Spawn the helper and complete one round trip, retrying once on
    /// failure. The payload of the initial round trip is returned so callers
    /// can prime their cache without a second fetch.
    pub async fn initialize(&mut self) -> Result<Vec<HistoryItem>, SessionError> {
        let mut last_error = SessionError::NotRunning;
        for attempt in 1..=SPAWN_ATTEMPTS {
            self.state = SessionState::Starting;
            match self.start_once().await {
                Ok(items) => {
                    debug!(attempt, items = items.len(), "clipboard helper ready");
                    self.state = SessionState::Ready;
                    return Ok(items);
                }
                Err(error) => {
                    warn!(attempt, %error, "clipboard helper failed to start");
                    self.teardown_process().await;
                    last_error = error;
                }
            }
        }
        self.state = SessionState::Failed;
        Err(last_error)
    }

    /// One request/response round trip: write a trigger line, read exactly
    /// one decoded history array.
    pub async fn fetch(&mut self) -> Result<Vec<HistoryItem>, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotRunning);
        }
        self.round_trip().await
    }

    /// Tear the session down, idempotently.
    ///
    /// Asks the helper to exit by writing the terminate token, closes the
    /// pipes, waits a bounded grace period, then kills. Never fails: errors
    /// here mean the process is already gone, which is the goal.
    pub async fn dispose(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closing;

        if let Some(mut stdin) = self.stdin.take() {
            let _ = stdin.write_all(TERMINATE_TOKEN.as_bytes()).await;
            let _ = stdin.write_all(b"\n").await;
            let _ = stdin.shutdown().await;
        }
        self.stdout = None;

        if let Some(mut child) = self.child.take() {
            match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(Ok(status)) => debug!(%status, "clipboard helper exited"),
                Ok(Err(error)) => warn!(%error, "failed waiting for clipboard helper"),
                Err(_) => {
                    warn!("clipboard helper ignored terminate request, killing");
                    let _ = child.kill().await;
                }
            }
        }

        self.state = SessionState::Closed;
    }

    async fn start_once(&mut self) -> Result<Vec<HistoryItem>, SessionError> {
        let mut cmd = Command::new(&self.spec.program);
        cmd.args(&self.spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| SessionError::spawn(self.spec.program.display().to_string(), e))?;
        debug!(program = %self.spec.program.display(), pid = ?child.id(), "spawned clipboard helper");

        let stdin =
            child.stdin.take().ok_or_else(|| pipe_missing("stdin"))?;
        let stdout =
            child.stdout.take().ok_or_else(|| pipe_missing("stdout"))?;

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout = Some(BufReader::new(stdout));
        self.decoder = JsonStreamDecoder::new();
        self.pending.clear();

        // The helper must answer one round trip before the session counts as
        // started; a spawn that launches but cannot speak the protocol is a
        // startup failure, not a steady-state one.
        self.round_trip().await
    }

    async fn teardown_process(&mut self) {
        self.stdin = None;
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill().await;
        }
        self.decoder = JsonStreamDecoder::new();
        self.pending.clear();
    }

    async fn round_trip(&mut self) -> Result<Vec<HistoryItem>, SessionError> {
        let stdin = self.stdin.as_mut().ok_or(SessionError::NotRunning)?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;

        let value = self.read_value().await?;
        parse_payload(value)
    }

    /// Read stdout line by line through the decoder until one value is
    /// complete. Values beyond the first (a helper emitting ahead of
    /// protocol) are queued for the next read rather than dropped.
    async fn read_value(&mut self) -> Result<Value, SessionError> {
        if let Some(value) = self.pending.pop_front() {
            return Ok(value);
        }
        let stdout = self.stdout.as_mut().ok_or(SessionError::NotRunning)?;
        let mut line = String::new();
        loop {
            line.clear();
            let read = stdout.read_line(&mut line).await?;
            if read == 0 {
                return Err(SessionError::UnexpectedEof);
            }
            let mut values = self.decoder.feed(&line);
            if values.is_empty() {
                continue;
            }
            let first = values.remove(0);
            self.pending.extend(values);
            return Ok(first);
        }
    }
}

fn pipe_missing(name: &str) -> SessionError {
    SessionError::Pipe(io::Error::other(format!("{name} pipe missing on spawned helper")))
}

fn parse_payload(value: Value) -> Result<Vec<HistoryItem>, SessionError> {
    if !value.is_array() {
        return Err(SessionError::InvalidPayload(format!(
            "expected an array, got {}",
            json_type_name(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| SessionError::InvalidPayload(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
