//! Error types for listeners and persistence.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure reported by a [`BoardListener`](crate::BoardListener).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Listener error: {} at {}:{}", message, file, line)]
pub struct ListenerError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ListenerError {
    /// Creates a new listener error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// One or more listeners failed while a change was being dispatched.
///
/// Every listener still ran; the mutation that triggered the dispatch has
/// already been applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct NotifyError {
    /// Failures in dispatch order.
    pub failures: Vec<ListenerError>,
}

impl NotifyError {
    /// Creates a notification error from collected listener failures.
    pub fn new(failures: Vec<ListenerError>) -> Self {
        Self { failures }
    }

    /// Returns the first failure.
    pub fn first(&self) -> Option<&ListenerError> {
        self.failures.first()
    }
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} listener(s) failed", self.failures.len())?;
        if let Some(first) = self.first() {
            write!(f, ": {}", first)?;
        }
        Ok(())
    }
}

/// What went wrong while saving or loading a board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PersistErrorKind {
    /// The destination file already exists.
    #[display("File already exists: {}", _0)]
    AlreadyExists(String),

    /// Reading or writing the file failed.
    #[display("I/O error: {}", _0)]
    Io(String),

    /// The board could not be encoded.
    #[display("Encode error: {}", _0)]
    Encode(String),

    /// The bytes are not a snapshot.
    #[display("Decode error: {}", _0)]
    Decode(String),

    /// The snapshot decoded but describes an unreachable board.
    #[display("Invalid snapshot: {}", _0)]
    InvalidSnapshot(String),
}

/// Persistence error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Persistence error: {} at {}:{}", kind, file, line)]
pub struct PersistError {
    /// Error kind.
    pub kind: PersistErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PersistError {
    /// Creates a new persistence error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: PersistErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &PersistErrorKind {
        &self.kind
    }

    /// Returns true if the save target was already present.
    pub fn is_already_exists(&self) -> bool {
        matches!(self.kind, PersistErrorKind::AlreadyExists(_))
    }
}

impl From<serde_json::Error> for PersistError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(PersistErrorKind::Decode(err.to_string()))
    }
}
