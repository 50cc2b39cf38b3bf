//! Error types for the execution layer
//!
//! This module translates SQLite's numeric result codes into a structured
//! error taxonomy plus the engine's human-readable diagnostic.

use std::ffi::CStr;
use std::os::raw::c_int;

use libsqlite3_sys as ffi;
use serde::{Deserialize, Serialize};

/// Result type alias for execution-layer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Abstract failure categories that engine result codes map to
///
/// Environmental conditions (`Busy`, `Io`, `Constraint`, ...) are returned as
/// values; contract violations surface as panics and never reach an
/// `Error` with kind `Misuse` unless the engine itself reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed SQL text
    Syntax,
    /// SQL references an unknown table, column, or index, or the schema changed
    Schema,
    /// A bind index exceeded the statement's parameter count
    BindIndexOutOfRange,
    /// A constraint (UNIQUE, NOT NULL, FOREIGN KEY, ...) rejected the change
    Constraint,
    /// Another connection holds a conflicting lock; retry may succeed
    Busy,
    /// A conflicting lock within the same process or shared cache
    Locked,
    /// Disk-level failure: read/write error, corruption, or a full volume
    Io,
    /// The store could not be opened or is not a usable database
    StorageUnavailable,
    /// `open` was called on an instance that already holds a connection
    AlreadyOpen,
    /// The engine reported an API contract violation
    Misuse,
    /// Any engine code without a dedicated category; the raw code is preserved
    Other,
}

impl ErrorKind {
    /// Map a native result code to its category
    ///
    /// Extended result codes are masked to their primary code first, so
    /// e.g. `SQLITE_CONSTRAINT_UNIQUE` maps the same as `SQLITE_CONSTRAINT`.
    pub fn from_code(code: i32) -> Self {
        match code & 0xff {
            ffi::SQLITE_PERM | ffi::SQLITE_CANTOPEN | ffi::SQLITE_NOTADB => {
                ErrorKind::StorageUnavailable
            }
            ffi::SQLITE_READONLY => ErrorKind::StorageUnavailable,
            ffi::SQLITE_BUSY => ErrorKind::Busy,
            ffi::SQLITE_LOCKED => ErrorKind::Locked,
            ffi::SQLITE_IOERR | ffi::SQLITE_CORRUPT | ffi::SQLITE_FULL => ErrorKind::Io,
            ffi::SQLITE_SCHEMA => ErrorKind::Schema,
            ffi::SQLITE_CONSTRAINT => ErrorKind::Constraint,
            ffi::SQLITE_MISUSE => ErrorKind::Misuse,
            ffi::SQLITE_RANGE => ErrorKind::BindIndexOutOfRange,
            _ => ErrorKind::Other,
        }
    }

    /// Human-readable name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Schema => "schema error",
            ErrorKind::BindIndexOutOfRange => "bind index out of range",
            ErrorKind::Constraint => "constraint violation",
            ErrorKind::Busy => "database busy",
            ErrorKind::Locked => "database locked",
            ErrorKind::Io => "I/O error",
            ErrorKind::StorageUnavailable => "storage unavailable",
            ErrorKind::AlreadyOpen => "already open",
            ErrorKind::Misuse => "misuse",
            ErrorKind::Other => "database error",
        }
    }

    /// Whether waiting and retrying the operation may clear the condition
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Busy | ErrorKind::Locked)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured error carrying a category, the raw engine code when one
/// exists, and the engine's diagnostic text
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    code: Option<i32>,
    message: String,
}

impl Error {
    /// Create an error with no associated engine code
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Create an error preserving the raw engine code alongside the category
    pub fn with_code(kind: ErrorKind, code: i32, message: impl Into<String>) -> Self {
        Error {
            kind,
            code: Some(code),
            message: message.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        Error::new(ErrorKind::Syntax, msg)
    }

    /// Create a schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        Error::new(ErrorKind::Schema, msg)
    }

    /// Create an already-open error
    pub fn already_open<S: Into<String>>(msg: S) -> Self {
        Error::new(ErrorKind::AlreadyOpen, msg)
    }

    /// Create a storage-unavailable error
    pub fn storage_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::new(ErrorKind::StorageUnavailable, msg)
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::new(ErrorKind::Other, msg)
    }

    /// The failure category
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The raw engine result code, when the error originated in the engine
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// The diagnostic text, without the category prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Recover the Syntax/Schema split for `SQLITE_ERROR` diagnostics
///
/// The engine reports both malformed SQL and unknown-object references
/// through the same generic code; only the message distinguishes them.
fn classify_error_message(message: &str) -> Option<ErrorKind> {
    let lower = message.to_lowercase();
    if lower.contains("syntax error")
        || lower.contains("unrecognized token")
        || lower.contains("incomplete input")
    {
        Some(ErrorKind::Syntax)
    } else if lower.contains("no such table")
        || lower.contains("no such column")
        || lower.contains("no such index")
        || lower.contains("no such view")
        || lower.contains("has no column")
        || lower.contains("already exists")
    {
        Some(ErrorKind::Schema)
    } else {
        None
    }
}

/// Categorize a result code, refining the generic code by its diagnostic
pub(crate) fn kind_for(code: i32, message: &str) -> ErrorKind {
    match ErrorKind::from_code(code) {
        ErrorKind::Other if code & 0xff == ffi::SQLITE_ERROR => {
            classify_error_message(message).unwrap_or(ErrorKind::Other)
        }
        kind => kind,
    }
}

/// Build an [`Error`] from a connection handle and the code an API call
/// returned, reading the connection's current diagnostic text
///
/// # Safety
///
/// `db` must be a valid connection handle or null; when null the static
/// description of `code` is used instead.
pub(crate) unsafe fn error_from_handle(db: *mut ffi::sqlite3, code: c_int) -> Error {
    let message = if db.is_null() {
        CStr::from_ptr(ffi::sqlite3_errstr(code))
            .to_string_lossy()
            .into_owned()
    } else {
        CStr::from_ptr(ffi::sqlite3_errmsg(db))
            .to_string_lossy()
            .into_owned()
    };
    Error::with_code(kind_for(code, &message), code, message)
}
