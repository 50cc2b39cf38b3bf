//! Connection ownership and statement preparation
//!
//! This module owns the native connection handle. A `Database` is created
//! closed, opened explicitly with an access mode, hands out compiled
//! statements that borrow it, and releases the handle exactly once.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr::{self, NonNull};
use std::time::Duration;

use libsqlite3_sys as ffi;
use tracing::{trace, warn};

use super::error::{error_from_handle, Error, Result};
use super::open_mode::OpenMode;
use super::statement::Statement;

/// Owner of one native connection handle
///
/// Statements prepared from a `Database` borrow it, so the borrow checker
/// rejects closing (or dropping) the connection while any statement is
/// still alive. A `Database` may move between threads but must be driven
/// by one thread at a time; share-nothing or serialize externally.
///
/// # Example
///
/// ```
/// use sqlite_guard::prelude::*;
///
/// fn main() -> Result<()> {
///     let mut db = Database::new();
///     db.open_in_memory()?;
///
///     let ctx = DatabaseContext::new(&db);
///     let mut run = ctx.use_once("select 1 + 2")?;
///     assert_eq!(run.step()?, Step::Row);
///     assert_eq!(run.column_int64(0), 3);
///     Ok(())
/// }
/// ```
pub struct Database {
    handle: Option<NonNull<ffi::sqlite3>>,
    path: Option<String>,
}

impl Database {
    /// Create a new, closed database instance
    pub fn new() -> Self {
        Self {
            handle: None,
            path: None,
        }
    }

    /// Establish the native connection
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if this instance already holds a connection and
    /// `StorageUnavailable` if the path cannot be opened under `mode`.
    pub fn open(&mut self, path: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        if self.handle.is_some() {
            return Err(Error::already_open(format!(
                "connection already open on {}",
                self.path.as_deref().unwrap_or("<unknown>")
            )));
        }

        let display_path = path.as_ref().display().to_string();
        let c_path = path_to_cstring(path.as_ref())?;
        let flags = mode.to_flags() | ffi::SQLITE_OPEN_NOMUTEX | ffi::SQLITE_OPEN_URI;

        let mut raw: *mut ffi::sqlite3 = ptr::null_mut();
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut raw, flags, ptr::null()) };
        if rc != ffi::SQLITE_OK {
            let err = unsafe { error_from_handle(raw, rc) };
            if !raw.is_null() {
                // the engine allocates a handle even on a failed open
                unsafe { ffi::sqlite3_close(raw) };
            }
            return Err(err);
        }
        let handle = NonNull::new(raw)
            .ok_or_else(|| Error::other("engine returned a null connection handle"))?;

        trace!(path = %display_path, %mode, "opened database");
        self.handle = Some(handle);
        self.path = Some(display_path);
        Ok(())
    }

    /// Open a private in-memory database
    pub fn open_in_memory(&mut self) -> Result<()> {
        self.open(":memory:", OpenMode::ReadWriteCreate)
    }

    /// Check whether this instance holds a connection
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// The path this database was opened on, if open
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Compile one SQL statement
    ///
    /// # Errors
    ///
    /// Returns `Syntax` for malformed SQL (or input containing no statement)
    /// and `Schema` when the SQL references an unknown table or column.
    ///
    /// # Panics
    ///
    /// Panics if the database is not open; preparing against a closed
    /// connection is a programming error, not a runtime condition.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        let (statement, _) = self.prepare_next(sql)?;
        let statement =
            statement.ok_or_else(|| Error::syntax("input contains no SQL statement"))?;
        trace!(sql, "prepared statement");
        Ok(statement)
    }

    /// Compile the first statement of `sql`, reporting how many bytes of the
    /// input it consumed
    ///
    /// Returns `None` for the statement when the consumed prefix holds only
    /// whitespace or comments. The script executor iterates this to split a
    /// batch without parsing SQL itself.
    pub(crate) fn prepare_next<'db>(&'db self, sql: &str) -> Result<(Option<Statement<'db>>, usize)> {
        let handle = self.handle();
        let len = c_int::try_from(sql.len())
            .map_err(|_| Error::other("SQL text exceeds the engine's length limit"))?;

        let mut raw_stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let mut tail: *const c_char = ptr::null();
        let rc = unsafe {
            ffi::sqlite3_prepare_v2(
                handle.as_ptr(),
                sql.as_ptr() as *const c_char,
                len,
                &mut raw_stmt,
                &mut tail,
            )
        };
        if rc != ffi::SQLITE_OK {
            return Err(unsafe { error_from_handle(handle.as_ptr(), rc) });
        }

        let consumed = if tail.is_null() {
            sql.len()
        } else {
            tail as usize - sql.as_ptr() as usize
        };
        Ok((NonNull::new(raw_stmt).map(Statement::from_raw), consumed))
    }

    /// Release the connection
    ///
    /// Idempotent: closing an already-closed instance succeeds. Statements
    /// cannot be outstanding here; they borrow the database, so the borrow
    /// checker rejects a close while any are alive.
    pub fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let rc = unsafe { ffi::sqlite3_close(handle.as_ptr()) };
        if rc != ffi::SQLITE_OK {
            let err = unsafe { error_from_handle(handle.as_ptr(), rc) };
            self.handle = Some(handle);
            return Err(err);
        }
        trace!(path = self.path.as_deref(), "closed database");
        self.path = None;
        Ok(())
    }

    /// Rowid of the most recent successful insert on this connection
    pub fn last_insert_rowid(&self) -> i64 {
        unsafe { ffi::sqlite3_last_insert_rowid(self.handle().as_ptr()) }
    }

    /// Number of rows changed by the most recent INSERT, UPDATE, or DELETE
    pub fn changes(&self) -> u64 {
        unsafe { ffi::sqlite3_changes(self.handle().as_ptr()) as u64 }
    }

    /// Have the engine wait up to `timeout` for a conflicting lock to clear
    /// before reporting `Busy`
    ///
    /// A zero timeout restores the default fail-fast behavior.
    pub fn busy_timeout(&self, timeout: Duration) -> Result<()> {
        let ms = c_int::try_from(timeout.as_millis())
            .map_err(|_| Error::other("busy timeout exceeds the engine's limit"))?;
        let handle = self.handle();
        let rc = unsafe { ffi::sqlite3_busy_timeout(handle.as_ptr(), ms) };
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(unsafe { error_from_handle(handle.as_ptr(), rc) })
        }
    }

    /// The native handle; panics when closed, since every caller reaching
    /// here is past the point where a recoverable error makes sense
    pub(crate) fn handle(&self) -> NonNull<ffi::sqlite3> {
        match self.handle {
            Some(handle) => handle,
            None => panic!("attempted to use a database that is not open"),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let rc = unsafe { ffi::sqlite3_close(handle.as_ptr()) };
            if rc != ffi::SQLITE_OK {
                // close_v2 marks the handle for teardown once the engine
                // releases its last internal resource
                unsafe { sqlite3_close_v2(handle.as_ptr()) };
                warn!(
                    code = rc,
                    path = self.path.as_deref(),
                    "database dropped with unreleased work"
                );
            }
        }
    }
}

// The handle may move between threads. No Sync: a connection must be driven
// by one thread at a time, and the handle is opened with NOMUTEX.
unsafe impl Send for Database {}

// the bundled engine exports this symbol, but libsqlite3-sys blocklists it
// from its generated bindings
extern "C" {
    fn sqlite3_close_v2(db: *mut ffi::sqlite3) -> c_int;
}

fn path_to_cstring(path: &Path) -> Result<CString> {
    let text = path.to_str().ok_or_else(|| {
        Error::storage_unavailable(format!("path is not valid UTF-8: {}", path.display()))
    })?;
    CString::new(text).map_err(|_| {
        Error::storage_unavailable(format!("path contains a NUL byte: {}", path.display()))
    })
}
