//! Compiled statement ownership and metadata
//!
//! A `Statement` owns one compiled query plan tied to the database that
//! prepared it. Between uses it holds no visible state; the engine-internal
//! bind and result buffers are cleared when an execution handle releases it.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::ptr::NonNull;

use libsqlite3_sys as ffi;

use super::database::Database;

/// One compiled SQL statement, reusable across many executions
///
/// The lifetime ties the statement to the [`Database`] that prepared it, so
/// a statement can never outlive (or be used after closing) its connection.
/// Parameter indices are 1-based; column indices are 0-based.
pub struct Statement<'db> {
    raw: NonNull<ffi::sqlite3_stmt>,
    _db: PhantomData<&'db Database>,
}

impl<'db> Statement<'db> {
    pub(crate) fn from_raw(raw: NonNull<ffi::sqlite3_stmt>) -> Self {
        Statement {
            raw,
            _db: PhantomData,
        }
    }

    /// Number of bindable parameters in this statement
    pub fn parameter_count(&self) -> usize {
        unsafe { ffi::sqlite3_bind_parameter_count(self.raw.as_ptr()) as usize }
    }

    /// Name of the 1-based parameter `index`, including its prefix
    /// (e.g. `:uuid`), or `None` for nameless (`?`) or out-of-range
    /// parameters
    pub fn parameter_name(&self, index: usize) -> Option<&str> {
        let idx = c_int::try_from(index).ok()?;
        unsafe {
            let ptr = ffi::sqlite3_bind_parameter_name(self.raw.as_ptr(), idx);
            if ptr.is_null() {
                None
            } else {
                CStr::from_ptr(ptr).to_str().ok()
            }
        }
    }

    /// 1-based index of the named parameter, written with its prefix
    /// (e.g. `:uuid`), or `None` if the statement has no such parameter
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        let c_name = CString::new(name).ok()?;
        let idx =
            unsafe { ffi::sqlite3_bind_parameter_index(self.raw.as_ptr(), c_name.as_ptr()) };
        if idx > 0 {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Number of columns in this statement's result rows; zero for
    /// statements that return no data
    pub fn column_count(&self) -> usize {
        unsafe { ffi::sqlite3_column_count(self.raw.as_ptr()) as usize }
    }

    /// Name of the 0-based result column, or `None` if out of range
    pub fn column_name(&self, index: usize) -> Option<&str> {
        let idx = c_int::try_from(index).ok()?;
        unsafe {
            let ptr = ffi::sqlite3_column_name(self.raw.as_ptr(), idx);
            if ptr.is_null() {
                None
            } else {
                CStr::from_ptr(ptr).to_str().ok()
            }
        }
    }

    /// Declared type of the 0-based result column, as written in the schema
    ///
    /// Advisory only: the engine stores cells dynamically, so the declared
    /// type constrains nothing. `None` for expressions and subqueries.
    pub fn column_decltype(&self, index: usize) -> Option<&str> {
        let idx = c_int::try_from(index).ok()?;
        unsafe {
            let ptr = ffi::sqlite3_column_decltype(self.raw.as_ptr(), idx);
            if ptr.is_null() {
                None
            } else {
                CStr::from_ptr(ptr).to_str().ok()
            }
        }
    }

    /// The SQL text this statement was compiled from
    pub fn sql(&self) -> &str {
        unsafe {
            let ptr = ffi::sqlite3_sql(self.raw.as_ptr());
            if ptr.is_null() {
                ""
            } else {
                CStr::from_ptr(ptr).to_str().unwrap_or("")
            }
        }
    }

    pub(crate) fn handle(&self) -> NonNull<ffi::sqlite3_stmt> {
        self.raw
    }

    /// Connection this statement was prepared on
    pub(crate) fn db_handle(&self) -> *mut ffi::sqlite3 {
        unsafe { ffi::sqlite3_db_handle(self.raw.as_ptr()) }
    }

    /// Rewind the cursor; returns the engine's code, which repeats the most
    /// recent step error if there was one
    pub(crate) fn reset(&mut self) -> c_int {
        unsafe { ffi::sqlite3_reset(self.raw.as_ptr()) }
    }

    /// Clear all bound parameter values back to NULL
    pub(crate) fn clear_bindings(&mut self) -> c_int {
        unsafe { ffi::sqlite3_clear_bindings(self.raw.as_ptr()) }
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        // finalize repeats the most recent step error; the caller already
        // saw it through the execution handle
        let _ = unsafe { ffi::sqlite3_finalize(self.raw.as_ptr()) };
    }
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql())
            .field("parameter_count", &self.parameter_count())
            .field("column_count", &self.column_count())
            .finish()
    }
}
