//! Single execution pass of a statement
//!
//! A `Run` drives one statement through the bind, step, and read cycle and
//! tracks where in that cycle the statement is. Reads are only allowed
//! while a row is current, binds only before the first step, and stepping
//! past completion is rejected instead of silently rewinding the cursor
//! the way the raw engine would.
//!
//! Dropping a `Run` that borrowed its statement rewinds the cursor and
//! clears every bound parameter, so the next borrower always starts from
//! a blank slate.

use std::os::raw::{c_char, c_int, c_void};

use libsqlite3_sys as ffi;
use tracing::warn;

use super::database::Database;
use super::error::{error_from_handle, Error, ErrorKind, Result};
use super::statement::Statement;
use super::value::{StorageClass, Value};

/// Outcome of a successful [`Run::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A result row is available for column reads
    Row,
    /// The statement finished; no further rows will be produced
    Done,
}

/// Where a run is in the bind, step, read cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// No step yet; parameters may still be bound
    Unstarted,
    /// The last step produced a row that can be read
    RowAvailable,
    /// The last step returned [`Step::Done`]
    Finished,
    /// The last step failed; only `reset` may follow
    Failed,
}

enum StatementHandle<'run, 'db> {
    Borrowed(&'run mut Statement<'db>),
    Owned(Statement<'db>),
}

impl<'db> StatementHandle<'_, 'db> {
    fn statement(&self) -> &Statement<'db> {
        match self {
            StatementHandle::Borrowed(statement) => statement,
            StatementHandle::Owned(statement) => statement,
        }
    }

    fn statement_mut(&mut self) -> &mut Statement<'db> {
        match self {
            StatementHandle::Borrowed(statement) => statement,
            StatementHandle::Owned(statement) => statement,
        }
    }
}

/// Exclusive execution handle for one statement
///
/// Obtained from [`DatabaseContext::borrow`] for a prepared statement or
/// [`DatabaseContext::use_once`] for throwaway SQL. Parameter indices are
/// 1-based, column indices 0-based, matching the engine's conventions.
///
/// Sequencing mistakes (binding after a step, reading a column without a
/// current row, stepping a finished run) are caller bugs and panic rather
/// than returning an error; environmental failures such as a locked
/// database come back as [`Err`] values.
///
/// [`DatabaseContext::borrow`]: super::context::DatabaseContext::borrow
/// [`DatabaseContext::use_once`]: super::context::DatabaseContext::use_once
///
/// # Example
///
/// ```
/// use sqlite_guard::{Database, DatabaseContext, Step};
///
/// fn main() -> sqlite_guard::Result<()> {
///     let mut db = Database::new();
///     db.open_in_memory()?;
///     let ctx = DatabaseContext::new(&db);
///
///     let mut run = ctx.use_once("select ?1 + ?2")?;
///     run.bind_int64(1, 2)?;
///     run.bind_int64(2, 40)?;
///     assert_eq!(run.step()?, Step::Row);
///     assert_eq!(run.column_int64(0), 42);
///     assert_eq!(run.step()?, Step::Done);
///     Ok(())
/// }
/// ```
pub struct Run<'run, 'db> {
    db: &'db Database,
    handle: StatementHandle<'run, 'db>,
    state: RunState,
    last_error: Option<String>,
}

impl<'run, 'db> Run<'run, 'db> {
    pub(crate) fn borrowed(db: &'db Database, statement: &'run mut Statement<'db>) -> Self {
        Run {
            db,
            handle: StatementHandle::Borrowed(statement),
            state: RunState::Unstarted,
            last_error: None,
        }
    }

    pub(crate) fn owned(db: &'db Database, statement: Statement<'db>) -> Self {
        Run {
            db,
            handle: StatementHandle::Owned(statement),
            state: RunState::Unstarted,
            last_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Parameter binding (1-based)
    // ------------------------------------------------------------------

    /// Bind a blob to the 1-based parameter `index`
    ///
    /// An empty slice binds a zero-length blob, not NULL.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BindIndexOutOfRange`] when `index` is zero or past the
    /// statement's parameter count.
    ///
    /// # Panics
    ///
    /// Panics if called after stepping has begun.
    pub fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.assert_bindable();
        let idx = bind_index(index)?;
        let len = length_as_c_int(value.len())?;
        let stmt = self.handle.statement().handle().as_ptr();
        let rc = if value.is_empty() {
            // a null data pointer binds NULL, so an empty blob goes in as a
            // zero-length zeroblob instead
            unsafe { ffi::sqlite3_bind_zeroblob(stmt, idx, 0) }
        } else {
            unsafe {
                ffi::sqlite3_bind_blob(
                    stmt,
                    idx,
                    value.as_ptr() as *const c_void,
                    len,
                    ffi::SQLITE_TRANSIENT(),
                )
            }
        };
        self.check_bind(rc)
    }

    /// Bind UTF-8 text to the 1-based parameter `index`
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BindIndexOutOfRange`] when `index` is zero or past the
    /// statement's parameter count.
    ///
    /// # Panics
    ///
    /// Panics if called after stepping has begun.
    pub fn bind_text(&mut self, index: usize, value: &str) -> Result<()> {
        self.assert_bindable();
        let idx = bind_index(index)?;
        let len = length_as_c_int(value.len())?;
        // a null pointer binds NULL; zero-length text still needs a real
        // pointer to go in as the empty string
        let ptr = if value.is_empty() {
            "".as_ptr()
        } else {
            value.as_ptr()
        };
        let stmt = self.handle.statement().handle().as_ptr();
        let rc = unsafe {
            ffi::sqlite3_bind_text(stmt, idx, ptr as *const c_char, len, ffi::SQLITE_TRANSIENT())
        };
        self.check_bind(rc)
    }

    /// Bind a 64-bit integer to the 1-based parameter `index`
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BindIndexOutOfRange`] when `index` is zero or past the
    /// statement's parameter count.
    ///
    /// # Panics
    ///
    /// Panics if called after stepping has begun.
    pub fn bind_int64(&mut self, index: usize, value: i64) -> Result<()> {
        self.assert_bindable();
        let idx = bind_index(index)?;
        let stmt = self.handle.statement().handle().as_ptr();
        let rc = unsafe { ffi::sqlite3_bind_int64(stmt, idx, value) };
        self.check_bind(rc)
    }

    /// Bind a double to the 1-based parameter `index`
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BindIndexOutOfRange`] when `index` is zero or past the
    /// statement's parameter count.
    ///
    /// # Panics
    ///
    /// Panics if called after stepping has begun.
    pub fn bind_double(&mut self, index: usize, value: f64) -> Result<()> {
        self.assert_bindable();
        let idx = bind_index(index)?;
        let stmt = self.handle.statement().handle().as_ptr();
        let rc = unsafe { ffi::sqlite3_bind_double(stmt, idx, value) };
        self.check_bind(rc)
    }

    /// Bind NULL to the 1-based parameter `index`
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BindIndexOutOfRange`] when `index` is zero or past the
    /// statement's parameter count.
    ///
    /// # Panics
    ///
    /// Panics if called after stepping has begun.
    pub fn bind_null(&mut self, index: usize) -> Result<()> {
        self.assert_bindable();
        let idx = bind_index(index)?;
        let stmt = self.handle.statement().handle().as_ptr();
        let rc = unsafe { ffi::sqlite3_bind_null(stmt, idx) };
        self.check_bind(rc)
    }

    /// Bind any [`Value`] to the 1-based parameter `index`
    ///
    /// # Errors
    ///
    /// Same conditions as the type-specific bind methods.
    ///
    /// # Panics
    ///
    /// Panics if called after stepping has begun.
    pub fn bind_value(&mut self, index: usize, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.bind_null(index),
            Value::Integer(v) => self.bind_int64(index, *v),
            Value::Real(v) => self.bind_double(index, *v),
            Value::Text(v) => self.bind_text(index, v),
            Value::Blob(v) => self.bind_blob(index, v),
        }
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Advance the statement by one row
    ///
    /// Returns [`Step::Row`] when a result row is ready to read and
    /// [`Step::Done`] when the statement has finished. Statements that
    /// return no data (inserts, DDL) go straight to `Done`.
    ///
    /// # Errors
    ///
    /// Environmental failures (busy or locked database, constraint
    /// violations, I/O trouble) come back as errors; the run then accepts
    /// nothing but [`reset`](Self::reset).
    ///
    /// # Panics
    ///
    /// Panics when called again after `Done` or after a failed step. The
    /// raw engine would silently rewind and re-execute in that situation;
    /// re-running must be an explicit `reset` here.
    pub fn step(&mut self) -> Result<Step> {
        match self.state {
            RunState::Unstarted | RunState::RowAvailable => {}
            RunState::Finished => {
                panic!("step called after the statement finished; call reset() first")
            }
            RunState::Failed => panic!("step called after a failed step; call reset() first"),
        }

        let rc = unsafe { ffi::sqlite3_step(self.handle.statement().handle().as_ptr()) };
        match rc {
            ffi::SQLITE_ROW => {
                self.state = RunState::RowAvailable;
                Ok(Step::Row)
            }
            ffi::SQLITE_DONE => {
                self.state = RunState::Finished;
                Ok(Step::Done)
            }
            code => {
                self.state = RunState::Failed;
                Err(self.engine_error(code))
            }
        }
    }

    /// Rewind the run so it can bind and step again
    ///
    /// Bound parameter values are retained across an explicit reset; they
    /// are only cleared when the run is dropped. Resetting after a failed
    /// step succeeds and simply rearms the run, since the engine repeats
    /// the step error from the reset call and the caller already saw it.
    ///
    /// # Errors
    ///
    /// Returns an error only when the rewind itself surfaces a failure the
    /// caller has not seen yet.
    pub fn reset(&mut self) -> Result<()> {
        let already_reported = self.state == RunState::Failed;
        let rc = self.handle.statement_mut().reset();
        self.state = RunState::Unstarted;
        if rc != ffi::SQLITE_OK && !already_reported {
            return Err(self.engine_error(rc));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Column reads (0-based, current row only)
    // ------------------------------------------------------------------

    /// Read the 0-based column of the current row as a blob
    ///
    /// NULL reads as an empty vector; use [`column_type`](Self::column_type)
    /// to tell NULL from a zero-length blob.
    ///
    /// # Panics
    ///
    /// Panics when no row is current or `index` is out of range.
    pub fn column_blob(&self, index: usize) -> Vec<u8> {
        let idx = self.row_slot(index);
        let stmt = self.handle.statement().handle().as_ptr();
        unsafe {
            // pointer first, then length, per the engine's call-order rule
            let ptr = ffi::sqlite3_column_blob(stmt, idx);
            let len = ffi::sqlite3_column_bytes(stmt, idx);
            if ptr.is_null() || len <= 0 {
                Vec::new()
            } else {
                std::slice::from_raw_parts(ptr as *const u8, len as usize).to_vec()
            }
        }
    }

    /// Read the 0-based column of the current row as text
    ///
    /// Non-text cells are rendered by the engine (an INTEGER cell reads as
    /// its decimal digits); NULL reads as the empty string. Invalid UTF-8
    /// is replaced rather than dropped.
    ///
    /// # Panics
    ///
    /// Panics when no row is current or `index` is out of range.
    pub fn column_text(&self, index: usize) -> String {
        let idx = self.row_slot(index);
        let stmt = self.handle.statement().handle().as_ptr();
        unsafe {
            let ptr = ffi::sqlite3_column_text(stmt, idx);
            if ptr.is_null() {
                return String::new();
            }
            let len = ffi::sqlite3_column_bytes(stmt, idx);
            let bytes = std::slice::from_raw_parts(ptr, len.max(0) as usize);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    /// Read the 0-based column of the current row as a 64-bit integer
    ///
    /// Non-integer cells are coerced by the engine; NULL reads as 0.
    ///
    /// # Panics
    ///
    /// Panics when no row is current or `index` is out of range.
    pub fn column_int64(&self, index: usize) -> i64 {
        let idx = self.row_slot(index);
        unsafe { ffi::sqlite3_column_int64(self.handle.statement().handle().as_ptr(), idx) }
    }

    /// Read the 0-based column of the current row as a double
    ///
    /// Non-real cells are coerced by the engine; NULL reads as 0.0.
    ///
    /// # Panics
    ///
    /// Panics when no row is current or `index` is out of range.
    pub fn column_double(&self, index: usize) -> f64 {
        let idx = self.row_slot(index);
        unsafe { ffi::sqlite3_column_double(self.handle.statement().handle().as_ptr(), idx) }
    }

    /// Read the 0-based column of the current row without coercion
    ///
    /// # Panics
    ///
    /// Panics when no row is current or `index` is out of range.
    pub fn column_value(&self, index: usize) -> Value {
        match self.column_type(index) {
            StorageClass::Null => Value::Null,
            StorageClass::Integer => Value::Integer(self.column_int64(index)),
            StorageClass::Real => Value::Real(self.column_double(index)),
            StorageClass::Text => Value::Text(self.column_text(index)),
            StorageClass::Blob => Value::Blob(self.column_blob(index)),
        }
    }

    /// Storage class of the 0-based column in the current row
    ///
    /// # Panics
    ///
    /// Panics when no row is current or `index` is out of range.
    pub fn column_type(&self, index: usize) -> StorageClass {
        let idx = self.row_slot(index);
        let code =
            unsafe { ffi::sqlite3_column_type(self.handle.statement().handle().as_ptr(), idx) };
        StorageClass::from_code(code)
    }

    // ------------------------------------------------------------------
    // Metadata and diagnostics
    // ------------------------------------------------------------------

    /// Number of columns in the statement's result rows
    pub fn column_count(&self) -> usize {
        self.handle.statement().column_count()
    }

    /// Name of the 0-based result column, or `None` if out of range
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.handle.statement().column_name(index)
    }

    /// Number of bindable parameters in the statement
    pub fn parameter_count(&self) -> usize {
        self.handle.statement().parameter_count()
    }

    /// 1-based index of the named parameter, written with its prefix
    /// (e.g. `:uuid`)
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.handle.statement().parameter_index(name)
    }

    /// Diagnostic from the most recent failed bind or step
    ///
    /// Retained across [`reset`](Self::reset); a later failure overwrites it.
    pub fn error_message(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn assert_bindable(&self) {
        assert!(
            self.state == RunState::Unstarted,
            "cannot bind parameters after stepping has begun; call reset() first"
        );
    }

    fn row_slot(&self, index: usize) -> c_int {
        assert!(
            self.state == RunState::RowAvailable,
            "no current row; column reads are only valid after step() returns Step::Row"
        );
        let count = self.column_count();
        assert!(
            index < count,
            "column index {index} out of range (result has {count} columns)"
        );
        index as c_int
    }

    fn check_bind(&mut self, rc: c_int) -> Result<()> {
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(self.engine_error(rc))
        }
    }

    /// Build an error from the connection's diagnostics and remember its
    /// message. An engine-reported misuse means this layer's sequencing
    /// broke down, which is not a recoverable condition.
    fn engine_error(&mut self, code: c_int) -> Error {
        let error = unsafe { error_from_handle(self.db.handle().as_ptr(), code) };
        if error.kind() == ErrorKind::Misuse {
            panic!("engine reported statement misuse: {error}");
        }
        self.last_error = Some(error.message().to_string());
        error
    }
}

impl Drop for Run<'_, '_> {
    fn drop(&mut self) {
        // an owned statement is about to be finalized by its own Drop;
        // only a borrowed one survives and needs scrubbing for the next
        // borrower
        if let StatementHandle::Borrowed(statement) = &mut self.handle {
            let already_reported = self.state == RunState::Failed;
            let rc = statement.reset();
            if rc != ffi::SQLITE_OK && !already_reported {
                warn!(code = rc, sql = statement.sql(), "statement reset failed on release");
            }
            let rc = statement.clear_bindings();
            if rc != ffi::SQLITE_OK {
                warn!(code = rc, sql = statement.sql(), "failed to clear bindings on release");
            }
        }
    }
}

impl std::fmt::Debug for Run<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("sql", &self.handle.statement().sql())
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .finish()
    }
}

fn bind_index(index: usize) -> Result<c_int> {
    c_int::try_from(index).map_err(|_| {
        Error::new(
            ErrorKind::BindIndexOutOfRange,
            format!("parameter index {index} is out of range"),
        )
    })
}

fn length_as_c_int(len: usize) -> Result<c_int> {
    c_int::try_from(len)
        .map_err(|_| Error::other("value length exceeds the engine's size limit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::DatabaseContext;

    fn scratch_db() -> Database {
        let mut db = Database::new();
        db.open_in_memory().expect("Failed to open");
        db
    }

    fn exec(ctx: &DatabaseContext<'_>, sql: &str) {
        ctx.use_once(sql)
            .expect("Failed to prepare")
            .step()
            .expect("Failed to execute");
    }

    #[test]
    fn test_bind_and_read_round_trip() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);
        exec(&ctx, "create table frames (data blob, label text, stamp integer, gain real)");

        let mut insert = ctx
            .use_once("insert into frames values (?1, ?2, ?3, ?4)")
            .expect("Failed to prepare");
        insert.bind_blob(1, &[0xde, 0xad, 0xbe, 0xef]).expect("Failed to bind");
        insert.bind_text(2, "wide angle").expect("Failed to bind");
        insert.bind_int64(3, 1_712_345_678).expect("Failed to bind");
        insert.bind_double(4, 0.75).expect("Failed to bind");
        assert_eq!(insert.step().expect("Failed to step"), Step::Done);
        drop(insert);

        let mut select = ctx
            .use_once("select data, label, stamp, gain from frames")
            .expect("Failed to prepare");
        assert_eq!(select.step().expect("Failed to step"), Step::Row);
        assert_eq!(select.column_blob(0), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(select.column_text(1), "wide angle");
        assert_eq!(select.column_int64(2), 1_712_345_678);
        assert_eq!(select.column_double(3), 0.75);
        assert_eq!(select.step().expect("Failed to step"), Step::Done);
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select null").expect("Failed to prepare");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_type(0), StorageClass::Null);
        assert_eq!(run.column_text(0), "");
        assert!(run.column_blob(0).is_empty());
        assert_eq!(run.column_int64(0), 0);
        assert_eq!(run.column_double(0), 0.0);
        assert_eq!(run.column_value(0), Value::Null);
    }

    #[test]
    fn test_integer_reads_as_decimal_text() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select 42").expect("Failed to prepare");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_type(0), StorageClass::Integer);
        assert_eq!(run.column_text(0), "42");
    }

    #[test]
    fn test_empty_blob_is_blob_not_null() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_blob(1, &[]).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_type(0), StorageClass::Blob);
        assert!(run.column_blob(0).is_empty());
    }

    #[test]
    fn test_empty_text_is_text_not_null() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_text(1, "").expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_type(0), StorageClass::Text);
        assert_eq!(run.column_text(0), "");
    }

    #[test]
    fn test_bind_index_out_of_range() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        let err = run.bind_int64(2, 7).expect_err("bind past the last parameter");
        assert_eq!(err.kind(), ErrorKind::BindIndexOutOfRange);
        assert!(run.error_message().is_some());

        // the run is still usable after a rejected bind
        run.bind_int64(1, 7).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_int64(0), 7);
    }

    #[test]
    fn test_bindings_survive_explicit_reset() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_int64(1, 5).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_int64(0), 5);

        run.reset().expect("Failed to reset");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_int64(0), 5);
    }

    #[test]
    fn test_release_clears_bindings() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut statement = db.prepare("select ?1").expect("Failed to prepare");
        {
            let mut run = ctx.borrow(&mut statement);
            run.bind_int64(1, 9).expect("Failed to bind");
            assert_eq!(run.step().expect("Failed to step"), Step::Row);
            assert_eq!(run.column_int64(0), 9);
        }
        {
            let mut run = ctx.borrow(&mut statement);
            assert_eq!(run.step().expect("Failed to step"), Step::Row);
            assert_eq!(run.column_type(0), StorageClass::Null);
        }
    }

    #[test]
    fn test_rebind_after_reset() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);
        exec(&ctx, "create table tally (n integer)");

        let mut statement = db
            .prepare("insert into tally (n) values (?1)")
            .expect("Failed to prepare");
        let mut run = ctx.borrow(&mut statement);
        for n in 0..3 {
            run.bind_int64(1, n).expect("Failed to bind");
            assert_eq!(run.step().expect("Failed to step"), Step::Done);
            run.reset().expect("Failed to reset");
        }
        drop(run);

        let mut count = ctx
            .use_once("select count(*) from tally")
            .expect("Failed to prepare");
        assert_eq!(count.step().expect("Failed to step"), Step::Row);
        assert_eq!(count.column_int64(0), 3);
    }

    #[test]
    fn test_failed_step_reports_and_resets_clean() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);
        exec(&ctx, "create table singleton (id integer primary key)");
        exec(&ctx, "insert into singleton (id) values (1)");

        let mut run = ctx
            .use_once("insert into singleton (id) values (1)")
            .expect("Failed to prepare");
        let err = run.step().expect_err("duplicate key must fail");
        assert_eq!(err.kind(), ErrorKind::Constraint);
        let message = run.error_message().expect("diagnostic should be recorded");
        assert!(!message.is_empty());

        // the failure was already reported, so rearming succeeds
        run.reset().expect("Failed to reset");
    }

    #[test]
    fn test_column_names_via_run() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let run = ctx
            .use_once("select 1 as one, 2 as two")
            .expect("Failed to prepare");
        assert_eq!(run.column_count(), 2);
        assert_eq!(run.column_name(0), Some("one"));
        assert_eq!(run.column_name(1), Some("two"));
    }

    #[test]
    fn test_named_parameter_lookup_via_run() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx
            .use_once("select :threshold")
            .expect("Failed to prepare");
        let idx = run.parameter_index(":threshold").expect("parameter exists");
        run.bind_int64(idx, 12).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_int64(0), 12);
    }

    // ==================================================================
    // Sequencing panics
    // ==================================================================

    #[test]
    #[should_panic(expected = "call reset() first")]
    fn test_step_after_done_panics() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select 1").expect("Failed to prepare");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.step().expect("Failed to step"), Step::Done);
        let _ = run.step();
    }

    #[test]
    #[should_panic(expected = "no current row")]
    fn test_column_read_without_row_panics() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let run = ctx.use_once("select 1").expect("Failed to prepare");
        let _ = run.column_int64(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_column_index_out_of_range_panics() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select 1").expect("Failed to prepare");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        let _ = run.column_int64(1);
    }

    #[test]
    #[should_panic(expected = "cannot bind parameters after stepping has begun")]
    fn test_bind_after_step_panics() {
        let db = scratch_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_int64(1, 1).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        let _ = run.bind_int64(1, 2);
    }
}
