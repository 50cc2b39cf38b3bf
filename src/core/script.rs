//! Sequential execution of multi-statement SQL scripts

use tracing::debug;

use super::context::DatabaseContext;
use super::error::{Error, Result};
use super::run::{Run, Step};

/// Execute every statement in `script`, in order, stopping at the first
/// failure
///
/// Statements are separated by semicolons; comments and blank stretches
/// between them are skipped. Result rows produced along the way (a stray
/// `select`, a DML `returning` clause) are drained and discarded. Intended
/// for schema setup and maintenance scripts rather than queries.
///
/// Each statement commits on its own unless the script itself opens a
/// transaction, so a mid-script failure leaves the earlier statements
/// applied.
///
/// # Errors
///
/// Returns the first compile or execution error, with the failing
/// statement's 1-based position prefixed to the diagnostic. The rest of
/// the script is not attempted.
///
/// # Example
///
/// ```
/// use sqlite_guard::{run_statements, Database, DatabaseContext};
///
/// fn main() -> sqlite_guard::Result<()> {
///     let mut db = Database::new();
///     db.open_in_memory()?;
///     let ctx = DatabaseContext::new(&db);
///
///     run_statements(
///         &ctx,
///         "create table cameras (uuid blob primary key, name text);
///          create index cameras_by_name on cameras (name);",
///     )?;
///     Ok(())
/// }
/// ```
pub fn run_statements(ctx: &DatabaseContext<'_>, script: &str) -> Result<()> {
    let db = ctx.database();
    let mut remaining = script;
    let mut ordinal = 0usize;

    while !remaining.is_empty() {
        let (statement, consumed) = db
            .prepare_next(remaining)
            .map_err(|e| at_statement(ordinal + 1, e))?;

        let Some(statement) = statement else {
            // nothing compiled: either trailing comments and whitespace
            // that the engine consumed, or the end of the script
            if consumed == 0 {
                break;
            }
            remaining = &remaining[consumed..];
            continue;
        };

        ordinal += 1;
        debug!(ordinal, sql = statement.sql(), "executing script statement");

        let mut run = Run::owned(db, statement);
        loop {
            match run.step() {
                Ok(Step::Row) => continue,
                Ok(Step::Done) => break,
                Err(e) => return Err(at_statement(ordinal, e)),
            }
        }

        remaining = &remaining[consumed..];
    }

    Ok(())
}

/// Prefix an error's diagnostic with the 1-based script position it
/// occurred at, keeping kind and engine code intact
fn at_statement(ordinal: usize, error: Error) -> Error {
    let message = format!("statement {ordinal}: {}", error.message());
    match error.code() {
        Some(code) => Error::with_code(error.kind(), code, message),
        None => Error::new(error.kind(), message),
    }
}
