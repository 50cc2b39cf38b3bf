//! Scoped statement execution over an open database
//!
//! A `DatabaseContext` is the only way to execute statements. It hands out
//! one [`Run`] per statement at a time, so a statement's cursor and bound
//! parameters always belong to exactly one caller, and it guarantees the
//! statement is rewound and its bindings cleared when that caller is done.

use super::database::Database;
use super::error::Result;
use super::run::Run;
use super::statement::Statement;

/// Issues exclusive execution handles for statements of one database
///
/// The borrow rules do the bookkeeping: a [`Run`] holds the statement
/// mutably, so a second execution of the same statement cannot even be
/// expressed until the first handle is dropped.
///
/// # Example
///
/// ```
/// use sqlite_guard::{Database, DatabaseContext, OpenMode, Step};
///
/// fn main() -> sqlite_guard::Result<()> {
///     let mut db = Database::new();
///     db.open_in_memory()?;
///
///     let ctx = DatabaseContext::new(&db);
///     ctx.use_once("create table points (x integer, y integer)")?.step()?;
///
///     let mut insert = db.prepare("insert into points (x, y) values (?1, ?2)")?;
///     let mut run = ctx.borrow(&mut insert);
///     run.bind_int64(1, 3)?;
///     run.bind_int64(2, 4)?;
///     assert_eq!(run.step()?, Step::Done);
///     Ok(())
/// }
/// ```
pub struct DatabaseContext<'db> {
    db: &'db Database,
}

impl<'db> DatabaseContext<'db> {
    /// Create a context over an open database
    ///
    /// # Panics
    ///
    /// Panics if the database is not open. A context without a live
    /// connection cannot execute anything, so this is a caller bug rather
    /// than a runtime condition.
    pub fn new(db: &'db Database) -> Self {
        assert!(
            db.is_open(),
            "cannot create a context over a database that is not open"
        );
        DatabaseContext { db }
    }

    /// The database this context executes against
    pub fn database(&self) -> &'db Database {
        self.db
    }

    /// Borrow a prepared statement for one execution pass
    ///
    /// The statement stays alive afterwards and can be borrowed again;
    /// dropping the returned [`Run`] rewinds the cursor and clears all
    /// bound parameters.
    ///
    /// # Panics
    ///
    /// Panics if the statement was prepared on a different database
    /// connection than this context wraps.
    pub fn borrow<'run>(&self, statement: &'run mut Statement<'db>) -> Run<'run, 'db> {
        assert!(
            std::ptr::eq(statement.db_handle(), self.db.handle().as_ptr()),
            "statement {:?} was prepared on a different database connection",
            statement.sql()
        );
        Run::borrowed(self.db, statement)
    }

    /// Prepare `sql` and execute it once, discarding the statement afterwards
    ///
    /// For statements that run more than once, [`Database::prepare`] plus
    /// [`borrow`](Self::borrow) avoids recompiling the SQL on every pass.
    ///
    /// # Errors
    ///
    /// Returns an error when `sql` does not compile, with the same kinds
    /// as [`Database::prepare`].
    pub fn use_once(&self, sql: &str) -> Result<Run<'_, 'db>> {
        let statement = self.db.prepare(sql)?;
        Ok(Run::owned(self.db, statement))
    }
}

impl std::fmt::Debug for DatabaseContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseContext")
            .field("database", &self.db.path())
            .finish()
    }
}
