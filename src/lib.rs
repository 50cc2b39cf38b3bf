//! # SQLite Guard
//!
//! A thin, deliberately small execution layer over bundled SQLite for code
//! that cannot afford to misuse its database. Every statement runs through
//! an exclusive, scoped handle that is rewound and scrubbed on release, so
//! stale cursors and leftover parameter bindings cannot leak from one part
//! of the program into another.
//!
//! ## Features
//!
//! - **Scoped Execution**: statements execute through a [`Run`] handle that
//!   resets the cursor and clears all bindings when dropped
//! - **Compile-Time Discipline**: lifetimes make use-after-close and
//!   concurrent reuse of a statement unrepresentable
//! - **Typed Binds and Reads**: 1-based parameters and 0-based columns,
//!   with the engine's coercion behavior preserved on reads
//! - **Deliberate Error Split**: sequencing mistakes panic as caller bugs,
//!   while environmental failures return classified [`Error`] values
//! - **Script Execution**: semicolon-separated setup scripts with the
//!   failing statement's position in every diagnostic
//! - **Bundled Engine**: compiles and links its own SQLite, no system
//!   library required
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sqlite_guard = "0.1"
//! ```
//!
//! ### Basic Usage
//!
//! ```rust
//! use sqlite_guard::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Open an in-memory database
//!     let mut db = Database::new();
//!     db.open_in_memory()?;
//!
//!     // All execution goes through a context
//!     let ctx = DatabaseContext::new(&db);
//!     run_statements(&ctx, "create table users (id integer primary key, name text)")?;
//!
//!     // Prepare once, execute through a scoped handle
//!     let mut insert = db.prepare("insert into users (name) values (?1)")?;
//!     {
//!         let mut run = ctx.borrow(&mut insert);
//!         run.bind_text(1, "Alice")?;
//!         run.step()?;
//!     }
//!
//!     // Throwaway statements skip the prepare step
//!     let mut query = ctx.use_once("select id, name from users")?;
//!     while query.step()? == Step::Row {
//!         println!("user {}: {}", query.column_int64(0), query.column_text(1));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Reusing a Prepared Statement
//!
//! ```rust
//! use sqlite_guard::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut db = Database::new();
//!     db.open_in_memory()?;
//!     let ctx = DatabaseContext::new(&db);
//!     run_statements(&ctx, "create table samples (n integer)")?;
//!
//!     let mut insert = db.prepare("insert into samples (n) values (?1)")?;
//!     let mut run = ctx.borrow(&mut insert);
//!     for n in 0..3 {
//!         run.bind_int64(1, n)?;
//!         run.step()?;
//!         run.reset()?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Project Structure
//!
//! ```text
//! sqlite_guard/
//! ├── src/
//! │   ├── core/
//! │   │   ├── context.rs     # Scoped execution handles
//! │   │   ├── database.rs    # Connection lifecycle
//! │   │   ├── error.rs       # Error kinds and classification
//! │   │   ├── open_mode.rs   # Read-only / read-write / create
//! │   │   ├── run.rs         # Bind, step, read cycle
//! │   │   ├── script.rs      # Multi-statement scripts
//! │   │   ├── statement.rs   # Compiled statements
//! │   │   ├── value.rs       # Storage classes and values
//! │   │   └── mod.rs
//! │   └── lib.rs
//! ├── benches/               # Criterion benchmarks
//! ├── demos/                 # Example programs
//! ├── tests/                 # Integration tests
//! └── Cargo.toml
//! ```

/// Core connection, statement, and execution types
pub mod core;

/// Prelude for convenient imports
///
/// ```rust
/// use sqlite_guard::prelude::*;
///
/// fn main() -> Result<()> {
///     let mut db = Database::new();
///     db.open_in_memory()?;
///     Ok(())
/// }
/// ```
pub mod prelude {
    pub use crate::core::{
        run_statements, Database, DatabaseContext, Error, ErrorKind, OpenMode, Result, Run,
        Statement, Step, StorageClass, Value,
    };
}

// Re-export at root level for convenience
pub use crate::core::{
    run_statements, Database, DatabaseContext, Error, ErrorKind, OpenMode, Result, Run, Statement,
    Step, StorageClass, Value,
};
