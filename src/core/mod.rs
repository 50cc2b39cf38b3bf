//! Core connection, statement, and execution types
//!
//! This module provides the fundamental building blocks of the crate: the
//! connection lifecycle ([`Database`]), compiled statements ([`Statement`]),
//! the scoped execution layer ([`DatabaseContext`] and [`Run`]), script
//! execution ([`run_statements`]), and the error and value types shared by
//! all of them.

pub mod context;
pub mod database;
pub mod error;
pub mod open_mode;
pub mod run;
pub mod script;
pub mod statement;
pub mod value;

// Re-export commonly used types
pub use context::DatabaseContext;
pub use database::Database;
pub use error::{Error, ErrorKind, Result};
pub use open_mode::OpenMode;
pub use run::{Run, Step};
pub use script::run_statements;
pub use statement::Statement;
pub use value::{StorageClass, Value};
