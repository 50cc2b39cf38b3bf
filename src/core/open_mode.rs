//! Connection access-mode configuration
//!
//! This module defines how a database file is opened: read-only, read-write,
//! or read-write with creation of a missing file.

use serde::{Deserialize, Serialize};
use std::os::raw::c_int;
use std::str::FromStr;

use libsqlite3_sys as ffi;

/// Access mode for [`Database::open`](crate::core::Database::open)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OpenMode {
    /// Open an existing database for reading only
    ReadOnly,
    /// Open an existing database for reading and writing
    ReadWrite,
    /// Open for reading and writing, creating the file if it is missing
    #[default]
    ReadWriteCreate,
}

impl OpenMode {
    /// Translate to the engine's open flags
    pub(crate) fn to_flags(self) -> c_int {
        match self {
            OpenMode::ReadOnly => ffi::SQLITE_OPEN_READONLY,
            OpenMode::ReadWrite => ffi::SQLITE_OPEN_READWRITE,
            OpenMode::ReadWriteCreate => ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE,
        }
    }

    /// Convert access mode to string representation
    pub fn to_str(&self) -> &'static str {
        match self {
            OpenMode::ReadOnly => "read-only",
            OpenMode::ReadWrite => "read-write",
            OpenMode::ReadWriteCreate => "read-write-create",
        }
    }

    /// Check if this mode permits writes
    pub fn is_writable(&self) -> bool {
        !matches!(self, OpenMode::ReadOnly)
    }

    /// Check if this mode creates a missing database file
    pub fn creates_missing(&self) -> bool {
        matches!(self, OpenMode::ReadWriteCreate)
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for OpenMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read-only" | "readonly" | "ro" => Ok(OpenMode::ReadOnly),
            "read-write" | "readwrite" | "rw" => Ok(OpenMode::ReadWrite),
            "read-write-create" | "create" | "rwc" => Ok(OpenMode::ReadWriteCreate),
            _ => Err(format!("Invalid open mode: '{}'", s)),
        }
    }
}
