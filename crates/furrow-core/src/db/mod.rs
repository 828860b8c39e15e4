//! SQLite persistence for plans.
//!
//! Each planner operation opens its own [`Database`] on the blocking pool and
//! drops it when done. Concurrent writers are serialized by SQLite itself;
//! the one-shot oracle claim relies on a conditional `UPDATE` rather than an
//! in-process lock.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod plan_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
