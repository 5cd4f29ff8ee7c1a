// crates/cert-ledger-store-sqlite/src/manager.rs
// ============================================================================
// Module: SQLite Connection Manager
// Description: r2d2 connection manager for rusqlite connections.
// Purpose: Open pooled connections with durability pragmas applied.
// Dependencies: r2d2, rusqlite
// ============================================================================

//! ## Overview
//! [`SqliteConnectionManager`] opens read-write connections to one database
//! file and applies journal, sync, and busy-timeout pragmas to each. A
//! connection handed back with a transaction still open is reported broken
//! so the pool discards it instead of lending it out mid-transaction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::OpenFlags;

use crate::store::SqliteStoreMode;
use crate::store::SqliteSyncMode;

// ============================================================================
// SECTION: Manager
// ============================================================================

/// Opens `SQLite` connections for an `r2d2` pool.
#[derive(Debug, Clone)]
pub struct SqliteConnectionManager {
    /// Database file path.
    path: PathBuf,
    /// Journal mode applied on connect.
    journal_mode: SqliteStoreMode,
    /// Sync mode applied on connect.
    sync_mode: SqliteSyncMode,
    /// Busy timeout applied on connect.
    busy_timeout: Duration,
}

impl SqliteConnectionManager {
    /// Creates a manager for the database file at `path`.
    #[must_use]
    pub const fn new(
        path: PathBuf,
        journal_mode: SqliteStoreMode,
        sync_mode: SqliteSyncMode,
        busy_timeout: Duration,
    ) -> Self {
        Self {
            path,
            journal_mode,
            sync_mode,
            busy_timeout,
        }
    }
}

impl r2d2::ManageConnection for SqliteConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_with_flags(&self.path, flags)?;
        connection.busy_timeout(self.busy_timeout)?;
        connection.execute_batch(&format!(
            "PRAGMA journal_mode = {};",
            self.journal_mode.pragma_value()
        ))?;
        connection
            .execute_batch(&format!("PRAGMA synchronous = {};", self.sync_mode.pragma_value()))?;
        Ok(connection)
    }

    fn is_valid(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.query_row("SELECT 1", [], |_| Ok(()))
    }

    fn has_broken(&self, conn: &mut Connection) -> bool {
        !conn.is_autocommit()
    }
}
