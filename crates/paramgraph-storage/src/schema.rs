//! Connection setup for the parameter graph database.
//!
//! Every connection gets the same pragmas and is brought up to the newest
//! schema before the store sees it. The applied version is kept in SQLite's
//! `user_version`.

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// Schema steps in the order they were introduced.
const SCHEMA: &[&str] = &[include_str!("migrations/001_initial_schema.sql")];

fn migrations() -> Migrations<'static> {
    Migrations::new(SCHEMA.iter().copied().map(M::up).collect())
}

/// Opens the graph database file at `path`, creating it if missing.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    let conn = prepare(Connection::open(path)?)?;
    tracing::info!(path, "graph database opened");
    Ok(conn)
}

/// A private database that lives as long as the connection.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    prepare(Connection::open_in_memory()?)
}

/// Write-ahead journal with relaxed fsync and enforced foreign keys, then migrate.
fn prepare(mut conn: Connection) -> Result<Connection, StorageError> {
    for (pragma, value) in [
        ("journal_mode", "WAL"),
        ("synchronous", "NORMAL"),
        ("foreign_keys", "ON"),
    ] {
        conn.pragma_update(None, pragma, value)?;
    }
    migrations()
        .to_latest(&mut conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    tracing::debug!(version = SCHEMA.len(), "graph schema up to date");
    Ok(conn)
}
