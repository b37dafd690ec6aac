//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open the PDG database file read-only.
//! - Open in-memory databases carrying the PDG schema subset.
//!
//! # Invariants
//! - Returned connections have passed [`verify_schema`].
//! - File connections are opened with `SQLITE_OPEN_READ_ONLY`.

use super::schema::{apply_schema, verify_schema};
use super::DbResult;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens an existing PDG database file read-only and verifies its schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = path.as_ref();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = match Connection::open_with_flags(path, flags) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "file", started_at, |conn| {
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    })
}

/// Opens an in-memory database with the PDG schema subset applied.
///
/// The connection is writable so callers can seed fixture rows.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "memory", started_at, apply_schema)
}

fn finish_open(
    conn: Connection,
    mode: &str,
    started_at: Instant,
    prepare: impl FnOnce(&Connection) -> DbResult<()>,
) -> DbResult<Connection> {
    match prepare(&conn).and_then(|()| verify_schema(&conn)) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
