//! SQLite access to the PDG database.
//!
//! # Responsibility
//! - Open read-only connections to an existing PDG database file.
//! - Verify that the tables and columns read by core are present.
//! - Provide in-memory databases with the PDG schema subset for fixtures.
//!
//! # Invariants
//! - Core never writes to a database opened with [`open_db`].
//! - Core code must not query a connection before schema verification passes.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "PDG database is missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "PDG database is missing column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
