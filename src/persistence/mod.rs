use rusqlite::{Connection, OpenFlags};

use crate::app::DatabaseError;

pub mod records;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Opens a fresh connection to an existing database file. Read-write without
/// create, so a missing file surfaces as a connection error instead of an
/// empty database.
pub fn open_connection(path: &str) -> DatabaseResult<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .map_err(|e| DatabaseError::ConnectionError(e))
}
