//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values and classification of
//! constraint failures.

use chrono::{DateTime, Utc};
use rusqlite::ffi;
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::error::Error;

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| {
        SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse an optional DateTime from an RFC3339 string
pub fn parse_datetime_opt(s: Option<String>) -> Result<Option<DateTime<Utc>>, SqlError> {
    s.map(|s| parse_datetime(&s)).transpose()
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Map a write failure to a domain error
///
/// Unique and primary key violations become [`Error::Conflict`], foreign key
/// violations become [`Error::ReferentialIntegrity`]. SQLite reports a delete
/// blocked by `ON DELETE RESTRICT` as a trigger constraint carrying the
/// foreign key message, so that case is matched on the detail. `what` names
/// the record being written.
pub fn classify_write(err: SqlError, what: &str) -> Error {
    if let SqlError::SqliteFailure(ref failure, ref detail) = err {
        let detail = detail.as_deref().unwrap_or("constraint failed");
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return Error::Conflict(format!("{}: {}", what, detail));
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return Error::ReferentialIntegrity(format!("{}: {}", what, detail));
            }
            ffi::SQLITE_CONSTRAINT_TRIGGER if detail.starts_with("FOREIGN KEY") => {
                return Error::ReferentialIntegrity(format!("{}: {}", what, detail));
            }
            _ => {}
        }
    }
    Error::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_classify_unique_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();

        let err = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err();
        assert!(matches!(classify_write(err, "t"), Error::Conflict(_)));
    }

    #[test]
    fn test_classify_foreign_key_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id TEXT PRIMARY KEY);
             CREATE TABLE child (parent_id TEXT REFERENCES parent(id));",
        )
        .unwrap();

        let err = conn
            .execute("INSERT INTO child VALUES ('missing')", [])
            .unwrap_err();
        assert!(matches!(
            classify_write(err, "child"),
            Error::ReferentialIntegrity(_)
        ));
    }

    #[test]
    fn test_classify_restrict_delete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id TEXT PRIMARY KEY);
             CREATE TABLE child (
                 parent_id TEXT NOT NULL REFERENCES parent(id) ON DELETE RESTRICT
             );
             INSERT INTO parent VALUES ('p');
             INSERT INTO child VALUES ('p');",
        )
        .unwrap();

        let err = conn
            .execute("DELETE FROM parent WHERE id = 'p'", [])
            .unwrap_err();
        assert!(matches!(
            classify_write(err, "parent"),
            Error::ReferentialIntegrity(_)
        ));

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM parent", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[test]
    fn test_classify_passes_other_errors_through() {
        let err = SqlError::QueryReturnedNoRows;
        assert!(matches!(classify_write(err, "t"), Error::Database(_)));
    }

    #[test]
    fn test_parse_bad_uuid() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }
}
