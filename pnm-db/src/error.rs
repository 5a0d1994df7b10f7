//! Error taxonomy for database operations.
//!
//! SQLite reports every integrity failure as `SQLITE_CONSTRAINT`; the
//! extended result code tells the kinds apart. [`DbError::from`] maps those
//! codes onto variants so callers can match on the kind of violation
//! instead of parsing messages.

use rusqlite::ffi;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// UNIQUE or PRIMARY KEY violation.
    #[error("duplicate entry: {0}")]
    Unique(String),

    /// A required column was NULL.
    #[error("column cannot be null: {0}")]
    NotNull(String),

    /// Reference to a missing parent row, or delete of a referenced parent.
    #[error("foreign key constraint fails: {0}")]
    ForeignKey(String),

    /// CHECK constraint violation; the message names the constraint.
    #[error("check constraint violated: {0}")]
    Check(String),

    /// Value of the wrong type for a STRICT column.
    #[error("data type mismatch: {0}")]
    DataType(String),

    /// A business rule trigger aborted the statement; carries the rule name.
    #[error("business rule violated: {0}")]
    BusinessRule(String),

    #[error("record not found: {0}")]
    NotFound(String),

    /// Rejected on the Rust side before reaching SQL.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// True for any integrity violation raised by the engine.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Unique(_)
                | DbError::NotNull(_)
                | DbError::ForeignKey(_)
                | DbError::Check(_)
                | DbError::DataType(_)
                | DbError::BusinessRule(_)
        )
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        let (extended_code, message) = match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                (e.extended_code, msg.clone().unwrap_or_default())
            }
            _ => return DbError::Sqlite(err),
        };

        match extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                DbError::Unique(message)
            }
            ffi::SQLITE_CONSTRAINT_NOTNULL => DbError::NotNull(message),
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => DbError::ForeignKey(message),
            ffi::SQLITE_CONSTRAINT_CHECK => DbError::Check(message),
            ffi::SQLITE_CONSTRAINT_DATATYPE => DbError::DataType(message),
            ffi::SQLITE_CONSTRAINT_TRIGGER => DbError::BusinessRule(message),
            _ => DbError::Sqlite(err),
        }
    }
}
