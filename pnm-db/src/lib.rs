//! SQLite database layer for national park management.
//!
//! This crate owns the relational schema (provinces, parks, areas, natural
//! elements, personnel, visitors, accommodations and excursions), a typed
//! data-access API over it, the aggregate reports, and the loader for the
//! CSV files produced by `pnm-import`.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper, cheaply cloneable, single-threaded
//! - SQLite via `rusqlite` (bundled), foreign keys switched on per connection
//! - Integrity rules live in the schema: keys, NOT NULL, CHECK constraints and
//!   triggers (see [`schema::create_schema`]); violations surface as typed
//!   [`DbError`] variants
//! - Multi-statement writes run inside a transaction and either fully commit
//!   or leave the database unchanged
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pnm_db::{Database, models::NewPark};
//!
//! let db = Database::new().unwrap();
//! let province = db.insert_province("Córdoba", "Secretaría de Ambiente").unwrap();
//! let park = db
//!     .insert_park(&NewPark {
//!         name: "Quebrada del Condorito".into(),
//!         declaration_date: NaiveDate::from_ymd_opt(1996, 12, 2).unwrap(),
//!         contact_email: Some("condorito@example.org".into()),
//!         code: Some("QC".into()),
//!         total_area: Some(37344.0),
//!     })
//!     .unwrap();
//! db.link_park_province(park, province, Some(37344.0)).unwrap();
//!
//! let top = db.province_with_most_parks().unwrap().unwrap();
//! assert_eq!(top.province, "Córdoba");
//! ```

pub mod catalog;
mod elements;
pub mod error;
mod loader;
pub mod models;
mod parks;
mod personnel;
mod queries;
pub mod schema;
mod visits;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{DbError, DbResult};

use rusqlite::{Connection, Transaction};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Handle to the park management database.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
///
/// # Example
///
/// ```rust
/// use pnm_db::Database;
///
/// let db = Database::new().unwrap();
/// db.insert_province("Salta", "Secretaría de Ambiente de Salta").unwrap();
/// assert_eq!(db.list_provinces().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and apply the schema.
    ///
    /// The schema is idempotent, so opening an existing database is safe.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        log::info!("[PNM] db: opening {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`. The connection is borrowed for the duration of `f`, so
    /// `f` must work through the transaction it is given rather than calling
    /// other `Database` methods.
    pub fn transaction<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}
