//! Visitors, accommodations and excursions.

use chrono::NaiveTime;
use rusqlite::{params, OptionalExtension, Row};

use crate::models::{Accommodation, Excursion, ExcursionType, NewVisitor, Visitor};
use crate::{Database, DbError, DbResult};

fn visitor_from_row(row: &Row<'_>) -> rusqlite::Result<Visitor> {
    Ok(Visitor {
        id: row.get(0)?,
        dni: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        profession: row.get(4)?,
        accommodation_id: row.get(5)?,
        park_id: row.get(6)?,
    })
}

fn excursion_from_row(row: &Row<'_>) -> rusqlite::Result<Excursion> {
    let raw: String = row.get(2)?;
    let time = pnm_utils::dates::parse_time(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Excursion {
        id: row.get(0)?,
        day_of_week: row.get(1)?,
        time,
        excursion_type: row.get(3)?,
    })
}

const VISITOR_SELECT: &str =
    "SELECT id, DNI, name, address, profession, accommodation_id, park_id FROM visitors";

impl Database {
    // ───────────────────── Accommodations ─────────────────────

    pub fn insert_accommodation(&self, capacity: i64, category: Option<&str>) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO accommodations (capacity, category) VALUES (?1, ?2)",
            params![capacity, category],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_accommodation(&self, id: i64) -> DbResult<Accommodation> {
        let conn = self.conn.borrow();
        conn.query_row(
            "SELECT id, capacity, category FROM accommodations WHERE id = ?1",
            params![id],
            |row| {
                Ok(Accommodation {
                    id: row.get(0)?,
                    capacity: row.get(1)?,
                    category: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("accommodation {}", id)))
    }

    pub fn delete_accommodation(&self, id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute("DELETE FROM accommodations WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("accommodation {}", id)));
        }
        Ok(())
    }

    // ───────────────────── Visitors ─────────────────────

    pub fn insert_visitor(&self, visitor: &NewVisitor) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO visitors (DNI, name, address, profession, accommodation_id, park_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                visitor.dni,
                visitor.name,
                visitor.address,
                visitor.profession,
                visitor.accommodation_id,
                visitor.park_id
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("[PNM] write: visitor {} in park {}", id, visitor.park_id);
        Ok(id)
    }

    pub fn get_visitor(&self, id: i64) -> DbResult<Visitor> {
        let conn = self.conn.borrow();
        conn.query_row(
            &format!("{} WHERE id = ?1", VISITOR_SELECT),
            params![id],
            visitor_from_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("visitor {}", id)))
    }

    pub fn find_visitor_by_dni(&self, dni: &str) -> DbResult<Option<Visitor>> {
        let conn = self.conn.borrow();
        Ok(conn
            .query_row(
                &format!("{} WHERE DNI = ?1", VISITOR_SELECT),
                params![dni],
                visitor_from_row,
            )
            .optional()?)
    }

    /// Delete a visitor and their excursion bookings.
    pub fn delete_visitor(&self, id: i64) -> DbResult<()> {
        self.transaction(|tx| {
            tx.execute("DELETE FROM visitor_excursions WHERE visitor_id = ?1", params![id])?;
            let changed = tx.execute("DELETE FROM visitors WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("visitor {}", id)));
            }
            Ok(())
        })
    }

    // ───────────────────── Excursions ─────────────────────

    pub fn insert_excursion(
        &self,
        day_of_week: &str,
        time: NaiveTime,
        excursion_type: ExcursionType,
    ) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO excursions (day_of_week, time, type) VALUES (?1, ?2, ?3)",
            params![day_of_week, pnm_utils::dates::format_time(&time), excursion_type],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_excursion(&self, id: i64) -> DbResult<Excursion> {
        let conn = self.conn.borrow();
        conn.query_row(
            "SELECT id, day_of_week, time, type FROM excursions WHERE id = ?1",
            params![id],
            excursion_from_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("excursion {}", id)))
    }

    /// Fails with [`DbError::ForeignKey`] while accommodations or visitors
    /// still reference the excursion.
    pub fn delete_excursion(&self, id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute("DELETE FROM excursions WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("excursion {}", id)));
        }
        Ok(())
    }

    pub fn link_accommodation_excursion(&self, accommodation_id: i64, excursion_id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO accommodation_excursions (accommodation_id, excursion_id) VALUES (?1, ?2)",
            params![accommodation_id, excursion_id],
        )?;
        Ok(())
    }

    pub fn link_visitor_excursion(&self, visitor_id: i64, excursion_id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO visitor_excursions (visitor_id, excursion_id) VALUES (?1, ?2)",
            params![visitor_id, excursion_id],
        )?;
        Ok(())
    }

    /// Excursions booked by a visitor, by day then time.
    pub fn excursions_for_visitor(&self, visitor_id: i64) -> DbResult<Vec<Excursion>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT e.id, e.day_of_week, e.time, e.type
             FROM excursions e
             JOIN visitor_excursions ve ON ve.excursion_id = e.id
             WHERE ve.visitor_id = ?1
             ORDER BY e.day_of_week, e.time, e.id",
        )?;
        let rows = stmt
            .query_map(params![visitor_id], excursion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[PNM] query: excursions_for_visitor returned {} records",
            rows.len()
        );
        Ok(rows)
    }
}
