//! Provinces, parks, park/province links and park areas.

use pnm_utils::dates;
use rusqlite::{params, OptionalExtension, Row};

use crate::models::{AreaKey, NewPark, Park, ParkArea, ParkProvince, Province};
use crate::{Database, DbError, DbResult};

const PARK_COLUMNS: &str = "id, name, declaration_date, contact_email, code, total_area";

fn park_from_row(row: &Row<'_>) -> rusqlite::Result<Park> {
    let raw_date: String = row.get(2)?;
    let declaration_date = dates::parse_date(&raw_date).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;
    Ok(Park {
        id: row.get(0)?,
        name: row.get(1)?,
        declaration_date,
        contact_email: row.get(3)?,
        code: row.get(4)?,
        total_area: row.get(5)?,
    })
}

impl Database {
    // ───────────────────── Provinces ─────────────────────

    /// Insert a province; returns its id.
    ///
    /// Fails with [`DbError::Unique`] on a duplicate name and
    /// [`DbError::Check`] when the organisation is blank.
    pub fn insert_province(&self, name: &str, responsible_organization: &str) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO provinces (name, responsible_organization) VALUES (?1, ?2)",
            params![name, responsible_organization],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("[PNM] write: province {} '{}'", id, name);
        Ok(id)
    }

    pub fn get_province(&self, id: i64) -> DbResult<Province> {
        let conn = self.conn.borrow();
        conn.query_row(
            "SELECT id, name, responsible_organization FROM provinces WHERE id = ?1",
            params![id],
            |row| {
                Ok(Province {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    responsible_organization: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("province {}", id)))
    }

    /// All provinces ordered by name.
    pub fn list_provinces(&self) -> DbResult<Vec<Province>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT id, name, responsible_organization FROM provinces ORDER BY name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Province {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    responsible_organization: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[PNM] query: list_provinces returned {} records", rows.len());
        Ok(rows)
    }

    pub fn update_province_organization(&self, id: i64, organization: &str) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "UPDATE provinces SET responsible_organization = ?2 WHERE id = ?1",
            params![id, organization],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("province {}", id)));
        }
        Ok(())
    }

    /// Delete a province. Fails with [`DbError::ForeignKey`] while parks
    /// are still linked to it.
    pub fn delete_province(&self, id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute("DELETE FROM provinces WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("province {}", id)));
        }
        log::debug!("[PNM] write: deleted province {}", id);
        Ok(())
    }

    // ───────────────────── Parks ─────────────────────

    pub fn insert_park(&self, park: &NewPark) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO parks (name, declaration_date, contact_email, code, total_area)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                park.name,
                dates::format_date(&park.declaration_date),
                park.contact_email,
                park.code,
                park.total_area
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("[PNM] write: park {} '{}'", id, park.name);
        Ok(id)
    }

    pub fn get_park(&self, id: i64) -> DbResult<Park> {
        let conn = self.conn.borrow();
        conn.query_row(
            &format!("SELECT {} FROM parks WHERE id = ?1", PARK_COLUMNS),
            params![id],
            park_from_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("park {}", id)))
    }

    pub fn find_park_by_code(&self, code: &str) -> DbResult<Option<Park>> {
        let conn = self.conn.borrow();
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM parks WHERE code = ?1", PARK_COLUMNS),
                params![code],
                park_from_row,
            )
            .optional()?)
    }

    /// All parks ordered by name.
    pub fn list_parks(&self) -> DbResult<Vec<Park>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM parks ORDER BY name", PARK_COLUMNS))?;
        let rows = stmt
            .query_map([], park_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[PNM] query: list_parks returned {} records", rows.len());
        Ok(rows)
    }

    pub fn update_park_contact_email(&self, id: i64, email: Option<&str>) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "UPDATE parks SET contact_email = ?2 WHERE id = ?1",
            params![id, email],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("park {}", id)));
        }
        Ok(())
    }

    /// Delete a park. Areas, province links and visitors must be removed
    /// first; otherwise [`DbError::ForeignKey`].
    pub fn delete_park(&self, id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute("DELETE FROM parks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("park {}", id)));
        }
        log::debug!("[PNM] write: deleted park {}", id);
        Ok(())
    }

    // ───────────────────── Park / province links ─────────────────────

    pub fn link_park_province(
        &self,
        park_id: i64,
        province_id: i64,
        extension_in_province: Option<f64>,
    ) -> DbResult<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO park_provinces (park_id, province_id, extension_in_province)
             VALUES (?1, ?2, ?3)",
            params![park_id, province_id, extension_in_province],
        )?;
        log::debug!("[PNM] write: park {} in province {}", park_id, province_id);
        Ok(())
    }

    pub fn unlink_park_province(&self, park_id: i64, province_id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "DELETE FROM park_provinces WHERE park_id = ?1 AND province_id = ?2",
            params![park_id, province_id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!(
                "park {} in province {}",
                park_id, province_id
            )));
        }
        Ok(())
    }

    /// Provinces a park spans, ordered by province name.
    pub fn park_provinces_of(&self, park_id: i64) -> DbResult<Vec<ParkProvince>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT pp.park_id, pp.province_id, pr.name, pp.extension_in_province
             FROM park_provinces pp
             INNER JOIN provinces pr ON pr.id = pp.province_id
             WHERE pp.park_id = ?1
             ORDER BY pr.name",
        )?;
        let rows = stmt
            .query_map(params![park_id], |row| {
                Ok(ParkProvince {
                    park_id: row.get(0)?,
                    province_id: row.get(1)?,
                    province_name: row.get(2)?,
                    extension_in_province: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ───────────────────── Park areas ─────────────────────

    pub fn insert_park_area(
        &self,
        key: AreaKey,
        name: Option<&str>,
        extension: Option<f64>,
    ) -> DbResult<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO park_areas (park_id, area_number, name, extension)
             VALUES (?1, ?2, ?3, ?4)",
            params![key.park_id, key.area_number, name, extension],
        )?;
        log::debug!("[PNM] write: area {}/{}", key.park_id, key.area_number);
        Ok(())
    }

    /// Areas of one park ordered by area number.
    pub fn list_park_areas(&self, park_id: i64) -> DbResult<Vec<ParkArea>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT park_id, area_number, name, extension FROM park_areas
             WHERE park_id = ?1
             ORDER BY area_number",
        )?;
        let rows = stmt
            .query_map(params![park_id], |row| {
                Ok(ParkArea {
                    key: AreaKey::new(row.get(0)?, row.get(1)?),
                    name: row.get(2)?,
                    extension: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn delete_park_area(&self, key: AreaKey) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "DELETE FROM park_areas WHERE park_id = ?1 AND area_number = ?2",
            params![key.park_id, key.area_number],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!(
                "area {}/{}",
                key.park_id, key.area_number
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{count_rows, new_park};
    use crate::models::AreaKey;
    use crate::{Database, DbError};

    #[test]
    fn province_name_is_unique() {
        let db = Database::new().unwrap();
        db.insert_province("Buenos Aires", "OPDS").unwrap();
        let err = db.insert_province("Buenos Aires", "Other").unwrap_err();
        assert!(matches!(err, DbError::Unique(_)), "got {err:?}");
        assert_eq!(count_rows(&db, "provinces"), 1);
    }

    #[test]
    fn province_organization_is_required() {
        let db = Database::new().unwrap();
        let conn = db.conn.borrow();

        let err: DbError = conn
            .execute("INSERT INTO provinces (name) VALUES ('La Pampa')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::NotNull(_)));
        assert!(err.to_string().contains("cannot be null"));

        let err: DbError = conn
            .execute(
                "INSERT INTO provinces (name, responsible_organization) VALUES ('New Province', NULL)",
                [],
            )
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("cannot be null"));
    }

    #[test]
    fn province_organization_cannot_be_blank() {
        let db = Database::new().unwrap();
        let err = db.insert_province("San Luis", "").unwrap_err();
        match err {
            DbError::Check(msg) => assert!(msg.contains("check_responsible_organization")),
            other => panic!("expected Check, got {other:?}"),
        }
        assert!(db.insert_province("San Luis", "   ").is_err());
        assert_eq!(count_rows(&db, "provinces"), 0);
    }

    #[test]
    fn province_crud() {
        let db = Database::new().unwrap();
        let id = db.insert_province("Neuquén", "Secretaría de Ambiente").unwrap();
        db.update_province_organization(id, "Subsecretaría de Ambiente").unwrap();
        assert_eq!(
            db.get_province(id).unwrap().responsible_organization,
            "Subsecretaría de Ambiente"
        );
        db.delete_province(id).unwrap();
        assert!(matches!(db.get_province(id), Err(DbError::NotFound(_))));
        assert!(matches!(db.delete_province(id), Err(DbError::NotFound(_))));
    }

    #[test]
    fn park_round_trips_through_storage() {
        let db = Database::new().unwrap();
        let id = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        let park = db.get_park(id).unwrap();
        assert_eq!(park.name, "Parque A");
        assert_eq!(park.code.as_deref(), Some("A"));
        assert_eq!(park.declaration_date.to_string(), "2020-01-01");
        assert_eq!(park.total_area, Some(1000.0));

        let by_code = db.find_park_by_code("A").unwrap().unwrap();
        assert_eq!(by_code.id, id);
        assert!(db.find_park_by_code("Z").unwrap().is_none());
    }

    #[test]
    fn park_code_is_unique() {
        let db = Database::new().unwrap();
        db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        let err = db.insert_park(&new_park("Parque A bis", "A", 10.0)).unwrap_err();
        assert!(matches!(err, DbError::Unique(_)));
    }

    #[test]
    fn park_total_area_rejects_text() {
        let db = Database::new().unwrap();
        let conn = db.conn.borrow();
        let err: DbError = conn
            .execute(
                "INSERT INTO parks (name, declaration_date, total_area)
                 VALUES ('Bad', '2020-01-01', 'invalid')",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::DataType(_)), "got {err:?}");
    }

    #[test]
    fn park_contact_email_update() {
        let db = Database::new().unwrap();
        let id = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        db.update_park_contact_email(id, Some("nuevo@example.com")).unwrap();
        assert_eq!(
            db.get_park(id).unwrap().contact_email.as_deref(),
            Some("nuevo@example.com")
        );
        assert!(matches!(
            db.update_park_contact_email(999, None),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn park_province_link_requires_both_parents() {
        let db = Database::new().unwrap();
        let province = db.insert_province("Buenos Aires", "OPDS").unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();

        let err = db.link_park_province(999, province, Some(100.0)).unwrap_err();
        assert!(err.to_string().contains("foreign key constraint fails"));
        let err = db.link_park_province(park, 999, Some(100.0)).unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));
        assert_eq!(count_rows(&db, "park_provinces"), 0);

        db.link_park_province(park, province, Some(500.0)).unwrap();
        let err = db.link_park_province(park, province, Some(1.0)).unwrap_err();
        assert!(matches!(err, DbError::Unique(_)), "composite key must be unique");

        let links = db.park_provinces_of(park).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].province_name, "Buenos Aires");
        assert_eq!(links[0].extension_in_province, Some(500.0));
    }

    #[test]
    fn delete_parent_with_children_fails() {
        let db = Database::new().unwrap();
        let province = db.insert_province("Buenos Aires", "OPDS").unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        db.link_park_province(park, province, None).unwrap();

        assert!(matches!(db.delete_province(province), Err(DbError::ForeignKey(_))));
        assert!(matches!(db.delete_park(park), Err(DbError::ForeignKey(_))));

        db.unlink_park_province(park, province).unwrap();
        db.delete_province(province).unwrap();
        db.delete_park(park).unwrap();
        assert_eq!(count_rows(&db, "parks"), 0);
    }

    #[test]
    fn park_areas_are_keyed_by_park_and_number() {
        let db = Database::new().unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        db.insert_park_area(AreaKey::new(park, 2), Some("Area 2"), Some(200.0)).unwrap();
        db.insert_park_area(AreaKey::new(park, 1), Some("Area 1"), Some(100.0)).unwrap();

        let err = db
            .insert_park_area(AreaKey::new(park, 1), Some("Again"), None)
            .unwrap_err();
        assert!(matches!(err, DbError::Unique(_)));

        let err = db
            .insert_park_area(AreaKey::new(999, 1), Some("Orphan"), None)
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));

        let areas = db.list_park_areas(park).unwrap();
        let numbers: Vec<i64> = areas.iter().map(|a| a.key.area_number).collect();
        assert_eq!(numbers, vec![1, 2]);

        db.delete_park_area(AreaKey::new(park, 2)).unwrap();
        assert_eq!(db.list_park_areas(park).unwrap().len(), 1);
    }
}
