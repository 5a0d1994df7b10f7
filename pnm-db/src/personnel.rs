//! Park staff and their roles.
//!
//! A staff member is one `personnel` row plus zero or more role rows, one
//! per role table. Roles are not exclusive: the same person may be both a
//! researcher and a ranger.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{AreaKey, NewPersonnel, Personnel, PersonnelRole};
use crate::{Database, DbError, DbResult};

const ROLE_TABLES: [&str; 4] = [
    "management_personnel",
    "surveillance_personnel",
    "research_personnel",
    "conservation_personnel",
];

fn personnel_from_row(row: &Row<'_>) -> rusqlite::Result<Personnel> {
    Ok(Personnel {
        id: row.get(0)?,
        dni: row.get(1)?,
        cuil: row.get(2)?,
        name: row.get(3)?,
        address: row.get(4)?,
        phone_numbers: row.get(5)?,
        salary: row.get(6)?,
        roles: Vec::new(),
    })
}

fn insert_role(conn: &Connection, personnel_id: i64, role: &PersonnelRole) -> DbResult<()> {
    match role {
        PersonnelRole::Management { entrance_number } => conn.execute(
            "INSERT INTO management_personnel (personnel_id, entrance_number) VALUES (?1, ?2)",
            params![personnel_id, entrance_number],
        ),
        PersonnelRole::Surveillance {
            vehicle_type,
            vehicle_registration,
        } => conn.execute(
            "INSERT INTO surveillance_personnel (personnel_id, vehicle_type, vehicle_registration)
             VALUES (?1, ?2, ?3)",
            params![personnel_id, vehicle_type, vehicle_registration],
        ),
        PersonnelRole::Research { title, project_id } => conn.execute(
            "INSERT INTO research_personnel (personnel_id, title, project_id) VALUES (?1, ?2, ?3)",
            params![personnel_id, title, project_id],
        ),
        PersonnelRole::Conservation { specialty, area } => conn.execute(
            "INSERT INTO conservation_personnel (personnel_id, specialty, park_id, area_number)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                personnel_id,
                specialty,
                area.map(|a| a.park_id),
                area.map(|a| a.area_number)
            ],
        ),
    }?;
    Ok(())
}

fn roles_of(conn: &Connection, personnel_id: i64) -> rusqlite::Result<Vec<PersonnelRole>> {
    let mut roles = Vec::new();

    if let Some(role) = conn
        .query_row(
            "SELECT entrance_number FROM management_personnel WHERE personnel_id = ?1",
            params![personnel_id],
            |row| Ok(PersonnelRole::Management { entrance_number: row.get(0)? }),
        )
        .optional()?
    {
        roles.push(role);
    }

    if let Some(role) = conn
        .query_row(
            "SELECT vehicle_type, vehicle_registration FROM surveillance_personnel
             WHERE personnel_id = ?1",
            params![personnel_id],
            |row| {
                Ok(PersonnelRole::Surveillance {
                    vehicle_type: row.get(0)?,
                    vehicle_registration: row.get(1)?,
                })
            },
        )
        .optional()?
    {
        roles.push(role);
    }

    if let Some(role) = conn
        .query_row(
            "SELECT title, project_id FROM research_personnel WHERE personnel_id = ?1",
            params![personnel_id],
            |row| {
                Ok(PersonnelRole::Research {
                    title: row.get(0)?,
                    project_id: row.get(1)?,
                })
            },
        )
        .optional()?
    {
        roles.push(role);
    }

    if let Some(role) = conn
        .query_row(
            "SELECT specialty, park_id, area_number FROM conservation_personnel
             WHERE personnel_id = ?1",
            params![personnel_id],
            |row| {
                let park_id: Option<i64> = row.get(1)?;
                let area_number: Option<i64> = row.get(2)?;
                Ok(PersonnelRole::Conservation {
                    specialty: row.get(0)?,
                    area: park_id.zip(area_number).map(|(p, a)| AreaKey::new(p, a)),
                })
            },
        )
        .optional()?
    {
        roles.push(role);
    }

    Ok(roles)
}

const PERSONNEL_SELECT: &str =
    "SELECT id, DNI, CUIL, name, address, phone_numbers, salary FROM personnel";

impl Database {
    /// Insert a staff member together with their roles; returns the id.
    ///
    /// Either the base row and every role row are written, or nothing is.
    pub fn insert_personnel(&self, person: &NewPersonnel, roles: &[PersonnelRole]) -> DbResult<i64> {
        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO personnel (DNI, CUIL, name, address, phone_numbers, salary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    person.dni,
                    person.cuil,
                    person.name,
                    person.address,
                    person.phone_numbers,
                    person.salary
                ],
            )?;
            let id = tx.last_insert_rowid();
            for role in roles {
                insert_role(tx, id, role)?;
            }
            Ok(id)
        })?;
        log::debug!(
            "[PNM] write: personnel {} '{}' with {} roles",
            id,
            person.name,
            roles.len()
        );
        Ok(id)
    }

    pub fn get_personnel(&self, id: i64) -> DbResult<Personnel> {
        let conn = self.conn.borrow();
        let mut person = conn
            .query_row(
                &format!("{} WHERE id = ?1", PERSONNEL_SELECT),
                params![id],
                personnel_from_row,
            )
            .optional()?
            .ok_or_else(|| DbError::NotFound(format!("personnel {}", id)))?;
        person.roles = roles_of(&conn, id)?;
        Ok(person)
    }

    pub fn find_personnel_by_dni(&self, dni: &str) -> DbResult<Option<Personnel>> {
        let conn = self.conn.borrow();
        let person = conn
            .query_row(
                &format!("{} WHERE DNI = ?1", PERSONNEL_SELECT),
                params![dni],
                personnel_from_row,
            )
            .optional()?;
        match person {
            Some(mut p) => {
                p.roles = roles_of(&conn, p.id)?;
                Ok(Some(p))
            }
            None => Ok(None),
        }
    }

    /// All staff ordered by name, with roles.
    pub fn list_personnel(&self) -> DbResult<Vec<Personnel>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!("{} ORDER BY name, id", PERSONNEL_SELECT))?;
        let mut staff = stmt
            .query_map([], personnel_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        for person in &mut staff {
            person.roles = roles_of(&conn, person.id)?;
        }
        log::info!("[PNM] query: list_personnel returned {} records", staff.len());
        Ok(staff)
    }

    /// Give an existing staff member another role.
    ///
    /// Holding the same role twice is a [`DbError::Unique`] violation.
    pub fn assign_role(&self, personnel_id: i64, role: &PersonnelRole) -> DbResult<()> {
        let conn = self.conn.borrow();
        insert_role(&conn, personnel_id, role)?;
        log::debug!("[PNM] write: personnel {} now in {}", personnel_id, role.table());
        Ok(())
    }

    pub fn update_salary(&self, personnel_id: i64, salary: f64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "UPDATE personnel SET salary = ?2 WHERE id = ?1",
            params![personnel_id, salary],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("personnel {}", personnel_id)));
        }
        Ok(())
    }

    /// Remove every role row and then the staff member.
    pub fn delete_personnel(&self, personnel_id: i64) -> DbResult<()> {
        self.transaction(|tx| {
            for table in ROLE_TABLES {
                tx.execute(
                    &format!("DELETE FROM {} WHERE personnel_id = ?1", table),
                    params![personnel_id],
                )?;
            }
            let changed = tx.execute("DELETE FROM personnel WHERE id = ?1", params![personnel_id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("personnel {}", personnel_id)));
            }
            Ok(())
        })?;
        log::debug!("[PNM] write: deleted personnel {}", personnel_id);
        Ok(())
    }
}
