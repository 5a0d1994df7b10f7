//! Natural elements, their area populations, the feeding graph and the
//! research projects that study them.
//!
//! A natural element is one base row in `natural_elements` plus exactly one
//! row in a subtype table. Both rows are written in one transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{
    AreaElement, AreaKey, ElementKind, ElementSubtype, EmailLogEntry, NaturalElement,
    NewNaturalElement, ResearchProject,
};
use crate::{Database, DbError, DbResult};

const ELEMENT_SELECT: &str = "
    SELECT ne.id, ne.scientific_name, ne.common_name, ne.number_of_individuals,
           v.element_id, v.flowering_period,
           a.element_id, a.diet, a.mating_season,
           m.element_id, m.crystal_or_rock
    FROM natural_elements ne
    LEFT JOIN vegetal_elements v ON v.element_id = ne.id
    LEFT JOIN animal_elements a ON a.element_id = ne.id
    LEFT JOIN mineral_elements m ON m.element_id = ne.id";

const EMAIL_LOG_SELECT: &str = "
    SELECT id, park_id, area_number, element_id, recipient_email,
           scientific_name, old_count, new_count, logged_at
    FROM email_log";

fn element_from_row(row: &Row<'_>) -> rusqlite::Result<NaturalElement> {
    let vegetal: Option<i64> = row.get(4)?;
    let animal: Option<i64> = row.get(6)?;
    let mineral: Option<i64> = row.get(9)?;
    let subtype = if vegetal.is_some() {
        Some(ElementSubtype::Vegetal {
            flowering_period: row.get(5)?,
        })
    } else if animal.is_some() {
        Some(ElementSubtype::Animal {
            diet: row.get(7)?,
            mating_season: row.get(8)?,
        })
    } else if mineral.is_some() {
        Some(ElementSubtype::Mineral {
            crystal_or_rock: row.get(10)?,
        })
    } else {
        None
    };
    Ok(NaturalElement {
        id: row.get(0)?,
        scientific_name: row.get(1)?,
        common_name: row.get(2)?,
        number_of_individuals: row.get(3)?,
        subtype,
    })
}

fn email_from_row(row: &Row<'_>) -> rusqlite::Result<EmailLogEntry> {
    Ok(EmailLogEntry {
        id: row.get(0)?,
        area: AreaKey::new(row.get(1)?, row.get(2)?),
        element_id: row.get(3)?,
        recipient_email: row.get(4)?,
        scientific_name: row.get(5)?,
        old_count: row.get(6)?,
        new_count: row.get(7)?,
        logged_at: row.get(8)?,
    })
}

fn insert_subtype(conn: &Connection, element_id: i64, subtype: &ElementSubtype) -> DbResult<()> {
    match subtype {
        ElementSubtype::Vegetal { flowering_period } => conn.execute(
            "INSERT INTO vegetal_elements (element_id, flowering_period) VALUES (?1, ?2)",
            params![element_id, flowering_period],
        ),
        ElementSubtype::Animal { diet, mating_season } => conn.execute(
            "INSERT INTO animal_elements (element_id, diet, mating_season) VALUES (?1, ?2, ?3)",
            params![element_id, diet, mating_season],
        ),
        ElementSubtype::Mineral { crystal_or_rock } => conn.execute(
            "INSERT INTO mineral_elements (element_id, crystal_or_rock) VALUES (?1, ?2)",
            params![element_id, crystal_or_rock],
        ),
    }?;
    Ok(())
}

impl Database {
    // ───────────────────── Natural elements ─────────────────────

    /// Insert a natural element and its subtype row; returns the element id.
    pub fn insert_natural_element(&self, element: &NewNaturalElement) -> DbResult<i64> {
        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO natural_elements (scientific_name, common_name, number_of_individuals)
                 VALUES (?1, ?2, ?3)",
                params![
                    element.scientific_name,
                    element.common_name,
                    element.number_of_individuals
                ],
            )?;
            let id = tx.last_insert_rowid();
            insert_subtype(tx, id, &element.subtype)?;
            Ok(id)
        })?;
        log::debug!(
            "[PNM] write: {} element {} '{}'",
            element.subtype.kind(),
            id,
            element.scientific_name
        );
        Ok(id)
    }

    pub fn get_natural_element(&self, id: i64) -> DbResult<NaturalElement> {
        let conn = self.conn.borrow();
        conn.query_row(
            &format!("{} WHERE ne.id = ?1", ELEMENT_SELECT),
            params![id],
            element_from_row,
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("natural element {}", id)))
    }

    /// Natural elements ordered by scientific name, optionally of one kind.
    pub fn list_natural_elements(&self, kind: Option<ElementKind>) -> DbResult<Vec<NaturalElement>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!("{} ORDER BY ne.scientific_name, ne.id", ELEMENT_SELECT))?;
        let rows = stmt
            .query_map([], element_from_row)?
            .filter(|r| match (kind, r) {
                (Some(k), Ok(e)) => e.kind() == Some(k),
                _ => true,
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[PNM] query: list_natural_elements returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// Delete an element and its subtype row.
    ///
    /// Fails with [`DbError::ForeignKey`] while populations, feeding edges or
    /// research projects still reference it; nothing is removed in that case.
    pub fn delete_natural_element(&self, id: i64) -> DbResult<()> {
        self.transaction(|tx| {
            for kind in [ElementKind::Vegetal, ElementKind::Animal, ElementKind::Mineral] {
                tx.execute(
                    &format!("DELETE FROM {} WHERE element_id = ?1", kind.table()),
                    params![id],
                )?;
            }
            let changed = tx.execute("DELETE FROM natural_elements WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("natural element {}", id)));
            }
            Ok(())
        })?;
        log::debug!("[PNM] write: deleted element {}", id);
        Ok(())
    }

    // ───────────────────── Area populations ─────────────────────

    pub fn add_area_element(&self, area: AreaKey, element_id: i64, individuals: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO area_elements (park_id, area_number, element_id, number_of_individuals)
             VALUES (?1, ?2, ?3, ?4)",
            params![area.park_id, area.area_number, element_id, individuals],
        )?;
        Ok(())
    }

    pub fn area_population(&self, area: AreaKey, element_id: i64) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.query_row(
            "SELECT number_of_individuals FROM area_elements
             WHERE park_id = ?1 AND area_number = ?2 AND element_id = ?3",
            params![area.park_id, area.area_number, element_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| {
            DbError::NotFound(format!(
                "element {} in area {}/{}",
                element_id, area.park_id, area.area_number
            ))
        })
    }

    /// Every population recorded in a park, by area then element.
    pub fn area_elements_in_park(&self, park_id: i64) -> DbResult<Vec<AreaElement>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT park_id, area_number, element_id, number_of_individuals
             FROM area_elements
             WHERE park_id = ?1
             ORDER BY area_number, element_id",
        )?;
        let rows = stmt
            .query_map(params![park_id], |row| {
                Ok(AreaElement {
                    area: AreaKey::new(row.get(0)?, row.get(1)?),
                    element_id: row.get(2)?,
                    number_of_individuals: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Set the population of an element in an area.
    ///
    /// When the count goes down the schema trigger records a notification
    /// for the park's contact email; that entry is returned. Increases and
    /// unchanged counts return `None`.
    pub fn update_area_population(
        &self,
        area: AreaKey,
        element_id: i64,
        individuals: i64,
    ) -> DbResult<Option<EmailLogEntry>> {
        let notification = self.transaction(|tx| {
            let old: i64 = tx
                .query_row(
                    "SELECT number_of_individuals FROM area_elements
                     WHERE park_id = ?1 AND area_number = ?2 AND element_id = ?3",
                    params![area.park_id, area.area_number, element_id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| {
                    DbError::NotFound(format!(
                        "element {} in area {}/{}",
                        element_id, area.park_id, area.area_number
                    ))
                })?;

            tx.execute(
                "UPDATE area_elements SET number_of_individuals = ?4
                 WHERE park_id = ?1 AND area_number = ?2 AND element_id = ?3",
                params![area.park_id, area.area_number, element_id, individuals],
            )?;

            if individuals >= old {
                return Ok(None);
            }
            let entry = tx
                .query_row(
                    &format!(
                        "{} WHERE park_id = ?1 AND area_number = ?2 AND element_id = ?3
                         ORDER BY id DESC LIMIT 1",
                        EMAIL_LOG_SELECT
                    ),
                    params![area.park_id, area.area_number, element_id],
                    email_from_row,
                )
                .optional()?;
            Ok(entry)
        })?;

        if let Some(entry) = &notification {
            log::info!(
                "[PNM] notify: {} population in park {} fell from {} to {} (to: {})",
                entry.scientific_name,
                entry.area.park_id,
                entry.old_count,
                entry.new_count,
                entry.recipient_email.as_deref().unwrap_or("<no contact email>")
            );
        }
        Ok(notification)
    }

    pub fn remove_area_element(&self, area: AreaKey, element_id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "DELETE FROM area_elements
             WHERE park_id = ?1 AND area_number = ?2 AND element_id = ?3",
            params![area.park_id, area.area_number, element_id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!(
                "element {} in area {}/{}",
                element_id, area.park_id, area.area_number
            )));
        }
        Ok(())
    }

    /// All population decrease notifications, oldest first.
    pub fn email_log(&self) -> DbResult<Vec<EmailLogEntry>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", EMAIL_LOG_SELECT))?;
        let rows = stmt
            .query_map([], email_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[PNM] query: email_log returned {} records", rows.len());
        Ok(rows)
    }

    // ───────────────────── Feeding graph ─────────────────────

    /// Record that `element_id` feeds on `food_element_id`.
    ///
    /// Rejected with [`DbError::BusinessRule`] when the food is a mineral
    /// (`check_mineral_not_food`) or the eater is vegetal
    /// (`check_vegetal_not_feeding`).
    pub fn add_element_food(&self, element_id: i64, food_element_id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO element_food (element_id, food_element_id) VALUES (?1, ?2)",
            params![element_id, food_element_id],
        )?;
        log::debug!("[PNM] write: {} eats {}", element_id, food_element_id);
        Ok(())
    }

    pub fn remove_element_food(&self, element_id: i64, food_element_id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute(
            "DELETE FROM element_food WHERE element_id = ?1 AND food_element_id = ?2",
            params![element_id, food_element_id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!(
                "food edge {} -> {}",
                element_id, food_element_id
            )));
        }
        Ok(())
    }

    /// Elements that `element_id` feeds on.
    pub fn foods_of(&self, element_id: i64) -> DbResult<Vec<NaturalElement>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE ne.id IN (SELECT food_element_id FROM element_food WHERE element_id = ?1)
             ORDER BY ne.scientific_name",
            ELEMENT_SELECT
        ))?;
        let rows = stmt
            .query_map(params![element_id], element_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ───────────────────── Research projects ─────────────────────

    pub fn insert_research_project(&self, budget: f64, duration: &str, element_id: i64) -> DbResult<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO research_projects (budget, duration, element_id) VALUES (?1, ?2, ?3)",
            params![budget, duration, element_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_research_project(&self, id: i64) -> DbResult<ResearchProject> {
        let conn = self.conn.borrow();
        conn.query_row(
            "SELECT id, budget, duration, element_id FROM research_projects WHERE id = ?1",
            params![id],
            |row| {
                Ok(ResearchProject {
                    id: row.get(0)?,
                    budget: row.get(1)?,
                    duration: row.get(2)?,
                    element_id: row.get(3)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound(format!("research project {}", id)))
    }

    pub fn delete_research_project(&self, id: i64) -> DbResult<()> {
        let conn = self.conn.borrow();
        let changed = conn.execute("DELETE FROM research_projects WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("research project {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{animal, count_rows, mineral, new_park, vegetal};
    use crate::models::{AreaKey, ElementKind, ElementSubtype};
    use crate::schema::rules;
    use crate::{Database, DbError};

    struct FoodFixture {
        db: Database,
        animal: i64,
        vegetal: i64,
        mineral: i64,
    }

    fn food_fixture() -> FoodFixture {
        let db = Database::new().unwrap();
        let animal = db.insert_natural_element(&animal("especie_animal", 10)).unwrap();
        let vegetal = db.insert_natural_element(&vegetal("especie_vegetal", 10)).unwrap();
        let mineral = db.insert_natural_element(&mineral("roca")).unwrap();
        FoodFixture { db, animal, vegetal, mineral }
    }

    #[test]
    fn element_round_trips_with_subtype() {
        let f = food_fixture();
        let e = f.db.get_natural_element(f.vegetal).unwrap();
        assert_eq!(e.scientific_name, "especie_vegetal");
        assert_eq!(e.kind(), Some(ElementKind::Vegetal));
        assert_eq!(
            e.subtype,
            Some(ElementSubtype::Vegetal { flowering_period: Some("spring".into()) })
        );
        assert_eq!(f.db.get_natural_element(f.mineral).unwrap().kind(), Some(ElementKind::Mineral));
    }

    #[test]
    fn list_elements_filters_by_kind() {
        let f = food_fixture();
        assert_eq!(f.db.list_natural_elements(None).unwrap().len(), 3);
        let animals = f.db.list_natural_elements(Some(ElementKind::Animal)).unwrap();
        assert_eq!(animals.len(), 1);
        assert_eq!(animals[0].id, f.animal);
    }

    #[test]
    fn subtypes_are_disjoint() {
        let f = food_fixture();
        let conn = f.db.conn.borrow();
        let err: DbError = conn
            .execute(
                "INSERT INTO mineral_elements (element_id, crystal_or_rock) VALUES (?1, 'rock')",
                [f.vegetal],
            )
            .unwrap_err()
            .into();
        match err {
            DbError::BusinessRule(rule) => assert_eq!(rule, rules::ELEMENT_SUBTYPE_DISJOINT),
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[test]
    fn subtype_update_cannot_overlap() {
        let f = food_fixture();
        let err: DbError = f
            .db
            .conn
            .borrow()
            .execute(
                "UPDATE mineral_elements SET element_id = ?1 WHERE element_id = ?2",
                [f.vegetal, f.mineral],
            )
            .unwrap_err()
            .into();
        match err {
            DbError::BusinessRule(rule) => assert_eq!(rule, rules::ELEMENT_SUBTYPE_DISJOINT),
            other => panic!("expected BusinessRule, got {other:?}"),
        }
        assert_eq!(f.db.get_natural_element(f.mineral).unwrap().kind(), Some(ElementKind::Mineral));
        assert_eq!(count_rows(&f.db, "mineral_elements"), 1);
    }

    #[test]
    fn subtype_requires_existing_element() {
        let db = Database::new().unwrap();
        let conn = db.conn.borrow();
        let err: DbError = conn
            .execute("INSERT INTO animal_elements (element_id, diet) VALUES (999, 'x')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::ForeignKey(_)));
    }

    #[test]
    fn mineral_cannot_be_food() {
        let f = food_fixture();
        let err = f.db.add_element_food(f.animal, f.mineral).unwrap_err();
        match &err {
            DbError::BusinessRule(rule) => assert_eq!(rule, rules::MINERAL_NOT_FOOD),
            other => panic!("expected BusinessRule, got {other:?}"),
        }
        assert!(err.to_string().to_lowercase().contains("check_mineral_not_food"));
        assert_eq!(count_rows(&f.db, "element_food"), 0);
    }

    #[test]
    fn vegetal_cannot_feed() {
        let f = food_fixture();
        let err = f.db.add_element_food(f.vegetal, f.animal).unwrap_err();
        match &err {
            DbError::BusinessRule(rule) => assert_eq!(rule, rules::VEGETAL_NOT_FEEDING),
            other => panic!("expected BusinessRule, got {other:?}"),
        }
        assert!(!matches!(err, DbError::ForeignKey(_)));
        assert_eq!(count_rows(&f.db, "element_food"), 0);
    }

    #[test]
    fn animal_can_eat_vegetal() {
        let f = food_fixture();
        f.db.add_element_food(f.animal, f.vegetal).unwrap();
        let foods = f.db.foods_of(f.animal).unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].id, f.vegetal);

        let err = f.db.add_element_food(f.animal, f.vegetal).unwrap_err();
        assert!(matches!(err, DbError::Unique(_)));

        f.db.remove_element_food(f.animal, f.vegetal).unwrap();
        assert!(f.db.foods_of(f.animal).unwrap().is_empty());
    }

    #[test]
    fn food_rules_apply_on_update() {
        let f = food_fixture();
        f.db.add_element_food(f.animal, f.vegetal).unwrap();
        let conn = f.db.conn.borrow();
        let err: DbError = conn
            .execute(
                "UPDATE element_food SET food_element_id = ?1 WHERE element_id = ?2",
                [f.mineral, f.animal],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::BusinessRule(ref r) if r == rules::MINERAL_NOT_FOOD));
    }

    #[test]
    fn food_edge_requires_existing_elements() {
        let f = food_fixture();
        assert!(matches!(
            f.db.add_element_food(f.animal, 999),
            Err(DbError::ForeignKey(_))
        ));
        assert!(matches!(
            f.db.add_element_food(999, f.vegetal),
            Err(DbError::ForeignKey(_))
        ));
    }

    #[test]
    fn area_element_requires_existing_area() {
        let db = Database::new().unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        db.insert_park_area(AreaKey::new(park, 1), Some("Area 1"), Some(100.0)).unwrap();
        let element = db.insert_natural_element(&animal("Puma concolor", 4)).unwrap();

        let err = db.add_area_element(AreaKey::new(park, 2), element, 5).unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)), "area 2 does not exist");
        let err = db.add_area_element(AreaKey::new(park, 1), 999, 5).unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));
        assert_eq!(count_rows(&db, "area_elements"), 0);

        db.add_area_element(AreaKey::new(park, 1), element, 5).unwrap();
        let err = db.add_area_element(AreaKey::new(park, 1), element, 6).unwrap_err();
        assert!(matches!(err, DbError::Unique(_)));
        assert_eq!(db.area_population(AreaKey::new(park, 1), element).unwrap(), 5);
    }

    #[test]
    fn population_decrease_logs_exactly_once() {
        let db = Database::new().unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        let area = AreaKey::new(park, 1);
        db.insert_park_area(area, Some("Area 1"), None).unwrap();
        let element = db.insert_natural_element(&vegetal("Plantus communis", 100)).unwrap();
        db.add_area_element(area, element, 100).unwrap();

        let entry = db.update_area_population(area, element, 90).unwrap().unwrap();
        assert_eq!(entry.old_count, 100);
        assert_eq!(entry.new_count, 90);
        assert_eq!(entry.recipient_email.as_deref(), Some("a@example.com"));
        assert_eq!(entry.scientific_name, "Plantus communis");
        assert_eq!(entry.area, area);
        assert!(!entry.logged_at.is_empty());

        let log = db.email_log().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0], entry);
    }

    #[test]
    fn population_increase_or_no_change_logs_nothing() {
        let db = Database::new().unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        let area = AreaKey::new(park, 1);
        db.insert_park_area(area, None, None).unwrap();
        let element = db.insert_natural_element(&animal("Puma concolor", 10)).unwrap();
        db.add_area_element(area, element, 100).unwrap();

        assert!(db.update_area_population(area, element, 120).unwrap().is_none());
        assert!(db.update_area_population(area, element, 120).unwrap().is_none());
        assert!(db.email_log().unwrap().is_empty());
        assert_eq!(db.area_population(area, element).unwrap(), 120);

        // A later decrease is still reported against the latest value.
        let entry = db.update_area_population(area, element, 119).unwrap().unwrap();
        assert_eq!((entry.old_count, entry.new_count), (120, 119));
        assert_eq!(db.email_log().unwrap().len(), 1);
    }

    #[test]
    fn population_cannot_go_negative() {
        let db = Database::new().unwrap();
        let park = db.insert_park(&new_park("Parque A", "A", 1000.0)).unwrap();
        let area = AreaKey::new(park, 1);
        db.insert_park_area(area, None, None).unwrap();
        let element = db.insert_natural_element(&animal("Puma concolor", 10)).unwrap();
        db.add_area_element(area, element, 3).unwrap();

        let err = db.update_area_population(area, element, -1).unwrap_err();
        assert!(matches!(err, DbError::Check(_)));
        assert_eq!(db.area_population(area, element).unwrap(), 3);
        assert!(db.email_log().unwrap().is_empty());
    }

    #[test]
    fn update_missing_population_is_not_found() {
        let db = Database::new().unwrap();
        let err = db.update_area_population(AreaKey::new(1, 1), 1, 5).unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn delete_element_blocked_by_references() {
        let f = food_fixture();
        f.db.add_element_food(f.animal, f.vegetal).unwrap();
        let err = f.db.delete_natural_element(f.vegetal).unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));
        // Rolled back: the subtype row survives.
        assert_eq!(f.db.get_natural_element(f.vegetal).unwrap().kind(), Some(ElementKind::Vegetal));

        f.db.remove_element_food(f.animal, f.vegetal).unwrap();
        f.db.delete_natural_element(f.vegetal).unwrap();
        assert!(matches!(f.db.get_natural_element(f.vegetal), Err(DbError::NotFound(_))));
        assert_eq!(count_rows(&f.db, "vegetal_elements"), 0);
    }

    #[test]
    fn research_project_requires_fields_and_element() {
        let f = food_fixture();
        let id = f.db.insert_research_project(15000.0, "24 months", f.animal).unwrap();
        let project = f.db.get_research_project(id).unwrap();
        assert_eq!(project.duration, "24 months");
        assert_eq!(project.element_id, f.animal);

        let err = f.db.insert_research_project(14000.0, "6 months", 99999).unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));

        let conn = f.db.conn.borrow();
        for sql in [
            "INSERT INTO research_projects (budget, duration, element_id) VALUES (NULL, '12 months', 1)",
            "INSERT INTO research_projects (budget, duration, element_id) VALUES (12000.0, NULL, 1)",
            "INSERT INTO research_projects (budget, duration, element_id) VALUES (13000.0, '18 months', NULL)",
        ] {
            let err: DbError = conn.execute(sql, []).unwrap_err().into();
            assert!(matches!(err, DbError::NotNull(_)), "{sql}: {err:?}");
        }
    }
}
