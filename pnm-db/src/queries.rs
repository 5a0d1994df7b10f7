//! Aggregate reports over parks, provinces, species and visitors.
//!
//! Every query is read-only and parameterised. Orderings are total, so the
//! same snapshot always produces the same rows in the same order.
//!
//! # Park presence
//!
//! A species is present in a park when at least one of the park's areas has
//! an `area_elements` row for it, whatever the recorded count. Presence is
//! compared against the number of rows in `parks`, so a park with no
//! recorded species still counts towards the total.
//!
//! Species are identified by scientific name. Element rows sharing a name
//! are one species, reported under the lowest element id.

use rusqlite::{params, params_from_iter, Row};

use crate::models::{
    ElementKind, ExtensionMismatch, ParkPresence, ProvinceParkCount, SpeciesGroup,
    SpeciesPresence, VisitorStat,
};
use crate::{Database, DbResult};

/// Tolerance when comparing a park's total area with its provincial shares.
const AREA_EPSILON: f64 = 1e-6;

fn species_from_row(row: &Row<'_>) -> rusqlite::Result<SpeciesPresence> {
    Ok(SpeciesPresence {
        element_id: row.get(0)?,
        scientific_name: row.get(1)?,
        parks_present: row.get(2)?,
    })
}

impl ParkPresence {
    /// HAVING clause over `parks_present`, with `?1` bound to the park total.
    fn having(&self) -> &'static str {
        match self {
            ParkPresence::AtLeastHalf => "2 * COUNT(DISTINCT ae.park_id) >= ?1",
            ParkPresence::All => "COUNT(DISTINCT ae.park_id) = ?1",
            ParkPresence::ExactlyOne => "COUNT(DISTINCT ae.park_id) = 1",
        }
    }
}

impl Database {
    // ───────────────────── Provinces ─────────────────────

    /// Every province with the number of parks linked to it, most parks
    /// first and alphabetical within a tie.
    pub fn province_park_ranking(&self) -> DbResult<Vec<ProvinceParkCount>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT pr.id, pr.name, COUNT(pp.park_id) AS park_count
             FROM provinces pr
             LEFT JOIN park_provinces pp ON pp.province_id = pr.id
             GROUP BY pr.id, pr.name
             ORDER BY park_count DESC, pr.name ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ProvinceParkCount {
                    province_id: row.get(0)?,
                    province: row.get(1)?,
                    park_count: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[PNM] query: province_park_ranking returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// The province with the most parks. `None` when there are no provinces.
    pub fn province_with_most_parks(&self) -> DbResult<Option<ProvinceParkCount>> {
        Ok(self.province_park_ranking()?.into_iter().next())
    }

    // ───────────────────── Species ─────────────────────

    /// Species whose park presence matches `presence`, optionally limited to
    /// one element kind, ordered by scientific name.
    ///
    /// Returns nothing when there are no parks.
    pub fn species_by_park_presence(
        &self,
        presence: ParkPresence,
        kind: Option<ElementKind>,
    ) -> DbResult<Vec<SpeciesPresence>> {
        let conn = self.conn.borrow();
        let total_parks: i64 = conn.query_row("SELECT COUNT(*) FROM parks", [], |row| row.get(0))?;
        if total_parks == 0 {
            log::info!("[PNM] query: species_by_park_presence found no parks");
            return Ok(Vec::new());
        }

        let kind_filter = match kind {
            Some(k) => format!(
                "WHERE EXISTS (SELECT 1 FROM {} s WHERE s.element_id = ne.id)",
                k.table()
            ),
            None => String::new(),
        };
        let sql = format!(
            "SELECT MIN(ne.id), ne.scientific_name, COUNT(DISTINCT ae.park_id) AS parks_present
             FROM natural_elements ne
             JOIN area_elements ae ON ae.element_id = ne.id
             {}
             GROUP BY ne.scientific_name
             HAVING {}
             ORDER BY ne.scientific_name",
            kind_filter,
            presence.having()
        );
        let mut stmt = conn.prepare(&sql)?;
        // ExactlyOne does not reference ?1; only bind when the clause needs it.
        let rows = match presence {
            ParkPresence::ExactlyOne => stmt
                .query_map([], species_from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            _ => stmt
                .query_map(params![total_parks], species_from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        log::info!(
            "[PNM] query: species_by_park_presence({:?}, {:?}) returned {} records",
            presence,
            kind,
            rows.len()
        );
        Ok(rows)
    }

    pub fn species_in_at_least_half_of_parks(
        &self,
        kind: Option<ElementKind>,
    ) -> DbResult<Vec<SpeciesPresence>> {
        self.species_by_park_presence(ParkPresence::AtLeastHalf, kind)
    }

    pub fn species_in_all_parks(&self, kind: Option<ElementKind>) -> DbResult<Vec<SpeciesPresence>> {
        self.species_by_park_presence(ParkPresence::All, kind)
    }

    pub fn species_in_exactly_one_park(
        &self,
        kind: Option<ElementKind>,
    ) -> DbResult<Vec<SpeciesPresence>> {
        self.species_by_park_presence(ParkPresence::ExactlyOne, kind)
    }

    // ───────────────────── Visitors ─────────────────────

    /// Number of visitors registered in the parks with the given codes.
    pub fn count_visitors_in_parks(&self, codes: &[&str]) -> DbResult<i64> {
        if codes.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; codes.len()].join(", ");
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM visitors v
                 JOIN parks p ON p.id = v.park_id
                 WHERE p.code IN ({})",
                placeholders
            ),
            params_from_iter(codes.iter()),
            |row| row.get(0),
        )?;
        log::info!(
            "[PNM] query: count_visitors_in_parks({}) = {}",
            codes.join(","),
            count
        );
        Ok(count)
    }

    // ───────────────────── Consistency ─────────────────────

    /// Parks whose provincial extensions do not add up to their total area.
    ///
    /// Parks without a total area or without any province link have nothing
    /// to compare and are not reported. Missing extensions count as zero.
    pub fn park_extension_mismatches(&self) -> DbResult<Vec<ExtensionMismatch>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.total_area,
                    SUM(COALESCE(pp.extension_in_province, 0.0)) AS provinces_sum
             FROM parks p
             JOIN park_provinces pp ON pp.park_id = p.id
             WHERE p.total_area IS NOT NULL
             GROUP BY p.id, p.name, p.total_area
             HAVING abs(p.total_area - provinces_sum) > ?1
             ORDER BY p.name, p.id",
        )?;
        let rows = stmt
            .query_map(params![AREA_EPSILON], |row| {
                Ok(ExtensionMismatch {
                    park_id: row.get(0)?,
                    park_name: row.get(1)?,
                    total_area: row.get(2)?,
                    provinces_sum: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        if !rows.is_empty() {
            log::warn!(
                "[PNM] query: {} parks with provincial extensions not matching total area",
                rows.len()
            );
        }
        Ok(rows)
    }

    // ───────────────────── Reference data ─────────────────────

    pub fn species_groups(&self) -> DbResult<Vec<SpeciesGroup>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT name, count_argentina, count_protected, percentage
             FROM species_groups
             ORDER BY name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SpeciesGroup {
                    name: row.get(0)?,
                    count_argentina: row.get(1)?,
                    count_protected: row.get(2)?,
                    percentage: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[PNM] query: species_groups returned {} records", rows.len());
        Ok(rows)
    }

    /// Yearly resident / non-resident visitor shares, oldest year first.
    pub fn visitor_stats(&self) -> DbResult<Vec<VisitorStat>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, residents_pct, non_residents_pct FROM visitor_stats ORDER BY year",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(VisitorStat {
                    year: row.get(0)?,
                    residents_pct: row.get(1)?,
                    non_residents_pct: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[PNM] query: visitor_stats returned {} records", rows.len());
        Ok(rows)
    }
}
