//! CSV loading for the reference tables written by `pnm-import`.
//!
//! Each loader parses CSV data from a string slice (headers included) and
//! upserts rows by key, so loading the same file twice leaves one row per
//! key. All rows of one file are written in a single transaction.
//!
//! # CSV Formats
//!
//! - **Provinces**: `id,name,responsible_organization`
//! - **Species groups**: `name,count_argentina,count_protected,percentage`
//! - **Visitor stats**: `year,residents_pct,non_residents_pct`
//!
//! Numeric fields accept `,` as the decimal separator. Rows whose numeric
//! fields do not parse are skipped and counted in the returned
//! [`LoadSummary`]; province rows are still subject to every constraint.

use pnm_utils::numbers::{parse_count, parse_decimal};
use rusqlite::params;

use crate::models::LoadSummary;
use crate::Database;

fn reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes())
}

impl Database {
    /// Load provinces.
    ///
    /// # Example CSV
    /// ```text
    /// id,name,responsible_organization
    /// 1,"Córdoba","Organismo de Conservación de Córdoba"
    /// ```
    pub fn load_provinces(&self, csv_data: &str) -> anyhow::Result<LoadSummary> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let mut summary = LoadSummary::default();

        for result in reader(csv_data).records() {
            let r = result?;
            let Some(id) = r.get(0).and_then(parse_count) else {
                log::warn!("[PNM] loader: skipping province with bad id: {:?}", r);
                summary.skipped += 1;
                continue;
            };
            let name = r.get(1).unwrap_or("");
            let organization = r.get(2).unwrap_or("");

            tx.execute(
                "INSERT INTO provinces (id, name, responsible_organization)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     responsible_organization = excluded.responsible_organization",
                params![id, name, organization],
            )
            .map_err(crate::DbError::from)?;
            summary.loaded += 1;
        }
        tx.commit()?;
        log::info!(
            "[PNM] loader: Loaded {} provinces, skipped {}",
            summary.loaded,
            summary.skipped
        );
        Ok(summary)
    }

    /// Load species group representation.
    ///
    /// # Example CSV
    /// ```text
    /// name,count_argentina,count_protected,percentage
    /// Aves,1000,800,"80,0"
    /// ```
    pub fn load_species_groups(&self, csv_data: &str) -> anyhow::Result<LoadSummary> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let mut summary = LoadSummary::default();

        for result in reader(csv_data).records() {
            let r = result?;
            let name = r.get(0).unwrap_or("");
            let count_argentina = r.get(1).and_then(parse_count);
            let count_protected = r.get(2).and_then(parse_count);
            let percentage = r.get(3).and_then(parse_decimal);

            let (Some(count_argentina), Some(count_protected), Some(percentage)) =
                (count_argentina, count_protected, percentage)
            else {
                log::warn!("[PNM] loader: skipping species group with bad numbers: {:?}", r);
                summary.skipped += 1;
                continue;
            };
            if name.is_empty() {
                summary.skipped += 1;
                continue;
            }

            tx.execute(
                "INSERT INTO species_groups (name, count_argentina, count_protected, percentage)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name) DO UPDATE SET
                     count_argentina = excluded.count_argentina,
                     count_protected = excluded.count_protected,
                     percentage = excluded.percentage",
                params![name, count_argentina, count_protected, percentage],
            )?;
            summary.loaded += 1;
        }
        tx.commit()?;
        log::info!(
            "[PNM] loader: Loaded {} species groups, skipped {}",
            summary.loaded,
            summary.skipped
        );
        Ok(summary)
    }

    /// Load yearly visitor shares.
    ///
    /// # Example CSV
    /// ```text
    /// year,residents_pct,non_residents_pct
    /// 2019,"75,5","24,5"
    /// ```
    pub fn load_visitor_stats(&self, csv_data: &str) -> anyhow::Result<LoadSummary> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let mut summary = LoadSummary::default();

        for result in reader(csv_data).records() {
            let r = result?;
            let year = r.get(0).and_then(parse_count);
            let residents = r.get(1).and_then(parse_decimal);
            let non_residents = r.get(2).and_then(parse_decimal);

            let (Some(year), Some(residents), Some(non_residents)) = (year, residents, non_residents)
            else {
                log::warn!("[PNM] loader: skipping visitor stats with bad numbers: {:?}", r);
                summary.skipped += 1;
                continue;
            };

            tx.execute(
                "INSERT INTO visitor_stats (year, residents_pct, non_residents_pct)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(year) DO UPDATE SET
                     residents_pct = excluded.residents_pct,
                     non_residents_pct = excluded.non_residents_pct",
                params![year, residents, non_residents],
            )?;
            summary.loaded += 1;
        }
        tx.commit()?;
        log::info!(
            "[PNM] loader: Loaded {} visitor stats, skipped {}",
            summary.loaded,
            summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbError};

    const PROVINCES_CSV: &str = "\
id,name,responsible_organization
1,\"Buenos Aires\",\"Organismo de Conservación de Buenos Aires\"
2,\"Córdoba\",\"Organismo de Conservación de Córdoba\"
x,\"Nowhere\",\"Organismo de Conservación de Nowhere\"
";

    #[test]
    fn load_provinces_from_csv() {
        let db = Database::new().unwrap();
        let summary = db.load_provinces(PROVINCES_CSV).unwrap();
        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.skipped, 1);

        let provinces = db.list_provinces().unwrap();
        assert_eq!(provinces.len(), 2);
        assert_eq!(provinces[1].name, "Córdoba");
        assert_eq!(
            provinces[1].responsible_organization,
            "Organismo de Conservación de Córdoba"
        );
    }

    #[test]
    fn load_provinces_upserts_on_conflict() {
        let db = Database::new().unwrap();
        db.load_provinces(PROVINCES_CSV).unwrap();
        db.load_provinces(
            "id,name,responsible_organization\n2,\"Córdoba\",\"Secretaría de Ambiente\"\n",
        )
        .unwrap();

        let provinces = db.list_provinces().unwrap();
        assert_eq!(provinces.len(), 2);
        assert_eq!(db.get_province(2).unwrap().responsible_organization, "Secretaría de Ambiente");
    }

    #[test]
    fn load_provinces_enforces_constraints_atomically() {
        let db = Database::new().unwrap();
        let err = db
            .load_provinces("id,name,responsible_organization\n1,\"Salta\",\"SAyDS\"\n2,\"Jujuy\",\"  \"\n")
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DbError>(), Some(DbError::Check(_))), "{err}");
        assert!(db.list_provinces().unwrap().is_empty());
    }

    #[test]
    fn load_species_groups_skips_bad_numbers() {
        let db = Database::new().unwrap();
        let summary = db
            .load_species_groups(
                "name,count_argentina,count_protected,percentage\n\
                 Aves,1000,800,\"80,0\"\n\
                 Mamíferos,400,300,75.5\n\
                 Peces,s/d,10,0\n",
            )
            .unwrap();
        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.skipped, 1);

        let groups = db.species_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Aves");
        assert_eq!(groups[0].percentage, 80.0);
        assert_eq!(groups[1].count_protected, 300);
    }

    #[test]
    fn load_visitor_stats_from_csv() {
        let db = Database::new().unwrap();
        let summary = db
            .load_visitor_stats(
                "year,residents_pct,non_residents_pct\n\
                 2019,\"75,5\",\"24,5\"\n\
                 2018,70,30\n\
                 2020,,\n",
            )
            .unwrap();
        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.skipped, 1);

        let stats = db.visitor_stats().unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].year, 2018);
        assert_eq!(stats[1].residents_pct, 75.5);

        // Reloading replaces by year.
        db.load_visitor_stats("year,residents_pct,non_residents_pct\n2018,60,40\n")
            .unwrap();
        assert_eq!(db.visitor_stats().unwrap()[0].residents_pct, 60.0);
    }
}
