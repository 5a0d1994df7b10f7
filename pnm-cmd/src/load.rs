//! Database creation and loading of the importer's output.

use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;
use pnm_db::models::LoadSummary;
use pnm_db::Database;
use pnm_import::{PROVINCES_OUT, SPECIES_GROUPS_OUT, VISITOR_STATS_OUT};
use serde::Serialize;

/// Per-file outcome of [`run_load`].
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct LoadReport {
    pub provinces: LoadSummary,
    pub species_groups: LoadSummary,
    pub visitor_stats: LoadSummary,
}

/// Create the database file and schema. Existing data is left untouched.
pub fn run_init(database: &Path) -> anyhow::Result<()> {
    let db = Database::open(database)
        .with_context(|| format!("opening database {}", database.display()))?;
    let tables = db.table_names()?;
    info!("Database {} ready with {} tables", database.display(), tables.len());
    Ok(())
}

fn read_import_file(import_dir: &Path, name: &str) -> anyhow::Result<String> {
    let path = import_dir.join(name);
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

/// Load `provinces.csv`, `species_groups_info.csv` and `visitor_stats.csv`
/// from `import_dir`.
pub fn run_load(database: &Path, import_dir: &Path) -> anyhow::Result<LoadReport> {
    let db = Database::open(database)
        .with_context(|| format!("opening database {}", database.display()))?;

    let report = LoadReport {
        provinces: db.load_provinces(&read_import_file(import_dir, PROVINCES_OUT)?)?,
        species_groups: db.load_species_groups(&read_import_file(import_dir, SPECIES_GROUPS_OUT)?)?,
        visitor_stats: db.load_visitor_stats(&read_import_file(import_dir, VISITOR_STATS_OUT)?)?,
    };
    info!(
        "Load complete: {} provinces, {} species groups, {} visitor stats ({} rows skipped)",
        report.provinces.loaded,
        report.species_groups.loaded,
        report.visitor_stats.loaded,
        report.provinces.skipped + report.species_groups.skipped + report.visitor_stats.skipped
    );
    Ok(report)
}
