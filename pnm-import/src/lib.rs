//! Reshapes the government protected-area exports into the CSV files the
//! database loader consumes.
//!
//! | Input (data dir) | Output (out dir) |
//! |---|---|
//! | [`PROTECTED_AREAS_FILE`] | [`PROVINCES_OUT`] |
//! | [`SPECIES_FILE`] | [`SPECIES_GROUPS_OUT`] |
//! | [`VISITORS_FILE`] | [`VISITOR_STATS_OUT`] |

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

pub mod provinces;
pub mod reader;
pub mod species_groups;
pub mod visitor_stats;

pub const PROTECTED_AREAS_FILE: &str =
    "areas_protegidas_nacionales_y_provinciales_por_jurisdiccion.csv";
pub const SPECIES_FILE: &str =
    "representatividad_de_las_especies_en_areas_protegidas_nacionales.csv";
pub const VISITORS_FILE: &str = "visitantes_registrados_en_los_parques_nacionales.csv";

pub const PROVINCES_OUT: &str = "provinces.csv";
pub const SPECIES_GROUPS_OUT: &str = "species_groups_info.csv";
pub const VISITOR_STATS_OUT: &str = "visitor_stats.csv";

/// Rows written per output file.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub provinces: usize,
    pub species_groups: usize,
    pub visitor_stats: usize,
}

fn read_input(data_dir: &Path, name: &str) -> anyhow::Result<String> {
    let path = data_dir.join(name);
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn create_output(out_dir: &Path, name: &str) -> anyhow::Result<BufWriter<File>> {
    let path = out_dir.join(name);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Read the three exports from `data_dir` and write the loader files into
/// `out_dir`, creating it if needed.
pub fn run_import(data_dir: &Path, out_dir: &Path) -> anyhow::Result<ImportSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let provinces = provinces::parse_provinces(&read_input(data_dir, PROTECTED_AREAS_FILE)?)?;
    provinces::write_provinces(&provinces, create_output(out_dir, PROVINCES_OUT)?)?;
    log::info!("[PNM] import: Generated {} provinces", provinces.len());

    let groups = species_groups::parse_species_groups(&read_input(data_dir, SPECIES_FILE)?)?;
    species_groups::write_species_groups(&groups, create_output(out_dir, SPECIES_GROUPS_OUT)?)?;
    log::info!("[PNM] import: Generated info for {} species groups", groups.len());

    let stats = visitor_stats::parse_visitor_stats(&read_input(data_dir, VISITORS_FILE)?)?;
    visitor_stats::write_visitor_stats(&stats, create_output(out_dir, VISITOR_STATS_OUT)?)?;
    log::info!("[PNM] import: Generated visitor stats for {} years", stats.len());

    Ok(ImportSummary {
        provinces: provinces.len(),
        species_groups: groups.len(),
        visitor_stats: stats.len(),
    })
}
