//! Aggregate report over a park database, as text or JSON.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use pnm_db::models::{
    ExtensionMismatch, ProvinceParkCount, SpeciesGroup, SpeciesPresence, VisitorStat,
};
use pnm_db::Database;
use serde::Serialize;

/// Visitors counted for a set of park codes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisitorCount {
    pub codes: Vec<String>,
    pub visitors: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub province_ranking: Vec<ProvinceParkCount>,
    pub province_with_most_parks: Option<ProvinceParkCount>,
    pub species_in_at_least_half_of_parks: Vec<SpeciesPresence>,
    pub species_in_all_parks: Vec<SpeciesPresence>,
    pub species_in_exactly_one_park: Vec<SpeciesPresence>,
    pub visitors: Option<VisitorCount>,
    pub extension_mismatches: Vec<ExtensionMismatch>,
    pub population_notifications: usize,
    pub species_groups: Vec<SpeciesGroup>,
    pub visitor_stats: Vec<VisitorStat>,
}

/// Collect every report from `db`. Visitors are counted only when `codes`
/// is not empty.
pub fn build_report(db: &Database, codes: &[String]) -> anyhow::Result<Report> {
    let ranking = db.province_park_ranking()?;
    let visitors = if codes.is_empty() {
        None
    } else {
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        Some(VisitorCount {
            codes: codes.to_vec(),
            visitors: db.count_visitors_in_parks(&refs)?,
        })
    };
    Ok(Report {
        province_with_most_parks: ranking.first().cloned(),
        province_ranking: ranking,
        species_in_at_least_half_of_parks: db.species_in_at_least_half_of_parks(None)?,
        species_in_all_parks: db.species_in_all_parks(None)?,
        species_in_exactly_one_park: db.species_in_exactly_one_park(None)?,
        visitors,
        extension_mismatches: db.park_extension_mismatches()?,
        population_notifications: db.email_log()?.len(),
        species_groups: db.species_groups()?,
        visitor_stats: db.visitor_stats()?,
    })
}

fn species_line(out: &mut String, title: &str, species: &[SpeciesPresence]) -> std::fmt::Result {
    let names: Vec<&str> = species.iter().map(|s| s.scientific_name.as_str()).collect();
    if names.is_empty() {
        writeln!(out, "{}: (none)", title)
    } else {
        writeln!(out, "{}: {}", title, names.join(", "))
    }
}

/// Plain-text rendering of a [`Report`].
pub fn render_text(report: &Report) -> anyhow::Result<String> {
    let mut out = String::new();

    match &report.province_with_most_parks {
        Some(top) => writeln!(
            out,
            "Province with most parks: {} ({} parks)",
            top.province, top.park_count
        )?,
        None => writeln!(out, "Province with most parks: (no provinces)")?,
    }
    for row in &report.province_ranking {
        writeln!(out, "  {:<30} {:>4}", row.province, row.park_count)?;
    }

    species_line(
        &mut out,
        "Species in at least half of the parks",
        &report.species_in_at_least_half_of_parks,
    )?;
    species_line(&mut out, "Species in all parks", &report.species_in_all_parks)?;
    species_line(
        &mut out,
        "Species in exactly one park",
        &report.species_in_exactly_one_park,
    )?;

    if let Some(v) = &report.visitors {
        writeln!(out, "Visitors in parks {}: {}", v.codes.join(", "), v.visitors)?;
    }

    for m in &report.extension_mismatches {
        writeln!(
            out,
            "Extension mismatch: {} total {:.2} ha, provinces {:.2} ha",
            m.park_name, m.total_area, m.provinces_sum
        )?;
    }
    writeln!(out, "Population decrease notifications: {}", report.population_notifications)?;

    if !report.species_groups.is_empty() {
        writeln!(out, "Species groups:")?;
        for g in &report.species_groups {
            writeln!(
                out,
                "  {:<20} {:>6} {:>6} {:>6.1}%",
                g.name, g.count_argentina, g.count_protected, g.percentage
            )?;
        }
    }
    if !report.visitor_stats.is_empty() {
        writeln!(out, "Visitors (residents / non-residents):")?;
        for s in &report.visitor_stats {
            writeln!(
                out,
                "  {} {:.1}% / {:.1}%",
                s.year, s.residents_pct, s.non_residents_pct
            )?;
        }
    }
    Ok(out)
}

pub fn run_report(database: &Path, codes: &[String], json: bool) -> anyhow::Result<()> {
    let db = Database::open(database)
        .with_context(|| format!("opening database {}", database.display()))?;
    let report = build_report(&db, codes)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report)?);
    }
    Ok(())
}
