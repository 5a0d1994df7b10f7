//! Provinces from the protected-areas-by-jurisdiction export.

use std::io;

use serde::Serialize;

use crate::reader::read_records;

/// Jurisdiction rows that are not provinces.
pub const NON_PROVINCES: &[&str] = &["Áreas Marinas Protegidas", "Espacio marítimo argentino"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProvinceRow {
    pub id: usize,
    pub name: String,
    pub responsible_organization: String,
}

impl ProvinceRow {
    fn new(id: usize, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            responsible_organization: format!("Organismo de Conservación de {}", name),
        }
    }
}

/// Parse jurisdiction rows into provinces numbered from 1 in file order.
pub fn parse_provinces(text: &str) -> anyhow::Result<Vec<ProvinceRow>> {
    let rows = read_records(text)?
        .iter()
        .filter_map(|r| r.get(0))
        .filter(|name| !NON_PROVINCES.contains(name))
        .enumerate()
        .map(|(i, name)| ProvinceRow::new(i + 1, name))
        .collect();
    Ok(rows)
}

/// Write `id,name,responsible_organization`, quoting the text columns.
pub fn write_provinces<W: io::Write>(rows: &[ProvinceRow], mut out: W) -> anyhow::Result<()> {
    // NonNumeric would quote the header too; it is written bare.
    out.write_all(b"id,name,responsible_organization\n")?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
