//! Species representation per taxonomic group.

use std::io;

use serde::Serialize;

use crate::reader::read_records;

/// Summary row appended by the publisher; not a group.
pub const TOTAL_ROW: &str = "Total";

/// Counts are kept as published; the database loader parses them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeciesGroupRow {
    pub name: String,
    pub count_argentina: String,
    pub count_protected: String,
    pub percentage: String,
}

pub fn parse_species_groups(text: &str) -> anyhow::Result<Vec<SpeciesGroupRow>> {
    let rows = read_records(text)?
        .iter()
        .filter(|r| r.get(0) != Some(TOTAL_ROW))
        .map(|r| SpeciesGroupRow {
            name: r[0].to_string(),
            count_argentina: r[1].to_string(),
            count_protected: r[2].to_string(),
            percentage: r
                .get(3)
                .filter(|p| !p.is_empty())
                .unwrap_or("0")
                .to_string(),
        })
        .collect();
    Ok(rows)
}

/// Write `name,count_argentina,count_protected,percentage`.
pub fn write_species_groups<W: io::Write>(rows: &[SpeciesGroupRow], out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_total_and_defaults_percentage() {
        let text = "\"grupo\";\"especies en argentina\";\"especies en APN\";\"porcentaje\"\n\
                    \"Aves\";\"1000\";\"800\";\"80,0\"\n\
                    \"Peces\";\"500\";\"120\"\n\
                    \"Total\";\"1500\";\"920\";\"61,3\"\n";
        let rows = parse_species_groups(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Aves");
        assert_eq!(rows[0].percentage, "80,0");
        assert_eq!(rows[1].count_protected, "120");
        assert_eq!(rows[1].percentage, "0");
    }

    #[test]
    fn output_column_order() {
        let rows = vec![SpeciesGroupRow {
            name: "Aves".into(),
            count_argentina: "1000".into(),
            count_protected: "800".into(),
            percentage: "80,0".into(),
        }];
        let mut out = Vec::new();
        write_species_groups(&rows, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,count_argentina,count_protected,percentage\nAves,1000,800,\"80,0\"\n"
        );
    }
}
