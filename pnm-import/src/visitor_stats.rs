//! Yearly share of resident and non-resident park visitors.

use std::io;

use serde::Serialize;

use crate::reader::read_records;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisitorStatRow {
    pub year: String,
    pub residents_pct: String,
    pub non_residents_pct: String,
}

pub fn parse_visitor_stats(text: &str) -> anyhow::Result<Vec<VisitorStatRow>> {
    let rows = read_records(text)?
        .iter()
        .map(|r| VisitorStatRow {
            year: r[0].to_string(),
            residents_pct: r[1].to_string(),
            non_residents_pct: r[2].to_string(),
        })
        .collect();
    Ok(rows)
}

/// Write `year,residents_pct,non_residents_pct`.
pub fn write_visitor_stats<W: io::Write>(rows: &[VisitorStatRow], out: W) -> anyhow::Result<()> {
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
    fn parses_and_writes_year_rows() {
        let text = "\"año\";\"residentes\";\"no residentes\"\n\
                    \"2018\";\"70\";\"30\"\n\
                    \"2019\";\"75,5\";\"24,5\"\n";
        let rows = parse_visitor_stats(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].residents_pct, "75,5");

        let mut out = Vec::new();
        write_visitor_stats(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "year,residents_pct,non_residents_pct",
            "2018,70,30",
            "2019,\"75,5\",\"24,5\"",
        ]);
    }
}
