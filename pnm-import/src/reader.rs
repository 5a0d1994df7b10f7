//! Reader for the semicolon-delimited government exports.
//!
//! The exports quote every field and separate them with `;`. Each file opens
//! with a header whose first field is one of [`HEADER_MARKERS`]; headers can
//! repeat further down when several tables were concatenated.

use csv::StringRecord;

/// First fields that mark a header line.
pub const HEADER_MARKERS: &[&str] = &["jurisdicción", "grupo", "año"];

/// Records with fewer fields than this are ignored.
pub const MIN_FIELDS: usize = 3;

/// Parse an export into its data records.
///
/// Blank lines, header lines and records with fewer than [`MIN_FIELDS`]
/// fields are dropped. Fields are trimmed.
pub fn read_records(text: &str) -> anyhow::Result<Vec<StringRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut short = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let first = record.get(0).unwrap_or("");
        if HEADER_MARKERS.contains(&first) {
            continue;
        }
        if record.len() < MIN_FIELDS {
            log::warn!("[PNM] import: skipping short record {:?}", record);
            short += 1;
            continue;
        }
        records.push(record);
    }
    log::debug!(
        "[PNM] import: read {} records, skipped {} short",
        records.len(),
        short
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_headers_blank_lines_and_short_records() {
        let text = "\"jurisdicción\";\"nacional\";\"provincial\"\n\
                    \n\
                    \"Salta\";\"3\";\"12\"\n\
                    \"solo dos\";\"campos\"\n\
                    \"grupo\";\"a\";\"b\"\n\
                    \"Jujuy\";\"2\";\"8\"\n";
        let records = read_records(text).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(names, vec!["Salta", "Jujuy"]);
        assert_eq!(&records[0][2], "12");
    }

    #[test]
    fn semicolons_inside_quotes_stay_in_field() {
        let records = read_records("\"Tierra del Fuego; AeIAS\";\"1\";\"2\"\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "Tierra del Fuego; AeIAS");
    }

    #[test]
    fn header_marker_must_be_the_whole_first_field() {
        let records = read_records("\"año\";\"residentes\";\"no residentes\"\n\"añoso\";\"1\";\"2\"\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "añoso");
    }
}
