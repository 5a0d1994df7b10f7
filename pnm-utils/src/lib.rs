//! Shared utility functions for PNM crates.

/// Date and time utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveTime};

    /// Storage format for calendar dates (`declaration_date`).
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Storage format for times of day (`excursions.time`).
    pub const TIME_FORMAT: &str = "%H:%M:%S";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Format a NaiveTime as "HH:MM:SS"
    pub fn format_time(time: &NaiveTime) -> String {
        time.format(TIME_FORMAT).to_string()
    }

    /// Parse a time of day, accepting "HH:MM:SS" or the shorter "HH:MM".
    pub fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
        let s = s.trim();
        match NaiveTime::parse_from_str(s, TIME_FORMAT) {
            Ok(t) => Ok(t),
            Err(_) => Ok(NaiveTime::parse_from_str(s, "%H:%M")?),
        }
    }

}

/// Numeric parsing for values exported with either decimal separator.
pub mod numbers {
    /// Parse a float that may use `,` as the decimal separator ("45,3").
    ///
    /// Thousands separators are not supported; "1.234,5" is rejected.
    pub fn parse_decimal(s: &str) -> Option<f64> {
        let s = s.trim().trim_end_matches('%').trim();
        if s.is_empty() {
            return None;
        }
        if s.contains('.') && s.contains(',') {
            return None;
        }
        s.replace(',', ".").parse::<f64>().ok()
    }

    /// Parse an integer count, tolerating surrounding whitespace.
    pub fn parse_count(s: &str) -> Option<i64> {
        s.trim().parse::<i64>().ok()
    }

}
