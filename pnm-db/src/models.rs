//! Row and report structs for the park management database.
//!
//! All structs derive `Serialize` so reports can be exported as JSON by the
//! command-line front end. Subtype tables are represented as enums:
//! [`ElementSubtype`] for natural elements and [`PersonnelRole`] for staff.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::error::DbError;

/// A province and the organisation responsible for its protected areas.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Province {
    pub id: i64,
    pub name: String,
    pub responsible_organization: String,
}

/// A national park.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Park {
    pub id: i64,
    pub name: String,
    pub declaration_date: NaiveDate,
    /// Recipient of population decrease notifications.
    pub contact_email: Option<String>,
    /// Short park code used by visitor reports (e.g. "A").
    pub code: Option<String>,
    /// Total area in hectares.
    pub total_area: Option<f64>,
}

/// Fields for inserting a park.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPark {
    pub name: String,
    pub declaration_date: NaiveDate,
    pub contact_email: Option<String>,
    pub code: Option<String>,
    pub total_area: Option<f64>,
}

/// The share of a park that lies inside one province.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParkProvince {
    pub park_id: i64,
    pub province_id: i64,
    pub province_name: String,
    pub extension_in_province: Option<f64>,
}

/// Composite key of a park area.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct AreaKey {
    pub park_id: i64,
    pub area_number: i64,
}

impl AreaKey {
    pub fn new(park_id: i64, area_number: i64) -> Self {
        Self { park_id, area_number }
    }
}

/// A numbered area inside a park.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParkArea {
    pub key: AreaKey,
    pub name: Option<String>,
    pub extension: Option<f64>,
}

/// Discriminant of [`ElementSubtype`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vegetal,
    Animal,
    Mineral,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Vegetal => "vegetal",
            ElementKind::Animal => "animal",
            ElementKind::Mineral => "mineral",
        }
    }

    /// The subtype table holding rows of this kind.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            ElementKind::Vegetal => "vegetal_elements",
            ElementKind::Animal => "animal_elements",
            ElementKind::Mineral => "mineral_elements",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtype-specific attributes of a natural element.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementSubtype {
    Vegetal {
        flowering_period: Option<String>,
    },
    Animal {
        diet: Option<String>,
        mating_season: Option<String>,
    },
    Mineral {
        crystal_or_rock: Option<String>,
    },
}

impl ElementSubtype {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementSubtype::Vegetal { .. } => ElementKind::Vegetal,
            ElementSubtype::Animal { .. } => ElementKind::Animal,
            ElementSubtype::Mineral { .. } => ElementKind::Mineral,
        }
    }
}

/// A natural element with its subtype, if one has been recorded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NaturalElement {
    pub id: i64,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub number_of_individuals: i64,
    pub subtype: Option<ElementSubtype>,
}

impl NaturalElement {
    pub fn kind(&self) -> Option<ElementKind> {
        self.subtype.as_ref().map(ElementSubtype::kind)
    }
}

/// Fields for inserting a natural element together with its subtype row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNaturalElement {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub number_of_individuals: i64,
    pub subtype: ElementSubtype,
}

/// Population of one element inside one park area.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AreaElement {
    pub area: AreaKey,
    pub element_id: i64,
    pub number_of_individuals: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResearchProject {
    pub id: i64,
    pub budget: f64,
    pub duration: String,
    pub element_id: i64,
}

/// A role held by a staff member, one per role table.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PersonnelRole {
    Management {
        entrance_number: i64,
    },
    Surveillance {
        vehicle_type: Option<String>,
        vehicle_registration: Option<String>,
    },
    Research {
        title: Option<String>,
        project_id: Option<i64>,
    },
    Conservation {
        specialty: Option<String>,
        area: Option<AreaKey>,
    },
}

impl PersonnelRole {
    pub(crate) fn table(&self) -> &'static str {
        match self {
            PersonnelRole::Management { .. } => "management_personnel",
            PersonnelRole::Surveillance { .. } => "surveillance_personnel",
            PersonnelRole::Research { .. } => "research_personnel",
            PersonnelRole::Conservation { .. } => "conservation_personnel",
        }
    }
}

/// A staff member and every role they hold.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Personnel {
    pub id: i64,
    pub dni: String,
    pub cuil: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_numbers: Option<String>,
    pub salary: Option<f64>,
    pub roles: Vec<PersonnelRole>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPersonnel {
    pub dni: String,
    pub cuil: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_numbers: Option<String>,
    pub salary: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Accommodation {
    pub id: i64,
    pub capacity: i64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Visitor {
    pub id: i64,
    pub dni: String,
    pub name: String,
    pub address: Option<String>,
    pub profession: Option<String>,
    pub accommodation_id: Option<i64>,
    pub park_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVisitor {
    pub dni: String,
    pub name: String,
    pub address: Option<String>,
    pub profession: Option<String>,
    pub accommodation_id: Option<i64>,
    pub park_id: i64,
}

/// How an excursion is carried out. Stored as `foot` / `vehicle`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExcursionType {
    Foot,
    Vehicle,
}

impl ExcursionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcursionType::Foot => "foot",
            ExcursionType::Vehicle => "vehicle",
        }
    }
}

impl fmt::Display for ExcursionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExcursionType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot" => Ok(ExcursionType::Foot),
            "vehicle" => Ok(ExcursionType::Vehicle),
            other => Err(DbError::InvalidValue(format!(
                "excursion type must be 'foot' or 'vehicle', got '{}'",
                other
            ))),
        }
    }
}

impl ToSql for ExcursionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExcursionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e: DbError| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Excursion {
    pub id: i64,
    pub day_of_week: String,
    pub time: NaiveTime,
    pub excursion_type: ExcursionType,
}

/// A notification recorded when an area population decreased.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailLogEntry {
    pub id: i64,
    pub area: AreaKey,
    pub element_id: i64,
    /// The park's contact email at the time of the update.
    pub recipient_email: Option<String>,
    pub scientific_name: String,
    pub old_count: i64,
    pub new_count: i64,
    /// UTC timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub logged_at: String,
}

/// A province and how many parks are linked to it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProvinceParkCount {
    pub province_id: i64,
    pub province: String,
    pub park_count: i64,
}

/// Which parks a species must be present in to be reported.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParkPresence {
    /// Present in at least half of all parks (`2 * present >= total`).
    AtLeastHalf,
    /// Present in every park.
    All,
    /// Present in exactly one park.
    ExactlyOne,
}

/// A species and the number of distinct parks it was recorded in.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeciesPresence {
    /// Lowest element id recorded under this scientific name.
    pub element_id: i64,
    pub scientific_name: String,
    pub parks_present: i64,
}

/// A park whose per-province extensions do not add up to its total area.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtensionMismatch {
    pub park_id: i64,
    pub park_name: String,
    pub total_area: f64,
    pub provinces_sum: f64,
}

/// Species representation of one taxonomic group in protected areas.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeciesGroup {
    pub name: String,
    pub count_argentina: i64,
    pub count_protected: i64,
    pub percentage: f64,
}

/// Share of resident and non-resident visitors for one year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisitorStat {
    pub year: i64,
    pub residents_pct: f64,
    pub non_residents_pct: f64,
}

/// Outcome of loading one CSV file.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}
