use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//==============================================================================
// Schedule Data Model
//==============================================================================

/// Employee department within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    /// 門市部 (front-of-store retail staff)
    Retail,
    /// 調劑部 (pharmacists)
    Dispensing,
}

/// Classification of a shift definition for statistics.
///
/// Carried explicitly on the definition instead of being re-derived from the
/// nominal hour count, so customized hour values cannot silently move a shift
/// between statistics buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShiftClass {
    /// Standard AM/PM-style shift (counts toward the A/P total)
    Standard,
    /// Full-day shift (A全, P全, 全+2)
    FullDay,
    /// Scheduled day off
    Off,
    /// Annual leave (特休)
    Annual,
    /// Lesson / training block
    Lesson,
    /// Importer-minted custom shift
    Custom,
}

/// A shift type in the store catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDefinition {
    /// Unique catalog key (`CUSTOM_<text>` namespace reserved for imports)
    pub code: String,
    /// Display label (e.g. "A班")
    pub label: String,
    /// Short label rendered in grid cells
    pub short_label: String,
    /// Time-range text (e.g. "09:00 - 17:30")
    pub time: String,
    /// Nominal worked hours (may be 0 for off/lesson shifts)
    pub hours: u32,
    /// Overtime hours implied by the shift itself (e.g. 全+2, 上課)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_overtime: Option<u32>,
    /// Weekday color token
    pub color: String,
    /// Weekend color token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekend_color: Option<String>,
    /// Display ordering (custom codes sort last at 99)
    pub sort_order: u32,
    /// Statistics classification
    pub class: ShiftClass,
}

/// A rostered employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Stable unique key: spreadsheet staff code when present, else generated
    pub id: String,
    pub name: String,
    pub department: Department,
    /// Payroll / staff number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Free-text header label from the source sheet (department inference only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Sparse schedule: date key (`yyyy-MM-dd`) → employee id → raw shift code.
///
/// Absence at either level means "unassigned", distinct from an explicit OFF.
pub type StoreSchedule = BTreeMap<String, BTreeMap<String, String>>;

/// Shift-definition catalog keyed by code
pub type ShiftCatalog = BTreeMap<String, ShiftDefinition>;

/// Aggregate root owned by the surrounding application.
///
/// The importer constructs one fresh instance per successful import and never
/// mutates an existing project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleProject {
    pub id: String,
    pub name: String,
    pub store_name: String,
    /// ISO date, inclusive range start
    pub start_date: String,
    /// ISO date, inclusive range end (start ≤ end for the range to render)
    pub end_date: String,
    pub employees: Vec<Employee>,
    pub schedule: StoreSchedule,
    pub shift_definitions: ShiftCatalog,
    /// Unix millis
    pub last_modified: i64,
}

impl ScheduleProject {
    /// Every calendar date in the project's inclusive range
    pub fn date_range(&self) -> Vec<NaiveDate> {
        date_range(&self.start_date, &self.end_date)
    }
}

//==============================================================================
// Date helpers
//==============================================================================

/// Schedule map key format (stable, persisted long-term)
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a date as a schedule map key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// All dates from `start` to `end` inclusive, empty on unparseable or
/// reversed inputs
pub fn date_range(start: &str, end: &str) -> Vec<NaiveDate> {
    let (Ok(start), Ok(end)) = (
        NaiveDate::parse_from_str(start, DATE_KEY_FORMAT),
        NaiveDate::parse_from_str(end, DATE_KEY_FORMAT),
    ) else {
        return Vec::new();
    };

    start.iter_days().take_while(|d| *d <= end).collect()
}
