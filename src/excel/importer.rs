//! Schedule importer - loosely structured .xlsx/.xls → normalized project
//!
//! Source sheets follow one convention: a header row whose first cell is
//! 日期, with the staff-code and name rows directly above it, date rows below
//! carrying only month/day. Everything else (year, weekday, store name) is
//! recovered heuristically.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Datelike, Local, NaiveDate, Utc, Weekday};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{PaibanError, PaibanResult};
use crate::shift::{catalog, normalize};
use crate::types::{date_key, Department, Employee, ScheduleProject, StoreSchedule};

/// Header-row labels that never denote an employee column
const SKIP_HEADERS: [&str; 4] = ["日期", "星期", "進貨日", "備註"];

/// Header label fragment marking a pharmacist column
const PHARMACIST_MARKER: &str = "藥師";

/// Fallback store name when the sheet carries none
const DEFAULT_STORE_NAME: &str = "匯入分店";

/// First run of 3-4 digits in a sheet name, read as a ROC or AD year seed
static SHEET_YEAR_SEED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{3,4})").unwrap());

/// ROC year in row text; the leading boundary keeps "2025年" from matching
/// as ROC "025年"
static ROC_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])(\d{3})年度?").unwrap());

/// AD year in row text
static AD_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(20\d{2})年").unwrap());

/// A spreadsheet cell, resolved to an explicit tagged value at read time.
///
/// Consumers decide per column what the value means (date column vs shift
/// text column) instead of relying on implicit coercion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }

    /// Trimmed display text; numbers render without a trailing `.0` so staff
    /// codes like 123 survive the numeric round-trip
    fn text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    fn is_blank(&self) -> bool {
        self.text().is_empty()
    }
}

/// Schedule importer for converting roster spreadsheets to projects
pub struct ScheduleImporter {
    path: std::path::PathBuf,
}

impl ScheduleImporter {
    /// Create a new schedule importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the first sheet of the workbook into a fresh project.
    ///
    /// Structural violations (missing header, too few rows, no employees)
    /// abort with a descriptive error; per-row and per-cell anomalies are
    /// absorbed by skipping bad dates and minting custom shift codes.
    pub fn import(&self) -> PaibanResult<ScheduleProject> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| PaibanError::Import(format!("無法讀取試算表檔案：{}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PaibanError::Import("檔案中沒有任何工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| PaibanError::Import(format!("無法讀取工作表內容：{}", e)))?;

        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(CellValue::from_data).collect())
            .collect();

        import_rows(&sheet_name, &rows)
    }
}

/// Core import over already-read rows (separated from file IO for testing)
pub(crate) fn import_rows(
    sheet_name: &str,
    rows: &[Vec<CellValue>],
) -> PaibanResult<ScheduleProject> {
    if rows.len() < 5 {
        return Err(PaibanError::Import("檔案內容過少，無法解析".to_string()));
    }

    // The *last* row whose first cell is 日期 wins; sheets often carry a
    // second decorative title block above the real header
    let header_idx = rows
        .iter()
        .rposition(|row| row.first().map(|c| c.text()).as_deref() == Some("日期"))
        .ok_or_else(|| {
            PaibanError::Import("找不到含有「日期」的標題列 (A欄應為日期)".to_string())
        })?;

    if header_idx < 2 {
        return Err(PaibanError::Import(
            "標題列位置太靠上，無法讀取上方的姓名與工號列".to_string(),
        ));
    }

    let header_row = &rows[header_idx];
    let name_row = &rows[header_idx - 1];
    let id_row = &rows[header_idx - 2];

    let detected_year = detect_year(sheet_name, &rows[..=header_idx]);
    debug!(detected_year, sheet_name, "year heuristic seed");

    // Roster: a column is an employee column iff the name row has text there
    // and the header label is not one of the structural markers
    let mut employees: Vec<Employee> = Vec::new();
    let mut employee_columns: Vec<(usize, String)> = Vec::new();

    for (col, header_cell) in header_row.iter().enumerate() {
        let header_val = header_cell.text();
        if SKIP_HEADERS.contains(&header_val.as_str()) {
            continue;
        }
        let name_val = name_row.get(col).map(|c| c.text()).unwrap_or_default();
        if name_val.is_empty() {
            continue;
        }

        let code = id_row.get(col).map(|c| c.text()).unwrap_or_default();
        let id = if code.is_empty() {
            format!("EMP_{}", uuid::Uuid::new_v4().simple())
        } else {
            code.clone()
        };
        let department = if header_val.contains(PHARMACIST_MARKER) {
            Department::Dispensing
        } else {
            Department::Retail
        };

        employees.push(Employee {
            id: id.clone(),
            name: name_val,
            department,
            code: (!code.is_empty()).then_some(code),
            role: (!header_val.is_empty()).then_some(header_val),
        });
        employee_columns.push((col, id));
    }

    if employees.is_empty() {
        return Err(PaibanError::Import("找不到員工資料".to_string()));
    }

    let mut schedule = StoreSchedule::new();
    let mut shift_definitions = catalog::default_catalog();

    let mut current_year = detected_year;
    let mut last_month: Option<u32> = None;
    let mut min_date: Option<NaiveDate> = None;
    let mut max_date: Option<NaiveDate> = None;

    for row in &rows[header_idx + 1..] {
        let Some((month, day)) = parse_month_day(row.first()) else {
            continue;
        };

        if last_month.is_none() {
            // First parseable date: pin the year via the weekday cell when
            // present, else assume a December start belongs to the prior year
            let weekday_text = row.get(1).map(|c| c.text()).unwrap_or_default();
            if let Some(target) = chinese_weekday(&weekday_text) {
                if let Some(year) = resolve_year_by_weekday(detected_year, month, day, target) {
                    debug!(year, month, day, "year resolved by weekday match");
                    current_year = year;
                }
            } else if month == 12 && detected_year > 2000 {
                current_year = detected_year - 1;
            }
        } else if last_month == Some(12) && month == 1 {
            // Schedules spanning a year boundary roll over exactly once here
            current_year += 1;
            debug!(current_year, "month rolled 12→1, advancing working year");
        }
        last_month = Some(month);

        let Some(date) = NaiveDate::from_ymd_opt(current_year, month, day) else {
            debug!(current_year, month, day, "skipping invalid calendar date");
            continue;
        };

        min_date = Some(min_date.map_or(date, |d| d.min(date)));
        max_date = Some(max_date.map_or(date, |d| d.max(date)));

        let day_key = date_key(date);
        for (col, emp_id) in &employee_columns {
            let Some(cell) = row.get(*col) else { continue };
            if cell.is_blank() {
                continue;
            }

            let raw_text = cell.text();
            let code = match normalize(&raw_text) {
                Some(code) => code.to_string(),
                None => {
                    let custom = catalog::mint_custom(&mut shift_definitions, &raw_text);
                    debug!(raw = %raw_text, code = %custom, "minted custom shift code");
                    custom
                }
            };

            schedule
                .entry(day_key.clone())
                .or_insert_with(BTreeMap::new)
                .insert(emp_id.clone(), code);
        }
    }

    let (Some(min_date), Some(max_date)) = (min_date, max_date) else {
        return Err(PaibanError::Import(
            "標題列之下找不到任何可解析的日期".to_string(),
        ));
    };

    // Store/location name sits a couple of columns in on the first data row;
    // anything long there is usually a remark, not a name
    let store_name = rows
        .get(header_idx + 1)
        .and_then(|row| row.get(2))
        .map(|c| c.text())
        .filter(|text| !text.is_empty() && text.chars().count() < 8)
        .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string());

    Ok(ScheduleProject {
        id: format!("proj_{}", uuid::Uuid::new_v4().simple()),
        name: format!("{}年{}月 排班表", current_year, min_date.month()),
        store_name,
        start_date: date_key(min_date),
        end_date: date_key(max_date),
        employees,
        schedule,
        shift_definitions,
        last_modified: Utc::now().timestamp_millis(),
    })
}

/// Seed a year from the sheet name and override it with the first explicit
/// year found in the rows above the header.
///
/// Three-digit numbers are read as ROC (Republic of China) years; sheets are
/// typically named things like "114年1月排班".
pub(crate) fn detect_year(sheet_name: &str, header_rows: &[Vec<CellValue>]) -> i32 {
    let mut year = Local::now().year();

    if let Some(caps) = SHEET_YEAR_SEED.captures(sheet_name) {
        if let Ok(y) = caps[1].parse::<i32>() {
            if y > 100 && y < 200 {
                year = y + 1911;
            } else if (2000..2100).contains(&y) {
                year = y;
            }
        }
    }

    // Explicit year text in the sheet body takes priority over the name seed
    for row in header_rows {
        let row_text = row
            .iter()
            .map(|c| c.text())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(caps) = ROC_YEAR.captures(&row_text) {
            if let Ok(y) = caps[1].parse::<i32>() {
                year = y + 1911;
                break;
            }
        }
        if let Some(caps) = AD_YEAR.captures(&row_text) {
            if let Ok(y) = caps[1].parse::<i32>() {
                year = y;
                break;
            }
        }
    }

    year
}

/// Candidate years tested against the weekday predicate, in priority order
pub(crate) fn year_candidates(detected: i32) -> [i32; 5] {
    [detected, detected - 1, detected + 1, 2025, 2026]
}

/// First candidate year in which `month/day` falls on `target`
pub(crate) fn resolve_year_by_weekday(
    detected: i32,
    month: u32,
    day: u32,
    target: Weekday,
) -> Option<i32> {
    year_candidates(detected).into_iter().find(|&year| {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| date.weekday() == target)
            .unwrap_or(false)
    })
}

/// Map a Chinese weekday abbreviation (日一二三四五六) to a weekday
pub(crate) fn chinese_weekday(text: &str) -> Option<Weekday> {
    match text {
        "日" => Some(Weekday::Sun),
        "一" => Some(Weekday::Mon),
        "二" => Some(Weekday::Tue),
        "三" => Some(Weekday::Wed),
        "四" => Some(Weekday::Thu),
        "五" => Some(Weekday::Fri),
        "六" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Read a date cell as (month, day): either an Excel serial number or
/// slash-delimited text like "12/25" (with optional trailing time part)
pub(crate) fn parse_month_day(cell: Option<&CellValue>) -> Option<(u32, u32)> {
    match cell? {
        CellValue::Number(serial) => {
            if *serial <= 0.0 {
                return None;
            }
            // Excel serial dates count from the 1899-12-30 epoch
            let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
            let date = epoch.checked_add_days(chrono::Days::new(*serial as u64))?;
            Some((date.month(), date.day()))
        }
        CellValue::Text(text) => {
            let date_part = text.trim().split_whitespace().next()?;
            let mut parts = date_part.split('/');
            let month = parts.next()?.trim().parse::<u32>().ok()?;
            let day = parts.next()?.trim().parse::<u32>().ok()?;
            Some((month, day))
        }
        CellValue::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|s| text(s)).collect()
    }

    // -------------------------------------------------------------------------
    // Year heuristics
    // -------------------------------------------------------------------------

    #[test]
    fn test_detect_year_from_roc_sheet_name() {
        assert_eq!(detect_year("114年排班", &[]), 2025);
    }

    #[test]
    fn test_detect_year_from_ad_sheet_name() {
        assert_eq!(detect_year("2024 schedule", &[]), 2024);
    }

    #[test]
    fn test_detect_year_row_overrides_sheet_name() {
        let rows = vec![text_row(&["113年度 排班表"])];
        assert_eq!(detect_year("114年排班", &rows), 2024);
    }

    #[test]
    fn test_detect_year_ad_pattern_in_rows() {
        let rows = vec![text_row(&[""]), text_row(&["2026年1月班表"])];
        assert_eq!(detect_year("schedule", &rows), 2026);
    }

    #[test]
    fn test_detect_year_ad_row_not_misread_as_roc() {
        // "025年" inside "2025年" must not resolve as ROC 025 (1936)
        let rows = vec![text_row(&["2025年1月"])];
        assert_eq!(detect_year("s", &rows), 2025);
    }

    #[test]
    fn test_detect_year_defaults_to_current_year() {
        assert_eq!(detect_year("班表", &[]), Local::now().year());
    }

    #[test]
    fn test_year_candidates_ordering() {
        assert_eq!(year_candidates(2025), [2025, 2024, 2026, 2025, 2026]);
    }

    #[test]
    fn test_resolve_year_by_weekday_prefers_detected() {
        // 2025-06-02 is a Monday; the detected year wins when it matches
        assert_eq!(
            resolve_year_by_weekday(2025, 6, 2, Weekday::Mon),
            Some(2025)
        );
    }

    #[test]
    fn test_resolve_year_by_weekday_roc_hint_case() {
        // ROC 114 = 2025, but Dec 25 falls on a Wednesday in 2024
        assert_eq!(
            resolve_year_by_weekday(2025, 12, 25, Weekday::Wed),
            Some(2024)
        );
    }

    #[test]
    fn test_resolve_year_by_weekday_no_match() {
        // Feb 30 never exists in any candidate year
        assert_eq!(resolve_year_by_weekday(2025, 2, 30, Weekday::Mon), None);
    }

    // -------------------------------------------------------------------------
    // Cell parsing
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_month_day_text() {
        assert_eq!(parse_month_day(Some(&text("12/25"))), Some((12, 25)));
        assert_eq!(parse_month_day(Some(&text("1/5"))), Some((1, 5)));
    }

    #[test]
    fn test_parse_month_day_text_with_time_suffix() {
        assert_eq!(parse_month_day(Some(&text("12/25 00:00"))), Some((12, 25)));
    }

    #[test]
    fn test_parse_month_day_excel_serial() {
        // Serial 45651 = 2024-12-25
        let cell = CellValue::Number(45651.0);
        assert_eq!(parse_month_day(Some(&cell)), Some((12, 25)));
    }

    #[test]
    fn test_parse_month_day_rejects_garbage() {
        assert_eq!(parse_month_day(Some(&text("備註"))), None);
        assert_eq!(parse_month_day(Some(&text(""))), None);
        assert_eq!(parse_month_day(Some(&CellValue::Empty)), None);
        assert_eq!(parse_month_day(None), None);
    }

    #[test]
    fn test_chinese_weekday_mapping() {
        assert_eq!(chinese_weekday("日"), Some(Weekday::Sun));
        assert_eq!(chinese_weekday("三"), Some(Weekday::Wed));
        assert_eq!(chinese_weekday("六"), Some(Weekday::Sat));
        assert_eq!(chinese_weekday("x"), None);
    }

    #[test]
    fn test_cell_value_number_text_drops_trailing_zero() {
        assert_eq!(CellValue::Number(123.0).text(), "123");
        assert_eq!(CellValue::Number(1.5).text(), "1.5");
    }

    // -------------------------------------------------------------------------
    // Structural import over in-memory rows
    // -------------------------------------------------------------------------

    fn sample_rows() -> Vec<Vec<CellValue>> {
        vec![
            text_row(&["114年1月 排班表"]),
            text_row(&["", "", "E001", "E002", "E003"]),
            text_row(&["", "", "張助理", "陳助理", "王藥師"]),
            text_row(&["日期", "星期", "門市", "門市", "藥師"]),
            text_row(&["1/6", "一", "A1", "P", "特休"]),
            text_row(&["1/7", "二", "(A)", "全+2", "支援門市"]),
            text_row(&["1/8", "三", "", "休", "支援門市"]),
        ]
    }

    #[test]
    fn test_import_rows_happy_path() {
        let project = import_rows("114年1月", &sample_rows()).unwrap();

        assert_eq!(project.employees.len(), 3);
        assert_eq!(project.employees[0].name, "張助理");
        assert_eq!(project.employees[0].department, Department::Retail);
        assert_eq!(project.employees[2].department, Department::Dispensing);
        assert_eq!(project.employees[2].id, "E003");

        assert_eq!(project.start_date, "2025-01-06");
        assert_eq!(project.end_date, "2025-01-08");
        assert_eq!(project.name, "2025年1月 排班表");

        let day1 = &project.schedule["2025-01-06"];
        assert_eq!(day1["E001"], "A");
        assert_eq!(day1["E002"], "P");
        assert_eq!(day1["E003"], "ANNUAL");

        let day2 = &project.schedule["2025-01-07"];
        assert_eq!(day2["E001"], "A");
        assert_eq!(day2["E002"], "FULL_PLUS_2");
        assert_eq!(day2["E003"], "CUSTOM_支援門市");

        // Unassigned cell stays absent (sparse schedule)
        assert!(!project.schedule["2025-01-08"].contains_key("E001"));

        // One custom definition, reused for the repeated literal text
        let customs: Vec<_> = project
            .shift_definitions
            .keys()
            .filter(|k| k.starts_with("CUSTOM_"))
            .collect();
        assert_eq!(customs, vec!["CUSTOM_支援門市"]);
    }

    #[test]
    fn test_import_rows_too_few_rows() {
        let rows = vec![text_row(&["日期"]), text_row(&["1/1"])];
        let err = import_rows("s", &rows).unwrap_err();
        assert!(err.to_string().contains("檔案內容過少"));
    }

    #[test]
    fn test_import_rows_missing_header_marker() {
        let rows = vec![
            text_row(&["a"]),
            text_row(&["b"]),
            text_row(&["c"]),
            text_row(&["d"]),
            text_row(&["e"]),
        ];
        let err = import_rows("s", &rows).unwrap_err();
        assert!(err.to_string().contains("找不到含有「日期」的標題列"));
    }

    #[test]
    fn test_import_rows_header_too_near_top() {
        let rows = vec![
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["1/6", "一", "A"]),
            text_row(&["1/7", "二", "A"]),
            text_row(&["1/8", "三", "A"]),
        ];
        let err = import_rows("s", &rows).unwrap_err();
        assert!(err.to_string().contains("標題列位置太靠上"));
    }

    #[test]
    fn test_import_rows_no_employees() {
        let rows = vec![
            text_row(&["x"]),
            text_row(&["", ""]),
            text_row(&["", ""]),
            text_row(&["日期", "星期"]),
            text_row(&["1/6", "一"]),
        ];
        let err = import_rows("s", &rows).unwrap_err();
        assert!(err.to_string().contains("找不到員工資料"));
    }

    #[test]
    fn test_import_rows_last_header_row_wins() {
        // A decorative 日期 row above the real one must be ignored
        let rows = vec![
            text_row(&["日期"]),
            text_row(&["", "", "E001"]),
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["1/6", "一", "A"]),
        ];
        let project = import_rows("114", &rows).unwrap();
        assert_eq!(project.employees.len(), 1);
        assert_eq!(project.schedule["2025-01-06"]["E001"], "A");
    }

    #[test]
    fn test_import_rows_year_rollover_once() {
        let rows = vec![
            text_row(&["113年12月"]),
            text_row(&["", "", "E001"]),
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["12/31", "二", "A"]),
            text_row(&["1/1", "三", "P"]),
            text_row(&["1/2", "四", "P"]),
        ];
        // ROC 113 = 2024; 2024-12-31 is a Tuesday
        let project = import_rows("113年12月", &rows).unwrap();
        assert_eq!(project.start_date, "2024-12-31");
        assert_eq!(project.end_date, "2025-01-02");
        assert_eq!(project.schedule["2025-01-01"]["E001"], "P");
    }

    #[test]
    fn test_import_rows_december_without_weekday_uses_prior_year() {
        let rows = vec![
            text_row(&["2025年1月"]),
            text_row(&["", "", "E001"]),
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["12/30", "", "A"]),
            text_row(&["12/31", "", "A"]),
        ];
        let project = import_rows("s", &rows).unwrap();
        assert_eq!(project.start_date, "2024-12-30");
    }

    #[test]
    fn test_import_rows_skips_bad_dates() {
        let rows = vec![
            text_row(&["114年"]),
            text_row(&["", "", "E001"]),
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["1/6", "一", "A"]),
            text_row(&["2/30", "", "P"]),
            text_row(&["小計", "", ""]),
            text_row(&["1/8", "三", "P"]),
        ];
        let project = import_rows("114年", &rows).unwrap();
        assert_eq!(project.schedule.len(), 2);
        assert_eq!(project.end_date, "2025-01-08");
    }

    #[test]
    fn test_import_rows_no_parseable_dates() {
        let rows = vec![
            text_row(&["x"]),
            text_row(&["", "", "E001"]),
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["備註", "", ""]),
        ];
        let err = import_rows("s", &rows).unwrap_err();
        assert!(err.to_string().contains("日期"));
    }

    #[test]
    fn test_import_rows_store_name_from_first_data_row() {
        let mut rows = sample_rows();
        rows[4][2] = text("東勢店");
        let project = import_rows("114年1月", &rows).unwrap();
        assert_eq!(project.store_name, "東勢店");
    }

    #[test]
    fn test_import_rows_long_store_name_falls_back() {
        let mut rows = sample_rows();
        rows[4][2] = text("這是一個過長的備註不是店名");
        let project = import_rows("114年1月", &rows).unwrap();
        assert_eq!(project.store_name, DEFAULT_STORE_NAME);
    }

    #[test]
    fn test_import_rows_generates_id_when_no_staff_code() {
        let rows = vec![
            text_row(&["114年"]),
            text_row(&["", "", ""]),
            text_row(&["", "", "張助理"]),
            text_row(&["日期", "星期", "門市"]),
            text_row(&["1/6", "一", "A"]),
        ];
        let project = import_rows("114年", &rows).unwrap();
        assert!(project.employees[0].id.starts_with("EMP_"));
        assert_eq!(project.employees[0].code, None);
    }
}
