//! Schedule exporter - normalized project → presentation .xlsx report
//!
//! Layout generation is a pure step (`layout()`) producing a grid plus merge
//! regions and column widths; writing the workbook is the only fallible part.

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::Path;
use tracing::debug;

use crate::error::{PaibanError, PaibanResult};
use crate::shift::decode;
use crate::stats::period_stats;
use crate::types::{date_key, Department, Employee, ShiftCatalog, ShiftClass, StoreSchedule};

/// Excel caps sheet names at 31 characters
const MAX_SHEET_NAME_LEN: usize = 31;

/// Weekday abbreviations indexed by days-from-Sunday; fixed table so the
/// report renders the same regardless of process locale
const WEEKDAYS_ZH: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

/// Statistic row labels, in report order
const STAT_LABELS: [&str; 5] = ["A/P班", "全班", "特休時數", "加班時數", "總時數"];

/// A rectangular merged region (all coordinates inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRegion {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

/// Fully laid-out report, independent of the spreadsheet writer
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub sheet_name: String,
    pub rows: Vec<Vec<String>>,
    pub merges: Vec<MergeRegion>,
    pub column_widths: Vec<f64>,
}

/// Schedule exporter for the multi-section store report
pub struct ScheduleExporter<'a> {
    store_name: &'a str,
    employees: &'a [Employee],
    schedule: &'a StoreSchedule,
    dates: &'a [NaiveDate],
    definitions: &'a ShiftCatalog,
}

impl<'a> ScheduleExporter<'a> {
    pub fn new(
        store_name: &'a str,
        employees: &'a [Employee],
        schedule: &'a StoreSchedule,
        dates: &'a [NaiveDate],
        definitions: &'a ShiftCatalog,
    ) -> Self {
        Self {
            store_name,
            employees,
            schedule,
            dates,
            definitions,
        }
    }

    /// Default download name: sanitized store + suffix + start date
    pub fn suggested_file_name(&self) -> String {
        let start = self
            .dates
            .first()
            .map(|d| date_key(*d))
            .unwrap_or_default();
        format!(
            "{}_排班表_{}.xlsx",
            sanitize_sheet_name(self.store_name),
            start
        )
    }

    /// Build the full report grid.
    ///
    /// Retail employees first (existing order), then dispensing, separated by
    /// one spacer column when both groups are non-empty. Statistics are
    /// appended as a labeled block after the date rows.
    pub fn layout(&self) -> PaibanResult<ReportLayout> {
        let (Some(first), Some(last)) = (self.dates.first(), self.dates.last()) else {
            return Err(PaibanError::Export("日期範圍無效，無法產生報表".to_string()));
        };

        let retail: Vec<&Employee> = self
            .employees
            .iter()
            .filter(|e| e.department == Department::Retail)
            .collect();
        let dispensing: Vec<&Employee> = self
            .employees
            .iter()
            .filter(|e| e.department == Department::Dispensing)
            .collect();
        let spacer = !retail.is_empty() && !dispensing.is_empty();

        // Ordered report columns after 日期/星期: None marks the spacer
        let mut columns: Vec<Option<&Employee>> = retail.iter().copied().map(Some).collect();
        if spacer {
            columns.push(None);
        }
        columns.extend(dispensing.iter().copied().map(Some));

        let total_cols = 2 + columns.len();
        let mut rows: Vec<Vec<String>> = Vec::new();

        // Title row, merged across all data columns
        let title = format!(
            "{} 排班表 ({} - {})",
            self.store_name,
            first.format("%Y/%m/%d"),
            last.format("%Y/%m/%d"),
        );
        let mut title_row = vec![String::new(); total_cols];
        title_row[0] = title;
        rows.push(title_row);

        // Header row
        let mut header = vec!["日期".to_string(), "星期".to_string()];
        for column in &columns {
            header.push(column.map(|e| e.name.clone()).unwrap_or_default());
        }
        rows.push(header);

        // One row per date
        for date in self.dates {
            let weekday = WEEKDAYS_ZH[date.weekday().num_days_from_sunday() as usize];
            let mut row = vec![date.format("%m/%d").to_string(), weekday.to_string()];
            let day_key = date_key(*date);
            for column in &columns {
                row.push(match column {
                    Some(emp) => self.cell_text(&day_key, &emp.id),
                    None => String::new(),
                });
            }
            rows.push(row);
        }

        // Statistics block: blank spacer, label row, one row per statistic
        rows.push(vec![String::new(); total_cols]);
        let mut label_row = vec![String::new(); total_cols];
        label_row[0] = "統計".to_string();
        rows.push(label_row);

        let per_employee: Vec<Option<crate::stats::PeriodStats>> = columns
            .iter()
            .map(|column| {
                column.map(|emp| {
                    period_stats(&emp.id, self.schedule, self.dates, self.definitions)
                })
            })
            .collect();

        for (idx, label) in STAT_LABELS.iter().enumerate() {
            let mut row = vec![label.to_string(), String::new()];
            for stats in &per_employee {
                let value = match stats {
                    Some(s) => match idx {
                        0 => s.ap,
                        1 => s.full,
                        2 => s.annual,
                        3 => s.ot,
                        _ => s.total,
                    },
                    None => 0,
                };
                // Zeros render as empty cells for readability
                row.push(if value > 0 {
                    value.to_string()
                } else {
                    String::new()
                });
            }
            rows.push(row);
        }

        let merges = vec![MergeRegion {
            first_row: 0,
            first_col: 0,
            last_row: 0,
            last_col: (total_cols - 1) as u16,
        }];

        let mut column_widths = vec![8.0, 6.0];
        for column in &columns {
            column_widths.push(if column.is_some() { 10.0 } else { 2.0 });
        }

        Ok(ReportLayout {
            sheet_name: sheet_name_for(self.store_name),
            rows,
            merges,
            column_widths,
        })
    }

    /// Write the report to an .xlsx file
    pub fn export(&self, output_path: &Path) -> PaibanResult<()> {
        let layout = self.layout()?;
        debug!(
            rows = layout.rows.len(),
            sheet = %layout.sheet_name,
            "writing schedule report"
        );

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&layout.sheet_name)
            .map_err(|e| PaibanError::Export(format!("無法設定工作表名稱：{}", e)))?;

        let in_merge = |row: u32, col: u16| {
            layout.merges.iter().any(|m| {
                row >= m.first_row && row <= m.last_row && col >= m.first_col && col <= m.last_col
            })
        };

        for (row_idx, row) in layout.rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if value.is_empty() || in_merge(row_idx as u32, col_idx as u16) {
                    continue;
                }
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, value)
                    .map_err(|e| PaibanError::Export(format!("寫入儲存格失敗：{}", e)))?;
            }
        }

        let title_format = Format::new().set_bold().set_align(FormatAlign::Center);
        for merge in &layout.merges {
            let text = &layout.rows[merge.first_row as usize][merge.first_col as usize];
            worksheet
                .merge_range(
                    merge.first_row,
                    merge.first_col,
                    merge.last_row,
                    merge.last_col,
                    text,
                    &title_format,
                )
                .map_err(|e| PaibanError::Export(format!("合併儲存格失敗：{}", e)))?;
        }

        for (col_idx, width) in layout.column_widths.iter().enumerate() {
            worksheet
                .set_column_width(col_idx as u16, *width)
                .map_err(|e| PaibanError::Export(format!("設定欄寬失敗：{}", e)))?;
        }

        workbook
            .save(output_path)
            .map_err(|e| PaibanError::Export(format!("無法儲存 Excel 檔案：{}", e)))?;

        Ok(())
    }

    /// Render one schedule cell the way the grid displays it: short label
    /// plus annual-hour / overtime / lesson suffixes
    fn cell_text(&self, day_key: &str, employee_id: &str) -> String {
        let raw = self
            .schedule
            .get(day_key)
            .and_then(|day| day.get(employee_id));
        let cell = decode(raw.map(String::as_str));

        let Some(code) = cell.code else {
            return String::new();
        };
        let Some(def) = self.definitions.get(&code) else {
            return String::new();
        };

        let mut text = if def.short_label.is_empty() {
            code.clone()
        } else {
            def.short_label.clone()
        };

        if def.class == ShiftClass::Annual {
            if cell.overtime > 0 && cell.overtime != def.hours {
                text.push_str(&format!("({})", cell.overtime));
            }
        } else {
            if cell.overtime > 0 {
                text.push_str(&format!("+{}", cell.overtime));
            }
            if cell.is_lesson {
                text.push_str("/上");
            }
        }
        text
    }
}

/// Strip characters Excel forbids in sheet names
fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect()
}

fn sheet_name_for(store_name: &str) -> String {
    let sanitized = sanitize_sheet_name(store_name);
    let name: String = sanitized.chars().take(MAX_SHEET_NAME_LEN).collect();
    if name.is_empty() {
        "排班表".to_string()
    } else {
        name
    }
}
