//! Per-employee period statistics.
//!
//! Derived on demand from the schedule map; output depends only on the
//! inputs, so the grid and the Excel report always agree.

use chrono::NaiveDate;
use serde::Serialize;

use crate::shift::{catalog::codes, decode};
use crate::types::{date_key, ShiftCatalog, ShiftClass, StoreSchedule};

/// Totals for one employee over a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    /// Count of standard AM/PM-class shifts
    pub ap: u32,
    /// Count of full-day-class shifts
    pub full: u32,
    /// Annual-leave hours credited
    pub annual: u32,
    /// Overtime hours worked
    pub ot: u32,
    /// Total worked hours excluding annual leave
    pub total: u32,
}

/// Aggregate one employee's cells across `dates`.
///
/// Annual-leave cells credit the overtime slot as the actual leave hour count
/// when present, else the definition's nominal hours; they contribute nothing
/// to overtime or total. All other cells take their definition's default
/// overtime when the slot is empty (全+2, 上課), and a lesson flag adds the
/// lesson shift's default overtime on top.
pub fn period_stats(
    employee_id: &str,
    schedule: &StoreSchedule,
    dates: &[NaiveDate],
    catalog: &ShiftCatalog,
) -> PeriodStats {
    let lesson_overtime = catalog
        .get(codes::LESSON)
        .and_then(|d| d.default_overtime)
        .unwrap_or(0);

    let mut stats = PeriodStats::default();

    for date in dates {
        let raw = schedule
            .get(&date_key(*date))
            .and_then(|day| day.get(employee_id));
        let cell = decode(raw.map(String::as_str));

        let Some(code) = cell.code else { continue };
        // Codes without a surviving definition contribute nothing
        let Some(def) = catalog.get(&code) else {
            continue;
        };

        if def.class == ShiftClass::Annual {
            stats.annual += if cell.overtime > 0 {
                cell.overtime
            } else {
                def.hours
            };
            continue;
        }

        let mut cell_ot = if cell.overtime > 0 {
            cell.overtime
        } else {
            def.default_overtime.unwrap_or(0)
        };
        if cell.is_lesson {
            cell_ot += lesson_overtime;
        }

        stats.ot += cell_ot;
        stats.total += def.hours + cell_ot;

        match def.class {
            ShiftClass::Standard => stats.ap += 1,
            ShiftClass::FullDay => stats.full += 1,
            _ => {}
        }
    }

    stats
}
