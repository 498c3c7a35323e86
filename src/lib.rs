//! Paiban - shift-schedule spreadsheet interchange
//!
//! This library turns loosely structured roster spreadsheets into a
//! normalized schedule model and renders that model back into a
//! presentation-oriented store report.
//!
//! # Features
//!
//! - Heuristic header/year detection (ROC and AD year hints, weekday pinning)
//! - Fuzzy shift-code normalization with custom-code minting
//! - Per-employee period statistics (shift counts, overtime, leave hours)
//! - Multi-section .xlsx report with merged title and statistics block
//! - Remote blob-store boundary with classified errors and timeouts
//!
//! # Example
//!
//! ```no_run
//! use paiban::excel::{ScheduleExporter, ScheduleImporter};
//!
//! let project = ScheduleImporter::new("114年1月排班.xlsx").import()?;
//! println!("{} 位員工", project.employees.len());
//!
//! let dates = project.date_range();
//! let exporter = ScheduleExporter::new(
//!     &project.store_name,
//!     &project.employees,
//!     &project.schedule,
//!     &dates,
//!     &project.shift_definitions,
//! );
//! exporter.export(std::path::Path::new("report.xlsx"))?;
//! # Ok::<(), paiban::error::PaibanError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
pub mod shift;
pub mod stats;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use error::{PaibanError, PaibanResult};
pub use stats::PeriodStats;
pub use types::{
    Department, Employee, ScheduleProject, ShiftCatalog, ShiftClass, ShiftDefinition,
    StoreSchedule,
};
