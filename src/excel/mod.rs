//! Excel interchange module
//!
//! Bidirectional schedule ↔ spreadsheet conversion:
//! - Import: loosely structured roster sheet (.xlsx/.xls) → normalized project
//! - Export: normalized project → multi-section presentation report (.xlsx)

mod exporter;
mod importer;

pub use exporter::{MergeRegion, ReportLayout, ScheduleExporter};
pub use importer::ScheduleImporter;
