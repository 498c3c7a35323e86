//! CLI command implementations.
//!
//! The binary is the file-picker stand-in: `import` turns a roster
//! spreadsheet into a project JSON document, `export` turns a project JSON
//! document back into the presentation report.

use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::error::PaibanResult;
use crate::excel::{ScheduleExporter, ScheduleImporter};
use crate::types::ScheduleProject;

/// Execute the import command
pub fn import(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> PaibanResult<()> {
    println!("{}", "📥 匯入排班表".bold().green());
    println!("   File: {}", input.display());
    println!();

    let project = ScheduleImporter::new(&input).import()?;

    println!("{}", "✅ 匯入成功".bold().green());
    println!("   分店：{}", project.store_name.bright_blue());
    println!(
        "   期間：{} - {}",
        project.start_date.cyan(),
        project.end_date.cyan()
    );
    println!("   員工：{} 位", project.employees.len());

    let custom_codes: Vec<&String> = project
        .shift_definitions
        .keys()
        .filter(|code| code.starts_with("CUSTOM_"))
        .collect();
    if !custom_codes.is_empty() {
        println!(
            "   {}",
            format!("自訂班別 {} 種（來自無法辨識的儲存格文字）", custom_codes.len()).yellow()
        );
    }

    if verbose {
        for emp in &project.employees {
            println!(
                "      {} {:?}{}",
                emp.name.cyan(),
                emp.department,
                emp.code
                    .as_deref()
                    .map(|c| format!(" ({})", c))
                    .unwrap_or_default()
            );
        }
        for code in &custom_codes {
            println!("      {}", code.yellow());
        }
    }

    let output = output.unwrap_or_else(|| input.with_extension("json"));
    fs::write(&output, serde_json::to_string_pretty(&project)?)?;
    println!();
    println!("   已寫入 {}", output.display().to_string().bright_blue());

    Ok(())
}

/// Execute the export command
pub fn export(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> PaibanResult<()> {
    println!("{}", "📤 匯出排班報表".bold().green());
    println!("   File: {}", input.display());
    println!();

    let project: ScheduleProject = serde_json::from_str(&fs::read_to_string(&input)?)?;
    let dates = project.date_range();

    if verbose {
        println!(
            "   {} 位員工，{} 天",
            project.employees.len(),
            dates.len()
        );
    }

    let exporter = ScheduleExporter::new(
        &project.store_name,
        &project.employees,
        &project.schedule,
        &dates,
        &project.shift_definitions,
    );

    let output = output.unwrap_or_else(|| PathBuf::from(exporter.suggested_file_name()));
    exporter.export(&output)?;

    println!("{}", "✅ 匯出成功".bold().green());
    println!("   已寫入 {}", output.display().to_string().bright_blue());

    Ok(())
}
