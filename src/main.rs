use clap::{Parser, Subcommand};
use paiban::cli;
use paiban::error::PaibanResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paiban")]
#[command(about = "排班表 Excel 匯入/匯出工具 - roster spreadsheet interchange")]
#[command(long_about = "Paiban - shift-schedule spreadsheet interchange

Parses loosely structured roster spreadsheets (日期 header convention,
ROC/AD year hints, fuzzy shift codes) into a normalized schedule project,
and renders projects back into a multi-section store report.

COMMANDS:
  import  - Roster spreadsheet (.xlsx/.xls) → project JSON
  export  - Project JSON → presentation report (.xlsx)

EXAMPLES:
  paiban import 114年1月排班.xlsx                 # writes 114年1月排班.json
  paiban import schedule.xlsx -o project.json -v
  paiban export project.json                     # derives the report name
  paiban export project.json -o 東勢店.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import a roster spreadsheet into a project JSON file.

The first sheet must follow the header convention: a row whose first cell
is 日期, with the staff-code row and the name row directly above it, and
month/day date rows below. The year is recovered heuristically from the
sheet name (ROC years like 114), explicit year text, and weekday matching.

Unrecognized shift text never fails the import; each distinct literal is
minted as a CUSTOM_ shift definition instead.")]
    /// Import a roster spreadsheet (.xlsx/.xls) to project JSON
    Import {
        /// Path to the spreadsheet file
        input: PathBuf,

        /// Output JSON path (default: input with .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the extracted roster and minted custom codes
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Export a project JSON file to the store report (.xlsx).

The report carries a merged title row, one column per employee (retail
first, then dispensing, separated by a spacer), one row per date with the
grid's cell text, and a per-employee statistics block.")]
    /// Export a project JSON file to the report spreadsheet
    Export {
        /// Path to the project JSON file
        input: PathBuf,

        /// Output .xlsx path (default: <store>_排班表_<start>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show export steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> PaibanResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            input,
            output,
            verbose,
        } => cli::import(input, output, verbose),

        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose),
    }
}
