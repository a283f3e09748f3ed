//! CLI tool for inspecting and editing grid files.
//!
//! Provides commands for:
//! - Printing a grid file as a sheet
//! - Applying cell edits through a single sync transaction

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grid_sync_core::grid::JsonFileGrid;
use grid_sync_core::{CellValue, DataSheet, SheetError, SyncConfig, SyncOutcome};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the grid sync tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON grid file (`{"values": [[...], ...]}`)
    #[arg(short, long, global = true, default_value = "grid.json")]
    grid: PathBuf,

    /// TOML sync configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sheet loaded from the grid file
    Show,
    /// Apply cell edits in one transaction
    Set {
        /// Print the batch that would be sent and stop
        #[arg(long)]
        dry_run: bool,

        /// Edits as ROW:COLUMN=VALUE, e.g. `1:col_b=Updated`
        #[arg(required = true)]
        edits: Vec<CellEdit>,
    },
}

/// A single `ROW:COLUMN=VALUE` edit.
#[derive(Debug, Clone, PartialEq)]
struct CellEdit {
    row: usize,
    column: String,
    value: CellValue,
}

impl FromStr for CellEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, raw) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ROW:COLUMN=VALUE, got '{}'", s))?;
        let (row, column) = target
            .split_once(':')
            .ok_or_else(|| format!("expected ROW:COLUMN before '=', got '{}'", target))?;
        let row = row
            .trim()
            .parse()
            .map_err(|_| format!("invalid row identifier '{}'", row))?;
        if column.is_empty() {
            return Err(format!("missing column name in '{}'", s));
        }
        Ok(Self {
            row,
            column: column.to_string(),
            // Values are typed the way a user would type them into a cell
            value: CellValue::infer(raw),
        })
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SyncConfig> {
    let mut config = match path {
        Some(path) => SyncConfig::from_file(path)?,
        None => SyncConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

fn open_sheet(args: &Args) -> Result<DataSheet<JsonFileGrid>> {
    let config = load_config(args.config.as_ref())?;
    let grid = JsonFileGrid::open(&args.grid)
        .with_context(|| format!("Failed to open grid {}", args.grid.display()))?;
    let values = grid.values().to_vec();
    let sheet = DataSheet::from_grid_values(grid, &values, config)
        .with_context(|| format!("Failed to load sheet from {}", args.grid.display()))?;
    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        sheet.row_count(),
        sheet.column_count(),
        args.grid.display()
    );
    Ok(sheet)
}

fn show(sheet: &DataSheet<JsonFileGrid>) {
    println!("row\t{}", sheet.columns().join("\t"));
    for (row_id, values) in sheet.rows() {
        let cells: Vec<String> = values.iter().map(ToString::to_string).collect();
        println!("{}\t{}", row_id, cells.join("\t"));
    }
}

fn apply_edits(
    sheet: &mut DataSheet<JsonFileGrid>,
    edits: &[CellEdit],
    dry_run: bool,
) -> Result<bool> {
    if dry_run {
        let mut tx = sheet.start_update();
        for edit in edits {
            tx.set(edit.row, &edit.column, edit.value.clone())?;
        }
        println!("{}", serde_json::to_string_pretty(&tx.pending_batch())?);
        tx.abort();
        return Ok(true);
    }

    let outcome = sheet.update(|change| {
        for edit in edits {
            change.set(edit.row, &edit.column, edit.value.clone())?;
        }
        Ok::<(), SheetError>(())
    })?;

    match &outcome {
        SyncOutcome::Unchanged => println!("No changes"),
        SyncOutcome::Applied { changes } => {
            for change in changes {
                println!("{} = {}", change.address, change.value);
            }
        }
        SyncOutcome::Failed { error, attempted } => {
            eprintln!("Sync failed, {} changes not applied: {}", attempted.len(), error);
        }
    }
    Ok(outcome.is_synced())
}

fn run(args: Args) -> Result<bool> {
    let mut sheet = open_sheet(&args)?;
    match &args.command {
        Command::Show => {
            show(&sheet);
            Ok(true)
        }
        Command::Set { dry_run, edits } => apply_edits(&mut sheet, edits, *dry_run),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
