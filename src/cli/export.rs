//! CLI commands for data export
//!
//! Writes to a file when `--output` is given, otherwise to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{export_expenses_csv, export_full_json};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export expenses as CSV (can be imported again)
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export expenses and categories as JSON
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> ExpenseResult<()> {
    match cmd {
        ExportCommands::Csv { output } => {
            let mut writer = open_output(output.as_ref())?;
            export_expenses_csv(storage, &mut writer)?;
            writer.flush()?;
            if let Some(path) = output {
                let count = storage.expenses.count()?;
                println!("Exported {} expenses to: {}", count, path.display());
            }
        }
        ExportCommands::Json { output, pretty } => {
            let mut writer = open_output(output.as_ref())?;
            export_full_json(storage, &mut writer, pretty)?;
            writer.flush()?;
            match output {
                Some(path) => println!("Full database exported to: {}", path.display()),
                None => println!(),
            }
        }
    }

    Ok(())
}

fn open_output(output: Option<&PathBuf>) -> ExpenseResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                ExpenseError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
