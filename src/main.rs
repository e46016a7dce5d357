use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use expense_tracker::cli::{
    handle_category_command, handle_expense_command, handle_export_command,
    handle_headers_command, handle_history_command, handle_import_command, handle_report_command,
};
use expense_tracker::config::paths::DATA_DIR_ENV;
use expense_tracker::config::{AppPaths, Settings};
use expense_tracker::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "EXPENSES_LOG";

#[derive(Parser)]
#[command(
    name = "expenses",
    author = "Kaylee Beyene",
    version,
    about = "Personal expense tracking from the command line",
    long_about = "Record and categorize expenses, bulk-import bank statements \
                  from CSV with per-row error reporting, and see where the \
                  money went month by month."
)]
struct Cli {
    /// Directory holding settings, data and the audit log
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(expense_tracker::cli::ExpenseCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(expense_tracker::cli::CategoryCommands),

    /// Import expenses from a CSV file
    Import(expense_tracker::cli::ImportArgs),

    /// List the columns of a CSV file and preview its first rows
    Headers {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Spending reports
    #[command(subcommand)]
    Report(expense_tracker::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(expense_tracker::cli::ExportCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => AppPaths::with_base_dir(dir),
        None => AppPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    // Headers only reads a file, so it needs no storage
    if let Some(Commands::Headers { file }) = &cli.command {
        handle_headers_command(file, &settings)?;
        return Ok(());
    }

    let storage = Storage::open(paths.clone(), &settings)?;

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Import(args)) => {
            handle_import_command(&storage, &settings, args)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        Some(Commands::Headers { .. }) => {}
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!(
                "{} categories and {} expenses are ready.",
                storage.categories.list()?.len(),
                storage.expenses.count()?
            );
            println!("Run 'expenses expense list' to see them.");
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Default category: {}", settings.default_category);
            println!("  Fallback color:   {}", settings.fallback_color);
            println!("  Preview rows:     {}", settings.preview_rows);
            println!("  Seed fixtures:    {}", settings.seed_fixtures);
        }
        None => {
            println!("Expense Tracker - personal expense tracking");
            println!();
            println!("Run 'expenses --help' for usage information.");
            println!("Run 'expenses init' to set up the data directory.");
        }
    }

    Ok(())
}
