use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fairshare::cli::{
    handle_account_command, handle_expense_command, handle_export_command, handle_income_command,
    handle_reference_command, handle_report_command, ExpenseCommands, ExportCommands,
    IncomeCommands, ReferenceCommands, ViewArgs,
};
use fairshare::config::paths::{FairSharePaths, DATA_DIR_ENV};
use fairshare::config::settings::{validate_partner_names, Settings};
use fairshare::logging;
use fairshare::models::{Budget, Category};
use fairshare::storage::{init::initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fairshare",
    version,
    about = "Shared household expense tracker",
    long_about = "FairShare tracks a couple's recurring expenses and incomes and \
                  splits each expense in proportion to the partners' incomes, \
                  weighted by who benefits from it."
)]
struct Cli {
    /// Directory holding settings and data files
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,

    /// Initialize a new household
    Init {
        /// Name of partner X
        #[arg(long)]
        partner_x: Option<String>,
        /// Name of partner Y
        #[arg(long)]
        partner_y: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// Show or rename the two partners
    Partners {
        /// New name for partner X
        #[arg(requires = "y")]
        x: Option<String>,
        /// New name for partner Y
        y: Option<String>,
    },

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Income management commands
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(ReferenceCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(ReferenceCommands),

    /// Payment method management commands
    #[command(subcommand)]
    Account(ReferenceCommands),

    /// Income ratio and the expense split
    Report(ViewArgs),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FairSharePaths::with_base_dir(dir),
        None => FairSharePaths::new()?,
    };

    // The TUI owns the terminal, so its logs go to a file
    if matches!(cli.command, Some(Commands::Tui)) {
        paths.ensure_directories()?;
        logging::init_file(&paths.log_file())?;
    } else {
        logging::init_stderr();
    }

    let mut settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(Commands::Init {
            partner_x,
            partner_y,
        }) => {
            let partners = match (partner_x, partner_y) {
                (None, None) => None,
                (x, y) => Some(validate_partner_names(
                    x.as_deref().unwrap_or(&settings.partners.x),
                    y.as_deref().unwrap_or(&settings.partners.y),
                )?),
            };
            println!("Initializing FairShare at: {}", paths.base_dir().display());
            let settings = initialize_storage(&paths, partners)?;
            println!("Initialization complete!");
            println!(
                "Partners: {} (X) and {} (Y)",
                settings.partners.x, settings.partners.y
            );
            println!();
            println!("Run 'fairshare partners <X> <Y>' to rename them.");
            println!("Run 'fairshare tui' to launch the interactive interface.");
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("FairShare Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Preferences file: {}", paths.preferences_file().display());
            println!("Log file:         {}", paths.log_file().display());
            println!();
            println!("Settings:");
            println!("  Partner X:       {}", settings.partners.x);
            println!("  Partner Y:       {}", settings.partners.y);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Initialized:     {}", paths.is_initialized());
            return Ok(());
        }
        Some(Commands::Partners { x: Some(x), y: Some(y) }) => {
            settings.rename_partners(&x, &y)?;
            settings.save(&paths)?;
            println!(
                "Partners renamed: {} (X) and {} (Y)",
                settings.partners.x, settings.partners.y
            );
            return Ok(());
        }
        Some(Commands::Partners { .. }) => {
            println!("Partner X: {}", settings.partners.x);
            println!("Partner Y: {}", settings.partners.y);
            return Ok(());
        }
        None => {
            println!("FairShare - shared household expenses, split fairly");
            println!();
            println!("Run 'fairshare --help' for usage information.");
            println!("Run 'fairshare tui' to launch the interactive interface.");
            return Ok(());
        }
        Some(command) => command,
    };

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match command {
        Commands::Tui => fairshare::tui::run_tui(storage, settings, &paths)?,
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, cmd)?,
        Commands::Income(cmd) => handle_income_command(&storage, &settings, cmd)?,
        Commands::Category(cmd) => handle_reference_command::<Category>(&storage, &settings, cmd)?,
        Commands::Budget(cmd) => handle_reference_command::<Budget>(&storage, &settings, cmd)?,
        Commands::Account(cmd) => handle_account_command(&storage, &settings, cmd)?,
        Commands::Report(args) => handle_report_command(&storage, &settings, args)?,
        Commands::Export(cmd) => handle_export_command(&storage, &settings, cmd)?,
        Commands::Init { .. } | Commands::Config | Commands::Partners { .. } => {}
    }

    Ok(())
}
