//! CLI commands for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::config::settings::Settings;
use crate::error::{FairShareError, FairShareResult};
use crate::export::{export_expenses_csv, export_full_json, export_full_yaml, FullExport};
use crate::storage::Storage;
use crate::view::derive_expense_view;

use super::expense::ViewArgs;

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Expense view as CSV (honors filter, sort and grouping)
    Csv {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Every record plus summary figures as JSON
    Json {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Every record plus summary figures as YAML
    Yaml {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&PathBuf>) -> FairShareResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                FairShareError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn finish(mut writer: Box<dyn Write>, output: Option<&PathBuf>, what: &str) -> FairShareResult<()> {
    writer
        .flush()
        .map_err(|e| FairShareError::Export(format!("Failed to write export: {}", e)))?;
    if let Some(path) = output {
        info!(path = %path.display(), what, "export written");
        eprintln!("Exported {} to {}", what, path.display());
    }
    Ok(())
}

pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> FairShareResult<()> {
    let household = storage.snapshot()?;

    match cmd {
        ExportCommands::Csv { output, view } => {
            let view = derive_expense_view(&household, &settings.partners, &view.query());
            let mut writer = open_output(output.as_ref())?;
            export_expenses_csv(&view, &settings.partners, &mut writer)?;
            finish(writer, output.as_ref(), "expenses")
        }

        ExportCommands::Json { output } => {
            let export = FullExport::from_household(&household, &settings.partners);
            let mut writer = open_output(output.as_ref())?;
            export_full_json(&export, &mut writer)?;
            finish(writer, output.as_ref(), "household data")
        }

        ExportCommands::Yaml { output } => {
            let export = FullExport::from_household(&household, &settings.partners);
            let mut writer = open_output(output.as_ref())?;
            export_full_yaml(&export, &mut writer)?;
            finish(writer, output.as_ref(), "household data")
        }
    }
}
