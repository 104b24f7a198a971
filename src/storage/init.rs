//! First-run setup
//!
//! Writes the settings file and empty data files. A household starts with
//! no categories, budgets or payment methods.

use tracing::info;

use crate::config::paths::FairSharePaths;
use crate::config::settings::Settings;
use crate::error::FairShareError;
use crate::models::PartnerNames;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation; existing files are kept
pub fn initialize_storage(
    paths: &FairSharePaths,
    partners: Option<PartnerNames>,
) -> Result<Settings, FairShareError> {
    paths.ensure_directories()?;

    for file in [
        paths.expenses_file(),
        paths.incomes_file(),
        paths.categories_file(),
        paths.budgets_file(),
        paths.accounts_file(),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &Vec::<serde_json::Value>::new())?;
        }
    }

    let mut settings = Settings::load_or_create(paths)?;
    if let Some(names) = partners {
        settings.partners = names;
    }
    settings.setup_completed = true;
    settings.save(paths)?;

    info!(base = %paths.base_dir().display(), "initialized household data");
    Ok(settings)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FairSharePaths) -> bool {
    !paths.is_initialized()
}
