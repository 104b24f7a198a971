//! Path management for FairShare
//!
//! ## Path Resolution Order
//!
//! 1. `FAIRSHARE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories::ProjectDirs`
//!    (`~/.config/fairshare` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::FairShareError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "FAIRSHARE_DATA_DIR";

/// Manages all paths used by FairShare
#[derive(Debug, Clone)]
pub struct FairSharePaths {
    base_dir: PathBuf,
}

impl FairSharePaths {
    /// Resolve the base directory from the environment or the platform
    pub fn new() -> Result<Self, FairShareError> {
        if let Some(custom) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_base_dir(PathBuf::from(custom)));
        }

        let dirs = ProjectDirs::from("", "", "fairshare").ok_or_else(|| {
            FairShareError::Config("Could not determine a home directory".into())
        })?;
        Ok(Self::with_base_dir(dirs.config_dir().to_path_buf()))
    }

    /// Use an explicit base directory (tests, `--data-dir`)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.base_dir.join("preferences.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("fairshare.log")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn incomes_file(&self) -> PathBuf {
        self.data_dir().join("incomes.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Payment methods
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), FairShareError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FairShareError::Io(format!("Failed to create base directory: {}", e)))?;
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FairShareError::Io(format!("Failed to create data directory: {}", e)))?;
        Ok(())
    }

    /// Initialized once a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        let paths = FairSharePaths::with_base_dir(base.to_path_buf());

        assert_eq!(paths.base_dir(), base);
        assert_eq!(paths.settings_file(), base.join("config.json"));
        assert_eq!(paths.preferences_file(), base.join("preferences.json"));
        assert_eq!(paths.expenses_file(), base.join("data").join("expenses.json"));
        assert_eq!(paths.accounts_file(), base.join("data").join("accounts.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairSharePaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().is_dir());
        assert!(!paths.is_initialized());
    }
}
