//! Household settings
//!
//! Partner display names and colors plus the currency symbol. Written once
//! by `fairshare init` and edited through `fairshare partners` or the
//! configuration tab.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::FairSharePaths;
use crate::error::FairShareError;
use crate::models::{Partner, PartnerNames};
use crate::storage::{read_json, write_json_atomic};

pub const SCHEMA_VERSION: u32 = 1;

/// Optional display colors for each partner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

impl PartnerColors {
    pub fn for_partner(&self, partner: Partner) -> Option<&str> {
        match partner {
            Partner::X => self.x.as_deref(),
            Partner::Y => self.y.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub partners: PartnerNames,

    #[serde(default)]
    pub partner_colors: PartnerColors,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            partners: PartnerNames::default(),
            partner_colors: PartnerColors::default(),
            currency_symbol: default_currency(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults when no file exists yet
    pub fn load_or_create(paths: &FairSharePaths) -> Result<Self, FairShareError> {
        read_json(paths.settings_file()).map_err(|e| match e {
            FairShareError::Storage(msg) => FairShareError::Config(msg),
            other => other,
        })
    }

    pub fn save(&self, paths: &FairSharePaths) -> Result<(), FairShareError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)?;
        debug!("saved settings");
        Ok(())
    }

    /// Rename both partners; both names are required
    pub fn rename_partners(&mut self, x: &str, y: &str) -> Result<(), FairShareError> {
        self.partners = validate_partner_names(x, y)?;
        Ok(())
    }
}

/// Trimmed partner names, rejecting blanks
pub fn validate_partner_names(x: &str, y: &str) -> Result<PartnerNames, FairShareError> {
    let (x, y) = (x.trim(), y.trim());
    if x.is_empty() || y.is_empty() {
        return Err(FairShareError::Validation(
            "Both partner names are required".into(),
        ));
    }
    Ok(PartnerNames::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, SCHEMA_VERSION);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.partners.x, "Partner X");
        assert!(!settings.setup_completed);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairSharePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.rename_partners(" Alex ", "Sam").unwrap();
        settings.partner_colors.x = Some("#3366ff".into());
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.partners.x, "Alex");
        assert_eq!(loaded.partners.y, "Sam");
        assert_eq!(loaded.partner_colors.for_partner(Partner::X), Some("#3366ff"));
        assert_eq!(loaded.partner_colors.for_partner(Partner::Y), None);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"setup_completed": true}"#).unwrap();
        assert!(settings.setup_completed);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.partners.y, "Partner Y");
    }

    #[test]
    fn test_blank_partner_name_rejected() {
        let mut settings = Settings::default();
        let err = settings.rename_partners("Alex", "   ").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(settings.partners.y, "Partner Y");
    }
}
