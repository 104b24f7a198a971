//! YAML export for human-readable backups

use std::io::Write;

use crate::error::{FairShareError, FairShareResult};

use super::json::FullExport;

pub fn export_full_yaml<W: Write>(export: &FullExport, writer: &mut W) -> FairShareResult<()> {
    let err = |e: std::io::Error| FairShareError::Export(e.to_string());
    writeln!(writer, "# FairShare household export").map_err(err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(err)?;
    writeln!(writer).map_err(err)?;

    serde_yaml::to_writer(writer, export).map_err(|e| FairShareError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::EXPORT_SCHEMA_VERSION;
    use crate::models::{Household, PartnerNames};

    #[test]
    fn test_yaml_has_header_and_parses() {
        let export = FullExport::from_household(&Household::default(), &PartnerNames::default());
        let mut out = Vec::new();
        export_full_yaml(&export, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# FairShare household export"));
        let parsed: FullExport = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert!(parsed.expenses.is_empty());
    }
}
