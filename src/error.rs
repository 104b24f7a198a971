//! Custom error types for FairShare
//!
//! The computation layer (normalization, splitting, grouping) never fails.
//! Everything that talks to a collaborator or validates user input reports
//! through [`FairShareError`].

use thiserror::Error;

/// The main error type for FairShare operations
#[derive(Error, Debug)]
pub enum FairShareError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Input rejected before any collaborator round-trip
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persistence call failed; local state is left as the user saw it
    #[error("Could not save: {0}")]
    Persistence(String),

    /// Attempt to delete a reference entity that expenses still point at
    #[error("{kind} '{name}' is used by {usage} expense(s); choose a replacement or unassign them first")]
    ReferentialConflict {
        kind: &'static str,
        name: String,
        usage: usize,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl FairShareError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for incomes
    pub fn income_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Income",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a referential conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReferentialConflict { .. })
    }
}

impl From<std::io::Error> for FairShareError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FairShareError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for FairShare operations
pub type FairShareResult<T> = Result<T, FairShareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FairShareError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FairShareError::expense_not_found("Rent");
        assert_eq!(err.to_string(), "Expense not found: Rent");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_referential_conflict_message() {
        let err = FairShareError::ReferentialConflict {
            kind: "Category",
            name: "Groceries".into(),
            usage: 3,
        };
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "Category 'Groceries' is used by 3 expense(s); choose a replacement or unassign them first"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FairShareError = io_err.into();
        assert!(matches!(err, FairShareError::Io(_)));
    }
}
