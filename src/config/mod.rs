//! Configuration for FairShare
//!
//! - Path resolution (`FAIRSHARE_DATA_DIR` or the platform config dir)
//! - Household settings (partner names, colors, currency)
//! - Grid preferences

pub mod paths;
pub mod preferences;
pub mod settings;

pub use paths::FairSharePaths;
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use settings::Settings;
