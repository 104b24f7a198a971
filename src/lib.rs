//! FairShare - shared household expense tracker
//!
//! Two partners record their recurring expenses and incomes; every expense
//! is normalized to a monthly figure and split between them in proportion
//! to their incomes, weighted by how much each partner benefits from it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Core data models (expenses, incomes, reference entities, money)
//! - `split`: Income ratio and per-expense fair share
//! - `view`: Filtering, sorting, grouping and totals of the expense list
//! - `grid`: Spreadsheet interaction state machine and column definitions
//! - `config`: Paths, settings and view preferences
//! - `storage`: JSON file storage layer
//! - `services`: Validation and record management over storage
//! - `persistence`: Write requests and the background write queue
//! - `cli`, `display`, `export`, `tui`: Command line, tables, exports and
//!   the interactive interface
//!
//! # Example
//!
//! ```rust,ignore
//! use fairshare::config::{paths::FairSharePaths, settings::Settings};
//!
//! let paths = FairSharePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod grid;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod services;
pub mod split;
pub mod storage;
pub mod tui;
pub mod view;

pub use error::{FairShareError, FairShareResult};
