//! Persistence collaborator
//!
//! The grids talk to storage only through [`Persistence`]. In the TUI the
//! backend sits behind a [`WriteQueue`] so edits apply locally at once and
//! failures arrive later as notices.

pub mod local;
pub mod queue;
pub mod request;

pub use local::StoragePersistence;
pub use queue::{Ticket, WriteOutcome, WriteQueue};
pub use request::{ReferenceId, WriteReceipt, WriteRequest};

use crate::error::FairShareResult;

/// Executes one write request
pub trait Persistence {
    fn execute(&mut self, request: WriteRequest) -> FairShareResult<WriteReceipt>;
}
