//! Modal dialogs

pub mod confirm;
pub mod help;
pub mod input;
pub mod picker;

pub use confirm::{ConfirmAction, ConfirmState};
pub use input::{InputPurpose, InputState};
pub use picker::{PickerState, PickerTarget};
