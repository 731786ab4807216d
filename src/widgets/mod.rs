//! Widget state machines
//!
//! Each widget is a plain state object; schedulers and the HTTP host drive
//! them from the outside.

pub mod countdown;
pub mod duration_picker;
pub mod sheet_stack;

// Re-export main types
pub use countdown::{CountdownSync, DRIFT_TOLERANCE_SECONDS};
pub use duration_picker::{DurationPicker, DurationView, Step};
pub use sheet_stack::{layout, navigate, NavigateEvent, SlidePlacement};
