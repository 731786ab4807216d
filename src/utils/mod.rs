//! Utility functions module
//!
//! Input coercion for widget attributes and process signal handling.

pub mod attributes;
pub mod signals;

// Re-export main functions
pub use attributes::{coerce_seconds, parse_leading_int, value_as_int};
pub use signals::shutdown_signal;
