//! Background tasks module
//!
//! Each attached countdown widget runs its own ticker task alongside the
//! HTTP server.

pub mod countdown_ticker;

// Re-export main types
pub use countdown_ticker::{countdown_ticker_task, CountdownCommand, CountdownHandle, TICK_PERIOD};
