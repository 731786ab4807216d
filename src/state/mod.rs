//! State management module
//!
//! Timer state for a single countdown plus the registry of attached widgets.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{format_clock, AttributeSnapshot, Phase, SyncMessage, TimerState, TimerView};
