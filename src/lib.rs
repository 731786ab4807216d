//! Pulse Widgets - server-side state for socket-driven UI widgets
//!
//! The core is [`CountdownSync`], a countdown that ticks locally at 1 Hz and
//! reconciles against authoritative server updates without visible jumps.
//! Coverflow stack placement and a duration picker ride along, and a small
//! HTTP host drives them for demos and tests.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;
pub mod widgets;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, AttributeSnapshot, SyncMessage, TimerState, TimerView};
pub use api::create_router;
pub use tasks::CountdownHandle;
pub use utils::signals::shutdown_signal;
pub use widgets::CountdownSync;
