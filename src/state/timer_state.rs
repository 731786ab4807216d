//! Timer state structure and rendering

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::coerce_seconds;

/// Countdown phase derived from the remaining seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Running,
    Expired,
}

/// Attribute triple pushed by the host whenever it re-renders the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    pub remaining: u64,
    pub total: u64,
    pub threshold: u64,
}

impl AttributeSnapshot {
    pub fn new(remaining: u64, total: u64, threshold: u64) -> Self {
        Self { remaining, total, threshold }
    }

    /// Build a snapshot from raw host attributes, coercing anything malformed to 0
    pub fn from_value(raw: &Value) -> Self {
        Self {
            remaining: coerce_seconds("remaining", raw.get("remaining")),
            total: coerce_seconds("total", raw.get("total")),
            threshold: coerce_seconds("threshold", raw.get("threshold")),
        }
    }
}

/// Explicit authoritative correction pushed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncMessage {
    pub remaining: u64,
}

impl SyncMessage {
    pub fn from_value(raw: &Value) -> Self {
        Self {
            remaining: coerce_seconds("remaining", raw.get("remaining")),
        }
    }
}

/// Seconds left, full duration and warning threshold of one countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub warning_threshold_seconds: u64,
}

impl TimerState {
    /// Create a normalized timer state from a snapshot
    pub fn new(snapshot: AttributeSnapshot) -> Self {
        let mut state = Self {
            remaining_seconds: snapshot.remaining,
            total_seconds: snapshot.total,
            warning_threshold_seconds: snapshot.threshold,
        };
        state.normalize();
        state
    }

    /// Restore `remaining <= total`, `total > 0` and `threshold <= total`.
    ///
    /// The remaining value is authoritative, so the total is raised to meet it.
    pub fn normalize(&mut self) {
        self.total_seconds = self.total_seconds.max(self.remaining_seconds).max(1);
        self.warning_threshold_seconds = self.warning_threshold_seconds.min(self.total_seconds);
    }

    pub fn phase(&self) -> Phase {
        if self.remaining_seconds == 0 {
            Phase::Expired
        } else {
            Phase::Running
        }
    }

    pub fn is_warning(&self) -> bool {
        self.remaining_seconds <= self.warning_threshold_seconds
    }

    /// Fraction of the total duration still left, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.remaining_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }

    /// Render the state into its presentation. Pure: equal states render equal views.
    pub fn render(&self) -> TimerView {
        TimerView {
            display: format_clock(i64::try_from(self.remaining_seconds).unwrap_or(i64::MAX)),
            is_warning: self.is_warning(),
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            warning_threshold_seconds: self.warning_threshold_seconds,
            progress: self.progress(),
            phase: self.phase(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(AttributeSnapshot::default())
    }
}

/// What the widget shows: the clock text plus its warning styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub display: String,
    pub is_warning: bool,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub warning_threshold_seconds: u64,
    pub progress: f64,
    pub phase: Phase,
}

/// Format seconds as `m:ss`. Negative input renders as `0:00`.
pub fn format_clock(seconds: i64) -> String {
    if seconds < 0 {
        return "0:00".to_string();
    }
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
