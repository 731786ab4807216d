//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::TimerView,
    widgets::{DurationView, NavigateEvent, SlidePlacement},
};

/// Response for widget lifecycle and update endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetResponse {
    pub id: u64,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub view: TimerView,
}

impl WidgetResponse {
    pub fn new(id: u64, status: &str, view: TimerView) -> Self {
        Self {
            id,
            status: status.to_string(),
            timestamp: Utc::now(),
            view,
        }
    }
}

/// Entry in the widget listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSummary {
    pub id: u64,
    pub view: TimerView,
}

/// Response for DELETE /widgets/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetachResponse {
    pub id: u64,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl DetachResponse {
    pub fn detached(id: u64) -> Self {
        Self {
            id,
            status: "detached".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// One slide's placement and the event a click on it sends
#[derive(Debug, Clone, Serialize)]
pub struct StackSlide {
    #[serde(flatten)]
    pub placement: SlidePlacement,
    pub on_click: Option<NavigateEvent>,
}

/// Coverflow placements for a whole carousel
#[derive(Debug, Clone, Serialize)]
pub struct StackLayoutResponse {
    pub carousel: String,
    pub active: i64,
    pub slides: Vec<StackSlide>,
}

/// Response for the duration picker endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationResponse {
    #[serde(flatten)]
    pub view: DurationView,
}

/// Server status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub widgets_attached: usize,
    pub max_widgets: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
