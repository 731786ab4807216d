//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    state::{AppState, AttributeSnapshot, SyncMessage, TimerView},
    tasks::CountdownHandle,
    utils::parse_leading_int,
    widgets::{layout, navigate, DurationPicker, Step},
};
use super::responses::{
    DetachResponse, DurationResponse, HealthResponse, StackLayoutResponse, StackSlide,
    StatusResponse, WidgetResponse, WidgetSummary,
};

/// Upper bound on slides placed per layout request
const MAX_SLIDES: usize = 200;

fn lookup(state: &AppState, id: u64) -> Result<CountdownHandle, StatusCode> {
    match state.widget(id) {
        Ok(Some(handle)) => Ok(handle),
        Ok(None) => {
            warn!("Unknown widget {}", id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to look up widget {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn respond(id: u64, status: &str, result: Result<TimerView, String>) -> Result<Json<WidgetResponse>, StatusCode> {
    match result {
        Ok(view) => Ok(Json(WidgetResponse::new(id, status, view))),
        Err(e) => {
            error!("Widget {} failed to apply {}: {}", id, status, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /widgets - Attach a countdown from an attribute snapshot
pub async fn attach_handler(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> Result<(StatusCode, Json<WidgetResponse>), StatusCode> {
    let snapshot = AttributeSnapshot::from_value(&raw);

    match state.attach(snapshot) {
        Ok(Some((id, handle))) => {
            info!("Widget {} attached with {:?}", id, snapshot);
            Ok((StatusCode::CREATED, Json(WidgetResponse::new(id, "attached", handle.view()))))
        }
        Ok(None) => Err(StatusCode::SERVICE_UNAVAILABLE),
        Err(e) => {
            error!("Failed to attach widget: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /widgets - List attached widgets
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WidgetSummary>>, StatusCode> {
    match state.widgets() {
        Ok(widgets) => Ok(Json(
            widgets
                .into_iter()
                .map(|(id, handle)| WidgetSummary { id, view: handle.view() })
                .collect(),
        )),
        Err(e) => {
            error!("Failed to list widgets: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /widgets/:id - Current rendered view
pub async fn view_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WidgetResponse>, StatusCode> {
    let handle = lookup(&state, id)?;
    Ok(Json(WidgetResponse::new(id, "ok", handle.view())))
}

/// Handle PUT /widgets/:id/attributes - Host re-rendered the widget
pub async fn attributes_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(raw): Json<Value>,
) -> Result<Json<WidgetResponse>, StatusCode> {
    let handle = lookup(&state, id)?;
    let snapshot = AttributeSnapshot::from_value(&raw);
    state.record_action(&format!("attributes {}", id));
    respond(id, "attributes", handle.apply_attributes(snapshot).await)
}

/// Handle POST /widgets/:id/sync - Authoritative correction
pub async fn sync_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(raw): Json<Value>,
) -> Result<Json<WidgetResponse>, StatusCode> {
    let handle = lookup(&state, id)?;
    let message = SyncMessage::from_value(&raw);
    state.record_action(&format!("sync {}", id));
    respond(id, "sync", handle.sync(message).await)
}

/// Handle POST /widgets/:id/initialize - Reset the countdown
pub async fn initialize_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(raw): Json<Value>,
) -> Result<Json<WidgetResponse>, StatusCode> {
    let handle = lookup(&state, id)?;
    let snapshot = AttributeSnapshot::from_value(&raw);
    state.record_action(&format!("initialize {}", id));
    respond(id, "initialize", handle.initialize(snapshot).await)
}

/// Handle DELETE /widgets/:id - Tear down and detach
pub async fn detach_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<DetachResponse>, StatusCode> {
    match state.detach(id).await {
        Ok(true) => Ok(Json(DetachResponse::detached(id))),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to detach widget {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StackQuery {
    pub active: Option<String>,
    pub count: Option<usize>,
    pub carousel: Option<String>,
}

/// Handle GET /stack/layout - Coverflow placements for a carousel
pub async fn stack_layout_handler(Query(query): Query<StackQuery>) -> Json<StackLayoutResponse> {
    let active = query.active.as_deref().and_then(parse_leading_int).unwrap_or(0);
    let count = query.count.unwrap_or(0).min(MAX_SLIDES) as i64;
    let carousel = query.carousel.unwrap_or_else(|| "carousel".to_string());

    let slides = layout(active, 0..count)
        .into_iter()
        .map(|placement| StackSlide {
            on_click: navigate(&carousel, active, placement.index),
            placement,
        })
        .collect();

    Json(StackLayoutResponse { carousel, active, slides })
}

#[derive(Debug, Deserialize)]
pub struct DurationQuery {
    pub minutes: Option<String>,
    pub step: Option<Step>,
}

/// Handle GET /duration - Apply one picker step to a duration
pub async fn duration_handler(Query(query): Query<DurationQuery>) -> Json<DurationResponse> {
    let raw = query.minutes.map(Value::String);
    let mut picker = DurationPicker::new(raw.as_ref());
    if let Some(step) = query.step {
        picker.step(step);
    }
    Json(DurationResponse { view: picker.view() })
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        widgets_attached: state.widget_count(),
        max_widgets: state.max_widgets,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
