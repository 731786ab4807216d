//! Registry of attached widgets and server metadata

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::AttributeSnapshot;
use crate::tasks::CountdownHandle;

/// One attached countdown: the handle hosts talk to and the task behind it
#[derive(Debug)]
struct AttachedWidget {
    handle: CountdownHandle,
    task: JoinHandle<()>,
}

/// Shared application state for the widget host
#[derive(Debug)]
pub struct AppState {
    /// Attached countdown widgets by id
    widgets: Mutex<BTreeMap<u64, AttachedWidget>>,
    next_id: AtomicU64,
    pub max_widgets: usize,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, max_widgets: usize) -> Self {
        Self {
            widgets: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            max_widgets,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Attach a new countdown and start its ticker.
    ///
    /// Returns `Ok(None)` when the registry is full.
    pub fn attach(&self, snapshot: AttributeSnapshot) -> Result<Option<(u64, CountdownHandle)>, String> {
        let mut widgets = self.widgets.lock()
            .map_err(|e| format!("Failed to lock widget registry: {}", e))?;

        if widgets.len() >= self.max_widgets {
            warn!("Widget registry full ({} attached), refusing attach", widgets.len());
            return Ok(None);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (handle, task) = CountdownHandle::spawn(snapshot);
        widgets.insert(id, AttachedWidget { handle: handle.clone(), task });
        drop(widgets);

        info!("Attached countdown widget {}", id);
        self.record_action(&format!("attach {}", id));
        Ok(Some((id, handle)))
    }

    /// Handle for an attached widget, if any
    pub fn widget(&self, id: u64) -> Result<Option<CountdownHandle>, String> {
        self.widgets.lock()
            .map(|widgets| widgets.get(&id).map(|w| w.handle.clone()))
            .map_err(|e| format!("Failed to lock widget registry: {}", e))
    }

    /// Handles of every attached widget, ordered by id
    pub fn widgets(&self) -> Result<Vec<(u64, CountdownHandle)>, String> {
        self.widgets.lock()
            .map(|widgets| widgets.iter().map(|(id, w)| (*id, w.handle.clone())).collect())
            .map_err(|e| format!("Failed to lock widget registry: {}", e))
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.lock().map(|w| w.len()).unwrap_or(0)
    }

    /// Tear down and forget a widget. Returns false if it was not attached.
    pub async fn detach(&self, id: u64) -> Result<bool, String> {
        let removed = self.widgets.lock()
            .map_err(|e| format!("Failed to lock widget registry: {}", e))?
            .remove(&id);

        let Some(widget) = removed else {
            return Ok(false);
        };

        widget.handle.teardown().await;
        if let Err(e) = widget.task.await {
            warn!("Countdown task {} ended abnormally: {}", id, e);
        }

        info!("Detached countdown widget {}", id);
        self.record_action(&format!("detach {}", id));
        Ok(true)
    }

    /// Tear down every attached widget, used on shutdown
    pub async fn detach_all(&self) {
        let ids: Vec<u64> = match self.widgets.lock() {
            Ok(widgets) => widgets.keys().copied().collect(),
            Err(e) => {
                warn!("Failed to lock widget registry: {}", e);
                return;
            }
        };

        for id in ids {
            if let Err(e) = self.detach(id).await {
                warn!("Failed to detach widget {}: {}", id, e);
            }
        }
    }

    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
