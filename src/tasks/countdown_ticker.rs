//! Per-widget countdown scheduler task

use std::time::Duration;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    state::{AttributeSnapshot, SyncMessage, TimerView},
    widgets::CountdownSync,
};

/// Local tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;

/// Host input for a running countdown task
#[derive(Debug)]
pub enum CountdownCommand {
    Initialize(AttributeSnapshot, oneshot::Sender<TimerView>),
    Attributes(AttributeSnapshot, oneshot::Sender<TimerView>),
    Sync(SyncMessage, oneshot::Sender<TimerView>),
    Teardown,
}

/// Background task owning one widget and its 1 Hz timer.
///
/// Ticks and host commands are serialized through one `select!`, so they
/// never touch the widget concurrently. The task ends on teardown or once
/// every command sender is gone, which releases the timer with it.
pub async fn countdown_ticker_task(mut widget: CountdownSync, mut commands: mpsc::Receiver<CountdownCommand>) {
    debug!("Starting countdown ticker task");

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick(), if widget.is_ticking() => {
                widget.tick();
            }

            command = commands.recv() => {
                let was_ticking = widget.is_ticking();
                match command {
                    Some(CountdownCommand::Initialize(snapshot, reply)) => {
                        let _ = reply.send(widget.initialize(snapshot));
                    }
                    Some(CountdownCommand::Attributes(snapshot, reply)) => {
                        let _ = reply.send(widget.on_attribute_change(snapshot));
                    }
                    Some(CountdownCommand::Sync(message, reply)) => {
                        let _ = reply.send(widget.on_sync_message(message));
                    }
                    Some(CountdownCommand::Teardown) | None => {
                        widget.teardown();
                        break;
                    }
                }

                // Count a full period from the moment ticking resumes
                if !was_ticking && widget.is_ticking() {
                    interval.reset();
                }
            }
        }
    }

    info!("Countdown ticker task stopped");
}

/// Cloneable handle to a spawned countdown
#[derive(Debug, Clone)]
pub struct CountdownHandle {
    commands: mpsc::Sender<CountdownCommand>,
    views: watch::Receiver<TimerView>,
}

impl CountdownHandle {
    /// Attach a widget and spawn its ticker on the current runtime
    pub fn spawn(snapshot: AttributeSnapshot) -> (Self, JoinHandle<()>) {
        let widget = CountdownSync::attach(snapshot);
        let views = widget.subscribe();
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(countdown_ticker_task(widget, rx));
        (Self { commands, views }, task)
    }

    pub async fn initialize(&self, snapshot: AttributeSnapshot) -> Result<TimerView, String> {
        self.request(|reply| CountdownCommand::Initialize(snapshot, reply)).await
    }

    pub async fn apply_attributes(&self, snapshot: AttributeSnapshot) -> Result<TimerView, String> {
        self.request(|reply| CountdownCommand::Attributes(snapshot, reply)).await
    }

    pub async fn sync(&self, message: SyncMessage) -> Result<TimerView, String> {
        self.request(|reply| CountdownCommand::Sync(message, reply)).await
    }

    /// Latest published view
    pub fn view(&self) -> TimerView {
        self.views.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerView> {
        self.views.clone()
    }

    /// Stop the ticker. A task that already stopped makes this a no-op.
    pub async fn teardown(&self) {
        if self.commands.send(CountdownCommand::Teardown).await.is_err() {
            debug!("Countdown already torn down");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn request<F>(&self, command: F) -> Result<TimerView, String>
    where
        F: FnOnce(oneshot::Sender<TimerView>) -> CountdownCommand,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| "Countdown task is no longer running".to_string())?;
        reply_rx
            .await
            .map_err(|e| format!("Countdown task dropped the reply: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_until_expired() {
        let (handle, _task) = CountdownHandle::spawn(AttributeSnapshot::new(3, 10, 1));

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.view().remaining_seconds, 2);

        sleep(Duration::from_secs(2)).await;
        let view = handle.view();
        assert_eq!(view.remaining_seconds, 0);
        assert_eq!(view.phase, Phase::Expired);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.view().remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn attribute_drift_within_tolerance_keeps_local_clock() {
        let (handle, _task) = CountdownHandle::spawn(AttributeSnapshot::new(50, 100, 10));

        let view = handle.apply_attributes(AttributeSnapshot::new(52, 100, 10)).await.unwrap();
        assert_eq!(view.remaining_seconds, 50);

        let view = handle.apply_attributes(AttributeSnapshot::new(40, 100, 10)).await.unwrap();
        assert_eq!(view.remaining_seconds, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn sync_always_wins() {
        let (handle, _task) = CountdownHandle::spawn(AttributeSnapshot::new(50, 100, 10));
        let view = handle.sync(SyncMessage { remaining: 49 }).await.unwrap();
        assert_eq!(view.remaining_seconds, 49);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_twice_leaves_no_running_timer() {
        let (handle, task) = CountdownHandle::spawn(AttributeSnapshot::new(30, 60, 5));
        let mut views = handle.subscribe();

        handle.teardown().await;
        handle.teardown().await;
        task.await.unwrap();
        assert!(handle.is_closed());

        views.borrow_and_update();
        sleep(Duration::from_secs(10)).await;
        assert!(!views.has_changed().unwrap_or(false));
        assert_eq!(handle.view().remaining_seconds, 30);
        assert!(handle.sync(SyncMessage { remaining: 10 }).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reinitialize_after_expiry_resumes_ticking() {
        let (handle, _task) = CountdownHandle::spawn(AttributeSnapshot::new(1, 10, 0));
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.view().phase, Phase::Expired);

        let view = handle.initialize(AttributeSnapshot::new(10, 10, 3)).await.unwrap();
        assert_eq!(view.phase, Phase::Running);

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(handle.view().remaining_seconds, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_every_handle_stops_the_task() {
        let (handle, task) = CountdownHandle::spawn(AttributeSnapshot::new(30, 60, 5));
        drop(handle);
        task.await.unwrap();
    }
}
