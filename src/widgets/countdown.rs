//! Countdown widget that ticks locally and self-corrects against server truth

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::{AttributeSnapshot, Phase, SyncMessage, TimerState, TimerView};

/// Largest drift between local and attribute-pushed remaining seconds that is
/// ignored instead of adopted.
pub const DRIFT_TOLERANCE_SECONDS: u64 = 2;

/// Plain countdown state object.
///
/// Driven from the outside: a scheduler calls [`tick`](Self::tick) once per
/// second while [`is_ticking`](Self::is_ticking) holds, and the host forwards
/// attribute snapshots and sync messages. Every render is published on a
/// watch channel that stands in for the widget's own presentation.
#[derive(Debug)]
pub struct CountdownSync {
    state: TimerState,
    /// Whether the local scheduler should be running
    ticking: bool,
    /// False once torn down, until the next initialize
    attached: bool,
    view_tx: watch::Sender<TimerView>,
}

impl CountdownSync {
    /// Create an initialized widget with its scheduler started
    pub fn attach(snapshot: AttributeSnapshot) -> Self {
        let state = TimerState::new(snapshot);
        let (view_tx, _) = watch::channel(state.render());
        let mut widget = Self {
            state,
            ticking: false,
            attached: false,
            view_tx,
        };
        widget.initialize(snapshot);
        widget
    }

    /// Reset the whole state and (re)start ticking if time is left
    pub fn initialize(&mut self, snapshot: AttributeSnapshot) -> TimerView {
        self.state = TimerState::new(snapshot);
        self.attached = true;
        self.ticking = self.state.remaining_seconds > 0;
        info!(
            "Countdown initialized: remaining={}s total={}s threshold={}s",
            self.state.remaining_seconds, self.state.total_seconds, self.state.warning_threshold_seconds
        );
        self.publish()
    }

    /// One local second elapsed. Returns the new view, or `None` when the
    /// scheduler is stopped and nothing changed.
    pub fn tick(&mut self) -> Option<TimerView> {
        if !self.ticking {
            return None;
        }
        debug_assert!(self.state.remaining_seconds > 0, "ticking with no time left");

        self.state.remaining_seconds -= 1;
        debug!("Countdown tick: {}s remaining", self.state.remaining_seconds);
        if self.state.remaining_seconds == 0 {
            info!("Countdown expired");
            self.ticking = false;
        }
        Some(self.publish())
    }

    /// Host re-rendered the widget with fresh attributes.
    ///
    /// Total and threshold are always taken; remaining only when it drifted
    /// more than [`DRIFT_TOLERANCE_SECONDS`] from the local value.
    pub fn on_attribute_change(&mut self, snapshot: AttributeSnapshot) -> TimerView {
        let drift = self.state.remaining_seconds.abs_diff(snapshot.remaining);
        if drift > DRIFT_TOLERANCE_SECONDS {
            debug!(
                "Adopting remaining={}s (drift {}s from local {}s)",
                snapshot.remaining, drift, self.state.remaining_seconds
            );
            self.state.remaining_seconds = snapshot.remaining;
        } else {
            debug!("Ignoring {}s drift from attribute change", drift);
        }
        self.state.total_seconds = snapshot.total;
        self.state.warning_threshold_seconds = snapshot.threshold;
        self.state.normalize();

        self.reconcile_scheduler();
        self.publish()
    }

    /// Server pushed an explicit correction; always adopted
    pub fn on_sync_message(&mut self, message: SyncMessage) -> TimerView {
        debug!(
            "Sync message: remaining {}s -> {}s",
            self.state.remaining_seconds, message.remaining
        );
        self.state.remaining_seconds = message.remaining;
        self.state.normalize();

        self.reconcile_scheduler();
        self.publish()
    }

    /// Render the current state without publishing it
    pub fn render(&self) -> TimerView {
        self.state.render()
    }

    /// Stop the local scheduler and detach. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if self.attached {
            info!("Countdown torn down with {}s remaining", self.state.remaining_seconds);
        }
        self.ticking = false;
        self.attached = false;
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Subscribe to every view the widget publishes
    pub fn subscribe(&self) -> watch::Receiver<TimerView> {
        self.view_tx.subscribe()
    }

    /// Match the scheduler to the remaining time after a host update
    fn reconcile_scheduler(&mut self) {
        if self.state.remaining_seconds == 0 {
            if self.ticking {
                info!("Countdown expired by host update");
            }
            self.ticking = false;
        } else if self.attached && !self.ticking {
            info!("Countdown restarted with {}s remaining", self.state.remaining_seconds);
            self.ticking = true;
        }
    }

    fn publish(&self) -> TimerView {
        let view = self.render();
        self.view_tx.send_replace(view.clone());
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(remaining: u64, total: u64, threshold: u64) -> CountdownSync {
        CountdownSync::attach(AttributeSnapshot::new(remaining, total, threshold))
    }

    #[test]
    fn initialize_sets_warning_state() {
        assert!(!widget(60, 120, 30).render().is_warning);
        assert!(widget(30, 120, 30).render().is_warning);
        assert!(widget(0, 120, 30).render().is_warning);
    }

    #[test]
    fn ticks_down_to_expired_and_stays_there() {
        let mut countdown = widget(3, 10, 1);
        assert_eq!(countdown.phase(), Phase::Running);

        let seen: Vec<u64> = (0..3)
            .filter_map(|_| countdown.tick())
            .map(|view| view.remaining_seconds)
            .collect();
        assert_eq!(seen, vec![2, 1, 0]);
        assert_eq!(countdown.phase(), Phase::Expired);
        assert!(!countdown.is_ticking());

        assert!(countdown.tick().is_none());
        assert_eq!(countdown.state().remaining_seconds, 0);
    }

    #[test]
    fn starts_expired_when_attached_at_zero() {
        let mut countdown = widget(0, 10, 1);
        assert_eq!(countdown.phase(), Phase::Expired);
        assert!(!countdown.is_ticking());
        assert!(countdown.tick().is_none());
    }

    #[test]
    fn small_attribute_drift_is_ignored() {
        let mut countdown = widget(50, 100, 10);
        let view = countdown.on_attribute_change(AttributeSnapshot::new(52, 100, 10));
        assert_eq!(view.remaining_seconds, 50);

        let view = countdown.on_attribute_change(AttributeSnapshot::new(48, 100, 10));
        assert_eq!(view.remaining_seconds, 50);
    }

    #[test]
    fn large_attribute_drift_is_adopted() {
        let mut countdown = widget(50, 100, 10);
        let view = countdown.on_attribute_change(AttributeSnapshot::new(40, 100, 10));
        assert_eq!(view.remaining_seconds, 40);
    }

    #[test]
    fn attribute_change_always_takes_total_and_threshold() {
        let mut countdown = widget(50, 100, 10);
        let view = countdown.on_attribute_change(AttributeSnapshot::new(51, 200, 60));
        assert_eq!(view.remaining_seconds, 50);
        assert_eq!(view.total_seconds, 200);
        assert_eq!(view.warning_threshold_seconds, 60);
        assert!(view.is_warning);
    }

    #[test]
    fn sync_message_bypasses_tolerance() {
        let mut countdown = widget(50, 100, 10);
        assert_eq!(countdown.on_sync_message(SyncMessage { remaining: 40 }).remaining_seconds, 40);
        assert_eq!(countdown.on_sync_message(SyncMessage { remaining: 41 }).remaining_seconds, 41);
    }

    #[test]
    fn positive_update_after_expiry_restarts_ticking() {
        let mut countdown = widget(1, 10, 0);
        countdown.tick();
        assert_eq!(countdown.phase(), Phase::Expired);

        countdown.on_sync_message(SyncMessage { remaining: 5 });
        assert!(countdown.is_ticking());
        assert_eq!(countdown.tick().map(|v| v.remaining_seconds), Some(4));
    }

    #[test]
    fn every_zero_path_stops_the_scheduler() {
        let mut countdown = widget(20, 30, 5);
        countdown.on_attribute_change(AttributeSnapshot::new(0, 30, 5));
        assert!(!countdown.is_ticking());

        countdown.initialize(AttributeSnapshot::new(0, 30, 5));
        assert!(!countdown.is_ticking());
        assert!(countdown.tick().is_none());
    }

    #[test]
    fn update_to_zero_expires_immediately() {
        let mut countdown = widget(20, 30, 5);
        let view = countdown.on_sync_message(SyncMessage { remaining: 0 });
        assert_eq!(view.phase, Phase::Expired);
        assert!(!countdown.is_ticking());
    }

    #[test]
    fn reinitialize_after_expiry_runs_again() {
        let mut countdown = widget(1, 10, 0);
        countdown.tick();
        assert!(!countdown.is_ticking());

        let view = countdown.initialize(AttributeSnapshot::new(10, 10, 3));
        assert_eq!(view.phase, Phase::Running);
        assert!(countdown.is_ticking());
        assert_eq!(countdown.tick().map(|v| v.display), Some("0:09".to_string()));
    }

    #[test]
    fn teardown_is_idempotent_and_stops_ticks() {
        let mut countdown = widget(30, 60, 5);
        let mut views = countdown.subscribe();
        views.borrow_and_update();

        countdown.teardown();
        countdown.teardown();
        assert!(!countdown.is_ticking());
        assert!(!countdown.is_attached());
        assert!(countdown.tick().is_none());
        assert!(!views.has_changed().unwrap_or(false));

        // A detached widget does not restart on late host messages
        countdown.on_sync_message(SyncMessage { remaining: 20 });
        assert!(!countdown.is_ticking());
    }

    #[test]
    fn teardown_without_scheduler_is_safe() {
        let mut countdown = widget(0, 10, 0);
        countdown.teardown();
        assert!(!countdown.is_ticking());
    }

    #[test]
    fn every_render_is_published() {
        let mut countdown = widget(10, 10, 2);
        let mut views = countdown.subscribe();
        views.borrow_and_update();

        countdown.tick();
        assert!(views.has_changed().unwrap_or(false));
        assert_eq!(views.borrow_and_update().display, "0:09");

        countdown.on_attribute_change(AttributeSnapshot::new(9, 10, 9));
        assert!(views.borrow_and_update().is_warning);
    }
}
