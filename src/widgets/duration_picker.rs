//! Bounded minute stepper for picking a session length

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::value_as_int;

pub const MIN_MINUTES: i64 = 30;
pub const MAX_MINUTES: i64 = 480;
pub const STEP_MINUTES: i64 = 5;
pub const DEFAULT_MINUTES: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPicker {
    minutes: i64,
}

impl DurationPicker {
    /// Missing, unparseable or zero input falls back to the default. Other
    /// values are taken as-is; only stepping clamps to the bounds.
    pub fn new(raw: Option<&Value>) -> Self {
        let minutes = match raw.and_then(value_as_int) {
            Some(0) | None => DEFAULT_MINUTES,
            Some(minutes) => minutes,
        };
        Self { minutes }
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn step(&mut self, step: Step) {
        self.minutes = match step {
            Step::Increment => self.minutes.saturating_add(STEP_MINUTES).min(MAX_MINUTES),
            Step::Decrement => self.minutes.saturating_sub(STEP_MINUTES).max(MIN_MINUTES),
        };
    }

    /// Human readable length, e.g. `1 hr 35 min`
    pub fn formatted(&self) -> String {
        let hours = self.minutes / 60;
        let mins = self.minutes % 60;
        match (hours, mins) {
            (0, mins) => format!("{} min", mins),
            (hours, 0) => format!("{} hr", hours),
            (hours, mins) => format!("{} hr {} min", hours, mins),
        }
    }

    pub fn view(&self) -> DurationView {
        DurationView {
            minutes: self.minutes,
            formatted: self.formatted(),
        }
    }
}

impl Default for DurationPicker {
    fn default() -> Self {
        Self { minutes: DEFAULT_MINUTES }
    }
}

/// Display state written back to the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationView {
    pub minutes: i64,
    pub formatted: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_missing_or_zero() {
        assert_eq!(DurationPicker::new(None).minutes(), 120);
        assert_eq!(DurationPicker::new(Some(&json!("0"))).minutes(), 120);
        assert_eq!(DurationPicker::new(Some(&json!("lots"))).minutes(), 120);
        assert_eq!(DurationPicker::new(Some(&json!(10))).minutes(), 10);
    }

    #[test]
    fn steps_clamp_to_bounds() {
        let mut picker = DurationPicker::new(Some(&json!(478)));
        picker.step(Step::Increment);
        assert_eq!(picker.minutes(), MAX_MINUTES);

        let mut picker = DurationPicker::new(Some(&json!(32)));
        picker.step(Step::Decrement);
        assert_eq!(picker.minutes(), MIN_MINUTES);

        let mut picker = DurationPicker::default();
        picker.step(Step::Increment);
        assert_eq!(picker.minutes(), 125);
    }

    #[test]
    fn extreme_initial_values_step_into_bounds() {
        let mut picker = DurationPicker::new(Some(&json!("99999999999999999999")));
        picker.step(Step::Increment);
        assert_eq!(picker.minutes(), MAX_MINUTES);

        let mut picker = DurationPicker::new(Some(&json!("99999999999999999999")));
        picker.step(Step::Decrement);
        assert_eq!(picker.minutes(), i64::MAX - STEP_MINUTES);

        let mut picker = DurationPicker::new(Some(&json!(i64::MIN)));
        picker.step(Step::Decrement);
        assert_eq!(picker.minutes(), MIN_MINUTES);

        let mut picker = DurationPicker::new(Some(&json!("-99999999999999999999")));
        picker.step(Step::Increment);
        assert_eq!(picker.minutes(), -i64::MAX + STEP_MINUTES);
    }

    #[test]
    fn formats_hours_and_minutes() {
        let format = |m: i64| DurationPicker::new(Some(&json!(m))).formatted();
        assert_eq!(format(45), "45 min");
        assert_eq!(format(120), "2 hr");
        assert_eq!(format(95), "1 hr 35 min");
    }
}
