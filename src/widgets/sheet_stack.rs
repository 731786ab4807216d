//! Coverflow placement for a stack of sheets
//!
//! The server owns which slide is active; this only turns that index into
//! per-slide transforms, so there is no state to fight host patches.

use serde::{Deserialize, Serialize};

const ROTATE_DEG: f64 = 12.0;
const MAX_ROTATE_DEG: f64 = 20.0;
const SCALE_STEP: f64 = 0.06;
const MIN_SCALE: f64 = 0.8;
const OVERLAP_PX: f64 = 200.0;
const OPACITY_STEP: f64 = 0.35;
const MIN_OPACITY: f64 = 0.25;
const ACTIVE_Z: i64 = 100;

/// Where and how one slide is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlidePlacement {
    pub index: i64,
    pub active: bool,
    pub class: &'static str,
    /// CSS transform; empty for the active slide
    pub transform: String,
    pub opacity: f64,
    pub z_index: i64,
}

impl SlidePlacement {
    fn active(index: i64) -> Self {
        Self {
            index,
            active: true,
            class: "stack-active",
            transform: String::new(),
            opacity: 1.0,
            z_index: ACTIVE_Z,
        }
    }

    fn inactive(index: i64, distance: i64) -> Self {
        let dist = distance as f64;
        let abs = dist.abs();

        let scale = (1.0 - abs * SCALE_STEP).max(MIN_SCALE);
        let rotate = -(dist * ROTATE_DEG).clamp(-MAX_ROTATE_DEG, MAX_ROTATE_DEG);
        let translate = -dist * OVERLAP_PX;
        let opacity = (1.0 - abs * OPACITY_STEP).max(MIN_OPACITY);

        Self {
            index,
            active: false,
            class: "stack-inactive",
            transform: format!(
                "translateX({}px) perspective(800px) rotateY({}deg) scale({})",
                translate, rotate, scale
            ),
            opacity,
            z_index: ACTIVE_Z.saturating_sub((abs * 10.0).round() as i64),
        }
    }
}

/// Place every slide relative to the active one
pub fn layout<I>(active: i64, slides: I) -> Vec<SlidePlacement>
where
    I: IntoIterator<Item = i64>,
{
    slides
        .into_iter()
        .map(|index| match index.saturating_sub(active) {
            0 => SlidePlacement::active(index),
            distance => SlidePlacement::inactive(index, distance),
        })
        .collect()
}

/// Event sent to the host when an inactive slide is clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateEvent {
    pub index: i64,
    pub carousel: String,
}

impl NavigateEvent {
    pub const NAME: &'static str = "carousel_navigate";
}

/// Clicking the active slide does nothing
pub fn navigate(carousel: &str, active: i64, clicked: i64) -> Option<NavigateEvent> {
    (clicked != active).then(|| NavigateEvent {
        index: clicked,
        carousel: carousel.to_string(),
    })
}
