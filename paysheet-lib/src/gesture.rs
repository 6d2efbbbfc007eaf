//! Drag-to-dismiss gesture recognition.
//!
//! The [`DismissController`] follows one contact from press to release. It is
//! `Idle` until a press lands on a draggable part of the sheet, `Dragging` while
//! the contact moves, and resolves on release into a [`DismissDecision`]: close
//! the sheet, or snap back to rest.
//!
//! A release closes the sheet when either
//! - the downward travel exceeds the effective threshold
//!   (`max(close_threshold, panel_height * close_threshold_percent)`), or
//! - the last measured speed exceeds `velocity_threshold`, the final sample was
//!   still moving down, and the sheet ended below its resting position.
//!
//! Positions are in pixels growing downward, times in milliseconds.
//!
//! ```
//! use paysheet_lib::gesture::{DismissController, DismissThresholds, DragOrigin, DragOutcome};
//!
//! let mut controller = DismissController::new();
//! assert!(controller.begin(DragOrigin::Handle, 0.0, 0.0));
//! controller.update(20.0, 22.0, 400.0);
//! let decision = controller.release(&DismissThresholds::default(), 400.0).unwrap();
//! assert_eq!(decision.outcome, DragOutcome::Dismiss);
//! ```

use crate::config::{DEFAULT_CLOSE_THRESHOLD, DEFAULT_CLOSE_THRESHOLD_PERCENT, DEFAULT_VELOCITY_THRESHOLD};

/// Where a press landed on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragOrigin {
    /// The grab bar at the top of the sheet.
    Handle,
    /// The header strip.
    Header,
    /// Any other part of the sheet surface.
    Surface,
    /// The scrollable method list.
    Content,
    /// The confirm/cancel button row.
    Actions,
    /// The numeric keypad.
    Keypad,
    /// The explicit close control.
    CloseButton,
}

impl DragOrigin {
    /// Whether a press here starts a drag. Presses elsewhere are left to
    /// scroll and click normally.
    pub fn captures_drag(self) -> bool {
        matches!(self, Self::Handle | Self::Header | Self::Surface)
    }
}

/// Distance and velocity limits for dismissal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissThresholds {
    /// Absolute distance in px.
    pub close_threshold: f64,
    /// Fraction of the panel height.
    pub close_threshold_percent: f64,
    /// Speed in px/ms.
    pub velocity_threshold: f64,
}

impl DismissThresholds {
    /// The larger of the absolute and the height-relative distance.
    pub fn effective_distance(&self, panel_height: f64) -> f64 {
        self.close_threshold
            .max(panel_height.max(0.0) * self.close_threshold_percent)
    }
}

impl Default for DismissThresholds {
    fn default() -> Self {
        Self {
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
            close_threshold_percent: DEFAULT_CLOSE_THRESHOLD_PERCENT,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
        }
    }
}

/// One press-move-release interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactTrack {
    pub start_y: f64,
    pub start_time: f64,
    /// Most recent tracked sample.
    pub last_y: f64,
    pub last_time: f64,
    /// The sample before `last_*`.
    pub previous_y: f64,
    pub previous_time: f64,
    /// Speed between the two most recent samples, px/ms.
    pub velocity: f64,
}

impl ContactTrack {
    fn begin(y: f64, time: f64) -> Self {
        Self {
            start_y: y,
            start_time: time,
            last_y: y,
            last_time: time,
            previous_y: y,
            previous_time: time,
            velocity: 0.0,
        }
    }

    fn sample(&mut self, y: f64, time: f64) {
        self.velocity = (y - self.last_y).abs() / elapsed(self.last_time, time);
        self.previous_y = self.last_y;
        self.previous_time = self.last_time;
        self.last_y = y;
        self.last_time = time;
    }

    /// Signed travel since the press; positive is downward.
    pub fn delta(&self) -> f64 {
        self.last_y - self.start_y
    }

    /// Signed speed of the final movement, measured over the time since the
    /// previous sample. Only its sign is used by the close rule.
    pub fn final_direction_velocity(&self) -> f64 {
        (self.last_y - self.previous_y) / elapsed(self.previous_time, self.last_time)
    }
}

/// Milliseconds between two timestamps, never below one.
fn elapsed(from: f64, to: f64) -> f64 {
    (to - from).max(1.0)
}

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
}

/// Live presentation while dragging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragFrame {
    /// Downward translation of the sheet in px; never negative.
    pub offset: f64,
    /// Backdrop opacity in `[0, 1]`.
    pub backdrop_opacity: f64,
}

impl DragFrame {
    /// Frame for a signed travel `delta` on a panel `panel_height` tall.
    pub fn at(delta: f64, panel_height: f64) -> Self {
        let offset = delta.max(0.0);
        let backdrop_opacity = if panel_height > 0.0 {
            (1.0 - offset / panel_height).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            offset,
            backdrop_opacity,
        }
    }
}

/// How a released drag resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// Close the sheet; the drag itself was the exit motion.
    Dismiss,
    /// Return to the open resting position.
    SnapBack,
}

/// The inputs and result of a release evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissDecision {
    pub delta: f64,
    pub threshold: f64,
    pub velocity: f64,
    pub final_direction: f64,
    pub outcome: DragOutcome,
}

impl DismissDecision {
    /// Apply the distance-or-velocity rule to a finished track.
    pub fn evaluate(track: &ContactTrack, thresholds: &DismissThresholds, panel_height: f64) -> Self {
        let delta = track.delta();
        let threshold = thresholds.effective_distance(panel_height);
        let velocity = track.velocity;
        let final_direction = track.final_direction_velocity();

        let far_enough = delta > threshold;
        let flicked_down =
            velocity > thresholds.velocity_threshold && final_direction > 0.0 && delta > 0.0;

        Self {
            delta,
            threshold,
            velocity,
            final_direction,
            outcome: if far_enough || flicked_down {
                DragOutcome::Dismiss
            } else {
                DragOutcome::SnapBack
            },
        }
    }
}

/// Tracks at most one contact and decides its outcome.
#[derive(Clone, Debug, Default)]
pub struct DismissController {
    track: Option<ContactTrack>,
}

impl DismissController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        if self.track.is_some() {
            GestureState::Dragging
        } else {
            GestureState::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.track.is_some()
    }

    /// The active track, if dragging.
    pub fn track(&self) -> Option<&ContactTrack> {
        self.track.as_ref()
    }

    /// Start tracking a press at `y`.
    ///
    /// Returns false (and stays idle) when the origin does not capture drags
    /// or a contact is already being tracked.
    pub fn begin(&mut self, origin: DragOrigin, y: f64, time: f64) -> bool {
        if !origin.captures_drag() || self.track.is_some() || !y.is_finite() {
            return false;
        }
        self.track = Some(ContactTrack::begin(y, time));
        true
    }

    /// Feed a move sample. Returns the frame to present, or `None` when idle.
    pub fn update(&mut self, y: f64, time: f64, panel_height: f64) -> Option<DragFrame> {
        let track = self.track.as_mut()?;
        if !y.is_finite() {
            return None;
        }
        track.sample(y, time);
        Some(DragFrame::at(track.delta(), panel_height))
    }

    /// Finish the drag using the last tracked sample. Returns `None` when idle.
    pub fn release(&mut self, thresholds: &DismissThresholds, panel_height: f64) -> Option<DismissDecision> {
        let track = self.track.take()?;
        Some(DismissDecision::evaluate(&track, thresholds, panel_height))
    }

    /// Drop the active track without a decision.
    pub fn reset(&mut self) {
        self.track = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f64 = 400.0;

    /// Drag from 0 to `to` in steps of `step` px every `interval` ms.
    fn slow_drag(to: f64, step: f64, interval: f64) -> DismissController {
        let mut controller = DismissController::new();
        controller.begin(DragOrigin::Header, 0.0, 0.0);
        let mut y = 0.0;
        let mut t = 0.0;
        while y < to {
            y = (y + step).min(to);
            t += interval;
            controller.update(y, t, HEIGHT);
        }
        controller
    }

    #[test]
    fn test_origin_capture() {
        assert!(DragOrigin::Handle.captures_drag());
        assert!(DragOrigin::Surface.captures_drag());
        assert!(!DragOrigin::Content.captures_drag());
        assert!(!DragOrigin::Keypad.captures_drag());
        assert!(!DragOrigin::Actions.captures_drag());
        assert!(!DragOrigin::CloseButton.captures_drag());
    }

    #[test]
    fn test_effective_distance() {
        let thresholds = DismissThresholds::default();
        assert_eq!(thresholds.effective_distance(400.0), 120.0);
        assert_eq!(thresholds.effective_distance(200.0), 100.0);
        assert_eq!(thresholds.effective_distance(-50.0), 100.0);
    }

    #[test]
    fn test_slow_drag_past_threshold_dismisses() {
        let mut controller = slow_drag(130.0, 13.0, 100.0);
        let decision = controller
            .release(&DismissThresholds::default(), HEIGHT)
            .unwrap();
        assert_eq!(decision.delta, 130.0);
        assert_eq!(decision.threshold, 120.0);
        assert!(decision.velocity < 0.5);
        assert_eq!(decision.outcome, DragOutcome::Dismiss);
        assert_eq!(controller.state(), GestureState::Idle);
    }

    #[test]
    fn test_slow_drag_short_of_threshold_snaps_back() {
        let mut controller = slow_drag(110.0, 11.0, 100.0);
        let decision = controller
            .release(&DismissThresholds::default(), HEIGHT)
            .unwrap();
        assert_eq!(decision.outcome, DragOutcome::SnapBack);
    }

    #[test]
    fn test_fast_flick_dismisses() {
        let mut controller = DismissController::new();
        controller.begin(DragOrigin::Handle, 0.0, 0.0);
        controller.update(20.0, 22.0, HEIGHT);
        let decision = controller
            .release(&DismissThresholds::default(), HEIGHT)
            .unwrap();
        assert!((decision.velocity - 20.0 / 22.0).abs() < 1e-9);
        assert!(decision.velocity > 0.9);
        assert_eq!(decision.outcome, DragOutcome::Dismiss);
    }

    #[test]
    fn test_flick_reversed_at_release_snaps_back() {
        let mut controller = DismissController::new();
        controller.begin(DragOrigin::Handle, 0.0, 0.0);
        controller.update(25.0, 22.0, HEIGHT);
        controller.update(20.0, 27.0, HEIGHT);
        let decision = controller
            .release(&DismissThresholds::default(), HEIGHT)
            .unwrap();
        assert_eq!(decision.delta, 20.0);
        assert!(decision.velocity > 0.5);
        assert!(decision.final_direction < 0.0);
        assert_eq!(decision.outcome, DragOutcome::SnapBack);
    }

    #[test]
    fn test_upward_drag_never_dismisses() {
        let mut controller = DismissController::new();
        controller.begin(DragOrigin::Handle, 300.0, 0.0);
        let frame = controller.update(100.0, 10.0, HEIGHT).unwrap();
        assert_eq!(frame.offset, 0.0);
        assert_eq!(frame.backdrop_opacity, 1.0);
        let decision = controller
            .release(&DismissThresholds::default(), HEIGHT)
            .unwrap();
        assert_eq!(decision.outcome, DragOutcome::SnapBack);
    }

    #[test]
    fn test_frame_fades_backdrop() {
        assert_eq!(DragFrame::at(100.0, 400.0).backdrop_opacity, 0.75);
        assert_eq!(DragFrame::at(800.0, 400.0).backdrop_opacity, 0.0);
        assert_eq!(DragFrame::at(50.0, 0.0).backdrop_opacity, 1.0);
    }

    #[test]
    fn test_ineligible_origin_stays_idle() {
        let mut controller = DismissController::new();
        assert!(!controller.begin(DragOrigin::Content, 0.0, 0.0));
        assert!(controller.update(300.0, 10.0, HEIGHT).is_none());
        assert!(controller.release(&DismissThresholds::default(), HEIGHT).is_none());
        assert_eq!(controller.state(), GestureState::Idle);
    }

    #[test]
    fn test_single_active_track() {
        let mut controller = DismissController::new();
        assert!(controller.begin(DragOrigin::Handle, 10.0, 0.0));
        assert!(!controller.begin(DragOrigin::Handle, 50.0, 5.0));
        assert_eq!(controller.track().unwrap().start_y, 10.0);
    }

    #[test]
    fn test_zero_elapsed_time_is_bounded() {
        let mut controller = DismissController::new();
        controller.begin(DragOrigin::Handle, 0.0, 5.0);
        controller.update(3.0, 5.0, HEIGHT);
        assert_eq!(controller.track().unwrap().velocity, 3.0);
    }

    #[test]
    fn test_release_without_movement_snaps_back() {
        let mut controller = DismissController::new();
        controller.begin(DragOrigin::Handle, 0.0, 0.0);
        let decision = controller
            .release(&DismissThresholds::default(), HEIGHT)
            .unwrap();
        assert_eq!(decision.outcome, DragOutcome::SnapBack);
        assert_eq!(decision.final_direction, 0.0);
    }
}
