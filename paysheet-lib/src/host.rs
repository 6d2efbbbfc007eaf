//! The rendering seam.
//!
//! [`PaymentSheet`](crate::PaymentSheet) owns all state and decides every
//! transition; a [`SheetHost`] only reflects those decisions on some surface
//! (the browser DOM, a terminal, a test recorder). Hosts never call back into
//! the sheet from these methods.

use crate::gesture::DragFrame;
use crate::methods::MethodDisplay;

/// A surface that presents the sheet.
pub trait SheetHost {
    /// Rendered height of the sheet panel in px, used for the percent
    /// threshold and backdrop fade.
    fn panel_height(&self) -> f64;

    /// Prevent the page behind the sheet from scrolling.
    fn lock_scroll(&mut self);

    /// Undo [`lock_scroll`](Self::lock_scroll).
    fn unlock_scroll(&mut self);

    /// Make the sheet visible and start the entry transition on the next paint.
    fn schedule_show(&mut self);

    /// Start the exit transition and hide the sheet.
    fn hide(&mut self);

    /// Enable or suppress the stylesheet transition (suppressed while the
    /// user drags the sheet directly).
    fn set_transitions_enabled(&mut self, enabled: bool);

    /// Apply a live drag frame as inline overrides.
    fn apply_drag_frame(&mut self, frame: DragFrame);

    /// Remove inline drag overrides so the resting style applies again.
    fn clear_drag_frame(&mut self);

    fn render_amount(&mut self, amount: &str);

    fn render_header(&mut self, title: &str);

    fn render_methods(&mut self, methods: &[MethodDisplay], selected: Option<usize>);

    /// Show either the password pad (with `filled` of `length` digits entered)
    /// or the confirm/cancel actions.
    fn render_password(&mut self, enabled: bool, length: usize, filled: usize);

    /// Arm or disarm the drag listeners and show or hide the drag handle.
    fn set_swipe_enabled(&mut self, enabled: bool);

    /// Rebind the backdrop click-to-close behaviour. Any previous binding is
    /// detached first, so repeated calls never stack handlers.
    fn set_overlay_dismiss(&mut self, enabled: bool);
}
