//! The payment sheet component and its presentation lifecycle.
//!
//! [`PaymentSheet`] is the one cohesive component: it owns the configuration,
//! the method registry, the password pad and the dismiss controller, and drives
//! a [`SheetHost`] to reflect every transition.
//!
//! ```
//! use paysheet_lib::test_utils::RecordingHost;
//! use paysheet_lib::PaymentSheet;
//!
//! let mut sheet = PaymentSheet::new(RecordingHost::new(400.0));
//! sheet.open(Some(12.5));
//! assert!(sheet.is_open());
//! assert_eq!(sheet.formatted_amount(), "12.50");
//! sheet.close();
//! assert!(!sheet.is_open());
//! ```
//!
//! # Re-entrancy
//!
//! Handlers run synchronously while the sheet is mutably borrowed. A handler
//! that needs to drive the sheet again must defer that work (the browser
//! binding queues its JS callbacks as microtasks for this reason).

use crate::config::{
    clamp_non_negative, clamp_password_length, clamp_percent, ConfigPatch, SheetConfig,
};
use crate::events::{EventBus, EventKind, Handler, PaymentConfirmation, SheetEvent};
use crate::gesture::{DismissController, DismissDecision, DragOrigin, DragOutcome, GestureState};
use crate::host::SheetHost;
use crate::methods::{FieldMapping, MethodRegistry, PaymentMethod};
use crate::password::{PadInput, PasswordPad};
use serde_json::Value;

/// Format an amount with exactly two decimals. Non-finite amounts show as `0.00`.
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() {
        format!("{:.2}", amount)
    } else {
        "0.00".to_string()
    }
}

/// A bottom-sheet payment selector.
pub struct PaymentSheet<H: SheetHost> {
    host: H,
    config: SheetConfig,
    registry: MethodRegistry,
    pad: PasswordPad,
    gesture: DismissController,
    events: EventBus,
    amount: f64,
    open: bool,
}

impl<H: SheetHost> PaymentSheet<H> {
    /// Create a closed sheet with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, &ConfigPatch::default())
    }

    /// Create a closed sheet configured from `patch`.
    pub fn with_config(host: H, patch: &ConfigPatch) -> Self {
        let config = SheetConfig::from_patch(patch);
        let mut sheet = Self {
            host,
            pad: PasswordPad::new(config.password_length),
            config,
            registry: MethodRegistry::new(),
            gesture: DismissController::new(),
            events: EventBus::new(),
            amount: 0.0,
            open: false,
        };
        sheet.render_all();
        sheet
            .host
            .set_swipe_enabled(sheet.config.allow_swipe_to_close);
        sheet
            .host
            .set_overlay_dismiss(sheet.config.close_on_overlay_click);
        sheet
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount)
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    /// Digits currently entered on the password pad.
    pub fn password_filled(&self) -> usize {
        self.pad.filled()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Show the sheet. No-op when already open.
    ///
    /// Restores the built-in methods unless a custom list was set since the
    /// last open.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn open(&mut self, amount: Option<f64>) {
        if self.open {
            return;
        }
        let kept_custom = self.registry.prepare_for_open();
        #[cfg(feature = "tracing")]
        tracing::debug!(kept_custom, methods = self.registry.len(), "opening sheet");
        #[cfg(not(feature = "tracing"))]
        let _ = kept_custom;

        self.open = true;
        self.host.lock_scroll();
        if let Some(amount) = amount {
            self.amount = amount;
        }
        self.pad.clear();
        self.render_all();
        self.host.schedule_show();
    }

    /// Hide the sheet and emit `payment-close`. No-op when already closed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.gesture.reset();
        self.host.unlock_scroll();
        self.host.set_transitions_enabled(true);
        self.host.clear_drag_frame();
        self.pad.clear();
        self.render_password();
        self.host.hide();

        #[cfg(feature = "tracing")]
        tracing::debug!("sheet closed");
        self.events.emit(&SheetEvent::Close);
    }

    /// Update the displayed amount, open or not.
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.host.render_amount(&format_amount(amount));
    }

    // ------------------------------------------------------------------
    // Methods
    // ------------------------------------------------------------------

    /// Replace the method list. `None` or empty restores the defaults.
    pub fn set_payment_methods(&mut self, methods: Option<Vec<PaymentMethod>>, mapping: Option<FieldMapping>) {
        self.registry.set_methods(methods, mapping);
        self.render_methods();
    }

    pub fn selected_method(&self) -> Option<&PaymentMethod> {
        self.registry.selected()
    }

    /// Select a row by index. Returns true if the selection changed.
    pub fn select_method(&mut self, index: usize) -> bool {
        let changed = self.registry.select(index);
        if changed {
            self.render_methods();
        }
        changed
    }

    /// Select the row whose identity equals `identity`.
    pub fn select_method_by_identity(&mut self, identity: &Value) -> bool {
        let changed = self.registry.select_by_identity(identity);
        if changed {
            self.render_methods();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Adopt `patch`; every option it omits reverts to its default.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn set_config(&mut self, patch: &ConfigPatch) {
        self.apply_config(SheetConfig::from_patch(patch));
    }

    /// Restore every option and the method list to defaults.
    pub fn reset_config(&mut self) {
        self.apply_config(SheetConfig::default());
        self.registry.restore_defaults();
        self.render_methods();
    }

    pub fn set_allow_swipe_to_close(&mut self, allow: bool) {
        self.update_config(|c| c.allow_swipe_to_close = allow);
    }

    pub fn set_close_on_overlay_click(&mut self, close: bool) {
        self.update_config(|c| c.close_on_overlay_click = close);
    }

    pub fn set_enable_password(&mut self, enable: bool) {
        self.update_config(|c| c.enable_password = enable);
    }

    /// Clamped to `[4, 12]`.
    pub fn set_password_length(&mut self, length: i64) {
        if let Some(length) = clamp_password_length(length as f64) {
            self.update_config(|c| c.password_length = length);
        }
    }

    pub fn set_header_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.update_config(|c| c.header_title = title);
    }

    /// Negative distances clamp to zero.
    pub fn set_close_threshold(&mut self, px: f64) {
        if let Some(px) = clamp_non_negative(px) {
            self.update_config(|c| c.close_threshold = px);
        }
    }

    /// Clamped to `[0, 1]`.
    pub fn set_close_threshold_percent(&mut self, percent: f64) {
        if let Some(percent) = clamp_percent(percent) {
            self.update_config(|c| c.close_threshold_percent = percent);
        }
    }

    /// Negative velocities clamp to zero.
    pub fn set_velocity_threshold(&mut self, px_per_ms: f64) {
        if let Some(v) = clamp_non_negative(px_per_ms) {
            self.update_config(|c| c.velocity_threshold = v);
        }
    }

    fn update_config(&mut self, change: impl FnOnce(&mut SheetConfig)) {
        let mut next = self.config.clone();
        change(&mut next);
        self.apply_config(next);
    }

    fn apply_config(&mut self, next: SheetConfig) {
        let diff = self.config.diff(&next);
        self.config = next;

        if diff.swipe {
            if !self.config.allow_swipe_to_close && self.gesture.is_dragging() {
                self.gesture.reset();
                self.host.set_transitions_enabled(true);
                self.host.clear_drag_frame();
            }
            self.host.set_swipe_enabled(self.config.allow_swipe_to_close);
        }
        if diff.overlay {
            self.host
                .set_overlay_dismiss(self.config.close_on_overlay_click);
        }
        if diff.password {
            self.pad.set_capacity(self.config.password_length);
            self.render_password();
        }
        if diff.header {
            self.host.render_header(&self.config.header_title);
        }

        #[cfg(feature = "tracing")]
        {
            if !diff.is_empty() {
                tracing::debug!(?diff, "configuration changed");
            }
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Subscribe `handler` to `kind`. Subscribing the same handler twice has no
    /// further effect.
    pub fn on(&mut self, kind: EventKind, handler: Handler) -> bool {
        self.events.on(kind, handler)
    }

    pub fn off(&mut self, kind: EventKind, handler: &Handler) -> bool {
        self.events.off(kind, handler)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.events.listener_count(kind)
    }

    // ------------------------------------------------------------------
    // User input
    // ------------------------------------------------------------------

    /// The confirm button. Ignored while closed or in password mode (where the
    /// pad is the only way to confirm).
    pub fn confirm(&mut self) {
        if !self.open || self.config.enable_password {
            return;
        }
        self.emit_confirmation(None);
    }

    /// The cancel button or close control.
    pub fn cancel(&mut self) {
        self.close();
    }

    /// A tap on the backdrop. Returns true if it closed the sheet.
    pub fn overlay_clicked(&mut self) -> bool {
        if !self.open || !self.config.close_on_overlay_click {
            return false;
        }
        self.close();
        true
    }

    /// A keypad digit. Completing the password confirms and closes the sheet.
    pub fn press_digit(&mut self, digit: char) -> PadInput {
        if !self.open || !self.config.enable_password {
            return PadInput::Ignored;
        }
        let input = self.pad.press_digit(digit);
        match &input {
            PadInput::Ignored => {}
            PadInput::Updated { .. } => self.render_password(),
            PadInput::Complete(password) => {
                self.render_password();
                self.emit_confirmation(Some(password.clone()));
            }
        }
        input
    }

    /// The keypad delete key.
    pub fn press_delete(&mut self) -> PadInput {
        if !self.open || !self.config.enable_password {
            return PadInput::Ignored;
        }
        let input = self.pad.press_delete();
        if input != PadInput::Ignored {
            self.render_password();
        }
        input
    }

    /// A press at `y` (px) at `time` (ms). Returns true if the drag was captured;
    /// uncaptured presses should be left to the platform's default handling.
    pub fn pointer_down(&mut self, origin: DragOrigin, y: f64, time: f64) -> bool {
        if !self.open || !self.config.allow_swipe_to_close {
            return false;
        }
        let captured = self.gesture.begin(origin, y, time);
        if captured {
            self.host.set_transitions_enabled(false);
        }
        captured
    }

    /// A move sample. Returns true if it was consumed by an active drag.
    pub fn pointer_move(&mut self, y: f64, time: f64) -> bool {
        let height = self.host.panel_height();
        match self.gesture.update(y, time, height) {
            Some(frame) => {
                self.host.apply_drag_frame(frame);
                true
            }
            None => false,
        }
    }

    /// Release of the tracked contact. Returns the decision, or `None` when no
    /// drag was active.
    pub fn pointer_up(&mut self) -> Option<DismissDecision> {
        let height = self.host.panel_height();
        let decision = self.gesture.release(&self.config.thresholds(), height)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            delta = decision.delta,
            threshold = decision.threshold,
            velocity = decision.velocity,
            final_direction = decision.final_direction,
            outcome = ?decision.outcome,
            "drag released"
        );

        match decision.outcome {
            DragOutcome::Dismiss => self.close(),
            DragOutcome::SnapBack => {
                self.host.set_transitions_enabled(true);
                self.host.clear_drag_frame();
            }
        }
        Some(decision)
    }

    /// Tracking was interrupted; resolved like a release with the last known sample.
    pub fn pointer_cancel(&mut self) -> Option<DismissDecision> {
        self.pointer_up()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit_confirmation(&mut self, password: Option<String>) {
        let confirmation = PaymentConfirmation {
            method: self.registry.selected_identity().unwrap_or(Value::Null),
            method_data: self
                .registry
                .selected()
                .map(|m| m.as_value().clone())
                .unwrap_or(Value::Null),
            amount: self.formatted_amount(),
            password,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            method = %confirmation.method,
            amount = %confirmation.amount,
            with_password = confirmation.password.is_some(),
            "payment confirmed"
        );

        self.events.emit(&SheetEvent::Confirm(confirmation));
        self.close();
    }

    fn render_all(&mut self) {
        self.host.render_header(&self.config.header_title);
        self.host.render_amount(&format_amount(self.amount));
        self.render_methods();
        self.render_password();
    }

    fn render_methods(&mut self) {
        let displays = self.registry.displays();
        self.host
            .render_methods(&displays, self.registry.selected_index());
    }

    fn render_password(&mut self) {
        self.host.render_password(
            self.config.enable_password,
            self.config.password_length,
            self.pad.filled(),
        );
    }
}

impl<H: SheetHost + std::fmt::Debug> std::fmt::Debug for PaymentSheet<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSheet")
            .field("open", &self.open)
            .field("amount", &self.amount)
            .field("config", &self.config)
            .field("selected", &self.registry.selected_index())
            .field("gesture", &self.gesture.state())
            .field("host", &self.host)
            .finish()
    }
}
