//! Test utilities for Paysheet.
//!
//! [`RecordingHost`] is a [`SheetHost`] that keeps the last rendered state and
//! a log of every call, so tests can drive a [`PaymentSheet`](crate::PaymentSheet)
//! without a real surface.
//!
//! ```rust
//! use paysheet_lib::test_utils::{HostCall, RecordingHost};
//! use paysheet_lib::PaymentSheet;
//!
//! let mut sheet = PaymentSheet::new(RecordingHost::new(400.0));
//! sheet.open(None);
//! assert!(sheet.host().calls().contains(&HostCall::LockScroll));
//! ```

mod events;

pub use events::EventLog;

use crate::gesture::DragFrame;
use crate::host::SheetHost;
use crate::methods::MethodDisplay;

/// One call made on a [`RecordingHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    LockScroll,
    UnlockScroll,
    ScheduleShow,
    Hide,
    SetTransitions(bool),
    ApplyDragFrame(DragFrame),
    ClearDragFrame,
    RenderAmount(String),
    RenderHeader(String),
    RenderMethods(usize, Option<usize>),
    RenderPassword(bool, usize, usize),
    SetSwipeEnabled(bool),
    SetOverlayDismiss(bool),
}

/// In-memory host that records what the sheet asked it to do.
#[derive(Clone, Debug)]
pub struct RecordingHost {
    panel_height: f64,
    calls: Vec<HostCall>,
    scroll_locked: bool,
    visible: bool,
    transitions: bool,
    drag_frame: Option<DragFrame>,
    amount: String,
    header: String,
    methods: Vec<MethodDisplay>,
    selected: Option<usize>,
    password: (bool, usize, usize),
    swipe_enabled: bool,
    overlay_bindings: usize,
}

impl RecordingHost {
    /// A host whose panel is `panel_height` px tall.
    pub fn new(panel_height: f64) -> Self {
        Self {
            panel_height,
            calls: Vec::new(),
            scroll_locked: false,
            visible: false,
            transitions: true,
            drag_frame: None,
            amount: String::new(),
            header: String::new(),
            methods: Vec::new(),
            selected: None,
            password: (false, 0, 0),
            swipe_enabled: false,
            overlay_bindings: 0,
        }
    }

    pub fn set_panel_height(&mut self, height: f64) {
        self.panel_height = height;
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Return and forget the recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions
    }

    pub fn drag_frame(&self) -> Option<DragFrame> {
        self.drag_frame
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn methods(&self) -> &[MethodDisplay] {
        &self.methods
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// `(enabled, length, filled)` as last rendered.
    pub fn password_view(&self) -> (bool, usize, usize) {
        self.password
    }

    pub fn swipe_enabled(&self) -> bool {
        self.swipe_enabled
    }

    /// Number of live backdrop click bindings (0 or 1 when rebinding works).
    pub fn overlay_bindings(&self) -> usize {
        self.overlay_bindings
    }
}

impl SheetHost for RecordingHost {
    fn panel_height(&self) -> f64 {
        self.panel_height
    }

    fn lock_scroll(&mut self) {
        self.scroll_locked = true;
        self.calls.push(HostCall::LockScroll);
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
        self.calls.push(HostCall::UnlockScroll);
    }

    fn schedule_show(&mut self) {
        self.visible = true;
        self.calls.push(HostCall::ScheduleShow);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.calls.push(HostCall::Hide);
    }

    fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions = enabled;
        self.calls.push(HostCall::SetTransitions(enabled));
    }

    fn apply_drag_frame(&mut self, frame: DragFrame) {
        self.drag_frame = Some(frame);
        self.calls.push(HostCall::ApplyDragFrame(frame));
    }

    fn clear_drag_frame(&mut self) {
        self.drag_frame = None;
        self.calls.push(HostCall::ClearDragFrame);
    }

    fn render_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
        self.calls.push(HostCall::RenderAmount(amount.to_string()));
    }

    fn render_header(&mut self, title: &str) {
        self.header = title.to_string();
        self.calls.push(HostCall::RenderHeader(title.to_string()));
    }

    fn render_methods(&mut self, methods: &[MethodDisplay], selected: Option<usize>) {
        self.methods = methods.to_vec();
        self.selected = selected;
        self.calls
            .push(HostCall::RenderMethods(methods.len(), selected));
    }

    fn render_password(&mut self, enabled: bool, length: usize, filled: usize) {
        self.password = (enabled, length, filled);
        self.calls
            .push(HostCall::RenderPassword(enabled, length, filled));
    }

    fn set_swipe_enabled(&mut self, enabled: bool) {
        self.swipe_enabled = enabled;
        self.calls.push(HostCall::SetSwipeEnabled(enabled));
    }

    fn set_overlay_dismiss(&mut self, enabled: bool) {
        // detach-then-attach: at most one binding survives
        self.overlay_bindings = usize::from(enabled);
        self.calls.push(HostCall::SetOverlayDismiss(enabled));
    }
}
