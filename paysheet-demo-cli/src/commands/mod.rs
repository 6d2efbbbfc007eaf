//! CLI command implementations
//!
//! Each command has a pure entry point that drives a [`PaymentSheet`] and
//! returns what happened, plus a `run` function that prints it. Tests call the
//! pure entry points directly.

pub mod checkout;
pub mod config;
pub mod drag;
pub mod pin;

use anyhow::{Context, Result};
use clap::Args;
use paysheet_lib::events::{EventKind, SheetEvent};
use paysheet_lib::{ConfigPatch, FieldMapping, PaymentMethod, PaymentSheet};
use serde::Deserialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::terminal::TerminalHost;

/// Panel height used when none is given.
pub const DEFAULT_PANEL_HEIGHT: f64 = 400.0;

/// Options shared by every command that builds a sheet.
#[derive(Args, Debug, Clone, Default)]
pub struct SheetOptions {
    /// JSON file with a partial sheet configuration (camelCase keys)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// JSON file with payment methods: an array, or {"methods": [...], "mapping": {...}}
    #[arg(long, value_name = "FILE", global = true)]
    pub methods: Option<PathBuf>,

    /// Height of the simulated panel in px
    #[arg(long, global = true)]
    pub panel_height: Option<f64>,

    /// Absolute close distance in px
    #[arg(long, global = true)]
    pub close_threshold: Option<f64>,

    /// Close distance as a fraction of the panel height
    #[arg(long, global = true)]
    pub close_threshold_percent: Option<f64>,

    /// Flick velocity in px/ms
    #[arg(long, global = true)]
    pub velocity_threshold: Option<f64>,

    /// Disable drag-to-dismiss
    #[arg(long, global = true)]
    pub no_swipe: bool,

    /// Keep the sheet open when the backdrop is tapped
    #[arg(long, global = true)]
    pub no_overlay_close: bool,

    /// Confirm through the numeric password pad
    #[arg(long, global = true)]
    pub enable_password: bool,

    /// Digits collected before auto-submit (clamped to 4..=12)
    #[arg(long, global = true)]
    pub password_length: Option<i64>,

    /// Header label
    #[arg(long, global = true)]
    pub header_title: Option<String>,
}

/// Shape of a `--methods` file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MethodsFile {
    List(Vec<PaymentMethod>),
    WithMapping {
        methods: Vec<PaymentMethod>,
        #[serde(default)]
        mapping: Option<FieldMapping>,
    },
}

impl SheetOptions {
    /// The config file (if any) with command-line flags layered on top.
    pub fn patch(&self) -> Result<ConfigPatch> {
        let mut patch = match &self.config {
            Some(path) => read_json::<ConfigPatch>(path)?,
            None => ConfigPatch::new(),
        };
        if self.no_swipe {
            patch.allow_swipe_to_close = Some(false);
        }
        if self.no_overlay_close {
            patch.close_on_overlay_click = Some(false);
        }
        if self.enable_password {
            patch.enable_password = Some(true);
        }
        if let Some(length) = self.password_length {
            patch.password_length = Some(length as f64);
        }
        if let Some(title) = &self.header_title {
            patch.header_title = Some(title.clone());
        }
        if let Some(px) = self.close_threshold {
            patch.close_threshold = Some(px);
        }
        if let Some(percent) = self.close_threshold_percent {
            patch.close_threshold_percent = Some(percent);
        }
        if let Some(velocity) = self.velocity_threshold {
            patch.velocity_threshold = Some(velocity);
        }
        Ok(patch)
    }

    /// Methods from `--methods`, or `None` for the built-in list.
    pub fn payment_methods(&self) -> Result<Option<(Vec<PaymentMethod>, Option<FieldMapping>)>> {
        let Some(path) = &self.methods else {
            return Ok(None);
        };
        Ok(Some(match read_json::<MethodsFile>(path)? {
            MethodsFile::List(methods) => (methods, None),
            MethodsFile::WithMapping { methods, mapping } => (methods, mapping),
        }))
    }

    pub fn panel_height(&self) -> f64 {
        self.panel_height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(DEFAULT_PANEL_HEIGHT)
    }

    /// A closed sheet with this configuration and method list installed.
    pub fn build_sheet(&self) -> Result<PaymentSheet<TerminalHost>> {
        let patch = self.patch()?;
        let mut sheet = PaymentSheet::with_config(TerminalHost::new(self.panel_height()), &patch);
        if let Some((methods, mapping)) = self.payment_methods()? {
            sheet.set_payment_methods(Some(methods), mapping);
        }
        tracing::debug!(config = ?sheet.config(), "sheet built");
        Ok(sheet)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Records events emitted by a sheet.
pub type Captured = Rc<RefCell<Vec<SheetEvent>>>;

/// Subscribe to both events and collect them.
pub fn capture_events(sheet: &mut PaymentSheet<TerminalHost>) -> Captured {
    let captured: Captured = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&captured);
    let handler: paysheet_lib::Handler = Rc::new(move |event: &SheetEvent| {
        tracing::info!(event = %event.kind(), "sheet event");
        sink.borrow_mut().push(event.clone());
    });
    sheet.on(EventKind::PaymentConfirm, Rc::clone(&handler));
    sheet.on(EventKind::PaymentClose, handler);
    captured
}

/// Print captured events one per line.
pub fn print_events(events: &[SheetEvent]) {
    if events.is_empty() {
        crate::ui::info("No events emitted");
        return;
    }
    for event in events {
        match event {
            SheetEvent::Confirm(confirmation) => {
                let method = match &confirmation.method {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let mut line = format!("{} method={} amount={}", event.kind(), method, confirmation.amount);
                if let Some(password) = &confirmation.password {
                    line.push_str(&format!(" password={}", "*".repeat(password.len())));
                }
                crate::ui::success(&line);
            }
            SheetEvent::Close => crate::ui::info(event.kind().as_str()),
        }
    }
}
