//! Sheet configuration store.
//!
//! [`SheetConfig`] holds the effective value of every tunable. It is only ever
//! rebuilt from a [`ConfigPatch`]: options the patch leaves out revert to their
//! defaults, so nothing from an earlier configuration call bleeds through.
//!
//! # Example
//!
//! ```
//! use paysheet_lib::config::{ConfigPatch, SheetConfig};
//!
//! let config = SheetConfig::from_patch(&ConfigPatch::new().with_password_length(2));
//! assert_eq!(config.password_length, 4);
//! assert!(config.allow_swipe_to_close);
//! ```

use crate::gesture::DismissThresholds;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default absolute drag distance (px) that closes the sheet.
pub const DEFAULT_CLOSE_THRESHOLD: f64 = 100.0;
/// Default fraction of the panel height that closes the sheet.
pub const DEFAULT_CLOSE_THRESHOLD_PERCENT: f64 = 0.3;
/// Default flick velocity (px/ms) that closes the sheet.
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.5;
/// Default number of digits in the password pad.
pub const DEFAULT_PASSWORD_LENGTH: usize = 6;
/// Shortest allowed password.
pub const MIN_PASSWORD_LENGTH: usize = 4;
/// Longest allowed password.
pub const MAX_PASSWORD_LENGTH: usize = 12;
/// Default header label.
pub const DEFAULT_HEADER_TITLE: &str = "选择支付方式";

/// Effective sheet configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    /// Whether dragging the sheet down may dismiss it.
    pub allow_swipe_to_close: bool,
    /// Whether tapping the backdrop closes the sheet.
    pub close_on_overlay_click: bool,
    /// Whether confirmation goes through the numeric password pad.
    pub enable_password: bool,
    /// Number of digits collected before auto-submit, in `[4, 12]`.
    pub password_length: usize,
    /// Header label.
    pub header_title: String,
    /// Absolute close distance in pixels.
    pub close_threshold: f64,
    /// Close distance as a fraction of the panel height, in `[0, 1]`.
    pub close_threshold_percent: f64,
    /// Flick velocity in px/ms above which a downward release closes the sheet.
    pub velocity_threshold: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            allow_swipe_to_close: true,
            close_on_overlay_click: true,
            enable_password: false,
            password_length: DEFAULT_PASSWORD_LENGTH,
            header_title: DEFAULT_HEADER_TITLE.to_string(),
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
            close_threshold_percent: DEFAULT_CLOSE_THRESHOLD_PERCENT,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
        }
    }
}

impl SheetConfig {
    /// Build a configuration from a patch.
    ///
    /// Supplied options are clamped into range; omitted ones take their default.
    pub fn from_patch(patch: &ConfigPatch) -> Self {
        let defaults = Self::default();
        Self {
            allow_swipe_to_close: patch
                .allow_swipe_to_close
                .unwrap_or(defaults.allow_swipe_to_close),
            close_on_overlay_click: patch
                .close_on_overlay_click
                .unwrap_or(defaults.close_on_overlay_click),
            enable_password: patch.enable_password.unwrap_or(defaults.enable_password),
            password_length: patch
                .password_length
                .and_then(clamp_password_length)
                .unwrap_or(defaults.password_length),
            header_title: patch
                .header_title
                .clone()
                .unwrap_or(defaults.header_title),
            close_threshold: patch
                .close_threshold
                .and_then(clamp_non_negative)
                .unwrap_or(defaults.close_threshold),
            close_threshold_percent: patch
                .close_threshold_percent
                .and_then(clamp_percent)
                .unwrap_or(defaults.close_threshold_percent),
            velocity_threshold: patch
                .velocity_threshold
                .and_then(clamp_non_negative)
                .unwrap_or(defaults.velocity_threshold),
        }
    }

    /// The subset of options consulted by the dismiss controller.
    pub fn thresholds(&self) -> DismissThresholds {
        DismissThresholds {
            close_threshold: self.close_threshold,
            close_threshold_percent: self.close_threshold_percent,
            velocity_threshold: self.velocity_threshold,
        }
    }

    /// Which observable concerns differ between `self` and `next`.
    pub fn diff(&self, next: &SheetConfig) -> ConfigDiff {
        ConfigDiff {
            swipe: self.allow_swipe_to_close != next.allow_swipe_to_close,
            overlay: self.close_on_overlay_click != next.close_on_overlay_click,
            password: self.enable_password != next.enable_password
                || self.password_length != next.password_length,
            header: self.header_title != next.header_title,
        }
    }
}

/// Concerns touched by a configuration change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    /// `allow_swipe_to_close` changed.
    pub swipe: bool,
    /// `close_on_overlay_click` changed.
    pub overlay: bool,
    /// Password mode or length changed.
    pub password: bool,
    /// Header label changed.
    pub header: bool,
}

impl ConfigDiff {
    /// True when nothing observable changed.
    pub fn is_empty(&self) -> bool {
        !(self.swipe || self.overlay || self.password || self.header)
    }
}

/// A partial configuration as supplied by the caller.
///
/// Deserializes from camelCase objects (`{"closeThreshold": 50}`), which is the
/// shape JS callers and JSON config files use.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub allow_swipe_to_close: Option<bool>,
    pub close_on_overlay_click: Option<bool>,
    pub enable_password: Option<bool>,
    pub password_length: Option<f64>,
    pub header_title: Option<String>,
    pub close_threshold: Option<f64>,
    pub close_threshold_percent: Option<f64>,
    pub velocity_threshold: Option<f64>,
}

impl ConfigPatch {
    /// Create an empty patch (every option at its default).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_swipe_to_close(mut self, allow: bool) -> Self {
        self.allow_swipe_to_close = Some(allow);
        self
    }

    pub fn with_close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = Some(close);
        self
    }

    pub fn with_enable_password(mut self, enable: bool) -> Self {
        self.enable_password = Some(enable);
        self
    }

    pub fn with_password_length(mut self, length: i64) -> Self {
        self.password_length = Some(length as f64);
        self
    }

    pub fn with_header_title(mut self, title: impl Into<String>) -> Self {
        self.header_title = Some(title.into());
        self
    }

    pub fn with_close_threshold(mut self, px: f64) -> Self {
        self.close_threshold = Some(px);
        self
    }

    pub fn with_close_threshold_percent(mut self, percent: f64) -> Self {
        self.close_threshold_percent = Some(percent);
        self
    }

    pub fn with_velocity_threshold(mut self, px_per_ms: f64) -> Self {
        self.velocity_threshold = Some(px_per_ms);
        self
    }

    /// Parse element attributes into a patch.
    ///
    /// Names are matched case-insensitively, with or without a `data-` prefix.
    /// A bare boolean attribute (empty value) means `true`. Values that do not
    /// parse are skipped, leaving that option at its default.
    ///
    /// ```
    /// use paysheet_lib::config::ConfigPatch;
    ///
    /// let patch = ConfigPatch::from_attributes([
    ///     ("data-enable-password", ""),
    ///     ("password-length", "4"),
    ///     ("close-threshold", "wide"),
    /// ]);
    /// assert_eq!(patch.enable_password, Some(true));
    /// assert_eq!(patch.password_length, Some(4.0));
    /// assert_eq!(patch.close_threshold, None);
    /// ```
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut patch = Self::new();
        for (name, value) in attributes {
            let name = name.as_ref().trim().to_ascii_lowercase();
            let name = name.strip_prefix("data-").unwrap_or(&name);
            let value = value.as_ref().trim();
            match name {
                "allow-swipe-to-close" => patch.allow_swipe_to_close = parse_flag(value),
                "close-on-overlay-click" => patch.close_on_overlay_click = parse_flag(value),
                "enable-password" => patch.enable_password = parse_flag(value),
                "password-length" => patch.password_length = parse_number(value),
                "header-title" => patch.header_title = Some(value.to_string()),
                "close-threshold" => patch.close_threshold = parse_number(value),
                "close-threshold-percent" => patch.close_threshold_percent = parse_number(value),
                "velocity-threshold" => patch.velocity_threshold = parse_number(value),
                _ => {}
            }
        }
        patch
    }

    /// Build a patch from a JSON object one option at a time.
    ///
    /// An option whose value has the wrong type is left out (so it reverts to
    /// its default) and its name is returned in the second element. The other
    /// options are kept. Anything other than an object yields an empty patch.
    ///
    /// ```
    /// use paysheet_lib::config::ConfigPatch;
    /// use serde_json::json;
    ///
    /// let (patch, rejected) =
    ///     ConfigPatch::from_value_lenient(&json!({"passwordLength": "4", "enablePassword": true}));
    /// assert_eq!(patch.enable_password, Some(true));
    /// assert_eq!(patch.password_length, None);
    /// assert_eq!(rejected, vec!["passwordLength".to_string()]);
    /// ```
    pub fn from_value_lenient(value: &Value) -> (Self, Vec<String>) {
        let Some(fields) = value.as_object() else {
            return (Self::new(), Vec::new());
        };
        let mut accepted = Map::new();
        let mut rejected = Vec::new();
        for (name, field) in fields {
            let single = Value::Object(Map::from_iter([(name.clone(), field.clone())]));
            if serde_json::from_value::<Self>(single).is_ok() {
                accepted.insert(name.clone(), field.clone());
            } else {
                rejected.push(name.clone());
            }
        }
        let patch = serde_json::from_value(Value::Object(accepted)).unwrap_or_default();
        (patch, rejected)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Clamp a close-distance fraction into `[0, 1]`. Non-finite input is rejected.
pub fn clamp_percent(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

/// Round and clamp a password length into `[4, 12]`. Non-finite input is rejected.
pub fn clamp_password_length(value: f64) -> Option<usize> {
    value.is_finite().then(|| {
        value
            .round()
            .clamp(MIN_PASSWORD_LENGTH as f64, MAX_PASSWORD_LENGTH as f64) as usize
    })
}

/// Clamp a distance or velocity to be non-negative. Non-finite input is rejected.
pub fn clamp_non_negative(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.max(0.0))
}
