//! Payment method records and their display projection.
//!
//! A [`PaymentMethod`] is an open-ended record supplied by the caller. The
//! active [`FieldMapping`] names the fields that carry its title, subtitle,
//! icon and identity; anything the mapping leaves out is found through a fixed
//! fallback chain, and if that fails too a literal default is used. Resolution
//! never fails.
//!
//! # Example
//!
//! ```
//! use paysheet_lib::methods::{resolve_display, FieldMapping, PaymentMethod};
//! use serde_json::json;
//!
//! let record = PaymentMethod::new(json!({ "id": 7, "name": "X" }));
//! let display = resolve_display(&record, &FieldMapping::default(), 0);
//! assert_eq!(display.identity, json!(7));
//! assert_eq!(display.title, "X");
//! assert_eq!(display.subtitle, "");
//! ```

mod registry;

pub use registry::MethodRegistry;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Identity fields tried after the mapped one.
pub const IDENTITY_FALLBACKS: &[&str] = &["value", "id", "code"];
/// Title fields tried after the mapped one.
pub const TITLE_FALLBACKS: &[&str] = &["title", "name", "label"];
/// Subtitle fields tried after the mapped one.
pub const SUBTITLE_FALLBACKS: &[&str] = &["subtitle", "description", "desc"];
/// Icon fields tried after the mapped one.
pub const ICON_FALLBACKS: &[&str] = &["icon", "image", "logo"];

/// Title shown when a record has none.
pub const DEFAULT_TITLE: &str = "Payment method";
/// Icon shown when a record has none.
pub const DEFAULT_ICON: &str = "💳";

/// A caller-supplied payment method record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(pub Value);

impl PaymentMethod {
    /// Wrap a record.
    pub fn new(record: Value) -> Self {
        Self(record)
    }

    /// Look up a field. Records that are not objects have no fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(name))
    }

    /// The underlying record.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for PaymentMethod {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Names of the record fields that feed the display projection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMapping {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    #[serde(alias = "value", alias = "id")]
    pub identity: Option<String>,
}

impl FieldMapping {
    pub fn with_title(mut self, field: impl Into<String>) -> Self {
        self.title = Some(field.into());
        self
    }

    pub fn with_subtitle(mut self, field: impl Into<String>) -> Self {
        self.subtitle = Some(field.into());
        self
    }

    pub fn with_icon(mut self, field: impl Into<String>) -> Self {
        self.icon = Some(field.into());
        self
    }

    pub fn with_identity(mut self, field: impl Into<String>) -> Self {
        self.identity = Some(field.into());
        self
    }
}

/// What a method row shows, and the identity it reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDisplay {
    pub identity: Value,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
}

/// Project a record through `mapping`. `index` is the record's list position,
/// the identity of last resort.
pub fn resolve_display(record: &PaymentMethod, mapping: &FieldMapping, index: usize) -> MethodDisplay {
    MethodDisplay {
        identity: resolve_identity(record, mapping, index),
        title: lookup_text(record, mapping.title.as_deref(), TITLE_FALLBACKS)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        subtitle: lookup_text(record, mapping.subtitle.as_deref(), SUBTITLE_FALLBACKS)
            .unwrap_or_default(),
        icon: lookup_text(record, mapping.icon.as_deref(), ICON_FALLBACKS)
            .unwrap_or_else(|| DEFAULT_ICON.to_string()),
    }
}

/// Resolve only the identity of a record.
pub fn resolve_identity(record: &PaymentMethod, mapping: &FieldMapping, index: usize) -> Value {
    candidates(mapping.identity.as_deref(), IDENTITY_FALLBACKS)
        .filter_map(|name| record.field(name))
        .find(|value| as_text(value).is_some())
        .cloned()
        .unwrap_or_else(|| Value::String(index.to_string()))
}

fn lookup_text(record: &PaymentMethod, mapped: Option<&str>, fallbacks: &[&str]) -> Option<String> {
    candidates(mapped, fallbacks)
        .filter_map(|name| record.field(name))
        .find_map(as_text)
}

fn candidates<'a>(mapped: Option<&'a str>, fallbacks: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
    mapped
        .filter(|name| !name.is_empty())
        .into_iter()
        .chain(fallbacks.iter().copied())
}

/// Displayable text of a scalar. Null, empty strings, arrays and objects have none.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The built-in method list shown when the caller has not supplied one.
pub fn default_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod::new(json!({
            "value": "wechat",
            "title": "WeChat Pay",
            "subtitle": "Recommended for WeChat users",
            "icon": "💬",
        })),
        PaymentMethod::new(json!({
            "value": "alipay",
            "title": "Alipay",
            "subtitle": "Fast and secure",
            "icon": "🅰",
        })),
        PaymentMethod::new(json!({
            "value": "card",
            "title": "Bank Card",
            "subtitle": "Debit or credit card",
            "icon": "💳",
        })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_resolution() {
        let record = PaymentMethod::new(json!({ "id": 7, "name": "X" }));
        let display = resolve_display(&record, &FieldMapping::default(), 3);
        assert_eq!(display.identity, json!(7));
        assert_eq!(display.title, "X");
        assert_eq!(display.subtitle, "");
        assert_eq!(display.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_mapping_takes_precedence() {
        let record = PaymentMethod::new(json!({
            "value": "fallback",
            "sku": "primary",
            "title": "Plain",
            "headline": "Mapped",
        }));
        let mapping = FieldMapping::default()
            .with_identity("sku")
            .with_title("headline");
        let display = resolve_display(&record, &mapping, 0);
        assert_eq!(display.identity, json!("primary"));
        assert_eq!(display.title, "Mapped");
    }

    #[test]
    fn test_missing_mapped_field_falls_through() {
        let record = PaymentMethod::new(json!({ "code": "cc", "label": "Card" }));
        let mapping = FieldMapping::default().with_identity("missing").with_title("");
        let display = resolve_display(&record, &mapping, 0);
        assert_eq!(display.identity, json!("cc"));
        assert_eq!(display.title, "Card");
    }

    #[test]
    fn test_identity_falls_back_to_index() {
        let record = PaymentMethod::new(json!({ "value": null, "id": "" }));
        assert_eq!(
            resolve_identity(&record, &FieldMapping::default(), 2),
            json!("2")
        );
    }

    #[test]
    fn test_non_object_record() {
        let record = PaymentMethod::new(json!("just a string"));
        let display = resolve_display(&record, &FieldMapping::default(), 0);
        assert_eq!(display.identity, json!("0"));
        assert_eq!(display.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_nested_values_are_ignored() {
        let record = PaymentMethod::new(json!({ "title": { "en": "Card" }, "name": "Card" }));
        let display = resolve_display(&record, &FieldMapping::default(), 0);
        assert_eq!(display.title, "Card");
    }

    #[test]
    fn test_mapping_aliases() {
        let mapping: FieldMapping = serde_json::from_str(r#"{"value": "uid", "title": "t"}"#).unwrap();
        assert_eq!(mapping.identity.as_deref(), Some("uid"));
        assert_eq!(mapping.title.as_deref(), Some("t"));
    }

    #[test]
    fn test_default_methods() {
        let methods = default_methods();
        assert_eq!(methods.len(), 3);
        let ids: Vec<Value> = methods
            .iter()
            .enumerate()
            .map(|(i, m)| resolve_identity(m, &FieldMapping::default(), i))
            .collect();
        assert_eq!(ids, vec![json!("wechat"), json!("alipay"), json!("card")]);
    }
}
