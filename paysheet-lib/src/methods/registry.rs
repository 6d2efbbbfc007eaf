//! Method registry: the active method list, its mapping and the selection.
//!
//! A caller-supplied list is "customized" and survives exactly one open of
//! the sheet. [`MethodRegistry::prepare_for_open`] restores the built-in list
//! unless the flag is set, and clears the flag either way.

use super::{default_methods, resolve_display, resolve_identity, FieldMapping, MethodDisplay, PaymentMethod};
use serde_json::Value;

/// Holds the active payment methods and tracks which one is selected.
#[derive(Clone, Debug)]
pub struct MethodRegistry {
    methods: Vec<PaymentMethod>,
    mapping: FieldMapping,
    selected: Option<usize>,
    customized: bool,
}

impl MethodRegistry {
    /// Creates a registry holding the built-in defaults.
    pub fn new() -> Self {
        let mut registry = Self {
            methods: Vec::new(),
            mapping: FieldMapping::default(),
            selected: None,
            customized: false,
        };
        registry.restore_defaults();
        registry
    }

    /// Replaces the method list.
    ///
    /// `None` or an empty list restores the defaults (and the default mapping)
    /// and clears the customized flag. The selection always resets to the first
    /// entry.
    pub fn set_methods(&mut self, methods: Option<Vec<PaymentMethod>>, mapping: Option<FieldMapping>) {
        match methods {
            Some(methods) if !methods.is_empty() => {
                self.methods = methods;
                self.mapping = mapping.unwrap_or_default();
                self.customized = true;
                self.selected = Some(0);
            }
            _ => self.restore_defaults(),
        }
    }

    /// Reinstalls the built-in list and default mapping.
    pub fn restore_defaults(&mut self) {
        self.methods = default_methods();
        self.mapping = FieldMapping::default();
        self.customized = false;
        self.selected = (!self.methods.is_empty()).then_some(0);
    }

    /// Applies the one-shot rule on open. Returns whether a custom list was kept.
    pub fn prepare_for_open(&mut self) -> bool {
        let kept = self.customized;
        if !kept {
            self.restore_defaults();
        }
        self.customized = false;
        kept
    }

    /// Whether the current list was supplied by the caller and not yet consumed by an open.
    pub fn is_customized(&self) -> bool {
        self.customized
    }

    pub fn methods(&self) -> &[PaymentMethod] {
        &self.methods
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The selected record, if any.
    pub fn selected(&self) -> Option<&PaymentMethod> {
        self.selected.and_then(|i| self.methods.get(i))
    }

    /// Identity of the selected record, if any.
    pub fn selected_identity(&self) -> Option<Value> {
        let index = self.selected?;
        let method = self.methods.get(index)?;
        Some(resolve_identity(method, &self.mapping, index))
    }

    /// Selects by row index. Out-of-range indexes are ignored.
    ///
    /// Returns true if the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.methods.len() || self.selected == Some(index) {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Selects the first record whose resolved identity equals `identity`.
    ///
    /// Returns true if the selection changed.
    pub fn select_by_identity(&mut self, identity: &Value) -> bool {
        let position = self
            .methods
            .iter()
            .enumerate()
            .position(|(i, m)| &resolve_identity(m, &self.mapping, i) == identity);
        match position {
            Some(index) => self.select(index),
            None => false,
        }
    }

    /// Display projection of one row.
    pub fn display(&self, index: usize) -> Option<MethodDisplay> {
        self.methods
            .get(index)
            .map(|m| resolve_display(m, &self.mapping, index))
    }

    /// Display projection of every row, in order.
    pub fn displays(&self) -> Vec<MethodDisplay> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| resolve_display(m, &self.mapping, i))
            .collect()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
