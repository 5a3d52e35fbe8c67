//! Inline style declaration of a DOM node.
//!
//! Two write paths exist, matching the browser's `CSSStyleDeclaration`:
//! direct assignment (`style.backgroundColor = "blue"`) and the property
//! setter (`style.setProperty("--accent", "red")`). Custom properties are only
//! reachable through the setter.

use std::collections::BTreeMap;

/// Inline style of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyle {
    assigned: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
}

impl CssStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a standard property directly (`style[name] = value`).
    ///
    /// An empty value clears the property.
    pub fn assign(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.assigned.remove(name);
        } else {
            self.assigned.insert(name.to_string(), value.to_string());
        }
    }

    /// Set a property through the property setter (`style.setProperty`).
    ///
    /// An empty value clears the property.
    pub fn set_property(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.properties.remove(name);
        } else {
            self.properties.insert(name.to_string(), value.to_string());
        }
    }

    /// Value written by direct assignment.
    pub fn assigned(&self, name: &str) -> Option<&str> {
        self.assigned.get(name).map(String::as_str)
    }

    /// Value written through the property setter (`getPropertyValue`).
    pub fn property_value(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Value of a property regardless of how it was written.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assigned(name).or_else(|| self.property_value(name))
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty() && self.properties.is_empty()
    }
}
