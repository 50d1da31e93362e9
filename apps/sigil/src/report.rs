//! # Reports
//!
//! Serializable views of classes and check results, printed either as text
//! or as JSON.

use serde::Serialize;
use sigil_core::label::is_generated;
use sigil_core::{ActiveRegistry, Class, Symbol, SymbolTable};
use std::fmt;

/// Label of `symbol`, or its hex when it was never resolved in this process.
pub fn symbol_label(symbol: Symbol) -> String {
    SymbolTable::global()
        .label_of(symbol)
        .map(|label| label.to_string())
        .unwrap_or_else(|| symbol.to_hex())
}

/// Lineage of `class` as labels, most ancestral first.
pub fn lineage_labels(class: &Class) -> Vec<String> {
    class.lineage().into_iter().map(symbol_label).collect()
}

// =============================================================================
// CLASS REPORT
// =============================================================================

/// Identity summary of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassReport {
    pub name: String,
    pub parent: Option<String>,
    pub label: Option<String>,
    pub symbol: Option<String>,
    pub lineage: Vec<String>,
    /// Identity attached to this class rather than inherited.
    pub own_identity: bool,
    pub generated_label: bool,
    pub validated: bool,
}

impl ClassReport {
    pub fn from_class(class: &Class) -> Self {
        let label = class.label().map(|l| l.to_string());
        Self {
            name: class.name().to_string(),
            parent: class.parent().map(|p| p.name().to_string()),
            generated_label: label.as_deref().is_some_and(is_generated),
            label,
            symbol: class.symbol().map(|s| s.to_hex()),
            lineage: lineage_labels(class),
            own_identity: class.own_identity().is_some(),
            validated: class.is_validated(),
        }
    }
}

impl fmt::Display for ClassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(parent) = &self.parent {
            write!(f, " extends {parent}")?;
        }
        match (&self.label, self.own_identity) {
            (Some(label), true) => write!(f, "\n  label:    {label}")?,
            (Some(label), false) => write!(f, "\n  label:    {label} (inherited)")?,
            (None, _) => write!(f, "\n  label:    -")?,
        }
        if !self.lineage.is_empty() {
            write!(f, "\n  lineage:  {}", self.lineage.join(" > "))?;
        }
        Ok(())
    }
}

// =============================================================================
// CHECK RESULTS
// =============================================================================

/// Result of a membership test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipReport {
    pub type_class: String,
    pub value_class: String,
    pub strict: bool,
    pub result: bool,
}

/// Result of a label check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelReport {
    pub label: String,
    pub rule: String,
    pub valid: bool,
}

/// Symbol of a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReport {
    pub label: String,
    pub symbol: String,
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryRow {
    pub label: String,
    pub class: String,
}

/// Registry contents in registration order.
pub fn registry_rows(registry: &ActiveRegistry) -> Vec<RegistryRow> {
    registry
        .list_labels()
        .into_iter()
        .filter_map(|label| {
            let entry = registry.entry(&label)?;
            Some(RegistryRow {
                class: entry.class_name().to_string(),
                label,
            })
        })
        .collect()
}
