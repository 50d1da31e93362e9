//! # Symbol Table
//!
//! Canonical mapping from labels to runtime symbols.
//!
//! Resolution is a pure function of the label (see [`Symbol::derive`]), so
//! two tables never disagree. The table only remembers which labels have
//! been seen, which lets diagnostics turn a lineage back into labels.

use crate::Symbol;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<SymbolTable> = LazyLock::new(SymbolTable::new);

/// Interning domain for label symbols.
#[derive(Debug, Default)]
pub struct SymbolTable {
    labels: RwLock<HashMap<Symbol, Arc<str>>>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide table.
    #[must_use]
    pub fn global() -> &'static SymbolTable {
        &GLOBAL
    }

    /// Resolve a label to its symbol, registering it on first use.
    pub fn resolve(&self, label: &str) -> Symbol {
        let symbol = Symbol::derive(label);
        if !self.labels.read().contains_key(&symbol) {
            self.labels
                .write()
                .entry(symbol)
                .or_insert_with(|| Arc::from(label));
        }
        symbol
    }

    /// Label a symbol was resolved from, if this table has seen it.
    #[must_use]
    pub fn label_of(&self, symbol: Symbol) -> Option<Arc<str>> {
        self.labels.read().get(&symbol).cloned()
    }

    /// Number of distinct labels seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.read().len()
    }

    /// Whether no label has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.read().is_empty()
    }
}
