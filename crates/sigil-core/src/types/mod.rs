//! # Core Type Definitions
//!
//! This module contains the core types for the Sigil identity protocol:
//! - Runtime symbols (`Symbol`)
//! - Identity metadata bound to a class (`Identity`)
//! - Error types (`SigilError`)
//!
//! ## Immutability Guarantees
//!
//! An `Identity` is never mutated after construction. It is shared behind an
//! `Arc`, so every accessor may hand out borrowed views without copying.

use crate::primitives::SYMBOL_DERIVE_CONTEXT;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// SYMBOL
// =============================================================================

/// Opaque runtime token derived from a label.
///
/// The token is the BLAKE3 derive-key hash of the label, so the same label
/// yields the same symbol in every symbol table of the process, including
/// tables created by independently loaded copies of this crate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol([u8; 32]);

impl Symbol {
    /// Derive the symbol for a label.
    #[must_use]
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key(SYMBOL_DERIVE_CONTEXT);
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Raw bytes of the token.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding of the full token.
    #[must_use]
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Symbol({})", &hex[..16])
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// IDENTITY METADATA
// =============================================================================

/// Identity metadata bound to exactly one class.
///
/// - `lineage` runs from the most ancestral identified class to the owner.
/// - `lineage_set` holds exactly the elements of `lineage`.
/// - `explicit` is false only for identities produced by collision healing.
#[derive(Debug, Clone)]
pub struct Identity {
    label: Arc<str>,
    symbol: Symbol,
    lineage: Arc<[Symbol]>,
    lineage_set: HashSet<Symbol>,
    explicit: bool,
}

impl Identity {
    /// Build the metadata for a class whose parent carries `parent_lineage`.
    #[must_use]
    pub(crate) fn new(
        label: Arc<str>,
        symbol: Symbol,
        parent_lineage: &[Symbol],
        explicit: bool,
    ) -> Self {
        let mut lineage = Vec::with_capacity(parent_lineage.len().saturating_add(1));
        lineage.extend_from_slice(parent_lineage);
        lineage.push(symbol);
        let lineage_set = lineage.iter().copied().collect();

        Self {
            label,
            symbol,
            lineage: lineage.into(),
            lineage_set,
            explicit,
        }
    }

    /// The label this identity was created for.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Shared handle to the label.
    #[must_use]
    pub fn label_arc(&self) -> Arc<str> {
        Arc::clone(&self.label)
    }

    /// The symbol resolved from the label.
    #[must_use]
    pub const fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Ordered ancestor-to-self chain of symbols.
    #[must_use]
    pub fn lineage(&self) -> &[Symbol] {
        &self.lineage
    }

    /// The lineage without the owner's own symbol.
    #[must_use]
    pub fn parent_lineage(&self) -> &[Symbol] {
        let end = self.lineage.len().saturating_sub(1);
        &self.lineage[..end]
    }

    /// Unordered membership view of the lineage.
    #[must_use]
    pub fn lineage_set(&self) -> &HashSet<Symbol> {
        &self.lineage_set
    }

    /// Number of identified classes in the chain, owner included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lineage.len()
    }

    /// Whether this identity came from an identity entry point.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.lineage_set.contains(&symbol)
    }

    /// O(depth) positional prefix test.
    #[must_use]
    pub fn descends_from(&self, ancestor: &[Symbol]) -> bool {
        self.lineage.starts_with(ancestor)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the identity protocol.
///
/// All of them are programmer errors surfaced synchronously at the moment of
/// misuse. None are transient and none are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigilError {
    /// Identity was attached twice to the same class.
    #[error(
        "[Sigil] class '{class}' already carries identity '{label}'; \
         an identity entry point was probably applied twice (e.g. sigilify and with_sigil)"
    )]
    AlreadyIdentified { class: String, label: String },

    /// Two distinct classes claimed the same label in the registry.
    #[error(
        "[Sigil] duplicate label '{label}': already claimed by class '{existing}', \
         rejected for class '{incoming}'"
    )]
    DuplicateLabel {
        label: String,
        existing: String,
        incoming: String,
    },

    /// A subclass shares its label with one of its ancestors.
    #[error(
        "[Sigil] label '{label}' of class '{class}' is re-used from ancestor '{ancestor}'; \
         apply with_sigil (or declare) with a fresh label to '{class}'"
    )]
    AncestorLabelReused {
        label: String,
        ancestor: String,
        class: String,
    },

    /// A label failed the configured label rule.
    #[error("[Sigil] invalid label '{label}' for class '{class}': {reason}")]
    InvalidLabel {
        label: String,
        class: String,
        reason: String,
    },

    /// An entry point expecting an identified ancestor was applied to a class
    /// that has none.
    #[error("[Sigil] {entry} applied to '{class}', which does not descend from an identified class")]
    MissingSigilBase { class: String, entry: &'static str },

    /// The extension entry point was applied to a base that is already
    /// identified.
    #[error(
        "[Sigil] {entry} applied to '{class}', which is already identified; \
         use declare or with_sigil for subclasses of identified classes"
    )]
    BaseAlreadyIdentified { class: String, entry: &'static str },

    /// A label pattern could not be compiled.
    #[error("[Sigil] invalid label pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

// =============================================================================
// TESTS
// =============================================================================
