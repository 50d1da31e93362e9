//! # Protocol Primitives
//!
//! Hardcoded constants for the Sigil identity protocol.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Changing any of them changes the identity of every class, so they are
//! versioned with the crate.

/// Context string for BLAKE3 symbol derivation.
///
/// Every copy of this crate that shares this context derives identical
/// symbols for identical labels.
pub const SYMBOL_DERIVE_CONTEXT: &str = "sigil 2024-06 label symbol v1";

/// Well-known token under which the active registry is published as
/// shared process state.
pub const SHARED_REGISTRY_KEY: &str = "@sigil/registry";

/// Scope used for auto-generated labels.
///
/// - Auto labels have the form `@sigil-auto/<uuid>.<ClassName>`.
pub const AUTO_LABEL_SCOPE: &str = "@sigil-auto";

/// Recommended label format: `@scope[/scope...].UppercaseName`.
pub const RECOMMENDED_LABEL_PATTERN: &str =
    r"^@[A-Za-z0-9_-]+(?:/[A-Za-z0-9_-]+)*\.[A-Z][A-Za-z0-9_]*$";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_scope_is_scoped() {
        assert!(AUTO_LABEL_SCOPE.starts_with('@'));
    }

    #[test]
    fn shared_key_is_stable() {
        assert_eq!(SHARED_REGISTRY_KEY, "@sigil/registry");
    }
}
