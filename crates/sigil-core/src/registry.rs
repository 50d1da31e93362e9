//! # Registry
//!
//! Uniqueness-enforcing label → class store.
//!
//! - Labels are unique within one registry instance.
//! - Listing preserves registration order.
//! - Each entry remembers the declared class name even when the class
//!   reference itself is not stored, so duplicate diagnostics and the
//!   hot-reload heuristic never depend on reference storage.
//!
//! The active registry of a [`Sigil`](crate::Sigil) may be absent. Reads
//! through [`ActiveRegistry`] then report empty results instead of failing.

use crate::primitives::SHARED_REGISTRY_KEY;
use crate::class::ClassRef;
use crate::{Class, SigilError};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

// =============================================================================
// ENTRIES
// =============================================================================

/// One registration: the declared class name and, when storage is enabled,
/// the class itself.
///
/// The registering class is always recognisable through a weak handle, so
/// same-class checks do not depend on reference storage.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    class_name: Arc<str>,
    owner: ClassRef,
    class: Option<Class>,
}

impl RegistryEntry {
    /// Declared name of the registered class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The registered class, if references are stored.
    #[must_use]
    pub fn class(&self) -> Option<&Class> {
        self.class.as_ref()
    }
}

/// How a registration treats references and duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Keep the class reference in the entry.
    pub store_class: bool,
    /// Downgrade a duplicate from a same-named class to a warning.
    pub lenient: bool,
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            store_class: true,
            lenient: false,
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Label registry.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<IndexMap<Arc<str>, RegistryEntry>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `label` is registered.
    #[must_use]
    pub fn has(&self, label: &str) -> bool {
        self.entries.read().contains_key(label)
    }

    /// The class registered under `label`, if references are stored.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Class> {
        self.entries.read().get(label).and_then(|e| e.class.clone())
    }

    /// Full entry for `label`.
    #[must_use]
    pub fn entry(&self, label: &str) -> Option<RegistryEntry> {
        self.entries.read().get(label).cloned()
    }

    /// All labels in registration order.
    #[must_use]
    pub fn list_labels(&self) -> Vec<String> {
        self.entries.read().keys().map(|k| k.to_string()).collect()
    }

    /// Number of registered labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Register `class` under `label`.
    ///
    /// Re-registering the same class is a no-op. A different class with the
    /// same declared name is skipped with a warning when `opts.lenient` is set
    /// (module re-evaluation). Anything else fails with
    /// [`SigilError::DuplicateLabel`].
    pub fn register(
        &self,
        label: &str,
        class: &Class,
        opts: RegisterOptions,
    ) -> Result<(), SigilError> {
        let entry = RegistryEntry {
            class_name: Arc::from(class.name()),
            owner: class.downgrade(),
            class: opts.store_class.then(|| class.clone()),
        };
        self.insert_entry(label, entry, opts.lenient)
    }

    fn insert_entry(
        &self,
        label: &str,
        entry: RegistryEntry,
        lenient: bool,
    ) -> Result<(), SigilError> {
        let mut entries = self.entries.write();

        if let Some(existing) = entries.get(label) {
            if existing.owner.same_class(&entry.owner) {
                return Ok(());
            }

            if lenient && existing.class_name == entry.class_name {
                tracing::warn!(
                    label,
                    class = %entry.class_name,
                    "Label re-registered by a class with the same name; assuming module re-evaluation and keeping the first registration"
                );
                return Ok(());
            }

            return Err(SigilError::DuplicateLabel {
                label: label.to_string(),
                existing: existing.class_name.to_string(),
                incoming: entry.class_name.to_string(),
            });
        }

        entries.insert(Arc::from(label), entry);
        Ok(())
    }

    /// Remove `label`. Returns whether it was present.
    pub fn unregister(&self, label: &str) -> bool {
        self.entries.write().shift_remove(label).is_some()
    }

    /// Remove `label` only if it is registered to `class`.
    pub(crate) fn unregister_class(&self, label: &str, class: &Class) -> bool {
        let mut entries = self.entries.write();
        let owned = entries
            .get(label)
            .is_some_and(|registered| registered.owner.refers_to(class));
        owned && entries.shift_remove(label).is_some()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Register every entry of `other` into `self`, in `other`'s order,
    /// with the same duplicate rule as [`Registry::register`].
    ///
    /// Stops at the first duplicate; entries copied before it stay.
    pub fn merge(&self, other: &Registry, lenient: bool) -> Result<(), SigilError> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }
        let snapshot: Vec<(Arc<str>, RegistryEntry)> = other
            .entries
            .read()
            .iter()
            .map(|(label, entry)| (Arc::clone(label), entry.clone()))
            .collect();

        for (label, entry) in snapshot {
            self.insert_entry(&label, entry, lenient)?;
        }
        Ok(())
    }
}

// =============================================================================
// ACTIVE REGISTRY VIEW
// =============================================================================

/// View of the registry currently active in a [`Sigil`](crate::Sigil).
///
/// When the registry is disabled every read reports empty and every
/// mutation is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ActiveRegistry {
    inner: Option<Arc<Registry>>,
}

impl ActiveRegistry {
    pub(crate) fn new(inner: Option<Arc<Registry>>) -> Self {
        Self { inner }
    }

    /// Whether a registry is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> Option<&Arc<Registry>> {
        self.inner.as_ref()
    }

    #[must_use]
    pub fn has(&self, label: &str) -> bool {
        self.inner.as_ref().is_some_and(|r| r.has(label))
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<Class> {
        self.inner.as_ref().and_then(|r| r.get(label))
    }

    #[must_use]
    pub fn entry(&self, label: &str) -> Option<RegistryEntry> {
        self.inner.as_ref().and_then(|r| r.entry(label))
    }

    #[must_use]
    pub fn list_labels(&self) -> Vec<String> {
        self.inner
            .as_ref()
            .map(|r| r.list_labels())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |r| r.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn unregister(&self, label: &str) -> bool {
        self.inner.as_ref().is_some_and(|r| r.unregister(label))
    }

    pub fn clear(&self) {
        if let Some(registry) = &self.inner {
            registry.clear();
        }
    }
}

// =============================================================================
// SHARED PROCESS STATE
// =============================================================================

static SHARED: LazyLock<RwLock<HashMap<&'static str, Arc<Registry>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registry published under `key` by a [`Sigil`](crate::Sigil) with
/// `expose_registry` enabled.
///
/// The well-known key is [`SHARED_REGISTRY_KEY`].
#[must_use]
pub fn shared_registry(key: &str) -> Option<Arc<Registry>> {
    SHARED.read().get(key).cloned()
}

pub(crate) fn publish(registry: &Arc<Registry>) {
    SHARED
        .write()
        .insert(SHARED_REGISTRY_KEY, Arc::clone(registry));
}

/// Withdraw `registry` if it is the one currently published.
pub(crate) fn withdraw(registry: &Arc<Registry>) {
    let mut shared = SHARED.write();
    if shared
        .get(SHARED_REGISTRY_KEY)
        .is_some_and(|published| Arc::ptr_eq(published, registry))
    {
        shared.remove(SHARED_REGISTRY_KEY);
    }
}

// =============================================================================
// TESTS
// =============================================================================
