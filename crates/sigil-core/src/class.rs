//! # Classes and Instances
//!
//! Runtime class descriptors and the query surface built on their identity.
//!
//! A `Class` is a cheap handle. Equality is handle identity, never
//! structural: two classes with the same name and parent are still two
//! classes. A class without its own identity inherits the identity of its
//! nearest identified ancestor, the same way static members are inherited.
//!
//! Queries only read the frozen [`Identity`]; they never touch the registry
//! or the symbol table.

use crate::{Identity, Symbol};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// TYPED TRAIT
// =============================================================================

/// A value that can name the class it was constructed from.
///
/// This is the explicit "get owning class" capability every identified value
/// exposes. Values that are not class instances return `None`.
pub trait Typed {
    /// The class this value was constructed from.
    fn sigil_class(&self) -> Option<&Class>;
}

impl<T: Typed + ?Sized> Typed for &T {
    fn sigil_class(&self) -> Option<&Class> {
        (**self).sigil_class()
    }
}

impl<T: Typed + ?Sized> Typed for Box<T> {
    fn sigil_class(&self) -> Option<&Class> {
        (**self).sigil_class()
    }
}

impl<T: Typed + ?Sized> Typed for Arc<T> {
    fn sigil_class(&self) -> Option<&Class> {
        (**self).sigil_class()
    }
}

impl<T: Typed> Typed for Option<T> {
    fn sigil_class(&self) -> Option<&Class> {
        self.as_ref().and_then(Typed::sigil_class)
    }
}

// =============================================================================
// CLASS
// =============================================================================

struct ClassInner {
    name: Arc<str>,
    parent: Option<Class>,
    identity: RwLock<Option<Arc<Identity>>>,
    validated: AtomicBool,
}

/// Handle to a runtime class.
#[derive(Clone)]
pub struct Class {
    inner: Arc<ClassInner>,
}

impl Class {
    /// Declare a root class.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_parent(name.into(), None)
    }

    /// Declare a subclass of `parent`.
    ///
    /// The subclass inherits the parent's identity until it is identified
    /// itself.
    #[must_use]
    pub fn extend(parent: &Class, name: impl Into<Arc<str>>) -> Self {
        Self::with_parent(name.into(), Some(parent.clone()))
    }

    fn with_parent(name: Arc<str>, parent: Option<Class>) -> Self {
        Self {
            inner: Arc::new(ClassInner {
                name,
                parent,
                identity: RwLock::new(None),
                validated: AtomicBool::new(false),
            }),
        }
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Direct parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Class> {
        self.inner.parent.as_ref()
    }

    /// This class followed by its ancestors, closest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.parent())
    }

    /// Whether both handles refer to the same class.
    #[must_use]
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle that keeps recognising this class.
    pub(crate) fn downgrade(&self) -> ClassRef {
        ClassRef(Arc::downgrade(&self.inner))
    }

    /// Whether `self` is `ancestor` or extends it, directly or not.
    #[must_use]
    pub fn extends(&self, ancestor: &Class) -> bool {
        self.ancestors().any(|class| class.ptr_eq(ancestor))
    }

    // =========================================================================
    // IDENTITY STATE
    // =========================================================================

    /// Identity bound to this class itself, ignoring ancestors.
    #[must_use]
    pub fn own_identity(&self) -> Option<Arc<Identity>> {
        self.inner.identity.read().clone()
    }

    /// Identity resolved through the ancestor chain.
    #[must_use]
    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.ancestors().find_map(Class::own_identity)
    }

    /// Whether this class resolves an identity (own or inherited).
    #[must_use]
    pub fn is_identified(&self) -> bool {
        self.ancestors()
            .any(|class| class.inner.identity.read().is_some())
    }

    /// Whether this class was identified through an identity entry point.
    #[must_use]
    pub fn is_explicitly_identified(&self) -> bool {
        self.inner
            .identity
            .read()
            .as_ref()
            .is_some_and(|identity| identity.is_explicit())
    }

    /// Whether the inheritance validator has passed for this class.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.inner.validated.load(Ordering::Acquire)
    }

    pub(crate) fn mark_validated(&self) {
        self.inner.validated.store(true, Ordering::Release);
    }

    /// Exclusive access to the identity slot.
    ///
    /// Held for the whole attach so no caller observes a half-identified class.
    pub(crate) fn identity_slot(&self) -> RwLockWriteGuard<'_, Option<Arc<Identity>>> {
        self.inner.identity.write()
    }

    /// Lineage of the parent, empty when no ancestor is identified.
    #[must_use]
    pub(crate) fn parent_lineage(&self) -> Vec<Symbol> {
        self.parent()
            .and_then(Class::identity)
            .map(|identity| identity.lineage().to_vec())
            .unwrap_or_default()
    }

    // =========================================================================
    // QUERY SURFACE
    // =========================================================================

    /// Resolved label.
    #[must_use]
    pub fn label(&self) -> Option<Arc<str>> {
        self.identity().map(|identity| identity.label_arc())
    }

    /// Resolved symbol.
    #[must_use]
    pub fn symbol(&self) -> Option<Symbol> {
        self.identity().map(|identity| identity.symbol())
    }

    /// Copy of the resolved lineage; empty when unidentified.
    #[must_use]
    pub fn lineage(&self) -> Vec<Symbol> {
        self.identity()
            .map(|identity| identity.lineage().to_vec())
            .unwrap_or_default()
    }

    /// Copy of the resolved lineage set; empty when unidentified.
    #[must_use]
    pub fn lineage_set(&self) -> HashSet<Symbol> {
        self.identity()
            .map(|identity| identity.lineage_set().clone())
            .unwrap_or_default()
    }

    /// Whether `value` was constructed from a class that resolves an identity.
    #[must_use]
    pub fn is_sigil_instance(value: &dyn Typed) -> bool {
        value.sigil_class().is_some_and(Class::is_identified)
    }

    /// Same as [`Class::is_sigil_instance`], callable on any class.
    #[must_use]
    pub fn is_instance(&self, value: &dyn Typed) -> bool {
        Self::is_sigil_instance(value)
    }

    /// Subtype-or-exact test, O(1).
    ///
    /// True iff `value`'s class lineage set contains this class's symbol.
    #[must_use]
    pub fn is_of_type(&self, value: &dyn Typed) -> bool {
        let Some(own) = self.symbol() else {
            return false;
        };
        value
            .sigil_class()
            .and_then(Class::identity)
            .is_some_and(|identity| identity.contains(own))
    }

    /// Prefix-lineage test, O(depth).
    ///
    /// True iff `value`'s class lineage starts with this class's full lineage.
    #[must_use]
    pub fn is_of_type_strict(&self, value: &dyn Typed) -> bool {
        let Some(own) = self.identity() else {
            return false;
        };
        value
            .sigil_class()
            .and_then(Class::identity)
            .is_some_and(|identity| identity.descends_from(own.lineage()))
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name())
            .field("label", &self.label())
            .field("parent", &self.parent().map(Class::name))
            .finish()
    }
}

// =============================================================================
// CLASS REFERENCE
// =============================================================================

/// Weak class handle used to recognise a class without keeping it alive.
#[derive(Clone)]
pub(crate) struct ClassRef(Weak<ClassInner>);

impl ClassRef {
    /// Whether `class` is the class this handle was taken from.
    pub(crate) fn refers_to(&self, class: &Class) -> bool {
        std::ptr::eq(self.0.as_ptr(), Arc::as_ptr(&class.inner))
    }

    /// Whether both handles were taken from the same class.
    pub(crate) fn same_class(&self, other: &ClassRef) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClassRef(..)")
    }
}

// =============================================================================
// INSTANCE
// =============================================================================

/// A value constructed from a class.
///
/// Instance queries delegate to the owning class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    class: Class,
}

impl Instance {
    pub(crate) fn new(class: Class) -> Self {
        Self { class }
    }

    /// The owning class.
    #[must_use]
    pub fn class(&self) -> &Class {
        &self.class
    }

    #[must_use]
    pub fn label(&self) -> Option<Arc<str>> {
        self.class.label()
    }

    #[must_use]
    pub fn symbol(&self) -> Option<Symbol> {
        self.class.symbol()
    }

    #[must_use]
    pub fn lineage(&self) -> Vec<Symbol> {
        self.class.lineage()
    }

    #[must_use]
    pub fn lineage_set(&self) -> HashSet<Symbol> {
        self.class.lineage_set()
    }

    /// Same as [`Class::is_sigil_instance`].
    #[must_use]
    pub fn is_instance(&self, value: &dyn Typed) -> bool {
        self.class.is_instance(value)
    }

    /// Whether `value` is of this instance's class, or a subclass of it.
    #[must_use]
    pub fn is_of_type(&self, value: &dyn Typed) -> bool {
        self.class.is_of_type(value)
    }

    /// Strict variant of [`Instance::is_of_type`].
    #[must_use]
    pub fn is_of_type_strict(&self, value: &dyn Typed) -> bool {
        self.class.is_of_type_strict(value)
    }
}

impl Typed for Instance {
    fn sigil_class(&self) -> Option<&Class> {
        Some(&self.class)
    }
}

// =============================================================================
// TESTS
// =============================================================================
