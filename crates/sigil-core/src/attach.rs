//! # Identity Attacher
//!
//! Binds identity metadata to a class.
//!
//! Attach order:
//! 1. resolve the label's symbol
//! 2. read the parent's lineage (empty if no ancestor is identified)
//! 3. register the label in the active registry
//! 4. bind `{label, symbol, lineage, lineage_set}` to the class
//!
//! The class's identity slot is held exclusively for the whole sequence and
//! the registration happens before binding, so a failed registration leaves
//! the class exactly as it was.

use crate::registry::RegisterOptions;
use crate::runtime::Snapshot;
use crate::{Class, Identity, SigilError, SymbolTable};
use std::sync::Arc;

/// How an attach treats an identity already bound to the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttachMode {
    /// Entry point call; any existing own identity is an error.
    Explicit,
    /// Collision healing; may replace an identity that was itself healed.
    Heal,
}

/// Binds identity metadata onto classes.
pub(crate) struct Attacher;

impl Attacher {
    /// Attach `label` to `class`.
    pub(crate) fn attach(
        ctx: &Snapshot,
        class: &Class,
        label: &str,
        mode: AttachMode,
    ) -> Result<Arc<Identity>, SigilError> {
        let symbol = SymbolTable::global().resolve(label);
        let parent_lineage = class.parent_lineage();

        let mut slot = class.identity_slot();
        let previous = slot.clone();
        if let Some(existing) = &previous
            && (mode == AttachMode::Explicit || existing.is_explicit())
        {
            return Err(SigilError::AlreadyIdentified {
                class: class.name().to_string(),
                label: existing.label().to_string(),
            });
        }

        if let Some(registry) = &ctx.registry {
            let opts = RegisterOptions {
                store_class: ctx.options.store_constructor,
                lenient: ctx.options.dev_mode,
            };
            registry.register(label, class, opts)?;
            if let Some(previous) = &previous {
                registry.unregister_class(previous.label(), class);
            }
        }

        let identity = Arc::new(Identity::new(
            Arc::from(label),
            symbol,
            &parent_lineage,
            mode == AttachMode::Explicit,
        ));
        *slot = Some(Arc::clone(&identity));

        tracing::debug!(
            class = class.name(),
            label,
            depth = identity.depth(),
            "Attached identity"
        );
        Ok(identity)
    }

    /// Recompute `class`'s lineage from its parent's current lineage.
    ///
    /// Label, symbol and registry entry are unchanged. Returns whether the
    /// lineage changed.
    pub(crate) fn relink(class: &Class) -> bool {
        let parent_lineage = class.parent_lineage();

        let mut slot = class.identity_slot();
        let Some(own) = slot.as_ref() else {
            return false;
        };
        if own.parent_lineage() == parent_lineage.as_slice() {
            return false;
        }

        let relinked = Identity::new(
            own.label_arc(),
            own.symbol(),
            &parent_lineage,
            own.is_explicit(),
        );
        tracing::debug!(
            class = class.name(),
            label = own.label(),
            depth = relinked.depth(),
            "Re-linked lineage after ancestor relabel"
        );
        *slot = Some(Arc::new(relinked));
        true
    }
}
