//! # Inheritance Validator
//!
//! Development-time check that no two classes in an ancestor chain share a
//! label.
//!
//! The typical failure is a subclass that was never identified itself and so
//! resolves its parent's label and symbol, which makes the two classes
//! indistinguishable to lineage queries. Depending on configuration the
//! validator either fails or relabels such a subclass.

use crate::attach::{AttachMode, Attacher};
use crate::label;
use crate::runtime::Snapshot;
use crate::{Class, SigilError};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-call validator options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Skip the walk for this call.
    pub skip: bool,
}

/// Walks ancestor chains for label collisions.
pub(crate) struct InheritanceValidator;

impl InheritanceValidator {
    /// Validate `class` and its identified ancestors.
    ///
    /// No-op outside dev mode, when ancestor checks are disabled, when
    /// `opts.skip` is set, or when `class` already passed.
    pub(crate) fn validate(
        ctx: &Snapshot,
        class: &Class,
        opts: ValidateOptions,
    ) -> Result<(), SigilError> {
        if !ctx.options.dev_mode
            || ctx.options.skip_ancestor_check
            || opts.skip
            || class.is_validated()
        {
            return Ok(());
        }

        let mut chain: Vec<&Class> = class.ancestors().filter(|c| c.is_identified()).collect();
        chain.reverse();

        // label -> name of the most basal class claiming it
        let mut claimed: HashMap<Arc<str>, String> = HashMap::with_capacity(chain.len());

        for current in chain {
            Attacher::relink(current);
            let Some(identity) = current.identity() else {
                continue;
            };

            let Some(ancestor) = claimed.get(identity.label()).cloned() else {
                claimed.insert(identity.label_arc(), current.name().to_string());
                continue;
            };

            if current.is_explicitly_identified() || !ctx.options.autofill_on_collision {
                return Err(SigilError::AncestorLabelReused {
                    label: identity.label().to_string(),
                    ancestor,
                    class: current.name().to_string(),
                });
            }

            let fresh = label::generate(current.name());
            tracing::debug!(
                class = current.name(),
                inherited = identity.label(),
                label = %fresh,
                "Relabeling subclass that inherited its ancestor's label"
            );
            let healed = Attacher::attach(ctx, current, &fresh, AttachMode::Heal)?;
            claimed.insert(healed.label_arc(), current.name().to_string());
        }

        class.mark_validated();
        Ok(())
    }
}
