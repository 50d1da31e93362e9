//! # Identity Entry Points
//!
//! Three equivalent ways to give a class its identity. All of them attach
//! through [`Attacher`] and differ only in when validation runs:
//!
//! | Entry point | Applies to | Validation |
//! |---|---|---|
//! | [`Sigil::sigilify`] | a new class extending an unidentified base | on first construction |
//! | [`Sigil::declare`] | a class being declared under an identified base | immediately |
//! | [`Sigil::with_sigil`] | an existing subclass of an identified base | immediately |
//!
//! A subclass of a sigilified class that skips all three only inherits its
//! parent's identity; the validator catches that on construction.

use crate::attach::{AttachMode, Attacher};
use crate::validate::{InheritanceValidator, ValidateOptions};
use crate::{Class, Sigil, SigilError, label};
use std::sync::Arc;

impl Sigil {
    /// Create class `name` extending `base` and identify it.
    ///
    /// `base` must not resolve an identity: subclasses of identified classes
    /// go through [`Sigil::declare`] or [`Sigil::with_sigil`].
    pub fn sigilify(
        &self,
        name: impl Into<Arc<str>>,
        base: Option<&Class>,
        label: Option<&str>,
    ) -> Result<Class, SigilError> {
        if let Some(base) = base
            && base.is_identified()
        {
            return Err(SigilError::BaseAlreadyIdentified {
                class: base.name().to_string(),
                entry: "sigilify",
            });
        }

        let class = match base {
            Some(base) => Class::extend(base, name),
            None => Class::new(name),
        };

        let ctx = self.snapshot();
        let label = label::normalize(&ctx.options, class.name(), label)?;
        Attacher::attach(&ctx, &class, &label, AttachMode::Explicit)?;
        Ok(class)
    }

    /// Start declaring class `name`.
    #[must_use]
    pub fn declare(&self, name: impl Into<Arc<str>>) -> ClassBuilder<'_> {
        ClassBuilder {
            sigil: self,
            name: name.into(),
            parent: None,
            label: None,
            validate: ValidateOptions::default(),
        }
    }

    /// Identify an existing subclass of an identified base.
    ///
    /// A missing label is generated. Returns the same class handle.
    pub fn with_sigil(&self, class: &Class, label: Option<&str>) -> Result<Class, SigilError> {
        if !class.parent().is_some_and(Class::is_identified) {
            return Err(SigilError::MissingSigilBase {
                class: class.name().to_string(),
                entry: "with_sigil",
            });
        }
        self.identify(class, label, ValidateOptions::default())?;
        Ok(class.clone())
    }

    fn identify(
        &self,
        class: &Class,
        label: Option<&str>,
        validate: ValidateOptions,
    ) -> Result<(), SigilError> {
        let ctx = self.snapshot();
        let label = label::normalize(&ctx.options, class.name(), label)?;
        Attacher::attach(&ctx, class, &label, AttachMode::Explicit)?;
        InheritanceValidator::validate(&ctx, class, validate)
    }
}

// =============================================================================
// DECLARATION BUILDER
// =============================================================================

/// Declaration-time identification of a class under an identified base.
#[derive(Debug)]
#[must_use = "a class is only declared once `build` is called"]
pub struct ClassBuilder<'a> {
    sigil: &'a Sigil,
    name: Arc<str>,
    parent: Option<Class>,
    label: Option<String>,
    validate: ValidateOptions,
}

impl ClassBuilder<'_> {
    /// Parent class. Must resolve an identity.
    pub fn extends(mut self, parent: &Class) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Label to attach; generated when omitted.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Skip the inheritance walk for this declaration.
    pub fn skip_validation(mut self) -> Self {
        self.validate.skip = true;
        self
    }

    /// Declare, identify and validate the class.
    pub fn build(self) -> Result<Class, SigilError> {
        let Some(parent) = self.parent.as_ref().filter(|p| p.is_identified()) else {
            return Err(SigilError::MissingSigilBase {
                class: self.name.to_string(),
                entry: "declare",
            });
        };

        let class = Class::extend(parent, Arc::clone(&self.name));
        self.sigil
            .identify(&class, self.label.as_deref(), self.validate)?;
        Ok(class)
    }
}

// =============================================================================
// TESTS
// =============================================================================
