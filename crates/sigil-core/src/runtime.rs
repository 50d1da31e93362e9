//! # Sigil Service
//!
//! The process-wide service object that owns configuration and the active
//! registry.
//!
//! ## Access
//!
//! - [`Sigil::global()`] is the single process-wide instance, created on
//!   first use.
//! - [`Sigil::new()`] creates an isolated instance (tests, embedding).
//! - [`Sigil::reset()`] restores defaults and a fresh registry.
//!
//! ## Consistency
//!
//! Every identification call works on a [`Snapshot`] of options and registry
//! taken under one lock, and [`Sigil::update_options`] replaces both under
//! one write lock. A call therefore never sees half of an update.

use crate::attach::{AttachMode, Attacher};
use crate::config::{Options, OptionsUpdate};
use crate::registry::{self, ActiveRegistry, Registry};
use crate::validate::{InheritanceValidator, ValidateOptions};
use crate::{Class, Identity, Instance, SigilError, label};
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Sigil> = LazyLock::new(Sigil::new);

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug)]
struct State {
    options: Options,
    registry: Option<Arc<Registry>>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            options: Options::default(),
            registry: Some(Arc::new(Registry::new())),
        }
    }
}

/// Options and registry as seen by one identification call.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub(crate) options: Options,
    pub(crate) registry: Option<Arc<Registry>>,
}

// =============================================================================
// SIGIL
// =============================================================================

/// Identity service: configuration, registry, attach and validate.
#[derive(Debug, Default)]
pub struct Sigil {
    state: RwLock<State>,
}

impl Sigil {
    /// Create an isolated service with default options and an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an isolated service and apply `update` to it.
    pub fn with_options(update: OptionsUpdate) -> Result<Self, SigilError> {
        let sigil = Self::new();
        sigil.update_options(update)?;
        Ok(sigil)
    }

    /// The process-wide service.
    #[must_use]
    pub fn global() -> &'static Sigil {
        &GLOBAL
    }

    /// Restore default options and a fresh, empty registry.
    ///
    /// Classes identified before the reset keep their metadata.
    pub fn reset(&self) {
        let mut state = self.state.write();
        if state.options.expose_registry
            && let Some(current) = &state.registry
        {
            registry::withdraw(current);
        }
        *state = State::default();
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            options: state.options.clone(),
            registry: state.registry.clone(),
        }
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Current options.
    #[must_use]
    pub fn options(&self) -> Options {
        self.state.read().options.clone()
    }

    /// Apply `update` as a single unit.
    ///
    /// A registry replacement copies every entry of the current registry into
    /// the new one before switching. If that copy fails, nothing changes.
    pub fn update_options(&self, update: OptionsUpdate) -> Result<(), SigilError> {
        let mut state = self.state.write();

        let mut options = state.options.clone();
        options.apply(&update);

        let registry = match update.registry {
            None => state.registry.clone(),
            Some(None) => {
                tracing::info!("Registry disabled; label uniqueness is no longer enforced");
                None
            }
            Some(Some(next)) => {
                if let Some(current) = &state.registry {
                    next.merge(current, options.dev_mode)?;
                }
                tracing::info!(labels = next.len(), "Switched active registry");
                Some(next)
            }
        };

        if state.options.expose_registry
            && let Some(current) = &state.registry
        {
            registry::withdraw(current);
        }
        if options.expose_registry
            && let Some(next) = &registry
        {
            registry::publish(next);
        }

        state.options = options;
        state.registry = registry;
        Ok(())
    }

    /// Switch the active registry; `None` disables it.
    pub fn replace_registry(&self, registry: Option<Arc<Registry>>) -> Result<(), SigilError> {
        self.update_options(OptionsUpdate::new().registry(registry))
    }

    /// View of the active registry.
    #[must_use]
    pub fn registry(&self) -> ActiveRegistry {
        ActiveRegistry::new(self.state.read().registry.clone())
    }

    // =========================================================================
    // COMPONENT OPERATIONS
    // =========================================================================

    /// Attach `label` to `class` without any entry-point checks.
    ///
    /// The label rule still applies.
    pub fn attach(&self, class: &Class, label: &str) -> Result<Arc<Identity>, SigilError> {
        let ctx = self.snapshot();
        let label = label::normalize(&ctx.options, class.name(), Some(label))?;
        Attacher::attach(&ctx, class, &label, AttachMode::Explicit)
    }

    /// Run the inheritance validator on `class`.
    pub fn validate(&self, class: &Class, opts: ValidateOptions) -> Result<(), SigilError> {
        InheritanceValidator::validate(&self.snapshot(), class, opts)
    }

    /// Construct an instance of `class`.
    ///
    /// In dev mode the first construction of an identified class validates
    /// its ancestor chain.
    pub fn construct(&self, class: &Class) -> Result<Instance, SigilError> {
        if class.is_identified() {
            self.validate(class, ValidateOptions::default())?;
        }
        Ok(Instance::new(class.clone()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
