//! # Configuration
//!
//! Process-wide options for identification calls.
//!
//! Options change only through [`Sigil::update_options`](crate::Sigil::update_options),
//! which applies an [`OptionsUpdate`] as a single unit. Changes affect
//! identification calls made afterwards; classes identified earlier keep
//! their metadata.
//!
//! [`SigilConfig`] is the serde form of the same options, for loading from
//! configuration files.

use crate::primitives::RECOMMENDED_LABEL_PATTERN;
use crate::{Registry, SigilError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

static RECOMMENDED: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(RECOMMENDED_LABEL_PATTERN));

// =============================================================================
// LABEL RULE
// =============================================================================

type LabelPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Rule a developer-chosen label must satisfy.
#[derive(Clone)]
pub enum LabelRule {
    /// Label must match the regular expression.
    Pattern(Regex),
    /// Label must satisfy the predicate.
    Predicate(LabelPredicate),
}

impl LabelRule {
    /// Compile a pattern rule.
    pub fn pattern(pattern: &str) -> Result<Self, SigilError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| SigilError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Wrap a predicate.
    pub fn predicate(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(check))
    }

    /// The recommended `@scope[/scope...].UppercaseName` format.
    ///
    /// Compiled once per process.
    pub fn recommended() -> Result<Self, SigilError> {
        RECOMMENDED
            .as_ref()
            .map(|regex| Self::Pattern(regex.clone()))
            .map_err(|e| SigilError::InvalidPattern {
                pattern: RECOMMENDED_LABEL_PATTERN.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether `label` satisfies the rule.
    #[must_use]
    pub fn accepts(&self, label: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(label),
            Self::Predicate(check) => check(label),
        }
    }
}

impl fmt::Debug for LabelRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl fmt::Display for LabelRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(regex) => write!(f, "pattern {}", regex.as_str()),
            Self::Predicate(_) => f.write_str("custom label predicate"),
        }
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Effective options of a [`Sigil`](crate::Sigil).
#[derive(Debug, Clone)]
pub struct Options {
    /// Rule applied to developer-chosen labels.
    pub label_rule: Option<LabelRule>,
    /// Disable the inheritance validator entirely.
    pub skip_ancestor_check: bool,
    /// Relabel a subclass that silently inherited its ancestor's label
    /// instead of failing.
    pub autofill_on_collision: bool,
    /// Gate for development-only checks and the lenient duplicate path.
    pub dev_mode: bool,
    /// Publish the active registry as shared process state.
    pub expose_registry: bool,
    /// Keep class references in registry entries.
    pub store_constructor: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            label_rule: None,
            skip_ancestor_check: false,
            autofill_on_collision: false,
            dev_mode: cfg!(debug_assertions),
            expose_registry: false,
            store_constructor: true,
        }
    }
}

impl Options {
    pub(crate) fn apply(&mut self, update: &OptionsUpdate) {
        if let Some(rule) = &update.label_rule {
            self.label_rule.clone_from(rule);
        }
        if let Some(skip) = update.skip_ancestor_check {
            self.skip_ancestor_check = skip;
        }
        if let Some(autofill) = update.autofill_on_collision {
            self.autofill_on_collision = autofill;
        }
        if let Some(dev) = update.dev_mode {
            self.dev_mode = dev;
        }
        if let Some(expose) = update.expose_registry {
            self.expose_registry = expose;
        }
        if let Some(store) = update.store_constructor {
            self.store_constructor = store;
        }
    }
}

// =============================================================================
// OPTIONS UPDATE
// =============================================================================

/// Merge patch for [`Options`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct OptionsUpdate {
    pub label_rule: Option<Option<LabelRule>>,
    pub skip_ancestor_check: Option<bool>,
    pub autofill_on_collision: Option<bool>,
    pub dev_mode: Option<bool>,
    pub expose_registry: Option<bool>,
    pub store_constructor: Option<bool>,
    /// Replace the active registry. `Some(None)` disables it.
    pub registry: Option<Option<Arc<Registry>>>,
}

impl OptionsUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label_rule(mut self, rule: Option<LabelRule>) -> Self {
        self.label_rule = Some(rule);
        self
    }

    #[must_use]
    pub fn skip_ancestor_check(mut self, skip: bool) -> Self {
        self.skip_ancestor_check = Some(skip);
        self
    }

    #[must_use]
    pub fn autofill_on_collision(mut self, autofill: bool) -> Self {
        self.autofill_on_collision = Some(autofill);
        self
    }

    #[must_use]
    pub fn dev_mode(mut self, dev: bool) -> Self {
        self.dev_mode = Some(dev);
        self
    }

    #[must_use]
    pub fn expose_registry(mut self, expose: bool) -> Self {
        self.expose_registry = Some(expose);
        self
    }

    #[must_use]
    pub fn store_constructor(mut self, store: bool) -> Self {
        self.store_constructor = Some(store);
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: Option<Arc<Registry>>) -> Self {
        self.registry = Some(registry);
        self
    }
}

// =============================================================================
// FILE CONFIGURATION
// =============================================================================

/// Serializable options, e.g. the `[options]` table of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigilConfig {
    /// Regular expression every explicit label must match.
    pub label_pattern: Option<String>,
    /// Use the recommended label format (ignored when `label_pattern` is set).
    pub recommended_labels: Option<bool>,
    pub skip_ancestor_check: Option<bool>,
    pub autofill_on_collision: Option<bool>,
    pub dev_mode: Option<bool>,
    pub expose_registry: Option<bool>,
    pub store_constructor: Option<bool>,
    /// `false` disables the registry; `true` switches to a fresh one
    /// (merging existing entries).
    pub registry_enabled: Option<bool>,
}

impl SigilConfig {
    /// Convert into an update, compiling the label pattern.
    pub fn into_update(self) -> Result<OptionsUpdate, SigilError> {
        let label_rule = match (self.label_pattern, self.recommended_labels) {
            (Some(pattern), _) => Some(Some(LabelRule::pattern(&pattern)?)),
            (None, Some(true)) => Some(Some(LabelRule::recommended()?)),
            (None, Some(false)) => Some(None),
            (None, None) => None,
        };
        let registry = self
            .registry_enabled
            .map(|enabled| enabled.then(|| Arc::new(Registry::new())));

        Ok(OptionsUpdate {
            label_rule,
            skip_ancestor_check: self.skip_ancestor_check,
            autofill_on_collision: self.autofill_on_collision,
            dev_mode: self.dev_mode,
            expose_registry: self.expose_registry,
            store_constructor: self.store_constructor,
            registry,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
