//! # sigil-core
//!
//! Nominal identity for structurally-typed classes - THE PROTOCOL.
//!
//! Classes are given a label, the label resolves to a stable [`Symbol`], and
//! each class records the chain of symbols of its identified ancestors (its
//! lineage). Membership tests then read only that frozen metadata:
//!
//! - [`Class::is_of_type`]: O(1) lineage-set membership
//! - [`Class::is_of_type_strict`]: O(depth) lineage prefix match
//!
//! Symbols are derived from labels, not allocated, so identity survives
//! duplicated copies of the code that declares a class.
//!
//! ## Example
//!
//! ```
//! use sigil_core::{OptionsUpdate, Sigil};
//!
//! # fn main() -> Result<(), sigil_core::SigilError> {
//! let sigil = Sigil::with_options(OptionsUpdate::new().dev_mode(true))?;
//! let base = sigil.sigilify("Base", None, Some("@t.Base"))?;
//! let sub = sigil.declare("Sub").extends(&base).label("@t.Sub").build()?;
//!
//! let instance = sigil.construct(&sub)?;
//! assert!(base.is_of_type(&instance));
//! assert!(!sub.is_of_type(&sigil.construct(&base)?));
//! assert_eq!(sub.lineage().len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architectural Constraints
//!
//! - Synchronous: nothing suspends, every call completes before returning
//! - In-memory: no persisted state
//! - Identity metadata is immutable once bound

// =============================================================================
// MODULES
// =============================================================================

mod attach;
pub mod class;
pub mod config;
pub mod facade;
pub mod label;
pub mod primitives;
pub mod registry;
pub mod runtime;
pub mod symbol;
pub mod types;
pub mod validate;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Identity, SigilError, Symbol};

// =============================================================================
// RE-EXPORTS: Protocol
// =============================================================================

pub use class::{Class, Instance, Typed};
pub use facade::ClassBuilder;
pub use registry::{ActiveRegistry, RegisterOptions, Registry, RegistryEntry, shared_registry};
pub use runtime::Sigil;
pub use symbol::SymbolTable;
pub use validate::ValidateOptions;

// =============================================================================
// RE-EXPORTS: Configuration
// =============================================================================

pub use config::{LabelRule, Options, OptionsUpdate, SigilConfig};
pub use primitives::{RECOMMENDED_LABEL_PATTERN, SHARED_REGISTRY_KEY};
