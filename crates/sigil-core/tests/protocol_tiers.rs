//! # Protocol Tier Tests (T0-T5)
//!
//! If ANY tier fails, the identity protocol is INVALID.
//!
//! ## Tiers
//! - T0: Symbol Interning
//! - T1: Registry Uniqueness
//! - T2: Attachment & Lineage
//! - T3: Inheritance Validation
//! - T4: Entry Points & Queries
//! - T5: Configuration

use sigil_core::{
    Class, Instance, LabelRule, OptionsUpdate, Registry, Sigil, SigilError, Symbol, SymbolTable,
};
use std::sync::Arc;

fn dev() -> Sigil {
    Sigil::with_options(OptionsUpdate::new().dev_mode(true)).expect("sigil")
}

fn prod() -> Sigil {
    Sigil::with_options(OptionsUpdate::new().dev_mode(false)).expect("sigil")
}

// =============================================================================
// TIER T0: SYMBOL INTERNING
// =============================================================================

mod t0_symbols {
    use super::*;

    /// T0.1: Same label, same symbol, across repeated calls.
    #[test]
    fn same_label_same_symbol() {
        let table = SymbolTable::global();
        assert_eq!(table.resolve("@t0.Stable"), table.resolve("@t0.Stable"));
    }

    /// T0.2: A second, independently created table agrees with the global one.
    #[test]
    fn second_load_agrees() {
        let reloaded = SymbolTable::new();
        assert_eq!(
            SymbolTable::global().resolve("@t0.Reloaded"),
            reloaded.resolve("@t0.Reloaded")
        );
    }

    /// T0.3: Distinct labels never share a symbol.
    #[test]
    fn distinct_labels_distinct_symbols() {
        let table = SymbolTable::new();
        assert_ne!(table.resolve("@t0.A"), table.resolve("@t0.B"));
    }

    /// T0.4: Identified classes carry the symbol of their label.
    #[test]
    fn class_symbol_matches_label() {
        let sigil = dev();
        let base = sigil
            .sigilify("Base", None, Some("@t0.Base"))
            .expect("base");
        assert_eq!(base.symbol(), Some(Symbol::derive("@t0.Base")));
        assert_eq!(
            SymbolTable::global()
                .label_of(Symbol::derive("@t0.Base"))
                .as_deref(),
            Some("@t0.Base")
        );
    }
}

// =============================================================================
// TIER T1: REGISTRY UNIQUENESS
// =============================================================================

mod t1_registry {
    use super::*;

    /// T1.1: Two differently-named classes cannot share a label.
    #[test]
    fn duplicate_label_rejected() {
        let sigil = dev();
        sigil.sigilify("First", None, Some("@t1.X")).expect("first");

        let result = sigil.sigilify("Second", None, Some("@t1.X"));
        assert_eq!(
            result,
            Err(SigilError::DuplicateLabel {
                label: "@t1.X".to_string(),
                existing: "First".to_string(),
                incoming: "Second".to_string(),
            })
        );
    }

    /// T1.2: Same declared name in dev mode is treated as a re-evaluation.
    #[test]
    fn hot_reload_tolerated_in_dev() {
        let sigil = dev();
        let first = sigil.sigilify("Widget", None, Some("@t1.Widget")).expect("first");
        let reloaded = sigil
            .sigilify("Widget", None, Some("@t1.Widget"))
            .expect("reload");

        assert_eq!(reloaded.label().as_deref(), Some("@t1.Widget"));
        assert_eq!(sigil.registry().get("@t1.Widget"), Some(first));
    }

    /// T1.3: The same re-evaluation fails outside dev mode.
    #[test]
    fn hot_reload_rejected_in_prod() {
        let sigil = prod();
        sigil.sigilify("Widget", None, Some("@t1.Widget")).expect("first");

        let result = sigil.sigilify("Widget", None, Some("@t1.Widget"));
        assert!(matches!(result, Err(SigilError::DuplicateLabel { .. })));
    }

    /// T1.4: Re-identifying the exact same class is blocked before the registry.
    #[test]
    fn same_class_twice_is_reidentification() {
        let sigil = dev();
        let class = Class::new("Once");
        sigil.attach(&class, "@t1.Once").expect("first");

        let result = sigil.attach(&class, "@t1.Once");
        assert!(matches!(result, Err(SigilError::AlreadyIdentified { .. })));
        assert_eq!(sigil.registry().len(), 1);
    }

    /// T1.5: A disabled registry reports empty and never rejects.
    #[test]
    fn disabled_registry() {
        let sigil = prod();
        sigil.sigilify("Before", None, Some("@t1.Before")).expect("before");
        sigil.replace_registry(None).expect("disable");

        let registry = sigil.registry();
        assert!(!registry.has("@t1.Before"));
        assert!(registry.get("@t1.Before").is_none());
        assert!(registry.list_labels().is_empty());
        assert_eq!(registry.len(), 0);

        for name in ["One", "Two", "Three"] {
            sigil
                .sigilify(name, None, Some("@t1.Shared"))
                .expect("no uniqueness when disabled");
        }
    }

    /// T1.6: Replacing the registry carries prior registrations over.
    #[test]
    fn replace_registry_merges() {
        let sigil = dev();
        sigil.sigilify("Kept", None, Some("@t1.Kept")).expect("kept");

        let next = Arc::new(Registry::new());
        sigil.replace_registry(Some(Arc::clone(&next))).expect("replace");
        assert!(next.has("@t1.Kept"));

        let result = sigil.sigilify("Other", None, Some("@t1.Kept"));
        assert!(matches!(result, Err(SigilError::DuplicateLabel { .. })));
    }

    /// T1.7: Reference storage can be turned off.
    #[test]
    fn reference_storage_disabled() {
        let sigil = Sigil::with_options(OptionsUpdate::new().store_constructor(false))
            .expect("sigil");
        sigil.sigilify("Hidden", None, Some("@t1.Hidden")).expect("hidden");

        assert!(sigil.registry().has("@t1.Hidden"));
        assert!(sigil.registry().get("@t1.Hidden").is_none());
    }

    /// T1.8: Unregister and clear act on the active registry.
    #[test]
    fn unregister_and_clear() {
        let sigil = dev();
        sigil.sigilify("A", None, Some("@t1.A")).expect("a");
        sigil.sigilify("B", None, Some("@t1.B")).expect("b");

        assert!(sigil.registry().unregister("@t1.A"));
        assert_eq!(sigil.registry().list_labels(), vec!["@t1.B".to_string()]);
        sigil.registry().clear();
        assert!(sigil.registry().is_empty());
    }
}

// =============================================================================
// TIER T2: ATTACHMENT & LINEAGE
// =============================================================================

mod t2_lineage {
    use super::*;

    /// T2.1: Lineage is the parent's lineage plus the class's own symbol.
    #[test]
    fn lineage_extends_parent() {
        let sigil = dev();
        let a = sigil.sigilify("A", None, Some("@t2.A")).expect("a");
        let b = sigil.declare("B").extends(&a).label("@t2.B").build().expect("b");
        let c = sigil.declare("C").extends(&b).label("@t2.C").build().expect("c");

        let mut expected = b.lineage();
        expected.push(c.symbol().expect("symbol"));
        assert_eq!(c.lineage(), expected);
        assert_eq!(c.lineage().len(), 3);
        assert!(c.lineage_set().is_superset(&b.lineage_set()));
    }

    /// T2.2: Unidentified ancestors do not contribute to lineage.
    #[test]
    fn plain_ancestors_are_skipped() {
        let sigil = dev();
        let plain = Class::new("Plain");
        let base = sigil
            .sigilify("Base", Some(&plain), Some("@t2.Base"))
            .expect("base");

        assert_eq!(base.lineage(), vec![Symbol::derive("@t2.Base")]);
        assert!(plain.lineage().is_empty());
    }

    /// T2.3: Metadata lives on the class and is shared by every instance.
    #[test]
    fn instances_share_class_metadata() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t2.Base")).expect("base");
        let one = sigil.construct(&base).expect("one");
        let two = sigil.construct(&base).expect("two");

        assert_eq!(one.label(), two.label());
        assert_eq!(one.symbol(), base.symbol());
        assert_eq!(one.lineage(), base.lineage());
        assert_eq!(one.lineage_set(), base.lineage_set());
    }

    /// T2.4: Accessors return copies.
    #[test]
    fn accessors_are_defensive_copies() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t2.Base")).expect("base");

        let mut lineage = base.lineage();
        lineage.push(Symbol::derive("@t2.Intruder"));
        let mut set = base.lineage_set();
        set.insert(Symbol::derive("@t2.Intruder"));

        assert_eq!(base.lineage().len(), 1);
        assert_eq!(base.lineage_set().len(), 1);
    }

    /// T2.5: A failed attach leaves no partial identity.
    #[test]
    fn failed_attach_is_atomic() {
        let sigil = prod();
        sigil.sigilify("Owner", None, Some("@t2.Taken")).expect("owner");
        let class = Class::new("Late");

        assert!(sigil.attach(&class, "@t2.Taken").is_err());
        assert!(!class.is_identified());
        assert!(class.lineage().is_empty());
    }
}

// =============================================================================
// TIER T3: INHERITANCE VALIDATION
// =============================================================================

mod t3_validation {
    use super::*;

    /// T3.1: A subclass that forgot its identity fails on construction.
    #[test]
    fn forgotten_identity_fails() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t3.Base")).expect("base");
        let forgot = Class::extend(&base, "Forgot");

        let result = sigil.construct(&forgot);
        assert_eq!(
            result,
            Err(SigilError::AncestorLabelReused {
                label: "@t3.Base".to_string(),
                ancestor: "Base".to_string(),
                class: "Forgot".to_string(),
            })
        );
    }

    /// T3.2: With auto-fill the subclass is relabeled and stays a subtype.
    #[test]
    fn forgotten_identity_heals() {
        let sigil = Sigil::with_options(
            OptionsUpdate::new()
                .dev_mode(true)
                .autofill_on_collision(true),
        )
        .expect("sigil");
        let base = sigil.sigilify("Base", None, Some("@t3.Base")).expect("base");
        let forgot = Class::extend(&base, "Forgot");
        assert_eq!(forgot.label(), base.label());

        let instance = sigil.construct(&forgot).expect("construct");

        assert_ne!(forgot.label(), base.label());
        assert!(base.is_of_type(&instance));
        assert!(forgot.is_of_type(&instance));
        assert!(!forgot.is_of_type(&sigil.construct(&base).expect("base instance")));
        assert!(sigil.registry().has(&forgot.label().expect("label")));
    }

    /// T3.3: Validation happens once per class.
    #[test]
    fn validated_once() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t3.Base")).expect("base");
        assert!(!base.is_validated());

        sigil.construct(&base).expect("first");
        assert!(base.is_validated());
        sigil.construct(&base).expect("second");
    }

    /// T3.4: Production mode does not walk the chain.
    #[test]
    fn production_skips_walk() {
        let sigil = prod();
        let base = sigil.sigilify("Base", None, Some("@t3.Base")).expect("base");
        let forgot = Class::extend(&base, "Forgot");

        let instance = sigil.construct(&forgot).expect("construct");
        assert!(!forgot.is_validated());
        assert_eq!(instance.label().as_deref(), Some("@t3.Base"));
    }

    /// T3.5: The skip-ancestor-check switch disables the validator.
    #[test]
    fn skip_ancestor_check() {
        let sigil = Sigil::with_options(
            OptionsUpdate::new()
                .dev_mode(true)
                .skip_ancestor_check(true),
        )
        .expect("sigil");
        let base = sigil.sigilify("Base", None, Some("@t3.Base")).expect("base");
        let forgot = Class::extend(&base, "Forgot");

        assert!(sigil.construct(&forgot).is_ok());
    }

    /// T3.6: Per-declaration skip.
    #[test]
    fn declaration_skip() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t3.Base")).expect("base");
        let sub = sigil
            .declare("Sub")
            .extends(&base)
            .label("@t3.Sub")
            .skip_validation()
            .build()
            .expect("sub");

        assert!(!sub.is_validated());
        sigil.construct(&sub).expect("construct");
        assert!(sub.is_validated());
    }
}

// =============================================================================
// TIER T4: ENTRY POINTS & QUERIES
// =============================================================================

mod t4_queries {
    use super::*;

    /// T4.1: The reference round trip.
    #[test]
    fn round_trip() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t.Base")).expect("base");
        let sub = Class::extend(&base, "Sub");
        sigil.with_sigil(&sub, Some("@t.Sub")).expect("sub");

        assert_eq!(base.label().as_deref(), Some("@t.Base"));
        assert_eq!(sub.lineage().len(), 2);
        assert!(base.is_of_type(&sigil.construct(&sub).expect("sub instance")));
        assert!(!sub.is_of_type(&sigil.construct(&base).expect("base instance")));
    }

    /// T4.2: Reflexivity and transitivity.
    #[test]
    fn reflexive_and_transitive() {
        let sigil = dev();
        let a = sigil.sigilify("A", None, Some("@t4.A")).expect("a");
        let b = sigil.declare("B").extends(&a).label("@t4.B").build().expect("b");
        let c = sigil.declare("C").extends(&b).label("@t4.C").build().expect("c");

        let a1 = sigil.construct(&a).expect("a1");
        let b1 = sigil.construct(&b).expect("b1");
        let c1 = sigil.construct(&c).expect("c1");

        assert!(a.is_of_type(&a1));
        assert!(b.is_of_type(&c1));
        assert!(a.is_of_type(&b1));
        assert!(a.is_of_type(&c1));
    }

    /// T4.3: Strict test matches lineage prefixes only.
    #[test]
    fn strict_prefix() {
        let sigil = dev();
        let a = sigil.sigilify("A", None, Some("@t4.A")).expect("a");
        let b = sigil.declare("B").extends(&a).label("@t4.B").build().expect("b");

        let a1 = sigil.construct(&a).expect("a1");
        let b1 = sigil.construct(&b).expect("b1");

        assert!(a.is_of_type_strict(&b1));
        assert!(!b.is_of_type_strict(&a1));
        assert!(b.is_of_type_strict(&b1));
    }

    /// T4.4: A shared label satisfies the loose test but not the strict one.
    #[test]
    fn loose_without_strict_prefix() {
        let sigil = dev();
        sigil.replace_registry(None).expect("disable");
        let a = sigil.sigilify("A", None, Some("@x.A")).expect("a");
        let b = sigil.declare("B").extends(&a).label("@x.B").build().expect("b");
        let c = sigil.sigilify("C", None, Some("@x.B")).expect("c");

        let c1 = sigil.construct(&c).expect("c1");

        assert!(b.is_of_type(&c1));
        assert!(!b.is_of_type_strict(&c1));
        assert!(!a.is_of_type(&c1));
    }

    /// T4.5: Siblings are unrelated.
    #[test]
    fn siblings_unrelated() {
        let sigil = dev();
        let a = sigil.sigilify("A", None, Some("@t4.A")).expect("a");
        let left = sigil.declare("Left").extends(&a).label("@t4.Left").build().expect("l");
        let right = sigil
            .declare("Right")
            .extends(&a)
            .label("@t4.Right")
            .build()
            .expect("r");

        let r1 = sigil.construct(&right).expect("r1");
        assert!(!left.is_of_type(&r1));
        assert!(!left.is_of_type_strict(&r1));
        assert!(a.is_of_type(&r1));
    }

    /// T4.6: Non-instances and unidentified instances.
    #[test]
    fn is_instance() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t4.Base")).expect("base");
        let plain = Class::new("Plain");

        let identified = sigil.construct(&base).expect("identified");
        let unidentified = sigil.construct(&plain).expect("plain");
        let nothing: Option<Instance> = None;

        assert!(Class::is_sigil_instance(&identified));
        assert!(!Class::is_sigil_instance(&unidentified));
        assert!(!base.is_instance(&nothing));
        assert!(!base.is_of_type(&unidentified));
        assert!(!plain.is_of_type(&identified));
    }

    /// T4.7: Instance-level queries delegate to the class.
    #[test]
    fn instance_queries() {
        let sigil = dev();
        let a = sigil.sigilify("A", None, Some("@t4.A")).expect("a");
        let b = sigil.declare("B").extends(&a).label("@t4.B").build().expect("b");

        let a1 = sigil.construct(&a).expect("a1");
        let b1 = sigil.construct(&b).expect("b1");

        assert!(a1.is_of_type(&b1));
        assert!(!b1.is_of_type(&a1));
        assert!(a1.is_of_type_strict(&b1));
        assert!(a1.is_instance(&b1));
        assert_eq!(b1.class(), &b);
    }

    /// T4.8: Typed values behind smart pointers.
    #[test]
    fn typed_through_pointers() {
        let sigil = dev();
        let a = sigil.sigilify("A", None, Some("@t4.A")).expect("a");
        let boxed: Box<Instance> = Box::new(sigil.construct(&a).expect("a1"));
        let shared: Arc<Instance> = Arc::new(sigil.construct(&a).expect("a2"));

        assert!(a.is_of_type(&boxed));
        assert!(a.is_of_type(&shared));
    }

    /// T4.9: Misapplication errors are distinguishable.
    #[test]
    fn misapplication() {
        let sigil = dev();
        let base = sigil.sigilify("Base", None, Some("@t4.Base")).expect("base");

        assert!(matches!(
            sigil.sigilify("Again", Some(&base), None),
            Err(SigilError::BaseAlreadyIdentified { .. })
        ));
        assert!(matches!(
            sigil.with_sigil(&Class::new("Loose"), None),
            Err(SigilError::MissingSigilBase { entry: "with_sigil", .. })
        ));
        assert!(matches!(
            sigil.declare("Loose").build(),
            Err(SigilError::MissingSigilBase { entry: "declare", .. })
        ));
    }
}

// =============================================================================
// TIER T5: CONFIGURATION
// =============================================================================

mod t5_configuration {
    use super::*;

    /// T5.1: The label rule rejects non-conforming labels at identification.
    #[test]
    fn label_rule_enforced() {
        let sigil = Sigil::with_options(
            OptionsUpdate::new().label_rule(Some(LabelRule::recommended().expect("recommended"))),
        )
        .expect("sigil");

        assert!(sigil.sigilify("Good", None, Some("@t5/pkg.Good")).is_ok());
        assert!(matches!(
            sigil.sigilify("Bad", None, Some("bad label")),
            Err(SigilError::InvalidLabel { .. })
        ));
    }

    /// T5.2: Updates are not retroactive.
    #[test]
    fn updates_not_retroactive() {
        let sigil = dev();
        let early = sigil.sigilify("Early", None, Some("early")).expect("early");

        sigil
            .update_options(
                OptionsUpdate::new()
                    .label_rule(Some(LabelRule::recommended().expect("recommended"))),
            )
            .expect("update");

        assert_eq!(early.label().as_deref(), Some("early"));
        assert!(sigil.sigilify("Late", None, Some("late")).is_err());
    }

    /// T5.3: Invalid patterns are rejected before anything changes.
    #[test]
    fn invalid_pattern() {
        assert!(matches!(
            LabelRule::pattern("(["),
            Err(SigilError::InvalidPattern { .. })
        ));
    }
}
