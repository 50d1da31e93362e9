//! # CLI Command Implementations

use super::Output;
use crate::report::{
    ClassReport, LabelReport, MembershipReport, SymbolReport, lineage_labels, registry_rows,
};
use crate::{AppError, Manifest, Workspace};
use serde::Serialize;
use sigil_core::{LabelRule, SymbolTable};
use std::path::Path;

/// Print `value` as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(path: &Path) -> Result<Workspace, AppError> {
    let manifest = Manifest::from_path(path)?;
    tracing::debug!(path = %path.display(), classes = manifest.classes.len(), "Loaded manifest");
    Workspace::build(&manifest)
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Build a manifest, construct every identified class and report them all.
pub fn cmd_check(path: &Path, out: Output) -> Result<bool, AppError> {
    let workspace = load(path)?;

    for class in workspace.classes().filter(|c| c.is_identified()) {
        workspace.sigil().construct(class)?;
    }

    let reports: Vec<ClassReport> = workspace.classes().map(ClassReport::from_class).collect();
    if out.json {
        print_json(&reports)?;
        return Ok(true);
    }

    for report in &reports {
        println!("{report}");
    }
    if !out.quiet {
        println!();
        println!(
            "{} classes, {} labels registered",
            reports.len(),
            workspace.sigil().registry().len()
        );
    }
    Ok(true)
}

// =============================================================================
// LINEAGE COMMAND
// =============================================================================

/// Print the lineage of one class.
pub fn cmd_lineage(path: &Path, class: &str, out: Output) -> Result<bool, AppError> {
    let workspace = load(path)?;
    let lineage = lineage_labels(workspace.class(class)?);

    if out.json {
        print_json(&lineage)?;
    } else {
        for (depth, label) in lineage.iter().enumerate() {
            println!("{depth:>3}  {label}");
        }
    }
    Ok(true)
}

// =============================================================================
// MEMBERSHIP COMMAND
// =============================================================================

/// Run a membership test against an instance of `value_class`.
pub fn cmd_is_of_type(
    path: &Path,
    type_class: &str,
    value_class: &str,
    strict: bool,
    out: Output,
) -> Result<bool, AppError> {
    let workspace = load(path)?;
    let ty = workspace.class(type_class)?;
    let value = workspace.construct(value_class)?;

    let result = if strict {
        ty.is_of_type_strict(&value)
    } else {
        ty.is_of_type(&value)
    };

    let report = MembershipReport {
        type_class: type_class.to_string(),
        value_class: value_class.to_string(),
        strict,
        result,
    };
    if out.json {
        print_json(&report)?;
    } else {
        let relation = if result { "is" } else { "is not" };
        let mode = if strict { " (strict)" } else { "" };
        println!("{value_class} {relation} of type {type_class}{mode}");
    }
    Ok(result)
}

// =============================================================================
// LABELS COMMAND
// =============================================================================

/// List the registry of a built manifest.
pub fn cmd_labels(path: &Path, out: Output) -> Result<bool, AppError> {
    let workspace = load(path)?;
    let registry = workspace.sigil().registry();
    let rows = registry_rows(&registry);

    if out.json {
        print_json(&rows)?;
        return Ok(true);
    }

    if !registry.is_enabled() && !out.quiet {
        println!("Registry disabled");
    }
    for row in &rows {
        println!("{}  {}", row.label, row.class);
    }
    Ok(true)
}

// =============================================================================
// LABEL UTILITIES
// =============================================================================

/// Print the symbol of a label.
pub fn cmd_symbol(label: &str, out: Output) -> Result<bool, AppError> {
    let report = SymbolReport {
        label: label.to_string(),
        symbol: SymbolTable::global().resolve(label).to_hex(),
    };

    if out.json {
        print_json(&report)?;
    } else {
        println!("{}", report.symbol);
    }
    Ok(true)
}

/// Check `label` against `pattern`, or the recommended format.
pub fn cmd_validate_label(label: &str, pattern: Option<&str>, out: Output) -> Result<bool, AppError> {
    let rule = match pattern {
        Some(pattern) => LabelRule::pattern(pattern)?,
        None => LabelRule::recommended()?,
    };

    let report = LabelReport {
        label: label.to_string(),
        rule: rule.to_string(),
        valid: rule.accepts(label),
    };
    if out.json {
        print_json(&report)?;
    } else if report.valid {
        println!("{label}: valid");
    } else {
        println!("{label}: does not satisfy {}", report.rule);
    }
    Ok(report.valid)
}
