//! # Labels
//!
//! Normalization of developer-chosen labels and generation of automatic ones.

use crate::primitives::AUTO_LABEL_SCOPE;
use crate::{Options, SigilError};
use uuid::Uuid;

/// Generate a fresh random label for `class_name`.
///
/// Generated labels are unique per call and are never checked against the
/// configured label rule.
#[must_use]
pub fn generate(class_name: &str) -> String {
    format!("{AUTO_LABEL_SCOPE}/{}.{class_name}", Uuid::new_v4().simple())
}

/// Whether `label` was produced by [`generate`].
#[must_use]
pub fn is_generated(label: &str) -> bool {
    label
        .strip_prefix(AUTO_LABEL_SCOPE)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Resolve the label an entry point will attach.
///
/// - `None` generates a label.
/// - Explicit labels are trimmed, must be non-empty and must satisfy the
///   configured rule.
pub(crate) fn normalize(
    options: &Options,
    class_name: &str,
    label: Option<&str>,
) -> Result<String, SigilError> {
    let Some(raw) = label else {
        return Ok(generate(class_name));
    };

    let label = raw.trim();
    if label.is_empty() {
        return Err(SigilError::InvalidLabel {
            label: raw.to_string(),
            class: class_name.to_string(),
            reason: "label is empty".to_string(),
        });
    }

    if let Some(rule) = &options.label_rule
        && !rule.accepts(label)
    {
        return Err(SigilError::InvalidLabel {
            label: label.to_string(),
            class: class_name.to_string(),
            reason: format!("does not satisfy {rule}"),
        });
    }

    Ok(label.to_string())
}
