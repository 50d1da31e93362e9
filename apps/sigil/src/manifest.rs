//! # Manifest
//!
//! TOML description of a class hierarchy, and the [`Workspace`] built from it.
//!
//! Classes are declared in file order, so a class may only extend a class
//! listed above it.

use crate::AppError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sigil_core::{Class, Instance, Sigil, SigilConfig};
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// MANIFEST FORMAT
// =============================================================================

/// Which entry point identifies a declared class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    Sigilify,
    Declare,
    WithSigil,
    /// Declared without identifying it.
    #[default]
    Plain,
}

/// One `[[class]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub entry: EntryPoint,
}

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub options: SigilConfig,
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassDecl>,
}

impl FromStr for Manifest {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }
}

// =============================================================================
// WORKSPACE
// =============================================================================

/// An isolated [`Sigil`] holding the classes of one manifest.
#[derive(Debug)]
pub struct Workspace {
    sigil: Sigil,
    classes: IndexMap<String, Class>,
}

impl Workspace {
    /// Apply the manifest options and declare every class in order.
    pub fn build(manifest: &Manifest) -> Result<Self, AppError> {
        let sigil = Sigil::with_options(manifest.options.clone().into_update()?)?;
        let mut classes: IndexMap<String, Class> = IndexMap::with_capacity(manifest.classes.len());

        for decl in &manifest.classes {
            if classes.contains_key(&decl.name) {
                return Err(AppError::Manifest(format!(
                    "class '{}' is declared twice",
                    decl.name
                )));
            }
            let parent = match &decl.extends {
                Some(parent) => Some(classes.get(parent).cloned().ok_or_else(|| {
                    AppError::Manifest(format!(
                        "class '{}' extends '{}', which is not declared above it",
                        decl.name, parent
                    ))
                })?),
                None => None,
            };

            let class = Self::declare(&sigil, decl, parent.as_ref())?;
            let label = class.label();
            tracing::debug!(
                class = %decl.name,
                entry = ?decl.entry,
                label = label.as_deref().unwrap_or("-"),
                "Declared class"
            );
            classes.insert(decl.name.clone(), class);
        }

        tracing::info!(classes = classes.len(), "Workspace built");
        Ok(Self { sigil, classes })
    }

    fn declare(sigil: &Sigil, decl: &ClassDecl, parent: Option<&Class>) -> Result<Class, AppError> {
        let name = decl.name.as_str();
        let label = decl.label.as_deref();
        let plain = || match parent {
            Some(parent) => Class::extend(parent, name),
            None => Class::new(name),
        };

        let class = match decl.entry {
            EntryPoint::Sigilify => sigil.sigilify(name, parent, label)?,
            EntryPoint::Declare => {
                let mut builder = sigil.declare(name);
                if let Some(parent) = parent {
                    builder = builder.extends(parent);
                }
                if let Some(label) = label {
                    builder = builder.label(label);
                }
                builder.build()?
            }
            EntryPoint::WithSigil => sigil.with_sigil(&plain(), label)?,
            EntryPoint::Plain => {
                if label.is_some() {
                    return Err(AppError::Manifest(format!(
                        "class '{name}' has a label but no entry point"
                    )));
                }
                plain()
            }
        };
        Ok(class)
    }

    /// The service the classes were declared against.
    pub fn sigil(&self) -> &Sigil {
        &self.sigil
    }

    /// Look up a declared class by name.
    pub fn class(&self, name: &str) -> Result<&Class, AppError> {
        self.classes
            .get(name)
            .ok_or_else(|| AppError::UnknownClass(name.to_string()))
    }

    /// Declared classes, in manifest order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    /// Construct an instance of a declared class.
    pub fn construct(&self, name: &str) -> Result<Instance, AppError> {
        Ok(self.sigil.construct(self.class(name)?)?)
    }
}
