//! # sigil
//!
//! Command-line inspector for sigil identities.
//!
//! A manifest declares a class hierarchy and the options it runs under; the
//! CLI builds the hierarchy through the regular entry points and reports
//! labels, lineages and membership results.
//!
//! ```toml
//! [options]
//! dev_mode = true
//! recommended_labels = true
//!
//! [[class]]
//! name = "Base"
//! label = "@app.Base"
//! entry = "sigilify"
//!
//! [[class]]
//! name = "Sub"
//! extends = "Base"
//! label = "@app.Sub"
//! entry = "declare"
//! ```

pub mod cli;
pub mod error;
pub mod manifest;
pub mod report;

pub use error::AppError;
pub use manifest::{ClassDecl, EntryPoint, Manifest, Workspace};
