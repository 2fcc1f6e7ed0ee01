//! Core library for metadoc, extracting the documented public surface of compiled modules.
//!
//! An import reads the type definitions of a module through a [`metadata::MetadataReader`],
//! turns each selected type into an [`Entity`] with its members, inheritance chain and syntax
//! lines, then merges prose from the module's XML documentation sidecar. The result is
//! UI-agnostic and serializes to JSON for any frontend.

/// Raw metadata records and the reader boundary.
pub mod metadata;

/// Readable names for generic and aliased types.
pub mod names;

/// Canonical member keys shared with the documentation sidecar.
pub mod signature;

/// The documentation model produced by an import.
pub mod model;

/// Entity construction from type records.
pub mod builder;

/// Sidecar loading, markup transformation and documentation merge.
pub mod docs;

/// Core API for metadoc operations.
pub mod core_api;

pub use crate::core_api::{
	ImportError, ImportOptions, ImportWarning, ImportedModule, Result, TypeImporter,
	import_module, resolve_documentation,
};
pub use crate::model::{Entity, EntityKind, Event, Method, Modifiers, Property, Scope};
