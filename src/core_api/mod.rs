//! Top-level import API.
//!
//! [`TypeImporter`] drives one query end to end: it reads the module through a
//! [`MetadataReader`], builds an [`Entity`] per selected type and merges the sidecar
//! documentation. Each query owns its resolution session, so nothing carries over between
//! imports.

/// Error helpers for the core API.
pub mod error;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use self::error::{ImportError, ImportWarning, Result};
use crate::builder::EntityBuilder;
use crate::docs::{self, DEFAULT_LINK_SCHEME, DocResolver, Sidecar, TransformOptions};
use crate::metadata::{JsonMetadataReader, MetadataReader, ResolutionSession, TypeRecord};
use crate::model::Entity;
use crate::names::{GenericNameFormat, format_generic_name, strip_arity};

/// File extension of the documentation sidecar.
pub const SIDECAR_EXTENSION: &str = "xml";

/// Immutable configuration of one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
	/// Type names to import; empty imports every type.
	pub types: Vec<String>,
	/// Report only members declared on the type itself.
	pub declared_only: bool,
	/// Merge documentation from the sidecar.
	pub parse_documentation: bool,
	/// Copy description and category attributes onto entities and members.
	pub parse_description_attributes: bool,
	/// Reflow documentation prose.
	pub word_wrap: bool,
	/// Include private methods and private accessors.
	pub include_private: bool,
	/// Produce entities without member collections.
	pub skip_members: bool,
	/// Sidecar location; derived from the module path when absent.
	pub sidecar_path: Option<PathBuf>,
	/// Scheme prepended to cross-reference targets that are not web links.
	pub link_scheme: String,
}

impl Default for ImportOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl ImportOptions {
	/// Default options: declared members only, documentation parsed and reflowed.
	pub fn new() -> Self {
		Self {
			types: Vec::new(),
			declared_only: true,
			parse_documentation: true,
			parse_description_attributes: false,
			word_wrap: true,
			include_private: false,
			skip_members: false,
			sidecar_path: None,
			link_scheme: DEFAULT_LINK_SCHEME.to_string(),
		}
	}

	/// Restrict the import to a comma-delimited list of type names.
	pub fn with_type_filter(mut self, filter: &str) -> Self {
		self.types = filter
			.split(',')
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.map(str::to_string)
			.collect();
		self
	}

	/// Restrict the import to the given type names.
	pub fn with_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.types = types.into_iter().map(Into::into).collect();
		self
	}

	/// Report inherited members as well as declared ones.
	pub fn with_inherited_members(mut self, enabled: bool) -> Self {
		self.declared_only = !enabled;
		self
	}

	/// Enables or disables sidecar documentation.
	pub fn with_documentation(mut self, enabled: bool) -> Self {
		self.parse_documentation = enabled;
		self
	}

	/// Enables or disables description and category attributes.
	pub fn with_description_attributes(mut self, enabled: bool) -> Self {
		self.parse_description_attributes = enabled;
		self
	}

	/// Enables or disables reflow of documentation prose.
	pub fn with_word_wrap(mut self, enabled: bool) -> Self {
		self.word_wrap = enabled;
		self
	}

	/// Enables or disables private methods and accessors.
	pub fn with_private_members(mut self, enabled: bool) -> Self {
		self.include_private = enabled;
		self
	}

	/// Enables or disables member collections.
	pub fn with_skip_members(mut self, enabled: bool) -> Self {
		self.skip_members = enabled;
		self
	}

	/// Read documentation from an explicit sidecar path.
	pub fn with_sidecar(mut self, path: impl Into<PathBuf>) -> Self {
		self.sidecar_path = Some(path.into());
		self
	}

	/// Sets the scheme used for non-web cross-reference links.
	pub fn with_link_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.link_scheme = scheme.into();
		self
	}

	/// Sidecar path for a module at `module_path`.
	pub fn sidecar_for(&self, module_path: &Path) -> PathBuf {
		self.sidecar_path
			.clone()
			.unwrap_or_else(|| module_path.with_extension(SIDECAR_EXTENSION))
	}

	/// Options handed to the markup transformer.
	pub fn transform_options(&self) -> TransformOptions {
		TransformOptions {
			wrap: self.word_wrap,
			link_scheme: self.link_scheme.clone(),
		}
	}

	fn validate(&self) -> Result<()> {
		if self.sidecar_path.is_some() && !self.parse_documentation {
			return Err(ImportError::InvalidOptions(
				"a sidecar path was given but documentation parsing is disabled".into(),
			));
		}
		if self.parse_documentation && self.link_scheme.is_empty() {
			return Err(ImportError::InvalidOptions("link scheme must not be empty".into()));
		}
		Ok(())
	}

	/// Whether `record` passes the type allow-list.
	///
	/// A listed name matches the raw name, the name without its arity marker, the generic
	/// display name or the full name.
	pub fn selects(&self, record: &TypeRecord) -> bool {
		if self.types.is_empty() {
			return true;
		}
		let bare = strip_arity(&record.name).unwrap_or(&record.name);
		let display = format_generic_name(&record.to_type_ref(), GenericNameFormat::TypeName);
		let full_name = record.full_name();
		self.types.iter().any(|name| {
			name == &record.name || name == bare || name == &display || name == &full_name
		})
	}
}

/// Entities produced by one import, with the failures that were absorbed on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportedModule {
	/// Module name reported by the reader.
	pub module_name: String,
	/// Module file name.
	pub assembly: String,
	/// Entities in declaration order.
	pub entities: Vec<Entity>,
	/// Soft failures in the order they occurred.
	pub warnings: Vec<ImportWarning>,
}

impl ImportedModule {
	/// Most recent soft failure.
	pub fn last_warning(&self) -> Option<&ImportWarning> {
		self.warnings.last()
	}

	/// Message of the most recent soft failure.
	pub fn error_message(&self) -> Option<String> {
		self.last_warning().map(ToString::to_string)
	}

	/// Pretty-printed JSON rendering of the whole result.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Find an entity by display, raw or full name.
	pub fn entity(&self, name: &str) -> Option<&Entity> {
		self.entities.iter().find(|entity| {
			entity.name == name || entity.raw_name == name || entity.full_name() == name
		})
	}
}

/// Imports documented entities from a module.
#[derive(Debug, Clone)]
pub struct TypeImporter<R = JsonMetadataReader> {
	reader: R,
	options: ImportOptions,
}

impl Default for TypeImporter<JsonMetadataReader> {
	fn default() -> Self {
		Self::new(JsonMetadataReader::new(), ImportOptions::default())
	}
}

impl<R: MetadataReader> TypeImporter<R> {
	/// Create an importer reading modules through `reader`.
	pub fn new(reader: R, options: ImportOptions) -> Self {
		Self { reader, options }
	}

	/// Options applied to every import.
	pub fn options(&self) -> &ImportOptions {
		&self.options
	}

	/// Import every selected type of the module at `path`.
	///
	/// Only an unreadable module fails the call. Unresolved base types and sidecar or markup
	/// problems are recorded as warnings on the result.
	pub fn import(&self, path: &Path) -> Result<ImportedModule> {
		self.options.validate()?;
		let module = self.reader.read_module(path)?;
		let assembly = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| module.name.clone());

		let session = ResolutionSession::new(&module);
		let mut builder = EntityBuilder::new(&session, &self.options, assembly.clone());
		let entities: Vec<Entity> = module
			.types
			.iter()
			.filter(|record| self.options.selects(record))
			.filter_map(|record| builder.build(record))
			.collect();
		let mut warnings = builder.into_warnings();

		let mut imported = ImportedModule {
			module_name: module.name.clone(),
			assembly,
			entities,
			warnings: Vec::new(),
		};
		if self.options.parse_documentation {
			self.attach_documentation(path, &mut imported.entities, &mut warnings);
		}
		imported.warnings = warnings;

		info!(
			module = %imported.module_name,
			entities = imported.entities.len(),
			warnings = imported.warnings.len(),
			"import finished"
		);
		Ok(imported)
	}

	fn attach_documentation(
		&self,
		module_path: &Path,
		entities: &mut [Entity],
		warnings: &mut Vec<ImportWarning>,
	) {
		let sidecar_path = self.options.sidecar_for(module_path);
		if !sidecar_path.exists() {
			debug!(path = %sidecar_path.display(), "no documentation sidecar");
			return;
		}

		let sidecar = match Sidecar::load(&sidecar_path) {
			Ok(sidecar) => sidecar,
			Err(err) => {
				warn!(path = %sidecar_path.display(), error = %err, "documentation skipped");
				warnings.push(ImportWarning::SidecarUnavailable {
					path: sidecar_path,
					message: err.to_string(),
				});
				return;
			}
		};

		let resolver = DocResolver::new(&sidecar, self.options.transform_options());
		for entity in entities.iter_mut() {
			warnings.extend(resolver.resolve(entity));
		}
		debug!(
			path = %sidecar_path.display(),
			entries = sidecar.len(),
			"documentation merged"
		);
	}
}

/// Import a JSON metadata dump with the given options.
pub fn import_module(path: &Path, options: ImportOptions) -> Result<ImportedModule> {
	TypeImporter::new(JsonMetadataReader::new(), options).import(path)
}

/// Attach sidecar documentation at `sidecar_path` to an already built entity.
///
/// Fails only when the sidecar cannot be loaded; a sidecar without matching entries leaves the
/// entity untouched.
pub fn resolve_documentation(
	entity: &mut Entity,
	sidecar_path: &Path,
	options: &ImportOptions,
) -> Result<Vec<ImportWarning>> {
	Ok(docs::resolve_from_path(
		entity,
		sidecar_path,
		options.transform_options(),
	)?)
}
