//! Builds [`Entity`] values from raw type records.
//!
//! The builder applies the filtering and inheritance policy of an [`ImportOptions`] value, names
//! types and members through the generic name formatter and assigns each member its canonical
//! sidecar key. Documentation is attached later by the resolver in [`crate::docs`].
#![allow(clippy::missing_docs_in_private_items)]

mod members;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core_api::{ImportOptions, ImportWarning};
use crate::metadata::{
	ROOT_TYPE, ResolutionSession, TypeAttributes, TypeRecord, TypeRef, attribute_argument,
};
use crate::model::{Entity, EntityKind, Modifiers, Scope, syntax};
use crate::names::{GenericNameFormat, format_generic_name, type_alias};
use crate::signature::type_signature;

/// Base type names that mark a delegate.
const DELEGATE_BASES: [&str; 2] = ["MulticastDelegate", "Delegate"];

/// Base type names that are not reported as a base.
const UNREPORTED_BASES: [&str; 3] = ["Object", "Enum", "Delegate"];

/// Attribute carrying a human description.
pub(crate) const DESCRIPTION_ATTRIBUTE: &str = "DescriptionAttribute";
/// Attribute carrying a category name.
pub(crate) const CATEGORY_ATTRIBUTE: &str = "CategoryAttribute";

/// Converts type records of one module into entities.
///
/// Warnings for absorbed failures accumulate on the builder and are drained with
/// [`EntityBuilder::into_warnings`].
#[derive(Debug)]
pub struct EntityBuilder<'q, 'm> {
	session: &'q ResolutionSession<'m>,
	options: &'q ImportOptions,
	assembly: String,
	warnings: Vec<ImportWarning>,
}

impl<'q, 'm> EntityBuilder<'q, 'm> {
	/// Create a builder for one query.
	pub fn new(
		session: &'q ResolutionSession<'m>,
		options: &'q ImportOptions,
		assembly: impl Into<String>,
	) -> Self {
		Self {
			session,
			options,
			assembly: assembly.into(),
			warnings: Vec::new(),
		}
	}

	/// Build the entity for `record`, or `None` for compiler-synthesized types.
	pub fn build(&mut self, record: &TypeRecord) -> Option<Entity> {
		if record.is_synthesized() {
			debug!(name = %record.name, "skipping synthesized type");
			return None;
		}

		let name = if record.generic_parameters.is_empty() {
			record.name.clone()
		} else {
			format_generic_name(&record.to_type_ref(), GenericNameFormat::TypeName)
		};
		let kind = classify(record);
		let scope = Scope::from(record.visibility);
		let modifiers = type_modifiers(record);
		let base_type = record.base_type.as_ref().and_then(base_type_name);

		let mut entity = Entity {
			formatted_name: type_alias(&name),
			syntax: syntax::entity_syntax(scope, modifiers, kind, &name, base_type.as_deref()),
			name,
			raw_name: record.name.clone(),
			namespace: record.namespace.clone(),
			signature: type_signature(record),
			assembly: self.assembly.clone(),
			kind,
			scope,
			modifiers,
			base_type,
			interfaces: interface_names(record),
			inheritance_chain: self.inheritance_chain(record),
			..Entity::default()
		};

		if self.options.parse_description_attributes {
			let attributes = &record.custom_attributes;
			entity.description = attribute_argument(attributes, DESCRIPTION_ATTRIBUTE)
				.unwrap_or_default()
				.to_string();
			entity.category = attribute_argument(attributes, CATEGORY_ATTRIBUTE)
				.unwrap_or_default()
				.to_string();
		}

		if !self.options.skip_members {
			let chain = self.member_sources(record);
			entity.methods = members::methods(&entity, &chain, self.options);
			entity.fields = members::fields(&entity, &chain, self.options);
			entity.properties = members::properties(&chain, self.options);
			entity.events = members::events(&chain, self.options);
		}

		Some(entity)
	}

	/// Warnings recorded so far.
	pub fn warnings(&self) -> &[ImportWarning] {
		&self.warnings
	}

	/// Consume the builder, returning its warnings.
	pub fn into_warnings(self) -> Vec<ImportWarning> {
		self.warnings
	}

	/// Ancestor names from the root down to `record` itself.
	///
	/// The walk stops at the root type, at the first base that fails to resolve, and at the
	/// first base that was already visited.
	fn inheritance_chain<'r>(&mut self, record: &'r TypeRecord) -> Vec<String>
	where
		'm: 'r,
	{
		let mut chain = Vec::new();
		let mut visited = HashSet::new();
		let mut current = record;

		loop {
			chain.push(chain_name(current));
			visited.insert(current.full_name());

			let Some(base) = current.base_type.as_ref() else {
				break;
			};
			if base.element_full_name() == ROOT_TYPE {
				chain.push(ROOT_TYPE.to_string());
				break;
			}
			match self.session.resolve(base) {
				Ok(resolved) if visited.contains(&resolved.full_name()) => break,
				Ok(resolved) => current = resolved,
				Err(err) => {
					self.unresolved_base(record, base, &err.to_string());
					break;
				}
			}
		}

		chain.reverse();
		chain
	}

	/// Records whose members are reported: the type itself, then its ancestors when
	/// inherited members are requested.
	fn member_sources<'r>(&self, record: &'r TypeRecord) -> Vec<MemberSource<'r>>
	where
		'm: 'r,
	{
		let owner = record.full_name();
		let mut sources = vec![MemberSource {
			record,
			full_name: owner.clone(),
			inherited: false,
		}];
		if self.options.declared_only {
			return sources;
		}

		let mut visited: HashSet<String> = HashSet::from([owner]);
		let mut current = record;
		while let Some(base) = current.base_type.as_ref() {
			let resolved: &'r TypeRecord = match self.session.resolve(base) {
				Ok(resolved) => resolved,
				Err(err) => {
					if base.element_full_name() != ROOT_TYPE {
						debug!(base = %base.full_name(), error = %err, "inherited members stop");
					}
					break;
				}
			};
			let full_name = resolved.full_name();
			if !visited.insert(full_name.clone()) {
				break;
			}
			sources.push(MemberSource {
				record: resolved,
				full_name,
				inherited: true,
			});
			current = resolved;
		}
		sources
	}

	fn unresolved_base(&mut self, record: &TypeRecord, base: &TypeRef, message: &str) {
		warn!(
			entity = %record.full_name(),
			base = %base.full_name(),
			error = message,
			"inheritance chain truncated"
		);
		self.warnings.push(ImportWarning::UnresolvedBaseType {
			entity: record.full_name(),
			base: base.full_name(),
		});
	}
}

/// One record contributing members to an entity.
#[derive(Debug, Clone)]
pub(crate) struct MemberSource<'r> {
	pub(crate) record: &'r TypeRecord,
	pub(crate) full_name: String,
	pub(crate) inherited: bool,
}

impl MemberSource<'_> {
	/// Whether a member with the given declaring type belongs to this source.
	pub(crate) fn declares(&self, declaring_type: Option<&str>) -> bool {
		declaring_type.is_none_or(|declaring| declaring == self.full_name)
	}

	/// Declaring type name reported for a member of this source.
	pub(crate) fn declaring_type(&self, declaring_type: Option<&str>) -> String {
		declaring_type.unwrap_or(&self.full_name).to_string()
	}
}

fn classify(record: &TypeRecord) -> EntityKind {
	if record.is(TypeAttributes::INTERFACE) {
		EntityKind::Interface
	} else if record.is(TypeAttributes::ENUM) {
		EntityKind::Enum
	} else if record.is(TypeAttributes::VALUE_TYPE) {
		EntityKind::Struct
	} else if record
		.base_type
		.as_ref()
		.is_some_and(|base| DELEGATE_BASES.contains(&base.name.as_str()))
	{
		EntityKind::Delegate
	} else {
		EntityKind::Class
	}
}

fn type_modifiers(record: &TypeRecord) -> Modifiers {
	let sealed = record.is(TypeAttributes::SEALED);
	let abstract_ = record.is(TypeAttributes::ABSTRACT);
	if sealed && abstract_ {
		return Modifiers::STATIC;
	}
	let mut modifiers = Modifiers::empty();
	if sealed && !record.is(TypeAttributes::ENUM) {
		modifiers |= Modifiers::SEALED;
	}
	if abstract_ && !record.is(TypeAttributes::INTERFACE) {
		modifiers |= Modifiers::ABSTRACT;
	}
	modifiers
}

fn base_type_name(base: &TypeRef) -> Option<String> {
	let name = if base.is_generic() {
		format_generic_name(base, GenericNameFormat::TypeName)
	} else {
		base.name.clone()
	};
	if UNREPORTED_BASES.contains(&name.as_str()) {
		None
	} else {
		Some(type_alias(&name))
	}
}

fn interface_names(record: &TypeRecord) -> Vec<String> {
	record
		.interfaces
		.iter()
		.map(|interface| {
			if interface.generic_instance {
				format_generic_name(interface, GenericNameFormat::TypeName)
			} else {
				interface.name.clone()
			}
		})
		.map(|name| name.trim().to_string())
		.collect()
}

fn chain_name(record: &TypeRecord) -> String {
	if record.generic_parameters.is_empty() {
		record.full_name()
	} else {
		type_alias(&format_generic_name(
			&record.to_type_ref(),
			GenericNameFormat::FullTypeName,
		))
	}
}
