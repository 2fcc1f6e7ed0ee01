use crate::core_api::ImportOptions;
use crate::metadata::{
	FieldAttributes, MemberAccess, MethodAttributes, MethodRecord, ParameterRecord, TypeRef,
	attribute_argument,
};
use crate::model::{
	Entity, EntityKind, Event, Method, Modifiers, Parameter, ParameterPassing, Property,
	PropertyMode, Scope, syntax,
};
use crate::names::display_type_name;
use crate::signature::{member_signature, method_signature};

use super::{CATEGORY_ATTRIBUTE, DESCRIPTION_ATTRIBUTE, MemberSource};

/// Accessor methods reported through their property or event instead.
const ACCESSORS: MethodAttributes = MethodAttributes::GETTER
	.union(MethodAttributes::SETTER)
	.union(MethodAttributes::ADD_ON)
	.union(MethodAttributes::REMOVE_ON);

/// Backing field of an enumeration.
const ENUM_VALUE_FIELD: &str = "value__";

fn is_synthesized(name: &str) -> bool {
	name.starts_with(crate::metadata::SYNTHESIZED_MARKER)
}

/// Whether `source` contributes a member declared on `declaring_type`.
///
/// The inspected type keeps every member its reader listed unless only declared members were
/// requested. Ancestors contribute only what they declare themselves.
fn accepts(
	source: &MemberSource<'_>,
	declaring_type: Option<&str>,
	options: &ImportOptions,
) -> bool {
	if source.inherited || options.declared_only {
		source.declares(declaring_type)
	} else {
		true
	}
}

fn is_inherited(source: &MemberSource<'_>, declaring_type: Option<&str>) -> bool {
	source.inherited || !source.declares(declaring_type)
}

fn hidden(access: MemberAccess, options: &ImportOptions) -> bool {
	access == MemberAccess::Private && !options.include_private
}

fn accessor_modifiers(attributes: MethodAttributes) -> Modifiers {
	let mut modifiers = Modifiers::empty();
	if attributes.contains(MethodAttributes::ABSTRACT) {
		modifiers |= Modifiers::ABSTRACT;
	} else if attributes.contains(MethodAttributes::VIRTUAL) {
		modifiers |= Modifiers::VIRTUAL;
	}
	if attributes.contains(MethodAttributes::STATIC) {
		modifiers |= Modifiers::STATIC;
	}
	if attributes.contains(MethodAttributes::FINAL) {
		modifiers |= Modifiers::SEALED;
	}
	modifiers
}

/// Display name of a parameter type with any by-ref marker removed.
fn by_value_type_name(reference: &TypeRef) -> String {
	if reference.is_by_ref() {
		let mut by_value = reference.clone();
		by_value.name.pop();
		display_type_name(&by_value)
	} else {
		display_type_name(reference)
	}
}

fn parameter(record: &ParameterRecord) -> Parameter {
	let passing = match (record.parameter_type.is_by_ref(), record.is_out) {
		(false, _) => None,
		(true, true) => Some(ParameterPassing::Out),
		(true, false) => Some(ParameterPassing::Ref),
	};
	Parameter {
		name: record.name.clone(),
		type_name: by_value_type_name(&record.parameter_type),
		raw_type: record.parameter_type.full_name(),
		passing,
	}
}

fn generic_list(parameters: &[String]) -> String {
	if parameters.is_empty() {
		String::new()
	} else {
		format!("<{}>", parameters.join(","))
	}
}

/// Methods of the entity, constructors first, then by case-insensitive name.
pub(super) fn methods(
	entity: &Entity,
	sources: &[MemberSource<'_>],
	options: &ImportOptions,
) -> Vec<Method> {
	let mut methods: Vec<Method> = sources
		.iter()
		.flat_map(|source| {
			source
				.record
				.methods
				.iter()
				.map(move |record| (source, record))
		})
		.filter(|(source, record)| reportable_method(source, record, options))
		.map(|(source, record)| method(entity, source, record, options))
		.collect();
	methods.sort_by_key(|method| (!method.is_constructor, method.name.to_lowercase()));
	methods
}

fn reportable_method(
	source: &MemberSource<'_>,
	record: &MethodRecord,
	options: &ImportOptions,
) -> bool {
	let declaring_type = record.declaring_type.as_deref();
	if !accepts(source, declaring_type, options)
		|| is_synthesized(&record.name)
		|| record.is(ACCESSORS)
		|| hidden(record.access, options)
	{
		return false;
	}
	if record.is_constructor() {
		// Only the type's own instance constructors.
		return record.name == ".ctor"
			&& !record.is(MethodAttributes::STATIC)
			&& !is_inherited(source, declaring_type);
	}
	true
}

fn method(
	entity: &Entity,
	source: &MemberSource<'_>,
	record: &MethodRecord,
	options: &ImportOptions,
) -> Method {
	let scope = Scope::from(record.access);
	let modifiers = accessor_modifiers(record.attributes);
	let generic_parameters = generic_list(&record.generic_parameters);
	let parameters: Vec<Parameter> = record.parameters.iter().map(parameter).collect();
	let return_type = display_type_name(&record.return_type);
	let is_constructor = record.is_constructor();
	let declaring_type = record.declaring_type.as_deref();

	let syntax = if is_constructor {
		syntax::method_syntax(
			scope,
			modifiers,
			None,
			&entity.name,
			&generic_parameters,
			&parameters,
		)
	} else {
		syntax::method_syntax(
			scope,
			modifiers,
			Some(&return_type),
			&record.name,
			&generic_parameters,
			&parameters,
		)
	};

	let mut method = Method {
		name: if is_constructor {
			Method::CONSTRUCTOR_NAME.to_string()
		} else {
			record.name.clone()
		},
		raw_name: record.name.clone(),
		is_constructor,
		scope,
		modifiers,
		parameters,
		generic_parameters,
		return_type,
		signature: method_signature(
			&record.full_name(&source.full_name),
			record.generic_parameters.len(),
		),
		syntax,
		is_inherited: is_inherited(source, declaring_type),
		declaring_type: source.declaring_type(declaring_type),
		..Method::default()
	};
	if options.parse_description_attributes {
		method.description = attribute_argument(&record.custom_attributes, DESCRIPTION_ATTRIBUTE)
			.unwrap_or_default()
			.to_string();
		method.category = attribute_argument(&record.custom_attributes, CATEGORY_ATTRIBUTE)
			.unwrap_or_default()
			.to_string();
	}
	method
}

/// Fields of the entity. Enumerations report their members typed as the enumeration.
pub(super) fn fields(
	entity: &Entity,
	sources: &[MemberSource<'_>],
	options: &ImportOptions,
) -> Vec<Property> {
	let is_enum = entity.kind == EntityKind::Enum;
	let mut fields = Vec::new();

	for source in sources {
		for record in &source.record.fields {
			let declaring_type = record.declaring_type.as_deref();
			if !accepts(source, declaring_type, options)
				|| is_synthesized(&record.name)
				|| hidden(record.access, options)
				|| (is_enum && record.name == ENUM_VALUE_FIELD)
			{
				continue;
			}

			let scope = Scope::from(record.access);
			let (modifiers, type_name) = if is_enum {
				(Modifiers::empty(), entity.name.clone())
			} else {
				(
					field_modifiers(record.attributes),
					display_type_name(&record.field_type),
				)
			};

			fields.push(Property {
				syntax: syntax::member_syntax(scope, modifiers, &type_name, &record.name),
				name: record.name.clone(),
				mode: PropertyMode::Field,
				scope,
				modifiers,
				type_name,
				raw_type: record.field_type.full_name(),
				signature: member_signature(&record.full_name(&source.full_name)),
				is_inherited: is_inherited(source, declaring_type),
				declaring_type: source.declaring_type(declaring_type),
				..Property::default()
			});
		}
	}
	fields
}

fn field_modifiers(attributes: FieldAttributes) -> Modifiers {
	if attributes.contains(FieldAttributes::LITERAL) {
		return Modifiers::CONST;
	}
	let mut modifiers = Modifiers::empty();
	if attributes.contains(FieldAttributes::STATIC) {
		modifiers |= Modifiers::STATIC;
	}
	if attributes.contains(FieldAttributes::INIT_ONLY) {
		modifiers |= Modifiers::READ_ONLY;
	}
	modifiers
}

/// Properties of the entity. Scope and modifiers come from the getter, else the setter.
pub(super) fn properties(sources: &[MemberSource<'_>], options: &ImportOptions) -> Vec<Property> {
	let mut properties = Vec::new();

	for source in sources {
		for record in &source.record.properties {
			let declaring_type = record.declaring_type.as_deref();
			if !accepts(source, declaring_type, options) || is_synthesized(&record.name) {
				continue;
			}
			let Some(accessor) = record.primary_accessor() else {
				continue;
			};
			if hidden(accessor.access, options) {
				continue;
			}

			let scope = Scope::from(accessor.access);
			let mut modifiers = accessor_modifiers(accessor.attributes);
			if record.setter.is_none() {
				modifiers |= Modifiers::READ_ONLY;
			}
			if record.getter.is_none() {
				modifiers |= Modifiers::WRITE_ONLY;
			}
			let type_name = display_type_name(&record.property_type);

			let mut property = Property {
				syntax: syntax::member_syntax(scope, modifiers, &type_name, &record.name),
				name: record.name.clone(),
				mode: PropertyMode::Property,
				scope,
				modifiers,
				type_name,
				raw_type: record.property_type.full_name(),
				signature: member_signature(&record.full_name(&source.full_name)),
				is_inherited: is_inherited(source, declaring_type),
				declaring_type: source.declaring_type(declaring_type),
				..Property::default()
			};
			if options.parse_description_attributes {
				property.description =
					attribute_argument(&record.custom_attributes, DESCRIPTION_ATTRIBUTE)
						.unwrap_or_default()
						.to_string();
				property.category = attribute_argument(&record.custom_attributes, CATEGORY_ATTRIBUTE)
					.unwrap_or_default()
					.to_string();
			}
			properties.push(property);
		}
	}
	properties
}

/// Events of the entity.
pub(super) fn events(sources: &[MemberSource<'_>], options: &ImportOptions) -> Vec<Event> {
	let mut events = Vec::new();

	for source in sources {
		for record in &source.record.events {
			let declaring_type = record.declaring_type.as_deref();
			if !accepts(source, declaring_type, options)
				|| is_synthesized(&record.name)
				|| hidden(record.access, options)
			{
				continue;
			}

			let scope = Scope::from(record.access);
			let modifiers = accessor_modifiers(record.attributes);
			let type_name = display_type_name(&record.event_type);
			events.push(Event {
				syntax: syntax::event_syntax(scope, modifiers, &type_name, &record.name),
				name: record.name.clone(),
				scope,
				modifiers,
				type_name,
				signature: member_signature(&record.full_name(&source.full_name)),
				is_inherited: is_inherited(source, declaring_type),
				declaring_type: source.declaring_type(declaring_type),
				..Event::default()
			});
		}
	}
	events
}
