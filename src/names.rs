//! Human-readable type names.
//!
//! Metadata names carry an arity marker (`` Dictionary`2 ``) and bind their arguments separately.
//! [`format_generic_name`] turns such a reference into `Dictionary<string,object>` style text, and
//! [`type_alias`] maps framework type names to their keyword spelling.

use crate::metadata::TypeRef;

/// Rendered in place of an unbound placeholder parameter (`!0`, `!1`, ...).
pub const PLACEHOLDER_NAME: &str = "T";

/// Output shape of [`format_generic_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericNameFormat {
	/// Name followed by the generic list: `List<string>`.
	TypeName,
	/// Namespace-qualified name with the generic list: `System.Collections.Generic.List<string>`.
	FullTypeName,
	/// Only the bracketed generic list: `<string>`.
	GenericListOnly,
}

/// Format a type reference as readable generic text.
///
/// Open definitions list their declared parameter names. Instantiations list their bound
/// arguments, recursively formatting arguments that are themselves generic. Names without an
/// arity marker are returned unchanged, so formatting is idempotent on its own output.
pub fn format_generic_name(reference: &TypeRef, format: GenericNameFormat) -> String {
	if !reference.generic_instance {
		return format_definition(reference, format);
	}

	let Some(base) = strip_arity(&reference.name) else {
		return match format {
			GenericNameFormat::TypeName => reference.name.clone(),
			GenericNameFormat::GenericListOnly => String::new(),
			GenericNameFormat::FullTypeName => reference.full_name(),
		};
	};

	let arguments: Vec<String> = reference
		.generic_arguments
		.iter()
		.map(|argument| format_argument(argument, format))
		.collect();
	compose(reference, base, &arguments, format)
}

fn format_argument(argument: &TypeRef, format: GenericNameFormat) -> String {
	if argument.has_arity_marker() {
		return format_generic_name(argument, format);
	}
	if argument.is_placeholder() {
		return PLACEHOLDER_NAME.to_string();
	}
	type_alias(&argument.name)
}

fn format_definition(reference: &TypeRef, format: GenericNameFormat) -> String {
	let base = strip_arity(&reference.name).unwrap_or(&reference.name);
	compose(reference, base, &reference.generic_parameters, format)
}

fn compose(reference: &TypeRef, base: &str, items: &[String], format: GenericNameFormat) -> String {
	let list = if items.is_empty() {
		String::new()
	} else {
		format!("<{}>", items.join(","))
	};
	match format {
		GenericNameFormat::GenericListOnly => list,
		GenericNameFormat::TypeName => format!("{base}{list}"),
		GenericNameFormat::FullTypeName if reference.namespace.is_empty() => format!("{base}{list}"),
		GenericNameFormat::FullTypeName => format!("{}.{base}{list}", reference.namespace),
	}
}

/// Name with its arity marker removed, or `None` when it has none.
pub fn strip_arity(name: &str) -> Option<&str> {
	name.find('`').map(|index| &name[..index])
}

/// Map a framework type name to its keyword alias.
///
/// `Nullable<X>` becomes the alias of `X` followed by `?`. Unknown names pass through.
pub fn type_alias(name: &str) -> String {
	let alias = match name {
		"String" => "string",
		"Boolean" => "bool",
		"Object" => "object",
		"Object[]" => "object[]",
		"Int32" => "int",
		"Int64" => "long",
		"Int16" => "short",
		"Decimal" => "decimal",
		"Double" => "double",
		"Single" => "float",
		"Char" => "char",
		"Void" => "void",
		"Byte" => "byte",
		"Byte[]" => "byte[]",
		_ if name.starts_with("Nullable") => match between(name, '<', '>') {
			Some(inner) if !inner.is_empty() => return format!("{}?", type_alias(inner)),
			_ => name,
		},
		_ => name,
	};
	alias.to_string()
}

fn between(text: &str, open: char, close: char) -> Option<&str> {
	let start = text.find(open)? + open.len_utf8();
	let end = text[start..].find(close)? + start;
	Some(&text[start..end])
}

/// Display name for a type used in a member position: generic-formatted for generic
/// instances, keyword-aliased otherwise.
pub fn display_type_name(reference: &TypeRef) -> String {
	if reference.generic_instance && reference.has_arity_marker() {
		type_alias(&format_generic_name(reference, GenericNameFormat::TypeName))
	} else if reference.is_placeholder() {
		PLACEHOLDER_NAME.to_string()
	} else {
		type_alias(&reference.name)
	}
}

#[cfg(test)]
mod tests {
	use super::GenericNameFormat::*;
	use super::*;

	fn string() -> TypeRef {
		TypeRef::new("System", "String")
	}

	#[test]
	fn non_generic_names_are_unchanged() {
		let plain = TypeRef::new("Acme", "Widget");
		assert_eq!(format_generic_name(&plain, TypeName), "Widget");
		assert_eq!(format_generic_name(&plain, GenericListOnly), "");
		assert_eq!(format_generic_name(&plain, FullTypeName), "Acme.Widget");
	}

	#[test]
	fn instance_lists_aliased_arguments() {
		let dictionary = TypeRef::instance(
			"System.Collections.Generic",
			"Dictionary`2",
			vec![string(), TypeRef::new("System", "Object")],
		);
		assert_eq!(format_generic_name(&dictionary, TypeName), "Dictionary<string,object>");
		assert_eq!(format_generic_name(&dictionary, GenericListOnly), "<string,object>");
		assert_eq!(
			format_generic_name(&dictionary, FullTypeName),
			"System.Collections.Generic.Dictionary<string,object>"
		);
	}

	#[test]
	fn nested_instances_compose() {
		let inner = TypeRef::instance("System.Collections.Generic", "List`1", vec![string()]);
		let outer = TypeRef::instance("Acme", "Box`1", vec![inner]);
		assert_eq!(format_generic_name(&outer, TypeName), "Box<List<string>>");
	}

	#[test]
	fn integer_argument_uses_alias() {
		let boxed = TypeRef::instance("Acme", "Box`1", vec![TypeRef::new("System", "Int32")]);
		assert_eq!(format_generic_name(&boxed, TypeName), "Box<int>");
	}

	#[test]
	fn placeholders_render_as_single_letter() {
		let list = TypeRef::instance(
			"System.Collections.Generic",
			"KeyValuePair`2",
			vec![TypeRef::placeholder(0), TypeRef::placeholder(1)],
		);
		assert_eq!(format_generic_name(&list, TypeName), "KeyValuePair<T,T>");
	}

	#[test]
	fn empty_argument_list_has_no_brackets() {
		let bare = TypeRef::instance("Acme", "Box`1", Vec::new());
		assert_eq!(format_generic_name(&bare, TypeName), "Box");
		assert_eq!(format_generic_name(&bare, GenericListOnly), "");
	}

	#[test]
	fn definitions_list_declared_parameters() {
		let definition = TypeRef::definition("Acme", "Pair`2", &["TKey", "TValue"]);
		assert_eq!(format_generic_name(&definition, TypeName), "Pair<TKey,TValue>");
		assert_eq!(format_generic_name(&definition, FullTypeName), "Acme.Pair<TKey,TValue>");
	}

	#[test]
	fn formatting_is_idempotent_on_output() {
		let boxed = TypeRef::instance("Acme", "Box`1", vec![string()]);
		let once = format_generic_name(&boxed, TypeName);
		let again = TypeRef::instance("Acme", once.clone(), Vec::new());
		assert_eq!(format_generic_name(&again, TypeName), once);
	}

	#[test]
	fn aliases_cover_nullable() {
		assert_eq!(type_alias("Nullable<Int32>"), "int?");
		assert_eq!(type_alias("Nullable<DateTime>"), "DateTime?");
		assert_eq!(type_alias("Int16"), "short");
		assert_eq!(type_alias("Guid"), "Guid");
	}

	#[test]
	fn nullable_instance_displays_with_suffix() {
		let nullable = TypeRef::instance("System", "Nullable`1", vec![TypeRef::new("System", "Int32")]);
		assert_eq!(display_type_name(&nullable), "int?");
	}
}
