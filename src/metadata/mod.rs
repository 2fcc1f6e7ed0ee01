//! Raw metadata records and the reader boundary.
//!
//! The binary module reader is an external collaborator. Everything the importer needs from it
//! is captured here as plain data: a [`ModuleRecord`] holding [`TypeRecord`]s, each with its base
//! type, interfaces, generic parameters and member lists. Readers produce these records through
//! the [`MetadataReader`] trait; the bundled [`JsonMetadataReader`] loads them from a JSON dump.
//!
//! Type references keep the external format's textual conventions (arity markers such as
//! `` List`1 ``, placeholder parameters such as `!0`, a trailing `&` for by-ref types and `/` as
//! the nested-type separator) because the name formatter and signature generator operate on them.

/// JSON-backed metadata reader.
pub mod json;
/// Per-query type resolution.
pub mod resolver;

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use self::json::JsonMetadataReader;
pub use self::resolver::ResolutionSession;

/// Marker prefix of compiler-synthesized types and members.
pub const SYNTHESIZED_MARKER: char = '<';

/// Full name of the universal root type.
pub const ROOT_TYPE: &str = "System.Object";

/// Errors produced while reading or resolving metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
	/// The module file could not be read.
	#[error("unable to load module {}: {source}", .path.display())]
	Io {
		/// Path of the module.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The module file was read but could not be decoded.
	#[error("unable to parse module {}: {source}", .path.display())]
	Parse {
		/// Path of the module.
		path: PathBuf,
		/// Underlying decode failure.
		#[source]
		source: serde_json::Error,
	},
	/// A type reference has no definition in the resolution session.
	#[error("unable to resolve type {0}")]
	UnresolvedType(String),
}

/// Capability that turns a module path into raw metadata records.
pub trait MetadataReader {
	/// Read the module at `path`.
	fn read_module(&self, path: &Path) -> Result<ModuleRecord, MetadataError>;
}

/// All type records of one module, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
	/// Module (assembly) name.
	pub name: String,
	/// Types declared by the module, nested types included.
	#[serde(default)]
	pub types: Vec<TypeRecord>,
	/// Definitions from referenced modules, used only to resolve base types.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub referenced_types: Vec<TypeRecord>,
}

bitflags! {
	/// Semantic attributes of a type definition.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	#[serde(transparent)]
	pub struct TypeAttributes: u32 {
		/// The type is an interface.
		const INTERFACE = 1 << 0;
		/// The type is abstract.
		const ABSTRACT = 1 << 1;
		/// The type cannot be derived from.
		const SEALED = 1 << 2;
		/// The type is a value type.
		const VALUE_TYPE = 1 << 3;
		/// The type is an enumeration.
		const ENUM = 1 << 4;
	}
}

bitflags! {
	/// Semantic attributes of a method or accessor.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	#[serde(transparent)]
	pub struct MethodAttributes: u32 {
		/// Static method.
		const STATIC = 1 << 0;
		/// Abstract method.
		const ABSTRACT = 1 << 1;
		/// Virtual method.
		const VIRTUAL = 1 << 2;
		/// Method cannot be overridden further.
		const FINAL = 1 << 3;
		/// Property getter.
		const GETTER = 1 << 4;
		/// Property setter.
		const SETTER = 1 << 5;
		/// Event add accessor.
		const ADD_ON = 1 << 6;
		/// Event remove accessor.
		const REMOVE_ON = 1 << 7;
	}
}

bitflags! {
	/// Semantic attributes of a field.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	#[serde(transparent)]
	pub struct FieldAttributes: u32 {
		/// Static field.
		const STATIC = 1 << 0;
		/// Compile-time constant.
		const LITERAL = 1 << 1;
		/// Assignable only during construction.
		const INIT_ONLY = 1 << 2;
	}
}

/// Visibility of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeVisibility {
	/// Top-level public type.
	#[default]
	Public,
	/// Top-level type visible to its module only.
	NotPublic,
	/// Nested public type.
	NestedPublic,
	/// Nested private type.
	NestedPrivate,
	/// Nested type visible to derived types.
	NestedFamily,
	/// Nested type visible to its module.
	NestedAssembly,
	/// Nested type visible to derived types or its module.
	NestedFamilyOrAssembly,
	/// Nested type visible to derived types within its module.
	NestedFamilyAndAssembly,
}

/// Accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberAccess {
	/// Visible everywhere.
	#[default]
	Public,
	/// Visible to the declaring type only.
	Private,
	/// Visible to derived types.
	Family,
	/// Visible to the declaring module.
	Assembly,
	/// Visible to derived types or the declaring module.
	FamilyOrAssembly,
	/// Visible to derived types within the declaring module.
	FamilyAndAssembly,
}

/// A reference to a type as it appears in metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeRef {
	/// Raw name including any arity marker or by-ref suffix.
	pub name: String,
	/// Namespace, empty for placeholders and nested types.
	#[serde(default)]
	pub namespace: String,
	/// Full name of the enclosing type for nested types.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub declaring_type: Option<String>,
	/// Whether this reference binds concrete generic arguments.
	#[serde(default)]
	pub generic_instance: bool,
	/// Bound arguments of a generic instantiation.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub generic_arguments: Vec<TypeRef>,
	/// Declared parameter names of an open generic definition.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub generic_parameters: Vec<String>,
}

impl TypeRef {
	/// Reference a plain, non-generic type.
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			namespace: namespace.into(),
			..Self::default()
		}
	}

	/// Reference a generic instantiation bound to `arguments`.
	pub fn instance(
		namespace: impl Into<String>,
		name: impl Into<String>,
		arguments: Vec<TypeRef>,
	) -> Self {
		Self {
			name: name.into(),
			namespace: namespace.into(),
			generic_instance: true,
			generic_arguments: arguments,
			..Self::default()
		}
	}

	/// Reference an open generic definition declaring `parameters`.
	pub fn definition(
		namespace: impl Into<String>,
		name: impl Into<String>,
		parameters: &[&str],
	) -> Self {
		Self {
			name: name.into(),
			namespace: namespace.into(),
			generic_parameters: parameters.iter().map(|p| p.to_string()).collect(),
			..Self::default()
		}
	}

	/// Reference an unbound type parameter by position (`!0`, `!1`, ...).
	pub fn placeholder(position: usize) -> Self {
		Self::new("", format!("!{position}"))
	}

	/// Whether the raw name carries an arity marker.
	pub fn has_arity_marker(&self) -> bool {
		self.name.contains('`')
	}

	/// Whether this is an unbound placeholder parameter.
	pub fn is_placeholder(&self) -> bool {
		self.name.starts_with('!')
	}

	/// Whether the reference is generic, bound or open.
	pub fn is_generic(&self) -> bool {
		self.generic_instance || !self.generic_parameters.is_empty()
	}

	/// Whether this is a by-ref (`T&`) type.
	pub fn is_by_ref(&self) -> bool {
		self.name.ends_with('&')
	}

	/// Full name without generic arguments, the key used for resolution.
	pub fn element_full_name(&self) -> String {
		qualify(&self.namespace, self.declaring_type.as_deref(), &self.name)
	}

	/// Full name in the external format, generic arguments included.
	pub fn full_name(&self) -> String {
		let mut full = self.element_full_name();
		if self.generic_instance && !self.generic_arguments.is_empty() {
			let arguments: Vec<String> = self
				.generic_arguments
				.iter()
				.map(TypeRef::full_name)
				.collect();
			// By-ref and array suffixes follow the argument list.
			let suffix_at = full.find(['&', '[']).unwrap_or(full.len());
			let suffix = full.split_off(suffix_at);
			full.push('<');
			full.push_str(&arguments.join(","));
			full.push('>');
			full.push_str(&suffix);
		}
		full
	}
}

/// Build an external-format full name from its parts.
fn qualify(namespace: &str, declaring_type: Option<&str>, name: &str) -> String {
	match declaring_type {
		Some(outer) => format!("{outer}/{name}"),
		None if namespace.is_empty() => name.to_string(),
		None => format!("{namespace}.{name}"),
	}
}

/// Custom attribute applied to a type or member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomAttribute {
	/// Attribute type name, e.g. `DescriptionAttribute`.
	pub name: String,
	/// Constructor arguments rendered as strings.
	#[serde(default)]
	pub arguments: Vec<String>,
}

/// Find the first string argument of the named attribute.
pub fn attribute_argument<'a>(attributes: &'a [CustomAttribute], name: &str) -> Option<&'a str> {
	attributes
		.iter()
		.find(|attribute| attribute.name == name)
		.and_then(|attribute| attribute.arguments.first())
		.map(String::as_str)
}

/// A type definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeRecord {
	/// Raw name including any arity marker.
	pub name: String,
	/// Namespace of the type.
	#[serde(default)]
	pub namespace: String,
	/// Full name of the enclosing type for nested types.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub declaring_type: Option<String>,
	/// Declared visibility.
	#[serde(default)]
	pub visibility: TypeVisibility,
	/// Semantic attributes.
	#[serde(default)]
	pub attributes: TypeAttributes,
	/// Base type reference, absent for interfaces and the root type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_type: Option<TypeRef>,
	/// Implemented interfaces in declaration order.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub interfaces: Vec<TypeRef>,
	/// Declared generic parameter names.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub generic_parameters: Vec<String>,
	/// Methods, constructors and accessors.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub methods: Vec<MethodRecord>,
	/// Fields.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub fields: Vec<FieldRecord>,
	/// Properties.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub properties: Vec<PropertyRecord>,
	/// Events.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub events: Vec<EventRecord>,
	/// Custom attributes.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub custom_attributes: Vec<CustomAttribute>,
}

impl TypeRecord {
	/// Full name in the external format (`Ns.Outer/Inner`).
	pub fn full_name(&self) -> String {
		qualify(&self.namespace, self.declaring_type.as_deref(), &self.name)
	}

	/// Reference to this definition as an open generic (or plain) type.
	pub fn to_type_ref(&self) -> TypeRef {
		TypeRef {
			name: self.name.clone(),
			namespace: self.namespace.clone(),
			declaring_type: self.declaring_type.clone(),
			generic_instance: false,
			generic_arguments: Vec::new(),
			generic_parameters: self.generic_parameters.clone(),
		}
	}

	/// Whether the name carries the compiler-synthesized marker.
	pub fn is_synthesized(&self) -> bool {
		self.name.starts_with(SYNTHESIZED_MARKER)
	}

	/// Shorthand attribute checks.
	pub fn is(&self, attribute: TypeAttributes) -> bool {
		self.attributes.contains(attribute)
	}
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterRecord {
	/// Parameter name.
	pub name: String,
	/// Declared parameter type; by-ref types end in `&`.
	pub parameter_type: TypeRef,
	/// Whether a by-ref parameter is output-only.
	#[serde(default)]
	pub is_out: bool,
}

/// A method or constructor definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodRecord {
	/// Raw method name; constructors are `.ctor` and `.cctor`.
	pub name: String,
	/// Full name of the declaring type when it differs from the owning type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub declaring_type: Option<String>,
	/// Accessibility.
	#[serde(default)]
	pub access: MemberAccess,
	/// Semantic attributes.
	#[serde(default)]
	pub attributes: MethodAttributes,
	/// Return type; `System.Void` when absent from the dump.
	#[serde(default = "void_type")]
	pub return_type: TypeRef,
	/// Parameters in declaration order.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub parameters: Vec<ParameterRecord>,
	/// Declared method-level generic parameter names.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub generic_parameters: Vec<String>,
	/// Whether the method uses generic parameters of its declaring type.
	#[serde(default)]
	pub contains_generic_parameter: bool,
	/// Custom attributes.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub custom_attributes: Vec<CustomAttribute>,
}

fn void_type() -> TypeRef {
	TypeRef::new("System", "Void")
}

impl MethodRecord {
	/// Whether this is an instance or static constructor.
	pub fn is_constructor(&self) -> bool {
		self.name == ".ctor" || self.name == ".cctor"
	}

	/// Whether any of `attribute` is set.
	pub fn is(&self, attribute: MethodAttributes) -> bool {
		self.attributes.intersects(attribute)
	}

	/// Full name in the external format: `Ret Declaring::Name(ParamTypes)`.
	pub fn full_name(&self, owner_full_name: &str) -> String {
		let declaring = self.declaring_type.as_deref().unwrap_or(owner_full_name);
		format!(
			"{} {}::{}({})",
			self.return_type.full_name(),
			declaring,
			self.name,
			parameter_list(&self.parameters)
		)
	}
}

fn parameter_list(parameters: &[ParameterRecord]) -> String {
	parameters
		.iter()
		.map(|parameter| parameter.parameter_type.full_name())
		.collect::<Vec<_>>()
		.join(",")
}

/// A field definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldRecord {
	/// Field name.
	pub name: String,
	/// Full name of the declaring type when it differs from the owning type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub declaring_type: Option<String>,
	/// Field type.
	pub field_type: TypeRef,
	/// Accessibility.
	#[serde(default)]
	pub access: MemberAccess,
	/// Semantic attributes.
	#[serde(default)]
	pub attributes: FieldAttributes,
}

impl FieldRecord {
	/// Full name in the external format: `Type Declaring::Name`.
	pub fn full_name(&self, owner_full_name: &str) -> String {
		let declaring = self.declaring_type.as_deref().unwrap_or(owner_full_name);
		format!("{} {}::{}", self.field_type.full_name(), declaring, self.name)
	}
}

/// A property getter or setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessorRecord {
	/// Accessibility of the accessor.
	#[serde(default)]
	pub access: MemberAccess,
	/// Semantic attributes of the accessor.
	#[serde(default)]
	pub attributes: MethodAttributes,
}

/// A property definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyRecord {
	/// Property name.
	pub name: String,
	/// Full name of the declaring type when it differs from the owning type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub declaring_type: Option<String>,
	/// Property type.
	pub property_type: TypeRef,
	/// Getter, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub getter: Option<AccessorRecord>,
	/// Setter, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub setter: Option<AccessorRecord>,
	/// Index parameters.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub parameters: Vec<ParameterRecord>,
	/// Custom attributes.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub custom_attributes: Vec<CustomAttribute>,
}

impl PropertyRecord {
	/// Full name in the external format: `Type Declaring::Name(IndexTypes)`.
	pub fn full_name(&self, owner_full_name: &str) -> String {
		let declaring = self.declaring_type.as_deref().unwrap_or(owner_full_name);
		format!(
			"{} {}::{}({})",
			self.property_type.full_name(),
			declaring,
			self.name,
			parameter_list(&self.parameters)
		)
	}

	/// The accessor that defines modifiers and scope: the getter, else the setter.
	pub fn primary_accessor(&self) -> Option<AccessorRecord> {
		self.getter.or(self.setter)
	}
}

/// An event definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRecord {
	/// Event name.
	pub name: String,
	/// Full name of the declaring type when it differs from the owning type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub declaring_type: Option<String>,
	/// Handler type.
	pub event_type: TypeRef,
	/// Accessibility of the add accessor.
	#[serde(default)]
	pub access: MemberAccess,
	/// Semantic attributes of the add accessor.
	#[serde(default)]
	pub attributes: MethodAttributes,
}

impl EventRecord {
	/// Full name in the external format: `Type Declaring::Name`.
	pub fn full_name(&self, owner_full_name: &str) -> String {
		let declaring = self.declaring_type.as_deref().unwrap_or(owner_full_name);
		format!("{} {}::{}", self.event_type.full_name(), declaring, self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn full_name_includes_generic_arguments() {
		let dictionary = TypeRef::instance(
			"System.Collections.Generic",
			"Dictionary`2",
			vec![TypeRef::new("System", "String"), TypeRef::new("System", "Object")],
		);
		assert_eq!(
			dictionary.full_name(),
			"System.Collections.Generic.Dictionary`2<System.String,System.Object>"
		);
		assert_eq!(
			dictionary.element_full_name(),
			"System.Collections.Generic.Dictionary`2"
		);
	}

	#[test]
	fn nested_types_use_slash_separator() {
		let record = TypeRecord {
			name: "Inner".into(),
			declaring_type: Some("Acme.Outer".into()),
			..TypeRecord::default()
		};
		assert_eq!(record.full_name(), "Acme.Outer/Inner");
	}

	#[test]
	fn method_full_name_matches_external_format() {
		let method = MethodRecord {
			name: "Load".into(),
			return_type: TypeRef::new("System", "Boolean"),
			parameters: vec![ParameterRecord {
				name: "count".into(),
				parameter_type: TypeRef::new("System", "Int32&"),
				is_out: true,
			}],
			..MethodRecord::default()
		};
		assert_eq!(
			method.full_name("Acme.Loader"),
			"System.Boolean Acme.Loader::Load(System.Int32&)"
		);
	}

	#[test]
	fn attributes_deserialize_from_flag_names() {
		let record: TypeRecord =
			serde_json::from_str(r#"{"name":"Util","attributes":"SEALED | ABSTRACT"}"#).unwrap();
		assert!(record.is(TypeAttributes::SEALED | TypeAttributes::ABSTRACT));
		assert_eq!(record.visibility, TypeVisibility::Public);
	}
}
