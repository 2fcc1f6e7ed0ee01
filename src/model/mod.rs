//! Normalized documentation model.
//!
//! An [`Entity`] describes one type together with its members and documentation. Entities are
//! created fresh for every import and handed to the caller fully populated.

/// Modifier rendering and syntax lines.
pub mod syntax;

use bitflags::bitflags;
use serde::Serialize;

use crate::metadata::{MemberAccess, TypeVisibility};

pub use self::syntax::collapse_whitespace;

/// Visibility of an entity or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
	/// Visible everywhere.
	#[default]
	Public,
	/// Visible to derived types or the declaring module.
	Internal,
	/// Visible to the declaring type or module only.
	Private,
}

impl Scope {
	/// Keyword used in syntax lines.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Internal => "internal",
			Self::Private => "private",
		}
	}
}

impl From<TypeVisibility> for Scope {
	fn from(visibility: TypeVisibility) -> Self {
		match visibility {
			TypeVisibility::Public | TypeVisibility::NestedPublic => Self::Public,
			TypeVisibility::NestedFamily
			| TypeVisibility::NestedAssembly
			| TypeVisibility::NestedFamilyOrAssembly
			| TypeVisibility::NestedFamilyAndAssembly => Self::Internal,
			TypeVisibility::NotPublic | TypeVisibility::NestedPrivate => Self::Private,
		}
	}
}

impl From<MemberAccess> for Scope {
	fn from(access: MemberAccess) -> Self {
		match access {
			MemberAccess::Public => Self::Public,
			MemberAccess::Family
			| MemberAccess::Assembly
			| MemberAccess::FamilyOrAssembly
			| MemberAccess::FamilyAndAssembly => Self::Internal,
			MemberAccess::Private => Self::Private,
		}
	}
}

bitflags! {
	/// Modifier keywords of an entity or member.
	///
	/// Flags render in declaration order, see [`Modifiers::render`].
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Modifiers: u32 {
		/// `abstract`
		const ABSTRACT = 1 << 0;
		/// `virtual`
		const VIRTUAL = 1 << 1;
		/// `static`
		const STATIC = 1 << 2;
		/// `sealed`
		const SEALED = 1 << 3;
		/// `const`
		const CONST = 1 << 4;
		/// `readonly`
		const READ_ONLY = 1 << 5;
		/// `writeonly`
		const WRITE_ONLY = 1 << 6;
	}
}

impl Serialize for Modifiers {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.render())
	}
}

/// Kind of type an entity describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	/// Reference type.
	#[default]
	Class,
	/// Interface.
	Interface,
	/// Enumeration.
	Enum,
	/// Value type.
	Struct,
	/// Delegate type, inferred from its base.
	Delegate,
}

impl EntityKind {
	/// Keyword used in syntax lines.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Class => "class",
			Self::Interface => "interface",
			Self::Enum => "enum",
			Self::Struct => "struct",
			Self::Delegate => "delegate",
		}
	}
}

/// Documentation shared by every entity and member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Docs {
	/// Summary text.
	pub summary: String,
	/// Remarks text.
	pub remarks: String,
	/// Example text or fenced code blocks.
	pub example: String,
	/// Cross references extracted from see-also tags, in order of appearance.
	pub see_also: Vec<String>,
	/// Rendered design-by-contract blocks.
	pub contract: String,
}

impl Docs {
	/// Whether no documentation was attached.
	pub fn is_empty(&self) -> bool {
		self.summary.is_empty()
			&& self.remarks.is_empty()
			&& self.example.is_empty()
			&& self.see_also.is_empty()
			&& self.contract.is_empty()
	}
}

/// Description of one declared parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterDoc {
	/// Parameter name.
	pub name: String,
	/// Description; empty when the sidecar has none.
	pub description: String,
}

/// Description of one declared exception.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExceptionDoc {
	/// Exception type reference with its kind prefix removed.
	pub reference: String,
	/// Optional prose.
	pub description: String,
}

/// Method documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodDocs {
	/// Common sections.
	#[serde(flatten)]
	pub docs: Docs,
	/// Return value description.
	pub returns: String,
	/// One entry per declared parameter, in declaration order.
	pub parameters: Vec<ParameterDoc>,
	/// Declared exceptions.
	pub exceptions: Vec<ExceptionDoc>,
}

impl MethodDocs {
	/// Parameter descriptions as a markdown block (`**name**  ` then the description).
	pub fn parameter_markdown(&self) -> String {
		self.parameters
			.iter()
			.map(|parameter| format!("**{}**  \n{}\n\n", parameter.name, parameter.description))
			.collect::<String>()
			.trim_end()
			.to_string()
	}

	/// Exception descriptions as a markdown block.
	pub fn exception_markdown(&self) -> String {
		self.exceptions
			.iter()
			.map(|exception| {
				if exception.description.is_empty() {
					format!("**{}**  \n", exception.reference)
				} else {
					format!("**{}**  \n{}\n\n", exception.reference, exception.description)
				}
			})
			.collect::<String>()
			.trim_end()
			.to_string()
	}
}

/// Property and field documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyDocs {
	/// Common sections.
	#[serde(flatten)]
	pub docs: Docs,
	/// Description of the value or default value.
	pub default_value: String,
}

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterPassing {
	/// Passed by reference.
	Ref,
	/// Output-only reference.
	Out,
}

impl ParameterPassing {
	/// Keyword used in syntax lines.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Ref => "ref",
			Self::Out => "out",
		}
	}
}

/// A method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Parameter {
	/// Parameter name.
	pub name: String,
	/// Display type, aliased or generic-formatted.
	pub type_name: String,
	/// Raw metadata type name.
	pub raw_type: String,
	/// Ref or out marker for by-ref parameters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub passing: Option<ParameterPassing>,
}

/// Method or constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Method {
	/// Method name; constructors use [`Method::CONSTRUCTOR_NAME`].
	pub name: String,
	/// Raw metadata name.
	pub raw_name: String,
	/// Whether this is an instance constructor.
	pub is_constructor: bool,
	/// Visibility.
	pub scope: Scope,
	/// Modifier keywords.
	pub modifiers: Modifiers,
	/// Parameters in declaration order.
	pub parameters: Vec<Parameter>,
	/// Method-level generic parameter list, e.g. `<T,U>`.
	pub generic_parameters: String,
	/// Display return type.
	pub return_type: String,
	/// Canonical sidecar key.
	pub signature: String,
	/// Declaration line.
	pub syntax: String,
	/// Whether the method comes from an ancestor.
	pub is_inherited: bool,
	/// Full name of the declaring type.
	pub declaring_type: String,
	/// Value of the description attribute.
	pub description: String,
	/// Value of the category attribute.
	pub category: String,
	/// Documentation.
	pub docs: MethodDocs,
}

impl Method {
	/// Synthetic name shared by all constructors.
	pub const CONSTRUCTOR_NAME: &'static str = "Constructor";
}

/// Whether a [`Property`] describes a property or a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyMode {
	/// A property with accessors.
	#[default]
	Property,
	/// A field.
	Field,
}

/// Property or field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
	/// Member name.
	pub name: String,
	/// Property or field.
	pub mode: PropertyMode,
	/// Visibility.
	pub scope: Scope,
	/// Modifier keywords.
	pub modifiers: Modifiers,
	/// Display type.
	pub type_name: String,
	/// Raw metadata type name.
	pub raw_type: String,
	/// Canonical sidecar key.
	pub signature: String,
	/// Declaration line.
	pub syntax: String,
	/// Whether the member comes from an ancestor.
	pub is_inherited: bool,
	/// Full name of the declaring type.
	pub declaring_type: String,
	/// Value of the description attribute.
	pub description: String,
	/// Value of the category attribute.
	pub category: String,
	/// Documentation.
	pub docs: PropertyDocs,
}

/// Event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
	/// Event name.
	pub name: String,
	/// Visibility.
	pub scope: Scope,
	/// Modifier keywords.
	pub modifiers: Modifiers,
	/// Display handler type.
	pub type_name: String,
	/// Canonical sidecar key.
	pub signature: String,
	/// Declaration line.
	pub syntax: String,
	/// Whether the event comes from an ancestor.
	pub is_inherited: bool,
	/// Full name of the declaring type.
	pub declaring_type: String,
	/// Documentation.
	pub docs: Docs,
}

/// One documented type with its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entity {
	/// Display name, generic-formatted for generic definitions.
	pub name: String,
	/// Raw metadata name.
	pub raw_name: String,
	/// Keyword-aliased display name.
	pub formatted_name: String,
	/// Namespace.
	pub namespace: String,
	/// Canonical sidecar key.
	pub signature: String,
	/// Name of the module that declares the type.
	pub assembly: String,
	/// Type kind.
	pub kind: EntityKind,
	/// Visibility.
	pub scope: Scope,
	/// Modifier keywords.
	pub modifiers: Modifiers,
	/// Display name of the base type, absent for root, enum and delegate bases.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_type: Option<String>,
	/// Implemented interfaces in declaration order.
	pub interfaces: Vec<String>,
	/// Ancestors from the root down to the type itself.
	pub inheritance_chain: Vec<String>,
	/// Declaration line.
	pub syntax: String,
	/// Methods; constructors first.
	pub methods: Vec<Method>,
	/// Fields.
	pub fields: Vec<Property>,
	/// Properties.
	pub properties: Vec<Property>,
	/// Events.
	pub events: Vec<Event>,
	/// Documentation.
	pub docs: Docs,
	/// Value of the description attribute.
	pub description: String,
	/// Value of the category attribute.
	pub category: String,
}

impl Entity {
	/// Constructor entries.
	pub fn constructors(&self) -> impl Iterator<Item = &Method> {
		self.methods.iter().filter(|method| method.is_constructor)
	}

	/// Non-constructor method entries.
	pub fn ordinary_methods(&self) -> impl Iterator<Item = &Method> {
		self.methods.iter().filter(|method| !method.is_constructor)
	}

	/// Interfaces joined with commas.
	pub fn implements(&self) -> String {
		self.interfaces.join(",")
	}

	/// Fully qualified display name.
	pub fn full_name(&self) -> String {
		if self.namespace.is_empty() {
			self.name.clone()
		} else {
			format!("{}.{}", self.namespace, self.name)
		}
	}
}
