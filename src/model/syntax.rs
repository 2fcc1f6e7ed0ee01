use once_cell::sync::Lazy;
use regex::Regex;

use super::{EntityKind, Modifiers, Parameter, Scope};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Replace runs of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
	WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

impl Modifiers {
	const KEYWORDS: [(Modifiers, &'static str); 7] = [
		(Modifiers::ABSTRACT, "abstract"),
		(Modifiers::VIRTUAL, "virtual"),
		(Modifiers::STATIC, "static"),
		(Modifiers::SEALED, "sealed"),
		(Modifiers::CONST, "const"),
		(Modifiers::READ_ONLY, "readonly"),
		(Modifiers::WRITE_ONLY, "writeonly"),
	];

	/// Render the set as space-separated keywords in canonical order.
	pub fn render(self) -> String {
		Self::KEYWORDS
			.iter()
			.filter(|(flag, _)| self.contains(*flag))
			.map(|(_, keyword)| *keyword)
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Declaration line of a type: `public sealed class Foo : Bar`.
pub fn entity_syntax(
	scope: Scope,
	modifiers: Modifiers,
	kind: EntityKind,
	name: &str,
	base_type: Option<&str>,
) -> String {
	let mut line = format!(
		"{} {} {} {}",
		scope.keyword(),
		modifiers.render(),
		kind.keyword(),
		name
	);
	if let Some(base) = base_type {
		line.push_str(" : ");
		line.push_str(base);
	}
	collapse_whitespace(&line)
}

/// Declaration line of a method: `public static string Join<T>(string separator, ref int count)`.
///
/// Constructors pass the type name as `name` and no return type.
pub fn method_syntax(
	scope: Scope,
	modifiers: Modifiers,
	return_type: Option<&str>,
	name: &str,
	generic_parameters: &str,
	parameters: &[Parameter],
) -> String {
	let arguments = parameters
		.iter()
		.map(|parameter| match parameter.passing {
			Some(passing) => format!(
				"{} {} {}",
				passing.keyword(),
				parameter.type_name,
				parameter.name
			),
			None => format!("{} {}", parameter.type_name, parameter.name),
		})
		.collect::<Vec<_>>()
		.join(", ");
	collapse_whitespace(&format!(
		"{} {} {} {name}{generic_parameters}({arguments})",
		scope.keyword(),
		modifiers.render(),
		return_type.unwrap_or_default(),
	))
}

/// Declaration line of a property, field or event: `public static readonly int Count`.
pub fn member_syntax(scope: Scope, modifiers: Modifiers, type_name: &str, name: &str) -> String {
	collapse_whitespace(&format!(
		"{} {} {type_name} {name}",
		scope.keyword(),
		modifiers.render()
	))
}

/// Declaration line of an event: `public event EventHandler Changed`.
pub fn event_syntax(scope: Scope, modifiers: Modifiers, type_name: &str, name: &str) -> String {
	collapse_whitespace(&format!(
		"{} {} event {type_name} {name}",
		scope.keyword(),
		modifiers.render()
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::ParameterPassing;

	#[test]
	fn modifiers_render_in_canonical_order() {
		let modifiers = Modifiers::READ_ONLY | Modifiers::STATIC | Modifiers::ABSTRACT;
		assert_eq!(modifiers.render(), "abstract static readonly");
		assert_eq!(Modifiers::empty().render(), "");
	}

	#[test]
	fn entity_syntax_collapses_missing_parts() {
		assert_eq!(
			entity_syntax(Scope::Public, Modifiers::empty(), EntityKind::Class, "Foo", None),
			"public class Foo"
		);
		assert_eq!(
			entity_syntax(
				Scope::Public,
				Modifiers::SEALED,
				EntityKind::Class,
				"Foo",
				Some("Bar")
			),
			"public sealed class Foo : Bar"
		);
	}

	#[test]
	fn method_syntax_marks_passing() {
		let parameters = vec![
			Parameter {
				name: "key".into(),
				type_name: "string".into(),
				raw_type: "String".into(),
				passing: None,
			},
			Parameter {
				name: "value".into(),
				type_name: "int".into(),
				raw_type: "Int32&".into(),
				passing: Some(ParameterPassing::Out),
			},
		];
		assert_eq!(
			method_syntax(
				Scope::Public,
				Modifiers::VIRTUAL,
				Some("bool"),
				"TryGet",
				"",
				&parameters
			),
			"public virtual bool TryGet(string key, out int value)"
		);
		assert_eq!(
			method_syntax(Scope::Public, Modifiers::empty(), None, "Widget", "", &[]),
			"public Widget()"
		);
	}

	#[test]
	fn collapse_whitespace_handles_tabs_and_newlines() {
		assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
	}
}
