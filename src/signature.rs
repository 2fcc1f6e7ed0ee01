//! Canonical join keys between metadata and the documentation sidecar.
//!
//! Sidecar entries are keyed by a normalized member name: `Ns.Type.Method(System.String)`,
//! `Ns.Type.#ctor`, `Ns.Type.Load(System.Collections.Generic.List{System.String})`. The functions
//! here derive that form from the metadata reader's full names.

use crate::metadata::TypeRecord;

/// Constructor marker used by the sidecar format.
pub const CONSTRUCTOR_MARKER: &str = ".#ctor";

/// Canonical signature of a type: its full name with nested separators normalized.
pub fn type_signature(record: &TypeRecord) -> String {
	record.full_name().replace('/', ".")
}

/// Canonical signature of a member from its external full name.
///
/// The return or value type prefix is dropped, member separators become a single dot, and
/// constructors use [`CONSTRUCTOR_MARKER`]. A member without parameters has no parameter list.
/// Generic arguments inside the parameter list are brace-delimited, and placeholder parameters
/// are written with the sidecar's backtick positions.
pub fn member_signature(full_name: &str) -> String {
	let without_prefix = match full_name.find(' ') {
		Some(index) => full_name[index..].trim_start(),
		None => full_name,
	};

	let mut signature = without_prefix
		.replace("::.ctor", CONSTRUCTOR_MARKER)
		.replace("::", ".")
		.replace('/', ".");
	while signature.contains("..") {
		signature = signature.replace("..", ".");
	}
	let signature = signature.trim();

	if let Some(stripped) = signature.strip_suffix("()") {
		return stripped.to_string();
	}

	match signature.find('(') {
		Some(open) => {
			let (head, parameters) = signature.split_at(open);
			format!("{head}{}", brace_generic_arguments(parameters))
		}
		None => signature.to_string(),
	}
}

/// Canonical signature of a method declaring `arity` generic parameters.
///
/// Generic methods carry a ``` ``N ``` arity marker after the name, ahead of any parameter list:
/// ``` Acme.Widget.Map``1(``0) ```.
pub fn method_signature(full_name: &str, arity: usize) -> String {
	let mut signature = member_signature(full_name);
	if arity > 0 {
		let at = signature.find('(').unwrap_or(signature.len());
		signature.insert_str(at, &format!("``{arity}"));
	}
	signature
}

/// Rewrite `` Name`1<Arg> `` segments as `Name{Arg}`, handling nesting.
///
/// Angle brackets not introduced by an arity marker are kept.
fn brace_generic_arguments(parameters: &str) -> String {
	let mut output = String::with_capacity(parameters.len());
	let mut brackets: Vec<bool> = Vec::new();
	let mut chars = parameters.chars().peekable();

	while let Some(ch) = chars.next() {
		match ch {
			'`' => {
				let mut marker = String::from('`');
				while let Some(&next) = chars.peek() {
					if next == '`' || next.is_ascii_digit() {
						marker.push(next);
						chars.next();
					} else {
						break;
					}
				}
				if chars.peek() == Some(&'<') {
					chars.next();
					brackets.push(true);
					output.push('{');
				} else {
					output.push_str(&marker);
				}
			}
			'!' => output.push('`'),
			'<' => {
				brackets.push(false);
				output.push('<');
			}
			'>' => match brackets.pop() {
				Some(true) => output.push('}'),
				_ => output.push('>'),
			},
			_ => output.push(ch),
		}
	}
	output
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn drops_return_type_and_empty_parens() {
		assert_eq!(
			member_signature("System.Void Acme.Widget::Reset()"),
			"Acme.Widget.Reset"
		);
	}

	#[test]
	fn constructors_use_marker() {
		assert_eq!(
			member_signature("System.Void Acme.Widget::.ctor(System.String)"),
			"Acme.Widget.#ctor(System.String)"
		);
		assert_eq!(member_signature("System.Void Acme.Widget::.ctor()"), "Acme.Widget.#ctor");
	}

	#[test]
	fn generic_parameters_become_braces() {
		assert_eq!(
			member_signature(
				"System.Void Acme.Widget::Load(System.Collections.Generic.IDictionary`2<System.String,System.Object>,System.String)"
			),
			"Acme.Widget.Load(System.Collections.Generic.IDictionary{System.String,System.Object},System.String)"
		);
	}

	#[test]
	fn nested_generic_parameters_become_braces() {
		assert_eq!(
			member_signature(
				"System.Void Acme.Widget::Fill(System.Collections.Generic.List`1<System.Collections.Generic.List`1<System.Int32>>)"
			),
			"Acme.Widget.Fill(System.Collections.Generic.List{System.Collections.Generic.List{System.Int32}})"
		);
	}

	#[test]
	fn placeholders_use_backtick_positions() {
		assert_eq!(
			member_signature("System.Void Acme.Box`1::Put(!0,!!0)"),
			"Acme.Box`1.Put(`0,``0)"
		);
	}

	#[test]
	fn generic_methods_carry_their_arity() {
		assert_eq!(
			method_signature("System.Object Acme.Widget::Map(!!0)", 1),
			"Acme.Widget.Map``1(``0)"
		);
		assert_eq!(
			method_signature("System.Void Acme.Widget::Clear()", 2),
			"Acme.Widget.Clear``2"
		);
		assert_eq!(
			method_signature("System.Void Acme.Box`1::Put(!0)", 0),
			"Acme.Box`1.Put(`0)"
		);
	}

	#[test]
	fn fields_and_events_have_no_parameter_list() {
		assert_eq!(member_signature("System.String Acme.Widget::Title"), "Acme.Widget.Title");
		assert_eq!(
			member_signature("System.EventHandler Acme.Outer/Inner::Changed"),
			"Acme.Outer.Inner.Changed"
		);
	}

	#[test]
	fn signatures_are_deterministic() {
		let full = "System.Boolean Acme.Widget::TryGet(System.String,System.Int32&)";
		assert_eq!(member_signature(full), member_signature(full));
		assert_eq!(member_signature(full), "Acme.Widget.TryGet(System.String,System.Int32&)");
	}

	#[test]
	fn type_signature_normalizes_nesting() {
		let record = TypeRecord {
			name: "Inner".into(),
			declaring_type: Some("Acme.Outer".into()),
			..TypeRecord::default()
		};
		assert_eq!(type_signature(&record), "Acme.Outer.Inner");
	}
}
