use super::sidecar::MemberDoc;

/// Contract sections in output order.
const SECTIONS: [&str; 7] = [
	"invariant",
	"ensures",
	"requires",
	"getter/requires",
	"setter/requires",
	"getter/ensures",
	"setter/ensures",
];

/// Render the design-by-contract sections of a member.
///
/// Each section present in the entry produces an accessor marker for getter and setter
/// sections, a header, then every clause followed by its optional exception and description.
pub fn render(member: &MemberDoc) -> String {
	let mut lines: Vec<String> = Vec::new();

	for path in SECTIONS {
		let clauses = member.sections_at(path);
		if clauses.is_empty() {
			continue;
		}

		let (accessor, kind) = match path.split_once('/') {
			Some((accessor, kind)) => (Some(accessor), kind),
			None => (None, path),
		};
		match accessor {
			Some("getter") => lines.push(r#"<div class="contractgetset">Get</div>"#.to_string()),
			Some("setter") => lines.push(r#"<div class="contractgetset">Set</div>"#.to_string()),
			_ => {}
		}
		lines.push(format!(r#"<div class="contractitemheader">{}</div>"#, header(kind)));

		for clause in clauses {
			lines.push(clause.text.trim().to_string());
			if let Some(exception) = clause.attribute("exception").filter(|value| !value.is_empty()) {
				lines.push(format!("*Exception: {exception}*"));
			}
			if let Some(description) = clause
				.attribute("description")
				.filter(|value| !value.is_empty())
			{
				lines.push(format!("*Description: {description}*"));
			}
			lines.push(String::new());
		}
	}

	if lines.is_empty() {
		String::new()
	} else {
		lines.join("\n")
	}
}

fn header(kind: &str) -> String {
	if kind == "invariant" {
		return "Invariants".to_string();
	}
	let mut chars = kind.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::docs::Sidecar;

	#[test]
	fn renders_sections_in_order() {
		let sidecar = Sidecar::parse(
			r#"<doc><members><member name="P:Acme.Widget.Size">
				<setter><requires exception="ArgumentException">value &gt;= 0</requires></setter>
				<invariant description="never empty">Parts.Count &gt; 0</invariant>
			</member></members></doc>"#,
		)
		.unwrap();
		let rendered = render(sidecar.member("P:Acme.Widget.Size").unwrap());
		assert_eq!(
			rendered,
			"<div class=\"contractitemheader\">Invariants</div>\n\
			Parts.Count > 0\n\
			*Description: never empty*\n\
			\n\
			<div class=\"contractgetset\">Set</div>\n\
			<div class=\"contractitemheader\">Requires</div>\n\
			value >= 0\n\
			*Exception: ArgumentException*\n"
		);
	}

	#[test]
	fn empty_without_contract_sections() {
		let sidecar =
			Sidecar::parse(r#"<doc><members><member name="T:A"><summary>x</summary></member></members></doc>"#)
				.unwrap();
		assert_eq!(render(sidecar.member("T:A").unwrap()), "");
	}
}
