//! Documentation markup transformer.
//!
//! A documentation field is an XML fragment. It is parsed into a small [`Markup`] tree and
//! rendered back to text in one recursive pass:
//!
//! - `<see cref|href>` becomes a `[text](link)` token,
//! - `<seealso>` is removed from the body and collected separately,
//! - `<code>` and `<pre>` become `<pre>` blocks that reflow never touches,
//! - `<c>`, `<paramref>`, `<typeparamref>` and `<see langword>` become code spans,
//! - `<list type="table">` becomes an HTML table block,
//! - any other element is dropped while its content is kept.
//!
//! Escaped angle brackets are unescaped once, as the final step.

/// Padding removal and line joining.
pub mod reflow;
/// Table list conversion.
pub mod table;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use roxmltree::{Document, Node};

use self::table::Table;

/// Scheme used for cross-reference links that are not web links.
pub const DEFAULT_LINK_SCHEME: &str = "dm-title://";

/// Characters escaped in link targets.
const LINK_TARGET: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b'&').add(b'?').add(b'#');

/// Stands in for a literal block until reflow is done.
const LITERAL_SLOT: char = '\u{1}';
/// Marks a paragraph element boundary. Any run of them renders as one blank line.
const PARAGRAPH_BREAK: char = '\u{2}';

/// Prefix of see-also references into the platform documentation.
pub const PLATFORM_REFERENCE_PREFIX: &str = "msdn:";
/// Namespaces documented by the platform rather than the module.
const PLATFORM_NAMESPACES: [&str; 2] = ["System.", "Microsoft."];

/// Options for [`transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
	/// Join wrapped lines into paragraphs.
	pub wrap: bool,
	/// Prefix of non-web link targets.
	pub link_scheme: String,
}

impl Default for TransformOptions {
	fn default() -> Self {
		Self {
			wrap: true,
			link_scheme: DEFAULT_LINK_SCHEME.to_string(),
		}
	}
}

impl TransformOptions {
	/// Same options with reflow disabled.
	pub fn without_wrap(&self) -> Self {
		Self {
			wrap: false,
			..self.clone()
		}
	}
}

/// Recoverable problem found while transforming one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupIssue {
	/// A table list was kept as written.
	MalformedTable,
	/// The fragment did not parse; the raw text was used.
	Malformed(String),
}

/// Result of [`transform`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupOutput {
	/// Clean body text.
	pub text: String,
	/// References extracted from see-also tags.
	pub see_also: Vec<String>,
	/// Problems that were recovered from.
	pub issues: Vec<MarkupIssue>,
}

/// A parsed documentation fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
	/// Plain text, unescaped.
	Text(String),
	/// Cross reference rendered in place.
	Reference {
		/// `cref` or `href` value; may be empty.
		target: String,
		/// Link text content.
		content: Vec<Markup>,
	},
	/// Cross reference moved to the see-also list.
	SeeAlso {
		/// `cref` or `href` value; may be empty.
		target: String,
		/// Tag content, used when there is no target.
		content: Vec<Markup>,
	},
	/// Inline code span.
	Code(Vec<Markup>),
	/// Preformatted block, protected from reflow.
	Literal(String),
	/// Paragraph.
	Paragraph(Vec<Markup>),
	/// Well-formed table list.
	Table(Table),
	/// Malformed table list, kept as written.
	RawTable(String),
	/// Any other element; only its content is kept.
	Element(Vec<Markup>),
}

/// Transform one documentation field.
pub fn transform(raw: &str, options: &TransformOptions) -> MarkupOutput {
	let text = reflow::strip_padding(&reflow::normalize_newlines(raw));
	if text.trim().is_empty() {
		return MarkupOutput::default();
	}

	let nodes = match parse(&text) {
		Ok(nodes) => nodes,
		Err(err) => {
			return MarkupOutput {
				text: unescape_angles(text.trim()),
				see_also: Vec::new(),
				issues: vec![MarkupIssue::Malformed(err.to_string())],
			};
		}
	};

	let mut renderer = Renderer::new(options);
	let body = renderer.render_all(&nodes);
	let body = if options.wrap {
		reflow::collapse_breaks(&body)
	} else {
		body
	};
	let body = paragraph_breaks(&body);
	let body = renderer.splice_literals(&body);

	MarkupOutput {
		text: unescape_angles(body.trim()),
		see_also: renderer.see_also,
		issues: renderer.issues,
	}
}

/// Text of a code sample: padding removed, markup dropped, entities unescaped.
pub fn code_text(raw: &str) -> String {
	let text = reflow::strip_padding(&reflow::normalize_newlines(raw));
	let plain = match Document::parse(&format!("<doc>{text}</doc>")) {
		Ok(doc) => doc
			.root_element()
			.descendants()
			.filter(Node::is_text)
			.filter_map(|node| node.text())
			.collect::<String>(),
		Err(_) => unescape_angles(&text),
	};
	plain.trim_end().to_string()
}

/// Parse a fragment into markup nodes.
pub fn parse(fragment: &str) -> Result<Vec<Markup>, roxmltree::Error> {
	let wrapped = format!("<doc>{fragment}</doc>");
	let doc = Document::parse(&wrapped)?;
	Ok(children(doc.root_element(), &wrapped))
}

fn children(node: Node<'_, '_>, source: &str) -> Vec<Markup> {
	node.children()
		.filter_map(|child| convert(child, source))
		.collect()
}

fn convert(node: Node<'_, '_>, source: &str) -> Option<Markup> {
	if node.is_text() {
		return node.text().map(|text| Markup::Text(text.to_string()));
	}
	if !node.is_element() {
		return None;
	}

	let markup = match node.tag_name().name() {
		"see" => match node.attribute("langword") {
			Some(word) => Markup::Code(vec![Markup::Text(word.to_string())]),
			None => Markup::Reference {
				target: reference_target(node),
				content: children(node, source),
			},
		},
		"seealso" => Markup::SeeAlso {
			target: reference_target(node),
			content: children(node, source),
		},
		"c" => Markup::Code(children(node, source)),
		"paramref" | "typeparamref" => Markup::Code(vec![Markup::Text(
			node.attribute("name").unwrap_or_default().to_string(),
		)]),
		"code" | "pre" => Markup::Literal(
			node.descendants()
				.filter(Node::is_text)
				.filter_map(|child| child.text())
				.collect(),
		),
		"para" => Markup::Paragraph(children(node, source)),
		"list" if table::is_table(node) => match table::parse(node) {
			Some(table) => Markup::Table(table),
			None => Markup::RawTable(source[node.range()].to_string()),
		},
		_ => Markup::Element(children(node, source)),
	};
	Some(markup)
}

fn reference_target(node: Node<'_, '_>) -> String {
	node.attribute("cref")
		.or_else(|| node.attribute("href"))
		.unwrap_or_default()
		.to_string()
}

struct Renderer<'o> {
	options: &'o TransformOptions,
	literals: Vec<String>,
	see_also: Vec<String>,
	issues: Vec<MarkupIssue>,
}

impl<'o> Renderer<'o> {
	fn new(options: &'o TransformOptions) -> Self {
		Self {
			options,
			literals: Vec::new(),
			see_also: Vec::new(),
			issues: Vec::new(),
		}
	}

	fn render_all(&mut self, nodes: &[Markup]) -> String {
		nodes.iter().map(|node| self.render(node)).collect()
	}

	fn render(&mut self, node: &Markup) -> String {
		match node {
			Markup::Text(text) => escape_angles(text),
			Markup::Reference { target, content } => {
				let inner = self.render_all(content);
				self.link(target, inner.trim())
			}
			Markup::SeeAlso { target, content } => {
				let reference = if target.is_empty() {
					strip_kind_prefix(self.render_all(content).trim()).to_string()
				} else {
					see_also_reference(target)
				};
				if !reference.is_empty() {
					self.see_also.push(reference);
				}
				String::new()
			}
			Markup::Code(content) => {
				format!("<span class=\"code\">{}</span>", self.render_all(content))
			}
			Markup::Literal(text) => self.literal(format!("<pre>{}</pre>", escape_angles(text))),
			Markup::Paragraph(content) => {
				format!("{PARAGRAPH_BREAK}{}{PARAGRAPH_BREAK}", self.render_all(content))
			}
			Markup::Table(table) => self.literal(table.render()),
			Markup::RawTable(raw) => {
				self.issues.push(MarkupIssue::MalformedTable);
				self.literal(raw.clone())
			}
			Markup::Element(content) => self.render_all(content),
		}
	}

	fn link(&self, target: &str, inner: &str) -> String {
		let display = if inner.is_empty() {
			friendly_name(target)
		} else {
			strip_kind_prefix(inner)
		};
		let target = if target.is_empty() { display } else { target };
		let link = if target.starts_with("http") {
			target.to_string()
		} else {
			format!("{}{}", self.options.link_scheme, escape_link_target(target))
		};
		format!("[{display}]({link})")
	}

	fn literal(&mut self, text: String) -> String {
		self.literals.push(text);
		LITERAL_SLOT.to_string()
	}

	fn splice_literals(&self, body: &str) -> String {
		let mut literals = self.literals.iter();
		let mut output = String::with_capacity(body.len());
		for ch in body.chars() {
			if ch == LITERAL_SLOT {
				if let Some(literal) = literals.next() {
					output.push_str(literal);
				}
			} else {
				output.push(ch);
			}
		}
		output
	}
}

/// Kind prefixes of cross-reference identifiers.
const KIND_PREFIXES: [&str; 6] = ["T:", "M:", "P:", "F:", "E:", "N:"];

/// Link text for a reference target: web links as-is, otherwise without the kind prefix.
pub fn friendly_name(target: &str) -> &str {
	if target.starts_with("http") {
		return target;
	}
	match target.find(':') {
		Some(1) => &target[2..],
		_ => target,
	}
}

/// See-also entry for a reference target.
///
/// Platform types keep their full identifier behind [`PLATFORM_REFERENCE_PREFIX`]. Other
/// identifiers lose their kind prefix, and a method reference without a parameter list gets `()`.
pub fn see_also_reference(target: &str) -> String {
	let name = target
		.get(2..)
		.filter(|_| target.as_bytes().get(1) == Some(&b':'));
	match name {
		Some(name) if PLATFORM_NAMESPACES.iter().any(|ns| name.starts_with(ns)) => {
			format!("{PLATFORM_REFERENCE_PREFIX}{target}")
		}
		Some(name) if target.starts_with("M:") && !name.contains('(') => format!("{name}()"),
		Some(name) => name.to_string(),
		None => target.to_string(),
	}
}

/// Percent-encode the reserved ASCII characters of a link target; other text is kept as written.
fn escape_link_target(target: &str) -> String {
	let mut escaped = String::with_capacity(target.len());
	let mut buffer = [0; 4];
	for ch in target.chars() {
		let piece = ch.encode_utf8(&mut buffer);
		if ch.is_ascii() {
			escaped.extend(utf8_percent_encode(piece, LINK_TARGET));
		} else {
			escaped.push_str(piece);
		}
	}
	escaped
}

/// Render each run of paragraph markers, with the whitespace around it, as one blank line.
fn paragraph_breaks(body: &str) -> String {
	let mut output = String::with_capacity(body.len());
	let mut chars = body.chars().peekable();
	while let Some(ch) = chars.next() {
		if ch != PARAGRAPH_BREAK {
			output.push(ch);
			continue;
		}
		while chars.next_if(|&next| next == PARAGRAPH_BREAK || next.is_whitespace()).is_some() {}
		output.truncate(output.trim_end().len());
		if !output.is_empty() {
			output.push_str("\n\n");
		}
	}
	output
}

fn strip_kind_prefix(text: &str) -> &str {
	KIND_PREFIXES
		.iter()
		.find_map(|prefix| text.strip_prefix(prefix))
		.unwrap_or(text)
}

/// Escape `<` and `>` so they survive until the final unescape.
pub fn escape_angles(text: &str) -> String {
	text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Unescape `&lt;` and `&gt;`.
pub fn unescape_angles(text: &str) -> String {
	text.replace("&lt;", "<").replace("&gt;", ">")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn run(raw: &str) -> MarkupOutput {
		transform(raw, &TransformOptions::default())
	}

	#[test]
	fn see_with_cref_becomes_link() {
		let output = run(r#"Uses <see cref="T:Acme.Widget"/> internally."#);
		assert_eq!(output.text, "Uses [Acme.Widget](dm-title://T:Acme.Widget) internally.");
	}

	#[test]
	fn see_with_content_uses_content_as_text() {
		let output = run(r#"See <see href="https://example.com/a b">the guide</see>."#);
		assert_eq!(output.text, "See [the guide](https://example.com/a b).");
	}

	#[test]
	fn link_targets_are_escaped() {
		let output = run(r#"<see cref="M:Acme.Widget.Find(System.String,System.Int32)"/>"#);
		assert_eq!(
			output.text,
			"[Acme.Widget.Find(System.String,System.Int32)](dm-title://M:Acme.Widget.Find(System.String,System.Int32))"
		);
		let output = run(r#"<see cref="Q &amp; A#1"/>"#);
		assert_eq!(output.text, "[Q & A#1](dm-title://Q%20%26%20A%231)");
	}

	#[test]
	fn non_ascii_link_targets_are_kept() {
		let output = run(r#"<see cref="T:Acme.Größe"/> and <see cref="T:Acme.Maß Einheit"/>"#);
		assert_eq!(
			output.text,
			"[Acme.Größe](dm-title://T:Acme.Größe) and [Acme.Maß Einheit](dm-title://T:Acme.Maß%20Einheit)"
		);
	}

	#[test]
	fn seealso_is_extracted() {
		let output = run(r#"Summary text. <seealso cref="T:Foo"/>"#);
		assert_eq!(output.text, "Summary text.");
		assert_eq!(output.see_also, vec!["Foo".to_string()]);
	}

	#[test]
	fn seealso_points_platform_types_at_platform_docs() {
		let output = run(
			r#"<seealso cref="T:System.String"/><seealso cref="M:Microsoft.Win32.Registry.GetValue(System.String)"/>"#,
		);
		assert_eq!(
			output.see_also,
			vec![
				"msdn:T:System.String".to_string(),
				"msdn:M:Microsoft.Win32.Registry.GetValue(System.String)".to_string(),
			]
		);
	}

	#[test]
	fn seealso_methods_without_parameters_get_parentheses() {
		let output = run(
			r#"<seealso cref="M:Acme.Widget.Reset"/><seealso cref="M:Acme.Widget.Find(System.String)"/><seealso cref="P:Acme.System.Name"/>"#,
		);
		assert_eq!(
			output.see_also,
			vec![
				"Acme.Widget.Reset()".to_string(),
				"Acme.Widget.Find(System.String)".to_string(),
				"Acme.System.Name".to_string(),
			]
		);
	}

	#[test]
	fn seealso_with_content_strips_prefix() {
		let output = run("<seealso>T:Acme.Gadget</seealso><seealso>Overview</seealso>");
		assert_eq!(output.text, "");
		assert_eq!(output.see_also, vec!["Acme.Gadget".to_string(), "Overview".to_string()]);
	}

	#[test]
	fn reflow_preserves_code_blocks() {
		let raw = "\n            First line\n            continues here.\n\n            <code>\n            let x = 1;\n                nested();\n            </code>\n            ";
		let output = run(raw);
		assert_eq!(
			output.text,
			"First line continues here.\n\n<pre>\nlet x = 1;\n    nested();\n</pre>"
		);
	}

	#[test]
	fn without_wrap_keeps_line_breaks() {
		let options = TransformOptions::default().without_wrap();
		let output = transform("line one\nline two", &options);
		assert_eq!(output.text, "line one\nline two");
	}

	#[test]
	fn inline_code_and_parameter_references() {
		let output = run(r#"Pass <paramref name="count"/> or <c>null</c>, see <see langword="true"/>."#);
		assert_eq!(
			output.text,
			"Pass <span class=\"code\">count</span> or <span class=\"code\">null</span>, see <span class=\"code\">true</span>."
		);
	}

	#[test]
	fn unknown_tags_keep_their_text() {
		let output = run("<b>bold</b> and <i>slanted</i>");
		assert_eq!(output.text, "bold and slanted");
	}

	#[test]
	fn escaped_angles_are_unescaped_last() {
		let output = run("Returns a List&lt;string&gt;.");
		assert_eq!(output.text, "Returns a List<string>.");
	}

	#[test]
	fn paragraphs_break_lines() {
		let output = run("<para>First.</para><para>Second.</para>");
		assert_eq!(output.text, "First.\n\nSecond.");
	}

	#[test]
	fn paragraph_inside_prose_starts_a_new_paragraph() {
		let output = run("Intro.<para>Body</para>");
		assert_eq!(output.text, "Intro.\n\nBody");
		let output = run("Intro. <para>Body</para> Outro.");
		assert_eq!(output.text, "Intro.\n\nBody\n\nOutro.");
	}

	#[test]
	fn malformed_markup_falls_back_to_raw_text() {
		let output = run("broken <see cref=\"T:Foo\"> &lt;T&gt;");
		assert_eq!(output.text, "broken <see cref=\"T:Foo\"> <T>");
		assert!(matches!(output.issues.as_slice(), [MarkupIssue::Malformed(_)]));
	}

	#[test]
	fn malformed_table_is_kept_and_reported() {
		let output = run(r#"Flags: <list type="table"><item><term>x</term></item></list>"#);
		assert_eq!(
			output.text,
			r#"Flags: <list type="table"><item><term>x</term></item></list>"#
		);
		assert_eq!(output.issues, vec![MarkupIssue::MalformedTable]);
	}

	#[test]
	fn tables_are_flattened() {
		let output = run(
			r#"<list type="table"><item><term>a</term><description>first</description></item></list>"#,
		);
		assert_eq!(
			output.text,
			"<table>\n<tr><td>a</td><td>first</td></tr>\n</table>"
		);
	}

	#[test]
	fn code_text_unescapes_entities() {
		assert_eq!(
			code_text("\n    if (a &lt; b)\n        run();\n    "),
			"if (a < b)\n    run();"
		);
	}
}
