//! The `<list type="table">` microformat.
//!
//! ```xml
//! <list type="table">
//!   <listheader><term>Name</term><description>Meaning</description></listheader>
//!   <item><term>a</term><description>first</description></item>
//! </list>
//! ```
//!
//! is flattened into an HTML table block. A list missing a term or description in any row is
//! reported as malformed and kept as written.

use roxmltree::Node;

/// One row of a table list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
	/// Term cell text.
	pub term: String,
	/// Description cell text.
	pub description: String,
}

/// A parsed table list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
	/// Optional header row.
	pub header: Option<Row>,
	/// Body rows in order.
	pub rows: Vec<Row>,
}

/// Whether `node` is a `<list type="table">` element.
pub fn is_table(node: Node<'_, '_>) -> bool {
	node.has_tag_name("list") && node.attribute("type") == Some("table")
}

/// Parse a table list, or `None` when a row lacks a term or description.
pub fn parse(list: Node<'_, '_>) -> Option<Table> {
	let mut table = Table::default();
	for child in list.children().filter(Node::is_element) {
		match child.tag_name().name() {
			"listheader" => table.header = Some(row(child)?),
			"item" => table.rows.push(row(child)?),
			_ => return None,
		}
	}
	Some(table)
}

fn row(node: Node<'_, '_>) -> Option<Row> {
	let cell = |name: &str| {
		node.children()
			.find(|child| child.has_tag_name(name))
			.map(|child| cell_text(child))
	};
	Some(Row {
		term: cell("term")?,
		description: cell("description")?,
	})
}

fn cell_text(node: Node<'_, '_>) -> String {
	let text: String = node
		.descendants()
		.filter(Node::is_text)
		.filter_map(|child| child.text())
		.collect();
	super::escape_angles(text.trim())
}

impl Table {
	/// Render as a flat HTML block.
	pub fn render(&self) -> String {
		let mut html = String::from("<table>\n");
		if let Some(header) = &self.header {
			html.push_str(&format!(
				"<tr><th>{}</th><th>{}</th></tr>\n",
				header.term, header.description
			));
		}
		for row in &self.rows {
			html.push_str(&format!(
				"<tr><td>{}</td><td>{}</td></tr>\n",
				row.term, row.description
			));
		}
		html.push_str("</table>");
		html
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_list<T>(xml: &str, f: impl FnOnce(Node<'_, '_>) -> T) -> T {
		let doc = roxmltree::Document::parse(xml).unwrap();
		f(doc.root_element())
	}

	#[test]
	fn renders_header_and_rows() {
		let xml = r#"<list type="table">
			<listheader><term>Flag</term><description>Effect</description></listheader>
			<item><term>-v</term><description>Verbose output</description></item>
		</list>"#;
		let rendered = with_list(xml, |list| {
			assert!(is_table(list));
			parse(list).unwrap().render()
		});
		assert_eq!(
			rendered,
			"<table>\n<tr><th>Flag</th><th>Effect</th></tr>\n<tr><td>-v</td><td>Verbose output</td></tr>\n</table>"
		);
	}

	#[test]
	fn missing_description_is_malformed() {
		let xml = r#"<list type="table"><item><term>orphan</term></item></list>"#;
		assert!(with_list(xml, parse).is_none());
	}

	#[test]
	fn bullet_lists_are_not_tables() {
		let xml = r#"<list type="bullet"><item><description>a</description></item></list>"#;
		assert!(!with_list(xml, is_table));
	}
}
