use std::collections::HashMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::debug;

use super::DocsError;

/// An element inside a member entry, with its raw inner markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocElement {
	/// Tag name.
	pub name: String,
	/// Attributes in document order.
	pub attributes: Vec<(String, String)>,
	/// Inner markup exactly as written, entities still escaped.
	pub inner: String,
	/// Concatenated text content, entities unescaped.
	pub text: String,
	/// Child elements.
	pub children: Vec<DocElement>,
}

impl DocElement {
	fn from_node(node: Node<'_, '_>, source: &str) -> Self {
		let inner = match (node.first_child(), node.last_child()) {
			(Some(first), Some(last)) => source[first.range().start..last.range().end].to_string(),
			_ => String::new(),
		};
		Self {
			name: node.tag_name().name().to_string(),
			attributes: node
				.attributes()
				.map(|attribute| (attribute.name().to_string(), attribute.value().to_string()))
				.collect(),
			inner,
			text: node
				.descendants()
				.filter(Node::is_text)
				.filter_map(|child| child.text())
				.collect(),
			children: node
				.children()
				.filter(Node::is_element)
				.map(|child| Self::from_node(child, source))
				.collect(),
		}
	}

	/// Value of the named attribute.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Child elements with the given tag name.
	pub fn elements<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a DocElement> {
		self.children.iter().filter(move |child| child.name == name)
	}
}

/// Documentation of one member: the children of its `<member>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDoc {
	/// Sections such as `summary`, `param` and `returns`.
	pub sections: Vec<DocElement>,
}

impl MemberDoc {
	/// First section with the given tag name.
	pub fn section(&self, name: &str) -> Option<&DocElement> {
		self.sections.iter().find(|section| section.name == name)
	}

	/// Elements at a slash-separated path such as `getter/requires`.
	pub fn sections_at(&self, path: &str) -> Vec<&DocElement> {
		let mut segments = path.split('/');
		let Some(first) = segments.next() else {
			return Vec::new();
		};
		let mut current: Vec<&DocElement> = self
			.sections
			.iter()
			.filter(|section| section.name == first)
			.collect();
		for segment in segments {
			current = current
				.into_iter()
				.flat_map(|element| element.elements(segment))
				.collect();
		}
		current
	}

	/// Raw inner markup of the first section with the given name.
	pub fn raw(&self, name: &str) -> Option<&str> {
		self.section(name).map(|section| section.inner.as_str())
	}
}

/// A loaded documentation sidecar, keyed by member name (`T:Ns.Type`, `M:Ns.Type.Run`, ...).
#[derive(Debug, Clone, Default)]
pub struct Sidecar {
	assembly: Option<String>,
	members: HashMap<String, MemberDoc>,
}

impl Sidecar {
	/// Read and parse the sidecar at `path`.
	pub fn load(path: &Path) -> Result<Self, DocsError> {
		let text = fs::read_to_string(path).map_err(|source| DocsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let sidecar = Self::parse(&text).map_err(|err| err.at(path))?;
		debug!(
			path = %path.display(),
			members = sidecar.len(),
			"loaded documentation sidecar"
		);
		Ok(sidecar)
	}

	/// Parse sidecar XML. When a member name occurs twice, the first entry is kept.
	pub fn parse(text: &str) -> Result<Self, DocsError> {
		let doc = Document::parse(text)?;
		let mut sidecar = Self::default();

		for node in doc.descendants().filter(Node::is_element) {
			match node.tag_name().name() {
				"assembly" if sidecar.assembly.is_none() => {
					sidecar.assembly = node
						.children()
						.find(|child| child.has_tag_name("name"))
						.and_then(|child| child.text())
						.map(|name| name.trim().to_string());
				}
				"member" => {
					let Some(name) = node.attribute("name") else {
						continue;
					};
					sidecar
						.members
						.entry(name.to_string())
						.or_insert_with(|| MemberDoc {
							sections: node
								.children()
								.filter(Node::is_element)
								.map(|child| DocElement::from_node(child, text))
								.collect(),
						});
				}
				_ => {}
			}
		}
		Ok(sidecar)
	}

	/// Entry for a member key.
	pub fn member(&self, key: &str) -> Option<&MemberDoc> {
		self.members.get(key)
	}

	/// Assembly name declared by the sidecar.
	pub fn assembly(&self) -> Option<&str> {
		self.assembly.as_deref()
	}

	/// Number of member entries.
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// Whether there are no member entries.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	const SIDECAR: &str = r#"<?xml version="1.0"?>
<doc>
	<assembly><name>Acme</name></assembly>
	<members>
		<member name="T:Acme.Widget">
			<summary>A <see cref="T:Acme.Part"/> holder.</summary>
		</member>
		<member name="P:Acme.Widget.Size">
			<getter><requires description="positive">value &gt; 0</requires></getter>
		</member>
		<member name="T:Acme.Widget">
			<summary>Duplicate.</summary>
		</member>
	</members>
</doc>"#;

	#[test]
	fn first_duplicate_wins() {
		let sidecar = Sidecar::parse(SIDECAR).unwrap();
		assert_eq!(sidecar.assembly(), Some("Acme"));
		assert_eq!(sidecar.len(), 2);
		let widget = sidecar.member("T:Acme.Widget").unwrap();
		assert_eq!(
			widget.raw("summary"),
			Some(r#"A <see cref="T:Acme.Part"/> holder."#)
		);
	}

	#[test]
	fn nested_paths_resolve() {
		let sidecar = Sidecar::parse(SIDECAR).unwrap();
		let size = sidecar.member("P:Acme.Widget.Size").unwrap();
		let requires = size.sections_at("getter/requires");
		assert_eq!(requires.len(), 1);
		assert_eq!(requires[0].text, "value > 0");
		assert_eq!(requires[0].inner, "value &gt; 0");
		assert_eq!(requires[0].attribute("description"), Some("positive"));
	}

	#[test]
	fn child_elements_outlive_the_tag_name() {
		let sidecar = Sidecar::parse(SIDECAR).unwrap();
		let getter = sidecar
			.member("P:Acme.Widget.Size")
			.and_then(|size| size.section("getter"))
			.unwrap();
		let requires: Vec<&DocElement> = {
			let name = String::from("requires");
			getter.elements(&name).collect()
		};
		assert_eq!(requires.len(), 1);
		assert_eq!(requires[0].text, "value > 0");
	}

	#[test]
	fn invalid_xml_reports_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"<doc><members>").unwrap();
		let err = Sidecar::load(file.path()).unwrap_err();
		assert!(matches!(err, DocsError::Xml { path: Some(_), .. }));
	}
}
