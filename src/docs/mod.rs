//! Sidecar documentation merge.
//!
//! [`DocResolver`] looks up every entity and member of an [`Entity`] in a loaded [`Sidecar`] by
//! its canonical key and copies the transformed text onto the model. It only ever writes
//! documentation fields.

/// Design-by-contract sections.
pub mod contract;
/// Documentation markup transformer.
pub mod markup;
/// Sidecar loading.
pub mod sidecar;

use std::path::{Path, PathBuf};

use tracing::warn;

pub use self::markup::{
	DEFAULT_LINK_SCHEME, MarkupIssue, MarkupOutput, TransformOptions, transform,
};
pub use self::sidecar::{DocElement, MemberDoc, Sidecar};
use crate::core_api::ImportWarning;
use crate::model::{Docs, Entity, ExceptionDoc, MethodDocs, ParameterDoc, PropertyDocs, PropertyMode};

/// Errors produced while loading a sidecar.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
	/// The sidecar could not be read.
	#[error("unable to load documentation file {}: {source}", .path.display())]
	Io {
		/// Sidecar path.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The sidecar is not well-formed XML.
	#[error("invalid documentation XML{}: {source}", location(.path))]
	Xml {
		/// Sidecar path, when loaded from disk.
		path: Option<PathBuf>,
		/// Parser failure.
		#[source]
		source: roxmltree::Error,
	},
}

impl DocsError {
	/// Attach the sidecar path to a parse failure.
	pub fn at(self, sidecar: &Path) -> Self {
		match self {
			Self::Xml { source, .. } => Self::Xml {
				path: Some(sidecar.to_path_buf()),
				source,
			},
			other => other,
		}
	}
}

fn location(path: &Option<PathBuf>) -> String {
	path.as_ref()
		.map(|path| format!(" in {}", path.display()))
		.unwrap_or_default()
}

impl From<roxmltree::Error> for DocsError {
	fn from(source: roxmltree::Error) -> Self {
		Self::Xml { path: None, source }
	}
}

/// Key prefixes of the sidecar format.
pub mod prefix {
	/// Types.
	pub const TYPE: &str = "T:";
	/// Methods and constructors.
	pub const METHOD: &str = "M:";
	/// Properties.
	pub const PROPERTY: &str = "P:";
	/// Fields.
	pub const FIELD: &str = "F:";
	/// Events.
	pub const EVENT: &str = "E:";
}

/// Sidecar key of a method signature; by-ref parameters use `@`.
pub fn method_key(signature: &str) -> String {
	format!("{}{}", prefix::METHOD, signature.replace('&', "@"))
}

/// Merges sidecar documentation into entities.
#[derive(Debug)]
pub struct DocResolver<'s> {
	sidecar: &'s Sidecar,
	options: TransformOptions,
}

impl<'s> DocResolver<'s> {
	/// Create a resolver over a loaded sidecar.
	pub fn new(sidecar: &'s Sidecar, options: TransformOptions) -> Self {
		Self { sidecar, options }
	}

	/// Attach documentation to `entity` and all of its members.
	///
	/// Keys without an entry leave the corresponding fields empty. Problems inside individual
	/// fields are returned as warnings.
	pub fn resolve(&self, entity: &mut Entity) -> Vec<ImportWarning> {
		let mut collector = Collector::new(&self.options);

		let key = format!("{}{}", prefix::TYPE, entity.signature);
		if let Some(member) = self.sidecar.member(&key) {
			entity.docs = collector.docs(&key, member, true);
		}

		for method in &mut entity.methods {
			let key = method_key(&method.signature);
			let Some(member) = self.sidecar.member(&key) else {
				continue;
			};
			let names: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();
			method.docs = collector.method_docs(&key, member, &names);
		}

		for property in entity.properties.iter_mut().chain(entity.fields.iter_mut()) {
			let prefix = match property.mode {
				PropertyMode::Property => prefix::PROPERTY,
				PropertyMode::Field => prefix::FIELD,
			};
			let key = format!("{prefix}{}", property.signature);
			if let Some(member) = self.sidecar.member(&key) {
				property.docs = PropertyDocs {
					docs: collector.docs(&key, member, true),
					default_value: collector.field(&key, member, "value"),
				};
			}
		}

		for event in &mut entity.events {
			let key = format!("{}{}", prefix::EVENT, event.signature);
			if let Some(member) = self.sidecar.member(&key) {
				event.docs = collector.docs(&key, member, false);
			}
		}

		collector.warnings
	}
}

/// Load the sidecar at `path` and attach its documentation to `entity`.
pub fn resolve_from_path(
	entity: &mut Entity,
	path: &Path,
	options: TransformOptions,
) -> Result<Vec<ImportWarning>, DocsError> {
	let sidecar = Sidecar::load(path)?;
	Ok(DocResolver::new(&sidecar, options).resolve(entity))
}

struct Collector<'o> {
	options: &'o TransformOptions,
	warnings: Vec<ImportWarning>,
}

impl<'o> Collector<'o> {
	fn new(options: &'o TransformOptions) -> Self {
		Self {
			options,
			warnings: Vec::new(),
		}
	}

	fn docs(&mut self, key: &str, member: &MemberDoc, with_contract: bool) -> Docs {
		let summary = self.transformed(key, member.raw("summary"), self.options.wrap);
		let remarks = self.transformed(key, member.raw("remarks"), self.options.wrap);

		let mut see_also = summary.see_also;
		for reference in remarks.see_also {
			if !see_also.contains(&reference) {
				see_also.push(reference);
			}
		}

		Docs {
			summary: summary.text,
			remarks: remarks.text,
			example: self.example(key, member),
			see_also,
			contract: if with_contract {
				contract::render(member)
			} else {
				String::new()
			},
		}
	}

	fn method_docs(&mut self, key: &str, member: &MemberDoc, parameters: &[&str]) -> MethodDocs {
		let parameters = parameters
			.iter()
			.map(|name| {
				let raw = member
					.sections
					.iter()
					.find(|section| section.name == "param" && section.attribute("name") == Some(*name))
					.map(|section| section.inner.as_str());
				ParameterDoc {
					name: name.to_string(),
					description: self.transformed(key, raw, self.options.wrap).text,
				}
			})
			.collect();

		let exceptions = member
			.sections
			.iter()
			.filter(|section| section.name == "exception")
			.map(|section| ExceptionDoc {
				reference: section
					.attribute("cref")
					.unwrap_or_default()
					.replace("T:", "")
					.replace("!:", ""),
				description: self
					.transformed(key, Some(section.inner.as_str()), self.options.wrap)
					.text,
			})
			.collect();

		MethodDocs {
			docs: self.docs(key, member, true),
			returns: self.field(key, member, "returns"),
			parameters,
			exceptions,
		}
	}

	fn field(&mut self, key: &str, member: &MemberDoc, section: &str) -> String {
		self.transformed(key, member.raw(section), self.options.wrap)
			.text
	}

	/// Fenced code blocks when the example tags its code with a language, else plain text.
	fn example(&mut self, key: &str, member: &MemberDoc) -> String {
		let Some(example) = member.section("example") else {
			return String::new();
		};
		let code: Vec<&DocElement> = example.elements("code").collect();
		if !code.iter().any(|block| block.attribute("lang").is_some()) {
			return self.transformed(key, Some(example.inner.as_str()), false).text;
		}

		let mut output = String::new();
		for block in code {
			let text = markup::code_text(&block.inner);
			match block.attribute("lang") {
				Some(lang) => output.push_str(&format!("```{lang}\n{text}\n```\n")),
				None => {
					output.push_str(&text);
					output.push('\n');
				}
			}
		}
		output
	}

	fn transformed(&mut self, key: &str, raw: Option<&str>, wrap: bool) -> MarkupOutput {
		let Some(raw) = raw else {
			return MarkupOutput::default();
		};
		let options = if wrap == self.options.wrap {
			self.options.clone()
		} else {
			self.options.without_wrap()
		};
		let output = transform(raw, &options);
		for issue in &output.issues {
			let warning = match issue {
				MarkupIssue::MalformedTable => ImportWarning::MalformedTable {
					key: key.to_string(),
				},
				MarkupIssue::Malformed(message) => ImportWarning::MalformedMarkup {
					key: key.to_string(),
					message: message.clone(),
				},
			};
			warn!(%warning, "documentation markup recovered");
			self.warnings.push(warning);
		}
		output
	}
}
