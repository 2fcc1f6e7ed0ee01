use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Error as SerdeError;

use crate::docs::DocsError;
use crate::metadata::MetadataError;

/// Aggregate errors produced by the metadoc API.
#[derive(Debug)]
pub enum ImportError {
	/// The module could not be loaded.
	Metadata(MetadataError),
	/// The sidecar documentation could not be loaded.
	Docs(DocsError),
	/// Failed to encode or decode JSON.
	Serialization(SerdeError),
	/// Options that cannot describe a valid query.
	InvalidOptions(String),
}

impl fmt::Display for ImportError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Metadata(err) => write!(f, "{err}"),
			Self::Docs(err) => write!(f, "{err}"),
			Self::Serialization(err) => write!(f, "{err}"),
			Self::InvalidOptions(message) => write!(f, "{message}"),
		}
	}
}

impl std::error::Error for ImportError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Metadata(err) => Some(err),
			Self::Docs(err) => Some(err),
			Self::Serialization(err) => Some(err),
			Self::InvalidOptions(_) => None,
		}
	}
}

impl From<MetadataError> for ImportError {
	fn from(err: MetadataError) -> Self {
		Self::Metadata(err)
	}
}

impl From<DocsError> for ImportError {
	fn from(err: DocsError) -> Self {
		Self::Docs(err)
	}
}

impl From<SerdeError> for ImportError {
	fn from(err: SerdeError) -> Self {
		Self::Serialization(err)
	}
}

/// Result type returned by the metadoc library.
pub type Result<T> = std::result::Result<T, ImportError>;

/// A failure that was absorbed while importing; the affected fields keep partial values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportWarning {
	/// A base type could not be resolved; the inheritance chain stops there.
	UnresolvedBaseType {
		/// Type whose chain was truncated.
		entity: String,
		/// Base reference that failed to resolve.
		base: String,
	},
	/// The sidecar exists but could not be read or parsed.
	SidecarUnavailable {
		/// Sidecar path.
		path: PathBuf,
		/// Reason reported by the loader.
		message: String,
	},
	/// A table block was left unconverted.
	MalformedTable {
		/// Sidecar key of the affected entry.
		key: String,
	},
	/// A documentation field fell back to its raw text.
	MalformedMarkup {
		/// Sidecar key of the affected entry.
		key: String,
		/// Parser message.
		message: String,
	},
}

impl fmt::Display for ImportWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnresolvedBaseType { entity, base } => {
				write!(f, "inheritance chain of {entity} stops at unresolved base {base}")
			}
			Self::SidecarUnavailable { path, message } => {
				write!(f, "documentation file {} unavailable: {message}", path.display())
			}
			Self::MalformedTable { key } => write!(f, "table in {key} left unconverted"),
			Self::MalformedMarkup { key, message } => {
				write!(f, "markup in {key} kept as raw text: {message}")
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn metadata_errors_convert_and_keep_source() {
		let err: ImportError = MetadataError::UnresolvedType("Acme.Base".into()).into();
		assert_eq!(err.to_string(), "unable to resolve type Acme.Base");
		assert!(std::error::Error::source(&err).is_some());
	}

	#[test]
	fn warnings_describe_themselves() {
		let warning = ImportWarning::UnresolvedBaseType {
			entity: "Acme.Widget".into(),
			base: "Other.Base".into(),
		};
		assert_eq!(
			warning.to_string(),
			"inheritance chain of Acme.Widget stops at unresolved base Other.Base"
		);
	}
}
