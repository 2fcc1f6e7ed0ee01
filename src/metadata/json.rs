use std::fs;
use std::path::Path;

use tracing::debug;

use super::{MetadataError, MetadataReader, ModuleRecord};

/// Reads a [`ModuleRecord`] serialized as JSON.
///
/// This is the interchange format for dumps produced by an external binary metadata reader,
/// and the reader used by tests and fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMetadataReader;

impl JsonMetadataReader {
	/// Create a reader.
	pub fn new() -> Self {
		Self
	}

	/// Decode a module from an in-memory JSON document.
	pub fn parse(&self, path: &Path, text: &str) -> Result<ModuleRecord, MetadataError> {
		serde_json::from_str(text).map_err(|source| MetadataError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}
}

impl MetadataReader for JsonMetadataReader {
	fn read_module(&self, path: &Path) -> Result<ModuleRecord, MetadataError> {
		let text = fs::read_to_string(path).map_err(|source| MetadataError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let module = self.parse(path, &text)?;
		debug!(
			module = %module.name,
			types = module.types.len(),
			referenced = module.referenced_types.len(),
			"loaded module metadata"
		);
		Ok(module)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn missing_file_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = JsonMetadataReader::new()
			.read_module(&dir.path().join("absent.json"))
			.unwrap_err();
		assert!(matches!(err, MetadataError::Io { .. }));
	}

	#[test]
	fn malformed_json_is_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"{ not json").unwrap();
		let err = JsonMetadataReader::new().read_module(file.path()).unwrap_err();
		assert!(matches!(err, MetadataError::Parse { .. }));
		assert!(err.to_string().starts_with("unable to parse module"));
	}

	#[test]
	fn reads_minimal_module() {
		let module = JsonMetadataReader::new()
			.parse(
				Path::new("mem.json"),
				r#"{"name":"Acme","types":[{"name":"Widget","namespace":"Acme"}]}"#,
			)
			.unwrap();
		assert_eq!(module.name, "Acme");
		assert_eq!(module.types[0].full_name(), "Acme.Widget");
		assert!(module.referenced_types.is_empty());
	}
}
