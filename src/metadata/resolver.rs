use std::collections::HashMap;

use super::{MetadataError, ModuleRecord, TypeRecord, TypeRef};

/// Resolves type references to their definitions for the duration of one import.
///
/// A session indexes the module's own types followed by its referenced definitions. Module
/// types win when both declare the same full name. Sessions are created per query and dropped
/// with it; nothing is cached across imports.
#[derive(Debug)]
pub struct ResolutionSession<'m> {
	index: HashMap<String, &'m TypeRecord>,
}

impl<'m> ResolutionSession<'m> {
	/// Index every definition reachable from `module`.
	pub fn new(module: &'m ModuleRecord) -> Self {
		let mut index = HashMap::with_capacity(module.types.len() + module.referenced_types.len());
		for record in module.types.iter().chain(&module.referenced_types) {
			index.entry(record.full_name()).or_insert(record);
		}
		Self { index }
	}

	/// Look up the definition of `reference`, ignoring any generic arguments.
	pub fn resolve(&self, reference: &TypeRef) -> Result<&'m TypeRecord, MetadataError> {
		let key = reference.element_full_name();
		self.index
			.get(&key)
			.copied()
			.ok_or(MetadataError::UnresolvedType(key))
	}

	/// Look up a definition by its external full name.
	pub fn find(&self, full_name: &str) -> Option<&'m TypeRecord> {
		self.index.get(full_name).copied()
	}

	/// Number of indexed definitions.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Whether nothing is indexed.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(namespace: &str, name: &str) -> TypeRecord {
		TypeRecord {
			name: name.into(),
			namespace: namespace.into(),
			..TypeRecord::default()
		}
	}

	#[test]
	fn resolves_generic_instances_to_definitions() {
		let module = ModuleRecord {
			name: "Acme".into(),
			types: vec![record("Acme", "Box`1")],
			referenced_types: vec![record("System", "Object")],
		};
		let session = ResolutionSession::new(&module);
		let boxed = TypeRef::instance("Acme", "Box`1", vec![TypeRef::new("System", "String")]);
		assert_eq!(session.resolve(&boxed).unwrap().name, "Box`1");
		assert!(session.find("System.Object").is_some());
		assert_eq!(session.len(), 2);
	}

	#[test]
	fn unknown_reference_is_unresolved() {
		let module = ModuleRecord::default();
		let session = ResolutionSession::new(&module);
		let err = session.resolve(&TypeRef::new("Other", "Base")).unwrap_err();
		assert!(matches!(err, MetadataError::UnresolvedType(ref name) if name == "Other.Base"));
	}

	#[test]
	fn module_types_shadow_references() {
		let mut local = record("Acme", "Base");
		local.generic_parameters.push("T".into());
		let module = ModuleRecord {
			name: "Acme".into(),
			types: vec![local],
			referenced_types: vec![record("Acme", "Base")],
		};
		let session = ResolutionSession::new(&module);
		let found = session.resolve(&TypeRef::new("Acme", "Base")).unwrap();
		assert_eq!(found.generic_parameters, vec!["T".to_string()]);
	}
}
