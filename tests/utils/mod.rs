//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Metadata dump of a small module covering every entity kind.
pub const MODULE_JSON: &str = r#"{
	"name": "Acme",
	"types": [
		{
			"name": "Shape",
			"namespace": "Acme",
			"attributes": "ABSTRACT",
			"base_type": { "namespace": "System", "name": "Object" },
			"methods": [
				{
					"name": "Area",
					"attributes": "ABSTRACT | VIRTUAL",
					"return_type": { "namespace": "System", "name": "Double" }
				}
			],
			"properties": [
				{
					"name": "Name",
					"property_type": { "namespace": "System", "name": "String" },
					"getter": { "attributes": "GETTER" }
				}
			]
		},
		{
			"name": "Circle",
			"namespace": "Acme",
			"attributes": "SEALED",
			"base_type": { "namespace": "Acme", "name": "Shape" },
			"interfaces": [ { "namespace": "System", "name": "IComparable" } ],
			"methods": [
				{
					"name": ".ctor",
					"parameters": [
						{ "name": "radius", "parameter_type": { "namespace": "System", "name": "Double" } }
					]
				},
				{
					"name": "Area",
					"attributes": "VIRTUAL",
					"return_type": { "namespace": "System", "name": "Double" }
				},
				{
					"name": "TryScale",
					"return_type": { "namespace": "System", "name": "Boolean" },
					"parameters": [
						{ "name": "factor", "parameter_type": { "namespace": "System", "name": "Double" } },
						{
							"name": "result",
							"parameter_type": { "namespace": "System", "name": "Double&" },
							"is_out": true
						}
					]
				},
				{
					"name": "Reset",
					"access": "private"
				}
			],
			"fields": [
				{
					"name": "Radius",
					"field_type": { "namespace": "System", "name": "Double" },
					"attributes": "INIT_ONLY"
				}
			],
			"events": [
				{
					"name": "Changed",
					"event_type": { "namespace": "System", "name": "EventHandler" }
				}
			]
		},
		{
			"name": "Color",
			"namespace": "Acme",
			"attributes": "SEALED | VALUE_TYPE | ENUM",
			"base_type": { "namespace": "System", "name": "Enum" },
			"fields": [
				{ "name": "value__", "field_type": { "namespace": "System", "name": "Int32" } },
				{
					"name": "Red",
					"field_type": { "namespace": "Acme", "name": "Color" },
					"attributes": "STATIC | LITERAL"
				}
			]
		},
		{
			"name": "Box`1",
			"namespace": "Acme",
			"generic_parameters": ["T"],
			"base_type": { "namespace": "System", "name": "Object" }
		},
		{
			"name": "<>c",
			"namespace": "Acme",
			"base_type": { "namespace": "System", "name": "Object" }
		},
		{
			"name": "Orphan",
			"namespace": "Acme",
			"base_type": { "namespace": "Vendor", "name": "Missing" }
		}
	],
	"referenced_types": [
		{
			"name": "Enum",
			"namespace": "System",
			"base_type": { "namespace": "System", "name": "ValueType" }
		},
		{
			"name": "ValueType",
			"namespace": "System",
			"base_type": { "namespace": "System", "name": "Object" }
		}
	]
}"#;

/// Documentation sidecar matching [`MODULE_JSON`].
pub const SIDECAR_XML: &str = r#"<?xml version="1.0"?>
<doc>
	<assembly><name>Acme</name></assembly>
	<members>
		<member name="T:Acme.Circle">
			<summary>
			A round <see cref="T:Acme.Shape"/>.
			</summary>
			<remarks>
			Circles are immutable.
			<seealso cref="T:Acme.Color"/>
			</remarks>
		</member>
		<member name="M:Acme.Circle.#ctor(System.Double)">
			<summary>Creates a circle.</summary>
			<param name="radius">Radius in units.</param>
		</member>
		<member name="M:Acme.Circle.TryScale(System.Double,System.Double@)">
			<summary>Scales the circle.</summary>
			<param name="factor">Scale factor.</param>
			<param name="result">Scaled area.</param>
			<returns><see langword="true"/> on success.</returns>
		</member>
		<member name="P:Acme.Shape.Name">
			<summary>Display name.</summary>
		</member>
		<member name="F:Acme.Circle.Radius">
			<summary>The radius.</summary>
		</member>
		<member name="E:Acme.Circle.Changed">
			<summary>Raised after scaling.</summary>
		</member>
		<member name="T:Acme.Box`1">
			<summary>Holds one value. <list type="table"><item><term>T</term></item></list></summary>
		</member>
	</members>
</doc>"#;

/// Write `contents` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, contents).unwrap();
	path
}

/// Create a temporary directory holding the fixture module and, optionally, its sidecar.
///
/// Returns the directory guard and the module path.
pub fn fixture(with_sidecar: bool) -> (TempDir, PathBuf) {
	let dir = TempDir::new().unwrap();
	let module = write_file(dir.path(), "Acme.json", MODULE_JSON);
	if with_sidecar {
		write_file(dir.path(), "Acme.xml", SIDECAR_XML);
	}
	(dir, module)
}
