use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::model::Diagram;
use super::types::{EdgeId, NodeId};

#[derive(Debug, Error)]
pub enum CodecError {
	#[error("invalid diagram JSON: {0}")]
	InvalidJson(#[source] serde_json::Error),
	#[error("failed to serialize diagram: {0}")]
	Serialize(#[source] serde_json::Error),
}

/// Wire shape `{ nodes: [{id, label, x, y}], edges: [{id, from, to}] }`.
///
/// Decoding is lenient: any syntactically valid JSON yields a document. A
/// non-array `nodes`/`edges` is empty, a non-string id is regenerated on load,
/// a non-string label gets the default, non-numeric coordinates become 0, and
/// edges without string endpoints are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiagramDocument {
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<EdgeRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<NodeId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeRecord {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<EdgeId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from: Option<NodeId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub to: Option<NodeId>,
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
	value.get(key).and_then(Value::as_str)
}

fn number_field(value: &Value, key: &str) -> f64 {
	value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
	value
		.get(key)
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default()
}

impl NodeRecord {
	fn from_value(value: &Value) -> Self {
		Self {
			id: str_field(value, "id").map(NodeId::from),
			label: str_field(value, "label").map(str::to_owned),
			x: number_field(value, "x"),
			y: number_field(value, "y"),
		}
	}
}

impl EdgeRecord {
	fn from_value(value: &Value) -> Self {
		Self {
			id: str_field(value, "id").map(EdgeId::from),
			from: str_field(value, "from").map(NodeId::from),
			to: str_field(value, "to").map(NodeId::from),
		}
	}
}

/// Counts from loading a document into a diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
	pub nodes: usize,
	pub edges: usize,
	pub dropped_edges: usize,
}

impl DiagramDocument {
	/// Reads whatever the value holds; a non-object yields an empty document.
	pub fn from_value(value: &Value) -> Self {
		Self {
			nodes: array_field(value, "nodes")
				.iter()
				.map(NodeRecord::from_value)
				.collect(),
			edges: array_field(value, "edges")
				.iter()
				.map(EdgeRecord::from_value)
				.collect(),
		}
	}

	pub fn from_diagram(diagram: &Diagram) -> Self {
		Self {
			nodes: diagram
				.nodes()
				.iter()
				.map(|n| NodeRecord {
					id: Some(n.id.clone()),
					label: Some(n.label.clone()),
					x: n.position.x,
					y: n.position.y,
				})
				.collect(),
			edges: diagram
				.edges()
				.iter()
				.map(|e| EdgeRecord {
					id: Some(e.id.clone()),
					from: Some(e.from.clone()),
					to: Some(e.to.clone()),
				})
				.collect(),
		}
	}

	/// Replaces the contents of `diagram`. Node ids are preserved so edges can
	/// be matched against them; edges whose endpoints do not resolve are dropped.
	pub fn load_into(self, diagram: &mut Diagram) -> LoadReport {
		diagram.clear();
		let mut report = LoadReport::default();

		for node in self.nodes {
			diagram.insert_node(node.id, node.x, node.y, node.label);
			report.nodes += 1;
		}

		for edge in self.edges {
			let (Some(from), Some(to)) = (edge.from, edge.to) else {
				report.dropped_edges += 1;
				continue;
			};
			if diagram.insert_edge(edge.id, from.clone(), to.clone()).is_some() {
				report.edges += 1;
			} else {
				log::debug!("dropping edge {from} -> {to}: unknown endpoint");
				report.dropped_edges += 1;
			}
		}

		report
	}
}

/// Pretty-printed (2-space indent) export of `diagram`.
pub fn export_json(diagram: &Diagram) -> Result<String, CodecError> {
	serde_json::to_string_pretty(&DiagramDocument::from_diagram(diagram)).map_err(CodecError::Serialize)
}

/// Fails only on JSON syntax errors; content is decoded leniently.
pub fn parse_document(text: &str) -> Result<DiagramDocument, CodecError> {
	let value: Value = serde_json::from_str(text).map_err(CodecError::InvalidJson)?;
	Ok(DiagramDocument::from_value(&value))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram_editor::types::Point;
	use pretty_assertions::assert_eq;

	fn sample() -> Diagram {
		let mut d = Diagram::new("Düğüm");
		let a = d.create_node(60.0, 80.0, Some("Başla".into())).id.clone();
		let b = d.create_node(320.0, 160.0, Some("Bitiş".into())).id.clone();
		let c = d.create_node(-5.0, 12.5, Some(String::new())).id.clone();
		d.create_edge(a.clone(), b.clone());
		d.create_edge(b, c);
		d.create_edge(a.clone(), a);
		d
	}

	#[test]
	fn export_has_expected_shape_and_key_order() {
		let mut d = Diagram::new("Düğüm");
		let a = d.create_node(1.0, 2.0, Some("A".into())).id.clone();
		d.create_edge(a.clone(), a);
		let json = export_json(&d).unwrap();
		let expected = r#"{
  "nodes": [
    {
      "id": "node_1",
      "label": "A",
      "x": 1.0,
      "y": 2.0
    }
  ],
  "edges": [
    {
      "id": "e_1",
      "from": "node_1",
      "to": "node_1"
    }
  ]
}"#;
		assert_eq!(json, expected);
	}

	#[test]
	fn round_trip_preserves_nodes_and_edges() {
		let original = sample();
		let json = export_json(&original).unwrap();

		let mut restored = Diagram::new("Düğüm");
		restored.create_node(999.0, 999.0, Some("stale".into()));
		let report = parse_document(&json).unwrap().load_into(&mut restored);

		assert_eq!(report.dropped_edges, 0);
		assert_eq!(restored.nodes(), original.nodes());
		let pairs = |d: &Diagram| d.edges().iter().map(|e| (e.from.clone(), e.to.clone())).collect::<Vec<_>>();
		assert_eq!(pairs(&restored), pairs(&original));
	}

	#[test]
	fn edges_with_unknown_endpoints_are_dropped() {
		let json = r#"{
			"nodes": [{"id": "a", "label": "A", "x": 0, "y": 0}, {"id": "b", "label": "B", "x": 5, "y": 5}],
			"edges": [
				{"id": "e1", "from": "a", "to": "b"},
				{"id": "e2", "from": "a", "to": "ghost"},
				{"id": "e3", "from": "b", "to": "a"}
			]
		}"#;
		let mut d = Diagram::new("Düğüm");
		let report = parse_document(json).unwrap().load_into(&mut d);

		assert_eq!(report, LoadReport { nodes: 2, edges: 2, dropped_edges: 1 });
		let ids: Vec<_> = d.edges().iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, vec!["e1", "e3"]);
	}

	#[test]
	fn import_keeps_coordinates_unclamped_and_ids_verbatim() {
		let json = r#"{"nodes": [{"id": "x1", "label": "L", "x": -40, "y": -1.5}]}"#;
		let mut d = Diagram::new("Düğüm");
		parse_document(json).unwrap().load_into(&mut d);
		assert_eq!(d.nodes()[0].id.as_str(), "x1");
		assert_eq!(d.nodes()[0].position, Point::new(-40.0, -1.5));
	}

	#[test]
	fn sparse_document_still_loads() {
		let json = r#"{"nodes": [{"x": 3}], "edges": [{"from": "node_1"}]}"#;
		let mut d = Diagram::new("Düğüm");
		let report = parse_document(json).unwrap().load_into(&mut d);
		assert_eq!(report, LoadReport { nodes: 1, edges: 0, dropped_edges: 1 });
		assert_eq!(d.nodes()[0].label, "Düğüm");
		assert_eq!(d.nodes()[0].position, Point::new(3.0, 0.0));

		let mut empty = sample();
		parse_document("{}").unwrap().load_into(&mut empty);
		assert!(empty.nodes().is_empty());
	}

	#[test]
	fn wrongly_typed_fields_fall_back() {
		let json = r#"{
			"nodes": [
				{"id": 7, "label": 3, "x": "10", "y": null},
				{"id": "b", "label": "B", "x": 1, "y": 2},
				"not a node"
			],
			"edges": [
				{"id": 1, "from": "b", "to": "b"},
				{"from": 7, "to": "b"}
			]
		}"#;
		let mut d = Diagram::new("Düğüm");
		let report = parse_document(json).unwrap().load_into(&mut d);

		assert_eq!(report, LoadReport { nodes: 3, edges: 1, dropped_edges: 1 });
		let first = &d.nodes()[0];
		assert_ne!(first.id.as_str(), "7");
		assert_eq!(first.label, "Düğüm");
		assert_eq!(first.position, Point::new(0.0, 0.0));
		assert_eq!(d.nodes()[2].position, Point::new(0.0, 0.0));
		assert_eq!(d.edges()[0].from.as_str(), "b");
	}

	#[test]
	fn non_array_sections_and_non_objects_load_empty() {
		for json in [r#"{"nodes": null, "edges": null}"#, r#"{"nodes": {}, "edges": 4}"#, "[]", "42"] {
			let mut d = sample();
			let report = parse_document(json).unwrap().load_into(&mut d);
			assert_eq!(report, LoadReport::default(), "{json}");
			assert!(d.nodes().is_empty());
			assert!(d.edges().is_empty());
		}
	}

	#[test]
	fn syntax_errors_are_reported() {
		let err = parse_document("{ not json").unwrap_err();
		assert!(matches!(err, CodecError::InvalidJson(_)));
	}
}
