use serde::Deserialize;

/// A node placed when the editor starts.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SeedNode {
	pub label: String,
	pub x: f64,
	pub y: f64,
}

/// Editor constants. Every node shares the same footprint; nothing is measured
/// per node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
	pub node_width: f64,
	pub node_height: f64,
	/// Distance of the connection handles outside the node box.
	pub handle_offset: f64,
	/// Offset of the drawn node box from the node's stored position.
	pub box_offset_x: f64,
	pub box_offset_y: f64,
	/// Lower bound for the horizontal control-point distance of edge curves.
	pub min_control_distance: f64,
	pub default_label: String,
	pub label_prompt: String,
	pub clear_prompt: String,
	pub invalid_json_message: String,
	pub export_file_name: String,
	pub seed_nodes: Vec<SeedNode>,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			node_width: 110.0,
			node_height: 50.0,
			handle_offset: 6.0,
			box_offset_x: 25.0,
			box_offset_y: 20.0,
			min_control_distance: 40.0,
			default_label: "Düğüm".into(),
			label_prompt: "Düğüm etiketi:".into(),
			clear_prompt: "Hepsini silmek istediğine emin misin?".into(),
			invalid_json_message: "Geçersiz JSON".into(),
			export_file_name: "diagram.json".into(),
			seed_nodes: vec![
				SeedNode {
					label: "Başla".into(),
					x: 60.0,
					y: 80.0,
				},
				SeedNode {
					label: "Bitiş".into(),
					x: 320.0,
					y: 160.0,
				},
			],
		}
	}
}
