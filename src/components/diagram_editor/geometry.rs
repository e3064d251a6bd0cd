use super::config::EditorConfig;
use super::model::Diagram;
use super::types::{Edge, Node, Point};

/// Axis-aligned box in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// The drawn box of a node. Every node shares the configured footprint.
pub fn node_box(node: &Node, config: &EditorConfig) -> Rect {
	Rect {
		x: node.position.x + config.box_offset_x,
		y: node.position.y + config.box_offset_y,
		width: config.node_width,
		height: config.node_height,
	}
}

/// Node position for a node placed at `center`: offset by half the footprint.
/// The drawn box offset is not applied, so stored coordinates stay independent
/// of how the box is rendered.
pub fn position_centered_at(center: Point, config: &EditorConfig) -> Point {
	Point::new(
		center.x - config.node_width / 2.0,
		center.y - config.node_height / 2.0,
	)
}

/// Source anchor (right handle) and target anchor (left handle) of an edge.
pub fn edge_anchors(from: &Node, to: &Node, config: &EditorConfig) -> (Point, Point) {
	let start = Point::new(
		from.position.x + config.node_width + config.handle_offset + config.box_offset_x,
		from.position.y + config.node_height / 2.0 + config.box_offset_y,
	);
	let end = Point::new(
		to.position.x - config.handle_offset + config.box_offset_x,
		to.position.y + config.node_height / 2.0 + config.box_offset_y,
	);
	(start, end)
}

/// SVG path data for `edge`: a cubic S-curve between the anchors. `None` when
/// either endpoint is missing from the diagram.
pub fn edge_path(diagram: &Diagram, edge: &Edge, config: &EditorConfig) -> Option<String> {
	let from = diagram.node(&edge.from)?;
	let to = diagram.node(&edge.to)?;
	let (a, b) = edge_anchors(from, to, config);
	let dx = config.min_control_distance.max((b.x - a.x).abs() / 2.0);
	Some(format!(
		"M {} {} C {} {} {} {} {} {}",
		a.x,
		a.y,
		a.x + dx,
		a.y,
		b.x - dx,
		b.y,
		b.x,
		b.y
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn two_nodes(ax: f64, ay: f64, bx: f64, by: f64) -> (Diagram, Edge) {
		let mut d = Diagram::new("Düğüm");
		let a = d.create_node(ax, ay, None).id.clone();
		let b = d.create_node(bx, by, None).id.clone();
		let edge = d.create_edge(a, b).clone();
		(d, edge)
	}

	#[test]
	fn seed_layout_path() {
		let (d, edge) = two_nodes(60.0, 80.0, 320.0, 160.0);
		let path = edge_path(&d, &edge, &EditorConfig::default()).unwrap();
		assert_eq!(path, "M 201 125 C 270 125 270 205 339 205");
	}

	#[test]
	fn close_nodes_use_minimum_control_distance() {
		let (d, edge) = two_nodes(0.0, 0.0, 100.0, 0.0);
		// anchors at x=141 and x=119, gap 22 -> control distance 40
		let path = edge_path(&d, &edge, &EditorConfig::default()).unwrap();
		assert_eq!(path, "M 141 45 C 181 45 79 45 119 45");
	}

	#[test]
	fn missing_endpoint_yields_no_path() {
		let (mut d, edge) = two_nodes(0.0, 0.0, 10.0, 10.0);
		d.remove_node(&edge.to);
		assert_eq!(edge_path(&d, &edge, &EditorConfig::default()), None);
	}

	#[test]
	fn placement_subtracts_half_the_footprint() {
		let config = EditorConfig::default();
		let p = position_centered_at(Point::new(300.0, 200.0), &config);
		assert_eq!(p, Point::new(245.0, 175.0));
	}

	#[test]
	fn box_contains_edges_inclusive() {
		let r = Rect {
			x: 10.0,
			y: 10.0,
			width: 5.0,
			height: 5.0,
		};
		assert!(r.contains(Point::new(10.0, 15.0)));
		assert!(!r.contains(Point::new(9.9, 12.0)));
	}
}
