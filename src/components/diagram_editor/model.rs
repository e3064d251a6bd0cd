use std::collections::HashMap;

use super::types::{Edge, EdgeId, Node, NodeId, Point};

pub const NODE_PREFIX: &str = "node_";
pub const EDGE_PREFIX: &str = "e_";

/// Hands out `<prefix><n>` tokens from a per-prefix counter, skipping any token
/// the caller reports as taken.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
	counters: HashMap<&'static str, u64>,
}

impl IdGenerator {
	pub fn next(&mut self, prefix: &'static str, taken: impl Fn(&str) -> bool) -> String {
		let counter = self.counters.entry(prefix).or_insert(0);
		loop {
			*counter += 1;
			let candidate = format!("{prefix}{counter}");
			if !taken(&candidate) {
				return candidate;
			}
		}
	}
}

/// Ordered nodes and edges of one editing session.
#[derive(Clone, Debug)]
pub struct Diagram {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	ids: IdGenerator,
	default_label: String,
}

impl Diagram {
	pub fn new(default_label: impl Into<String>) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			ids: IdGenerator::default(),
			default_label: default_label.into(),
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| &n.id == id)
	}

	pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| &n.id == id)
	}

	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.node(id).is_some()
	}

	pub fn edges_touching<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
		self.edges.iter().filter(move |e| e.touches(node))
	}

	fn fresh_node_id(&mut self) -> NodeId {
		let nodes = &self.nodes;
		NodeId::new(
			self.ids
				.next(NODE_PREFIX, |c| nodes.iter().any(|n| n.id.as_str() == c)),
		)
	}

	fn fresh_edge_id(&mut self) -> EdgeId {
		let edges = &self.edges;
		EdgeId::new(
			self.ids
				.next(EDGE_PREFIX, |c| edges.iter().any(|e| e.id.as_str() == c)),
		)
	}

	/// Appends a node with a fresh id. A missing label falls back to the
	/// diagram's default label; coordinates are taken as given.
	pub fn create_node(&mut self, x: f64, y: f64, label: Option<String>) -> &Node {
		let id = self.fresh_node_id();
		self.push_node(id, x, y, label)
	}

	/// Appends a node keeping `id` unless it is absent or already used.
	pub fn insert_node(
		&mut self,
		id: Option<NodeId>,
		x: f64,
		y: f64,
		label: Option<String>,
	) -> &Node {
		let id = match id {
			Some(id) if !self.contains_node(&id) => id,
			Some(id) => {
				log::warn!("duplicate node id {id}, assigning a fresh one");
				self.fresh_node_id()
			}
			None => self.fresh_node_id(),
		};
		self.push_node(id, x, y, label)
	}

	fn push_node(&mut self, id: NodeId, x: f64, y: f64, label: Option<String>) -> &Node {
		let label = label.unwrap_or_else(|| self.default_label.clone());
		self.nodes.push(Node {
			id,
			position: Point::new(x, y),
			label,
		});
		&self.nodes[self.nodes.len() - 1]
	}

	/// Removes the node and every edge that starts or ends at it.
	pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
		let idx = self.nodes.iter().position(|n| &n.id == id)?;
		self.edges.retain(|e| !e.touches(id));
		Some(self.nodes.remove(idx))
	}

	/// Appends an edge without checking its endpoints.
	pub fn create_edge(&mut self, from: NodeId, to: NodeId) -> &Edge {
		let id = self.fresh_edge_id();
		self.edges.push(Edge { id, from, to });
		&self.edges[self.edges.len() - 1]
	}

	/// Appends an edge only when both endpoints exist. `id` is kept unless
	/// absent or already used.
	pub fn insert_edge(&mut self, id: Option<EdgeId>, from: NodeId, to: NodeId) -> Option<&Edge> {
		if !self.contains_node(&from) || !self.contains_node(&to) {
			return None;
		}
		let id = match id {
			Some(id) if !self.edges.iter().any(|e| e.id == id) => id,
			_ => self.fresh_edge_id(),
		};
		self.edges.push(Edge { id, from, to });
		self.edges.last()
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use pretty_assertions::assert_eq;

	fn diagram() -> Diagram {
		Diagram::new("Düğüm")
	}

	#[test]
	fn created_ids_are_unique_and_prefixed() {
		let mut d = diagram();
		let ids: Vec<_> = (0..20).map(|i| d.create_node(i as f64, 0.0, None).id.clone()).collect();
		let unique: HashSet<_> = ids.iter().collect();
		assert_eq!(unique.len(), ids.len());
		assert!(ids.iter().all(|id| id.as_str().starts_with(NODE_PREFIX)));
	}

	#[test]
	fn missing_label_uses_default_but_blank_is_kept() {
		let mut d = diagram();
		assert_eq!(d.create_node(0.0, 0.0, None).label, "Düğüm");
		assert_eq!(d.create_node(0.0, 0.0, Some(String::new())).label, "");
	}

	#[test]
	fn placement_is_not_clamped() {
		let mut d = diagram();
		let node = d.create_node(-15.0, -3.5, None);
		assert_eq!(node.position, Point::new(-15.0, -3.5));
	}

	#[test]
	fn generator_skips_ids_already_present() {
		let mut d = diagram();
		d.insert_node(Some("node_1".into()), 0.0, 0.0, None);
		d.insert_node(Some("node_2".into()), 0.0, 0.0, None);
		let fresh = d.create_node(0.0, 0.0, None).id.clone();
		assert_eq!(fresh.as_str(), "node_3");
	}

	#[test]
	fn duplicate_insert_gets_fresh_id() {
		let mut d = diagram();
		d.insert_node(Some("a".into()), 0.0, 0.0, None);
		let second = d.insert_node(Some("a".into()), 1.0, 1.0, None).id.clone();
		assert_ne!(second.as_str(), "a");
		assert_eq!(d.nodes().len(), 2);
	}

	#[test]
	fn remove_node_cascades_to_incident_edges() {
		let mut d = diagram();
		let a = d.create_node(0.0, 0.0, None).id.clone();
		let b = d.create_node(0.0, 0.0, None).id.clone();
		let c = d.create_node(0.0, 0.0, None).id.clone();
		d.create_edge(a.clone(), b.clone());
		d.create_edge(c.clone(), a.clone());
		let kept = d.create_edge(b.clone(), c.clone()).id.clone();

		let removed = d.remove_node(&a).unwrap();
		assert_eq!(removed.id, a);
		assert_eq!(d.edges().len(), 1);
		assert_eq!(d.edges()[0].id, kept);

		let ids: HashSet<_> = d.nodes().iter().map(|n| &n.id).collect();
		assert!(d.edges().iter().all(|e| ids.contains(&e.from) && ids.contains(&e.to)));
	}

	#[test]
	fn remove_unknown_node_is_noop() {
		let mut d = diagram();
		d.create_node(0.0, 0.0, None);
		assert!(d.remove_node(&"nope".into()).is_none());
		assert_eq!(d.nodes().len(), 1);
	}

	#[test]
	fn insert_edge_requires_both_endpoints() {
		let mut d = diagram();
		let a = d.create_node(0.0, 0.0, None).id.clone();
		assert!(d.insert_edge(None, a.clone(), "ghost".into()).is_none());
		assert!(d.edges().is_empty());
	}

	#[test]
	fn self_loops_and_parallel_edges_are_allowed() {
		let mut d = diagram();
		let a = d.create_node(0.0, 0.0, None).id.clone();
		let b = d.create_node(0.0, 0.0, None).id.clone();
		d.create_edge(a.clone(), a.clone());
		d.create_edge(a.clone(), b.clone());
		assert!(d.insert_edge(None, a.clone(), b.clone()).is_some());
		assert_eq!(d.edges().len(), 3);
		assert_eq!(d.edges_touching(&b).count(), 2);
	}

	#[test]
	fn clear_empties_everything() {
		let mut d = diagram();
		let a = d.create_node(0.0, 0.0, None).id.clone();
		d.create_edge(a.clone(), a);
		d.clear();
		assert!(d.nodes().is_empty());
		assert!(d.edges().is_empty());
	}
}
