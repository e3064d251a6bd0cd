use std::cell::RefCell;
use std::rc::Rc;

use super::codec::{self, CodecError, LoadReport};
use super::config::EditorConfig;
use super::dialogs::Dialogs;
use super::geometry;
use super::model::Diagram;
use super::types::{Node, NodeId, Point};

pub const PRIMARY_BUTTON: i16 = 0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Dark,
	Light,
}

impl Theme {
	pub fn toggled(self) -> Self {
		match self {
			Self::Dark => Self::Light,
			Self::Light => Self::Dark,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Dark => "dark",
			Self::Light => "light",
		}
	}
}

/// An in-progress drag: where the pointer and the node were when it started.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	pub node: NodeId,
	pub pointer_start: Point,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConnectMode {
	#[default]
	Off,
	/// The next two distinct node clicks create one edge.
	On { source: Option<NodeId> },
}

/// Editor session: the diagram plus selection, drag and connect state.
pub struct EditorState {
	pub config: EditorConfig,
	diagram: Diagram,
	selected: Option<NodeId>,
	connect: ConnectMode,
	drag: Option<DragState>,
	theme: Theme,
}

impl EditorState {
	pub fn new(config: EditorConfig) -> Self {
		Self {
			diagram: Diagram::new(config.default_label.clone()),
			config,
			selected: None,
			connect: ConnectMode::Off,
			drag: None,
			theme: Theme::default(),
		}
	}

	/// A session starting with the configured seed nodes.
	pub fn with_seed_nodes(config: EditorConfig) -> Self {
		let mut state = Self::new(config);
		for seed in state.config.seed_nodes.clone() {
			state.diagram.create_node(seed.x, seed.y, Some(seed.label));
		}
		state
	}

	pub fn diagram(&self) -> &Diagram {
		&self.diagram
	}

	pub fn selected(&self) -> Option<&NodeId> {
		self.selected.as_ref()
	}

	pub fn connect_mode(&self) -> bool {
		matches!(self.connect, ConnectMode::On { .. })
	}

	pub fn connect_source(&self) -> Option<&NodeId> {
		match &self.connect {
			ConnectMode::On { source } => source.as_ref(),
			ConnectMode::Off => None,
		}
	}

	pub fn drag(&self) -> Option<&DragState> {
		self.drag.as_ref()
	}

	pub fn theme(&self) -> Theme {
		self.theme
	}

	/// Topmost node whose box contains `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&Node> {
		let p = Point::new(x, y);
		self.diagram
			.nodes()
			.iter()
			.rev()
			.find(|n| geometry::node_box(n, &self.config).contains(p))
	}

	pub fn pointer_down(&mut self, node: &NodeId, button: i16, x: f64, y: f64) {
		if button != PRIMARY_BUTTON {
			return;
		}
		let Some(n) = self.diagram.node(node) else {
			return;
		};
		self.drag = Some(DragState {
			node: node.clone(),
			pointer_start: Point::new(x, y),
			node_start: n.position,
		});
	}

	/// Moves the dragged node by the pointer delta, clamped to non-negative
	/// coordinates.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let Some(drag) = &self.drag else {
			return;
		};
		let nx = (drag.node_start.x + x - drag.pointer_start.x).max(0.0);
		let ny = (drag.node_start.y + y - drag.pointer_start.y).max(0.0);
		if let Some(node) = self.diagram.node_mut(&drag.node) {
			node.position = Point::new(nx, ny);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag = None;
	}

	pub fn click_node(&mut self, node: &NodeId) {
		if !self.diagram.contains_node(node) {
			return;
		}
		self.selected = Some(node.clone());

		let ConnectMode::On { source } = &mut self.connect else {
			return;
		};
		match source.take() {
			None => *source = Some(node.clone()),
			Some(from) if &from == node => {}
			Some(from) => {
				let edge = self.diagram.create_edge(from, node.clone());
				log::debug!("connected {} -> {} as {}", edge.from, edge.to, edge.id);
				self.connect = ConnectMode::Off;
			}
		}
	}

	pub fn click_canvas(&mut self) {
		self.selected = None;
		if let ConnectMode::On { source } = &mut self.connect {
			*source = None;
		}
	}

	/// Asks for a new label. Cancelling keeps the old label; submitting blank
	/// text sets a blank label.
	pub fn double_click_node(&mut self, node: &NodeId, dialogs: &mut impl Dialogs) {
		let Some(current) = self.diagram.node(node).map(|n| n.label.clone()) else {
			return;
		};
		let Some(label) = dialogs.ask_text(&self.config.label_prompt, &current) else {
			return;
		};
		if let Some(n) = self.diagram.node_mut(node) {
			n.label = label;
		}
	}

	/// Creates a node at the click point, offset by half the node footprint.
	pub fn double_click_canvas(&mut self, x: f64, y: f64) -> NodeId {
		let p = geometry::position_centered_at(Point::new(x, y), &self.config);
		self.diagram.create_node(p.x, p.y, None).id.clone()
	}

	pub fn key_down(&mut self, key: &str) {
		if !matches!(key, "Delete" | "Backspace") {
			return;
		}
		if let Some(node) = self.selected.clone() {
			self.remove_node(&node);
		}
	}

	pub fn toggle_connect_mode(&mut self) {
		self.connect = match self.connect {
			ConnectMode::Off => ConnectMode::On { source: None },
			ConnectMode::On { .. } => ConnectMode::Off,
		};
		log::debug!("connect mode: {}", self.connect_mode());
	}

	pub fn toggle_theme(&mut self) {
		self.theme = self.theme.toggled();
	}

	/// Removes the node with its edges and forgets any selection, connect
	/// source or drag that referred to it.
	pub fn remove_node(&mut self, node: &NodeId) {
		let incident = self.diagram.edges_touching(node).count();
		let Some(removed) = self.diagram.remove_node(node) else {
			return;
		};
		log::debug!("removed node {} with {incident} edges", removed.id);
		if self.selected.as_ref() == Some(node) {
			self.selected = None;
		}
		if let ConnectMode::On { source } = &mut self.connect {
			if source.as_ref() == Some(node) {
				*source = None;
			}
		}
		if self.drag.as_ref().is_some_and(|d| &d.node == node) {
			self.drag = None;
		}
	}

	pub fn export_json(&self) -> Result<String, CodecError> {
		codec::export_json(&self.diagram)
	}

	/// Replaces the diagram with the parsed document. On a parse error the
	/// user is notified and the current diagram is left untouched.
	pub fn import_json(
		&mut self,
		text: &str,
		dialogs: &mut impl Dialogs,
	) -> Result<LoadReport, CodecError> {
		let document = codec::parse_document(text).inspect_err(|err| {
			log::warn!("{err}");
			dialogs.notify_error(&self.config.invalid_json_message);
		})?;
		self.reset_interaction();
		let report = document.load_into(&mut self.diagram);
		log::info!(
			"imported {} nodes, {} edges ({} dropped)",
			report.nodes,
			report.edges,
			report.dropped_edges
		);
		Ok(report)
	}

	/// Empties the diagram after the user confirms. Returns whether it did.
	pub fn clear_all(&mut self, dialogs: &mut impl Dialogs) -> bool {
		if !dialogs.ask_confirm(&self.config.clear_prompt) {
			return false;
		}
		self.reset_interaction();
		self.diagram.clear();
		true
	}

	fn reset_interaction(&mut self) {
		self.selected = None;
		self.drag = None;
		if let ConnectMode::On { source } = &mut self.connect {
			*source = None;
		}
	}
}

/// Session shared between event handlers. Access that would overlap an
/// in-progress one, such as a window listener firing while a modal dialog is
/// open inside a mutation, is skipped instead of panicking.
#[derive(Clone)]
pub struct SharedEditor(Rc<RefCell<EditorState>>);

impl SharedEditor {
	pub fn new(state: EditorState) -> Self {
		Self(Rc::new(RefCell::new(state)))
	}

	pub fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> Option<R> {
		match self.0.try_borrow() {
			Ok(state) => Some(f(&state)),
			Err(_) => {
				log::debug!("editor busy, skipping read");
				None
			}
		}
	}

	pub fn write<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> Option<R> {
		match self.0.try_borrow_mut() {
			Ok(mut state) => Some(f(&mut state)),
			Err(_) => {
				log::debug!("editor busy, skipping update");
				None
			}
		}
	}
}
