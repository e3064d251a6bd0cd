use web_sys::{CanvasRenderingContext2d, Path2d};

use super::geometry::{self, Rect};
use super::state::{EditorState, Theme};

const ARROW_SIZE: f64 = 8.0;

struct Palette {
	background: &'static str,
	edge: &'static str,
	node_fill: &'static str,
	node_stroke: &'static str,
	selected: &'static str,
	source: &'static str,
	text: &'static str,
}

fn palette(theme: Theme) -> Palette {
	match theme {
		Theme::Dark => Palette {
			background: "#1a1a2e",
			edge: "rgba(100, 180, 255, 0.8)",
			node_fill: "#24243e",
			node_stroke: "#4a4a6a",
			selected: "#64b4ff",
			source: "#ff7f0e",
			text: "#f0f0f5",
		},
		Theme::Light => Palette {
			background: "#f7f7fa",
			edge: "rgba(40, 90, 160, 0.8)",
			node_fill: "#ffffff",
			node_stroke: "#b0b0c0",
			selected: "#1f77b4",
			source: "#d62728",
			text: "#1a1a2e",
		},
	}
}

pub fn render(state: &EditorState, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	let palette = palette(state.theme());
	ctx.set_fill_style_str(palette.background);
	ctx.fill_rect(0.0, 0.0, width, height);
	draw_edges(state, ctx, &palette);
	draw_nodes(state, ctx, &palette);
}

fn draw_edges(state: &EditorState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	let diagram = state.diagram();
	ctx.set_stroke_style_str(palette.edge);
	ctx.set_fill_style_str(palette.edge);
	ctx.set_line_width(2.0);

	for edge in diagram.edges() {
		let Some(d) = geometry::edge_path(diagram, edge, &state.config) else {
			continue;
		};
		match Path2d::new_with_path_string(&d) {
			Ok(path) => ctx.stroke_with_path(&path),
			Err(err) => {
				log::error!("bad edge path {d:?}: {err:?}");
				continue;
			}
		}

		// Curves always arrive horizontally, so the head points along +x.
		let (Some(from), Some(to)) = (diagram.node(&edge.from), diagram.node(&edge.to)) else {
			continue;
		};
		let (_, tip) = geometry::edge_anchors(from, to, &state.config);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(tip.x - ARROW_SIZE, tip.y - ARROW_SIZE * 0.5);
		ctx.line_to(tip.x - ARROW_SIZE, tip.y + ARROW_SIZE * 0.5);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &EditorState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in state.diagram().nodes() {
		let rect = geometry::node_box(node, &state.config);
		let Rect {
			x,
			y,
			width,
			height,
		} = rect;

		let (stroke, line_width) = if state.connect_source() == Some(&node.id) {
			(palette.source, 3.0)
		} else if state.selected() == Some(&node.id) {
			(palette.selected, 3.0)
		} else {
			(palette.node_stroke, 1.5)
		};

		ctx.set_fill_style_str(palette.node_fill);
		ctx.fill_rect(x, y, width, height);
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(line_width);
		ctx.stroke_rect(x, y, width, height);

		ctx.set_fill_style_str(palette.text);
		let center = rect.center();
		let _ = ctx.fill_text_with_max_width(&node.label, center.x, center.y, width - 8.0);
	}
}
