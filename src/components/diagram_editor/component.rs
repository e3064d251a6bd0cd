use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use leptos_meta::Html;
use wasm_bindgen::prelude::*;
use web_sys::{
	Blob, BlobPropertyBag, CanvasRenderingContext2d, FileReader, HtmlAnchorElement,
	HtmlCanvasElement, HtmlInputElement, MouseEvent, ProgressEvent, Url,
};

use super::config::EditorConfig;
use super::dialogs::{BrowserDialogs, Dialogs};
use super::render;
use super::state::{EditorState, SharedEditor, Theme};
use super::types::NodeId;

type ReaderCallback = Closure<dyn FnMut(ProgressEvent)>;

/// Shared handle the event handlers mutate through. Every mutation republishes
/// the toolbar signals and redraws the canvas.
#[derive(Clone)]
struct Editor {
	state: SharedEditor,
	ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>>,
	size: Rc<Cell<(f64, f64)>>,
	connect_mode: RwSignal<bool>,
	theme: RwSignal<Theme>,
	counts: RwSignal<(usize, usize)>,
}

impl Editor {
	/// `None` when the session is already borrowed, e.g. while a dialog opened
	/// by another handler is still showing.
	fn update<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> Option<R> {
		let result = self.state.write(f)?;
		self.refresh();
		Some(result)
	}

	fn refresh(&self) {
		let size = self.size.get();
		self.state.read(|state| {
			self.connect_mode.set(state.connect_mode());
			self.theme.set(state.theme());
			self.counts.set((
				state.diagram().nodes().len(),
				state.diagram().edges().len(),
			));
			if let Some(ctx) = self.ctx.borrow().as_ref() {
				render::render(state, ctx, size.0, size.1);
			}
		});
	}

	fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
		self.state
			.read(|s| s.node_at(x, y).map(|n| n.id.clone()))
			.flatten()
	}

	fn is_dragging(&self) -> bool {
		self.state.read(|s| s.drag().is_some()).unwrap_or(false)
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
	canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()
		.map_err(JsValue::from)
}

/// Sizes the canvas to its parent and returns the new size.
fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0));
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn download_json(json: &str, file_name: &str) -> Result<(), JsValue> {
	let parts = js_sys::Array::of1(&JsValue::from_str(json));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let anchor: HtmlAnchorElement = document().create_element("a")?.unchecked_into();
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();

	set_timeout(
		move || {
			let _ = Url::revoke_object_url(&url);
		},
		Duration::from_secs(1),
	);
	Ok(())
}

#[component]
pub fn DiagramEditorCanvas(#[prop(optional)] config: Option<EditorConfig>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let editor = Editor {
		state: SharedEditor::new(EditorState::with_seed_nodes(config.unwrap_or_default())),
		ctx: Rc::new(RefCell::new(None)),
		size: Rc::new(Cell::new((0.0, 0.0))),
		connect_mode: RwSignal::new(false),
		theme: RwSignal::new(Theme::default()),
		counts: RwSignal::new((0, 0)),
	};
	let (connect_mode, theme, counts) = (editor.connect_mode, editor.theme, editor.counts);
	let reading = RwSignal::new(false);
	let reader_slot: Rc<RefCell<Option<ReaderCallback>>> = Rc::new(RefCell::new(None));

	let editor_init = editor.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match context_2d(&canvas) {
			Ok(ctx) => *editor_init.ctx.borrow_mut() = Some(ctx),
			Err(err) => log::error!("canvas setup failed: {err:?}"),
		}
		editor_init.size.set(fit_canvas(&canvas));
		editor_init.refresh();
	});

	// Window-level listeners live exactly as long as the component.
	let (editor_mm, editor_mu, editor_kd, editor_rs) =
		(editor.clone(), editor.clone(), editor.clone(), editor.clone());
	let listeners = [
		window_event_listener(ev::mousemove, move |ev| {
			if editor_mm.is_dragging() {
				editor_mm.update(|s| s.pointer_move(ev.client_x() as f64, ev.client_y() as f64));
			}
		}),
		window_event_listener(ev::mouseup, move |_| {
			if editor_mu.is_dragging() {
				editor_mu.update(EditorState::pointer_up);
			}
		}),
		window_event_listener(ev::keydown, move |ev| {
			let key = ev.key();
			editor_kd.update(|s| s.key_down(&key));
		}),
		window_event_listener(ev::resize, move |_| {
			if let Some(canvas) = canvas_ref.get_untracked() {
				editor_rs.size.set(fit_canvas(&canvas));
				editor_rs.refresh();
			}
		}),
	];
	on_cleanup(move || {
		for listener in listeners {
			listener.remove();
		}
	});

	let editor_md = editor.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(id) = editor_md.node_at(x, y) {
			ev.stop_propagation();
			let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
			editor_md.update(|s| s.pointer_down(&id, ev.button(), cx, cy));
		}
	};

	let editor_cl = editor.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		match editor_cl.node_at(x, y) {
			Some(id) => editor_cl.update(|s| s.click_node(&id)),
			None => editor_cl.update(EditorState::click_canvas),
		};
	};

	let editor_dc = editor.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		match editor_dc.node_at(x, y) {
			Some(id) => {
				editor_dc.update(|s| s.double_click_node(&id, &mut BrowserDialogs));
			}
			None => {
				editor_dc.update(|s| {
					s.double_click_canvas(x, y);
				});
				editor_dc.size.set(fit_canvas(&canvas));
				editor_dc.refresh();
			}
		}
	};

	let editor_tc = editor.clone();
	let on_toggle_connect = move |_: MouseEvent| {
		editor_tc.update(EditorState::toggle_connect_mode);
	};

	let editor_tt = editor.clone();
	let on_toggle_theme = move |_: MouseEvent| {
		editor_tt.update(EditorState::toggle_theme);
	};

	let editor_ca = editor.clone();
	let on_clear = move |_: MouseEvent| {
		editor_ca.update(|s| s.clear_all(&mut BrowserDialogs));
	};

	let editor_ex = editor.clone();
	let on_export = move |_: MouseEvent| {
		let exported = editor_ex
			.state
			.read(|s| (s.export_json(), s.config.export_file_name.clone()));
		let Some((json, file_name)) = exported else {
			return;
		};
		let result = json
			.map_err(|err| JsValue::from_str(&err.to_string()))
			.and_then(|json| download_json(&json, &file_name));
		if let Err(err) = result {
			log::error!("export failed: {err:?}");
		}
	};

	let editor_im = editor.clone();
	let on_file = move |ev: web_sys::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		input.set_value("");

		let reader = match FileReader::new() {
			Ok(reader) => reader,
			Err(err) => {
				log::error!("file reader unavailable: {err:?}");
				return;
			}
		};
		let (editor, done) = (editor_im.clone(), reader.clone());
		let callback: ReaderCallback = Closure::new(move |_: ProgressEvent| {
			reading.set(false);
			match done.result().ok().and_then(|v| v.as_string()) {
				Some(text) => {
					let _ = editor.update(|s| s.import_json(&text, &mut BrowserDialogs));
				}
				None => {
					if let Some(message) =
						editor.state.read(|s| s.config.invalid_json_message.clone())
					{
						BrowserDialogs.notify_error(&message);
					}
				}
			}
		});
		reader.set_onloadend(Some(callback.as_ref().unchecked_ref()));
		match reader.read_as_text(&file) {
			Ok(()) => {
				reading.set(true);
				*reader_slot.borrow_mut() = Some(callback);
			}
			Err(err) => log::error!("reading {} failed: {err:?}", file.name()),
		}
	};

	view! {
		<Html attr:data-theme=move || theme.get().as_str() />

		<div class="diagram-editor" style="display: flex; flex-direction: column; height: 100%;">
			<div class="toolbar">
				<button class:active=move || connect_mode.get() on:click=on_toggle_connect>
					{move || if connect_mode.get() { "Bağlantı modu: açık" } else { "Bağlan" }}
				</button>
				<button on:click=on_export>"Dışa aktar"</button>
				<label class="file-picker">
					"İçe aktar"
					<input
						type="file"
						accept="application/json,.json"
						prop:disabled=move || reading.get()
						on:change=on_file
					/>
				</label>
				<button on:click=on_clear>"Temizle"</button>
				<button on:click=on_toggle_theme>"Tema"</button>
				<span class="status">
					{move || {
						let (nodes, edges) = counts.get();
						format!("{nodes} düğüm, {edges} bağlantı")
					}}
				</span>
			</div>
			<div class="canvas-host" style="position: relative; flex: 1; min-height: 0;">
				<canvas
					node_ref=canvas_ref
					class="diagram-canvas"
					on:mousedown=on_mousedown
					on:click=on_click
					on:dblclick=on_dblclick
					style="display: block; cursor: default;"
				/>
			</div>
		</div>
	}
}
