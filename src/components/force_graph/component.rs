//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas plus three popover elements and wires
//! pointer, wheel and window events into a [`ForceGraphState`]. An animation
//! loop runs via `requestAnimationFrame`, advancing the engine and redrawing
//! each frame. Everything the loop holds is released on cleanup: the pending
//! frame is cancelled, the simulation stopped, observers disconnected and
//! window listeners removed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent,
	WheelEvent, Window,
};

use super::config::GraphOptions;
use super::interaction::GraphEvent;
use super::overlay::{self, Overlays};
use super::render;
use super::resize::{ResizeAdapter, window_size};
use super::state::ForceGraphState;
use super::types::{GraphData, GraphNode};

/// A window event listener that unregisters itself when dropped.
struct WindowListener {
	window: Window,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
	fn add(window: &Window, event: &'static str, f: impl FnMut(Event) + 'static) -> Option<Self> {
		let callback = Closure::<dyn FnMut(Event)>::new(f);
		match window.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
			Ok(()) => Some(Self {
				window: window.clone(),
				event,
				callback,
			}),
			Err(e) => {
				warn!("satellite-graph: could not listen for `{event}`: {e:?}");
				None
			}
		}
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// Everything the animation loop and event handlers share. Cheap to clone.
#[derive(Clone, Default)]
struct Runtime {
	engine: Rc<RefCell<Option<ForceGraphState>>>,
	frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	frame_id: Rc<Cell<Option<i32>>>,
	resize: Rc<RefCell<Option<ResizeAdapter>>>,
	listeners: Rc<RefCell<Vec<WindowListener>>>,
}

impl Runtime {
	fn request_frame(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.frame.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.frame_id.set(Some(id)),
				Err(e) => error!("satellite-graph: requestAnimationFrame failed: {e:?}"),
			}
		}
	}

	fn with_engine(&self, f: impl FnOnce(&mut ForceGraphState)) {
		if let Some(engine) = self.engine.borrow_mut().as_mut() {
			f(engine);
		}
	}

	/// Runs on every exit path of the component.
	fn teardown(&self) {
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.with_engine(ForceGraphState::teardown);
		self.frame.borrow_mut().take();
		self.resize.borrow_mut().take();
		self.listeners.borrow_mut().clear();
		debug!("satellite-graph: component cleaned up");
	}
}

fn now() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_default()
}

/// Pointer position relative to the canvas.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Move a visible popover next to `anchor`, kept inside the container.
fn position_popover(el: &HtmlElement, anchor: (f64, f64), container: (f64, f64)) {
	let size = (el.offset_width() as f64, el.offset_height() as f64);
	if size.0 <= 0.0 || size.1 <= 0.0 {
		return;
	}
	let placement = overlay::place(anchor, size, container);
	let style = el.style();
	let _ = style.set_property("left", &format!("{}px", placement.left));
	let _ = style.set_property("top", &format!("{}px", placement.top));
}

/// The canvas is out of flow, so the root's observed size never includes it.
const CANVAS_STYLE: &str =
	"position: absolute; top: 0; left: 0; display: block; cursor: grab; touch-action: none;";

/// Inline style of the component root. The root is the element whose size is
/// observed; its height comes from its parent, never from its content.
fn root_style(fullscreen: bool, min_width: f64, min_height: f64) -> String {
	if fullscreen {
		"position: fixed; inset: 0; overflow: hidden;".to_string()
	} else {
		format!(
			"position: relative; width: 100%; height: 100%; \
			 min-width: {min_width}px; min-height: {min_height}px; overflow: hidden;"
		)
	}
}

fn class_list(base: &str, extra: Option<&str>) -> String {
	match extra.map(str::trim).filter(|e| !e.is_empty()) {
		Some(extra) => format!("{base} {extra}"),
		None => base.to_string(),
	}
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; a new value rebuilds the
/// simulation. `options` carries the node group styles and any overrides of
/// the link, force, satellite and zoom defaults. The component sizes itself
/// to its parent container (never below the configured minimum); set
/// `fullscreen = true` to fill the viewport instead. `popover_class` and
/// `tooltip_class` are appended to the node popover and satellite tooltip
/// classes.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] options: GraphOptions,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(optional)] on_node_hover: Option<Callback<Option<GraphNode>>>,
	#[prop(optional, into)] popover_class: Option<String>,
	#[prop(optional, into)] tooltip_class: Option<String>,
) -> impl IntoView {
	let root_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let node_popover_ref = NodeRef::<leptos::html::Div>::new();
	let link_popover_ref = NodeRef::<leptos::html::Div>::new();
	let satellite_tooltip_ref = NodeRef::<leptos::html::Div>::new();
	let (overlays, set_overlays) = signal(Overlays::default());

	let runtime = Runtime::default();
	let config = options.resolve();
	let container_style = root_style(fullscreen, config.min_width, config.min_height);
	let config = StoredValue::new(config);

	let runtime_init = runtime.clone();
	Effect::new(move |_| {
		let (Some(root), Some(canvas)) = (root_ref.get(), canvas_ref.get()) else {
			return;
		};
		if runtime_init.engine.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};

		let observed = if fullscreen {
			window_size(&window).unwrap_or((0.0, 0.0))
		} else {
			(root.client_width() as f64, root.client_height() as f64)
		};

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("satellite-graph: 2d context has an unexpected type");
					return;
				}
			},
			Ok(None) | Err(_) => {
				error!("satellite-graph: canvas has no 2d context");
				return;
			}
		};

		let engine = ForceGraphState::new(
			&data.get_untracked(),
			config.get_value(),
			observed.0,
			observed.1,
		);
		*runtime_init.engine.borrow_mut() = Some(engine);

		let rt = runtime_init.clone();
		let on_resize = move |w: f64, h: f64| rt.with_engine(|e| e.resize(w, h));
		let adapter = if fullscreen {
			ResizeAdapter::window(&window, on_resize)
		} else {
			ResizeAdapter::observe(&root, on_resize)
		};
		match adapter {
			Ok(adapter) => *runtime_init.resize.borrow_mut() = Some(adapter),
			Err(e) => warn!("satellite-graph: size changes will be ignored: {e:?}"),
		}

		let mut listeners = runtime_init.listeners.borrow_mut();
		let rt = runtime_init.clone();
		listeners.extend(WindowListener::add(&window, "pointerup", move |_| {
			rt.with_engine(|e| e.pointer_up());
		}));
		let rt = runtime_init.clone();
		listeners.extend(WindowListener::add(&window, "blur", move |_| {
			rt.with_engine(|e| e.blur());
		}));
		drop(listeners);

		let rt = runtime_init.clone();
		let cursor = Cell::new("");
		*runtime_init.frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			rt.frame_id.set(None);
			if !canvas.is_connected() {
				// Unmounted without cleanup running: stop, don't reschedule.
				rt.with_engine(ForceGraphState::teardown);
				return;
			}

			let mut frame = None;
			rt.with_engine(|engine| {
				if !engine.frame(timestamp) {
					return;
				}
				let (w, h) = engine.size();
				if canvas.width() != w as u32 || canvas.height() != h as u32 {
					canvas.set_width(w as u32);
					canvas.set_height(h as u32);
				}
				render::render(&ctx, engine.scene(), &engine.transform(), engine.theme(), (w, h));

				let controller = engine.controller();
				let wanted = if controller.is_dragging() {
					"grabbing"
				} else if controller.ring_host().is_some() {
					"pointer"
				} else {
					"grab"
				};
				if cursor.replace(wanted) != wanted {
					let _ = HtmlElement::style(&canvas).set_property("cursor", wanted);
				}

				frame = Some((
					engine.take_events(),
					engine.overlays(),
					engine.node_anchor(),
					engine.pointer(),
					(w, h),
				));
			});
			let Some((events, current, node_anchor, pointer, size)) = frame else {
				return;
			};

			for event in events {
				match event {
					GraphEvent::NodeHover(node) => {
						if let Some(cb) = on_node_hover {
							cb.run(node);
						}
					}
					GraphEvent::NodeClick(node) => {
						if let Some(cb) = on_node_click {
							cb.run(node);
						}
					}
				}
			}

			if overlays.with_untracked(|o| o != &current) {
				set_overlays.set(current);
			}
			if let Some(el) = node_popover_ref.get_untracked() {
				position_popover(&el, node_anchor.unwrap_or(pointer), size);
			}
			if let Some(el) = link_popover_ref.get_untracked() {
				position_popover(&el, pointer, size);
			}
			if let Some(el) = satellite_tooltip_ref.get_untracked() {
				position_popover(&el, pointer, size);
			}

			rt.request_frame();
		}));
		runtime_init.request_frame();
	});

	let runtime_data = runtime.clone();
	Effect::new(move |prev: Option<()>| {
		let next = data.get();
		if prev.is_some() {
			runtime_data.with_engine(|e| e.set_data(&next));
		}
	});

	let cleanup = StoredValue::new_local(runtime.clone());
	on_cleanup(move || {
		let _ = cleanup.try_with_value(Runtime::teardown);
	});

	let runtime_pd = runtime.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let _ = canvas.set_pointer_capture(ev.pointer_id());
		let point = canvas_point(&canvas, &ev);
		runtime_pd.with_engine(|e| e.pointer_down(point));
	};

	let runtime_pm = runtime.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let point = canvas_point(&canvas, &ev);
		runtime_pm.with_engine(|e| e.pointer_move(point, ev.buttons() != 0, now()));
	};

	let runtime_pl = runtime.clone();
	let on_pointerleave = move |_: PointerEvent| {
		runtime_pl.with_engine(|e| e.pointer_leave(now()));
	};

	let runtime_wh = runtime.clone();
	let on_wheel = move |ev: WheelEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let point = canvas_point(&canvas, &ev);
		let mut consumed = false;
		runtime_wh.with_engine(|e| {
			consumed = e.wheel(point, ev.delta_y(), ev.delta_mode(), ev.ctrl_key());
		});
		if consumed {
			ev.prevent_default();
		}
	};

	let runtime_dc = runtime;
	let on_dblclick = move |_: MouseEvent| {
		runtime_dc.with_engine(|e| e.double_click(now()));
	};

	let node_popover_class = class_list("graph-popover node-popover", popover_class.as_deref());
	let tooltip_class = class_list("graph-popover satellite-tooltip", tooltip_class.as_deref());
	let shown = |visible: bool| if visible { "block" } else { "none" };

	view! {
		<div node_ref=root_ref class="satellite-graph" style=container_style>
			<canvas
				node_ref=canvas_ref
				class="satellite-graph-canvas"
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerleave=on_pointerleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style=CANVAS_STYLE
			/>
			<div
				node_ref=node_popover_ref
				class=node_popover_class
				style="position: absolute; pointer-events: none; max-width: 280px;"
				style:display=move || shown(overlays.with(|o| o.node.is_some()))
			>
				<h3>{move || overlays.with(|o| o.node.as_ref().map(|n| n.title.clone()).unwrap_or_default())}</h3>
				<p>{move || overlays.with(|o| o.node.as_ref().map(|n| n.content.clone()).unwrap_or_default())}</p>
			</div>
			<div
				node_ref=link_popover_ref
				class="graph-popover link-popover"
				style="position: absolute; pointer-events: none; max-width: 280px;"
				style:display=move || shown(overlays.with(|o| o.link.is_some()))
			>
				<h4>
					{move || overlays.with(|o| {
						o.link.as_ref().map(|l| format!("{} \u{2192} {}", l.source, l.target)).unwrap_or_default()
					})}
				</h4>
				<strong>{move || overlays.with(|o| o.link.as_ref().map(|l| l.relationship.clone()).unwrap_or_default())}</strong>
				<p>{move || overlays.with(|o| o.link.as_ref().map(|l| l.description.clone()).unwrap_or_default())}</p>
			</div>
			<div
				node_ref=satellite_tooltip_ref
				class=tooltip_class
				style="position: absolute; pointer-events: none; max-width: 240px;"
				style:display=move || shown(overlays.with(|o| o.satellite.is_some()))
			>
				<strong>{move || overlays.with(|o| o.satellite.as_ref().map(|s| s.question.clone()).unwrap_or_default())}</strong>
				<p>{move || overlays.with(|o| o.satellite.as_ref().map(|s| s.answer.clone()).unwrap_or_default())}</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn observed_root_does_not_size_from_the_canvas() {
		assert!(CANVAS_STYLE.contains("position: absolute"));
		let style = root_style(false, 860.0, 400.0);
		assert!(style.contains("height: 100%"));
		assert!(style.contains("min-height: 400px"));
		assert!(style.contains("min-width: 860px"));
		assert!(root_style(true, 860.0, 400.0).contains("position: fixed"));
	}

	#[test]
	fn extra_classes_are_appended() {
		assert_eq!(class_list("graph-popover", None), "graph-popover");
		assert_eq!(class_list("graph-popover", Some("  ")), "graph-popover");
		assert_eq!(class_list("graph-popover", Some("dark wide")), "graph-popover dark wide");
	}
}
