//! Container size tracking.
//!
//! A [`ResizeAdapter`] reports `(width, height)` whenever the observed element
//! (or the window, in fullscreen mode) changes size. Dropping the adapter
//! disconnects it, so it lives exactly as long as the component that owns it.

use wasm_bindgen::prelude::*;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry, Window};

/// The size the graph should use for an observed container: never below the
/// configured minimum, and the minimum outright for nonsensical reports.
pub fn effective_size(observed: (f64, f64), min: (f64, f64)) -> (f64, f64) {
	let axis = |v: f64, min: f64| if v.is_finite() { v.max(min) } else { min };
	(axis(observed.0, min.0), axis(observed.1, min.1))
}

/// Size of the browser window's layout viewport.
pub fn window_size(window: &Window) -> Option<(f64, f64)> {
	let width = window.inner_width().ok()?.as_f64()?;
	let height = window.inner_height().ok()?.as_f64()?;
	Some((width, height))
}

enum Source {
	Element {
		observer: ResizeObserver,
		_callback: Closure<dyn FnMut(js_sys::Array)>,
	},
	Window {
		window: Window,
		callback: Closure<dyn FnMut()>,
	},
}

/// Live subscription to size changes.
pub struct ResizeAdapter {
	source: Source,
}

impl ResizeAdapter {
	/// Watch an element's content box.
	pub fn observe(
		target: &Element,
		mut on_resize: impl FnMut(f64, f64) + 'static,
	) -> Result<Self, JsValue> {
		let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
			// Only the latest entry matters when several are batched.
			let last = entries.length().checked_sub(1).map(|i| entries.get(i));
			let Some(entry) = last.and_then(|e| e.dyn_into::<ResizeObserverEntry>().ok()) else {
				return;
			};
			let rect = entry.content_rect();
			on_resize(rect.width(), rect.height());
		});
		let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
		observer.observe(target);
		Ok(Self {
			source: Source::Element {
				observer,
				_callback: callback,
			},
		})
	}

	/// Watch the window's inner size.
	pub fn window(window: &Window, mut on_resize: impl FnMut(f64, f64) + 'static) -> Result<Self, JsValue> {
		let win = window.clone();
		let callback = Closure::<dyn FnMut()>::new(move || {
			if let Some((w, h)) = window_size(&win) {
				on_resize(w, h);
			}
		});
		window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
		Ok(Self {
			source: Source::Window {
				window: window.clone(),
				callback,
			},
		})
	}
}

impl Drop for ResizeAdapter {
	fn drop(&mut self) {
		match &self.source {
			Source::Element { observer, .. } => observer.disconnect(),
			Source::Window { window, callback } => {
				let _ = window
					.remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn effective_size_never_drops_below_minimum() {
		let min = (860.0, 400.0);
		assert_eq!(effective_size((1200.0, 700.0), min), (1200.0, 700.0));
		assert_eq!(effective_size((320.0, 700.0), min), (860.0, 700.0));
		assert_eq!(effective_size((0.0, 0.0), min), min);
		assert_eq!(effective_size((f64::NAN, f64::INFINITY), min), min);
	}
}
