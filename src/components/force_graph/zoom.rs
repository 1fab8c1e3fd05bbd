//! Pan and zoom transform for the rendered graph.

use super::config::ZoomConfig;

/// Wheel delta mode reported by the browser for line-based scrolling.
pub const DELTA_LINE: u32 = 1;

/// Extent used when the configured one can't bound a zoom factor.
const FALLBACK_EXTENT: (f64, f64) = (0.1, 4.0);

/// Clamp `k` into `extent`. Bounds may arrive in either order; a bound that is
/// not a positive finite number replaces the extent with the default.
pub fn clamp_scale(k: f64, extent: (f64, f64)) -> f64 {
	let usable = |v: f64| v.is_finite() && v > 0.0;
	let (a, b) = if usable(extent.0) && usable(extent.1) {
		extent
	} else {
		FALLBACK_EXTENT
	};
	let (lo, hi) = (a.min(b), a.max(b));
	// NaN compares false both ways, so `max` lands it on the lower bound.
	k.max(lo).min(hi)
}

/// Pan and zoom transform applied to the entire graph view.
///
/// Maps world coordinates to screen coordinates: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, kept within the configured scale extent.
	pub k: f64,
}

impl Default for ZoomTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ZoomTransform {
	pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, k: 1.0 };

	/// The configured starting transform for a canvas of the given size.
	pub fn initial(config: &ZoomConfig, width: f64, height: f64) -> Self {
		Self {
			x: width * config.initial_translate.x,
			y: height * config.initial_translate.y,
			k: clamp_scale(config.initial_scale, config.scale_extent),
		}
	}

	pub fn screen_to_world(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn world_to_screen(&self, (wx, wy): (f64, f64)) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Multiply the zoom by `factor`, clamped to `extent`, keeping the world
	/// point under `anchor` fixed on screen.
	pub fn scale_about(&mut self, anchor: (f64, f64), factor: f64, extent: (f64, f64)) {
		if factor.is_nan() || factor < 0.0 {
			return;
		}
		let new_k = clamp_scale(self.k * factor, extent);
		let ratio = new_k / self.k;
		self.x = anchor.0 - (anchor.0 - self.x) * ratio;
		self.y = anchor.1 - (anchor.1 - self.y) * ratio;
		self.k = new_k;
	}

	fn lerp(self, to: Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Zoom factor for one wheel event. Pinch gestures arrive as ctrl+wheel and
/// zoom ten times faster.
pub fn wheel_factor(delta_y: f64, delta_mode: u32, ctrl: bool) -> f64 {
	let unit = match delta_mode {
		0 => 0.002,
		DELTA_LINE => 0.05,
		_ => 1.0,
	};
	let pinch = if ctrl { 10.0 } else { 1.0 };
	2f64.powf(-delta_y * unit * pinch)
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// An animated move between two transforms, driven by frame timestamps.
#[derive(Clone, Copy, Debug)]
pub struct ZoomTransition {
	from: ZoomTransform,
	to: ZoomTransform,
	start: f64,
	duration: f64,
}

impl ZoomTransition {
	pub fn new(from: ZoomTransform, to: ZoomTransform, start: f64, duration: f64) -> Self {
		Self {
			from,
			to,
			start,
			duration,
		}
	}

	/// Transform at time `now` and whether the transition has finished.
	pub fn sample(&self, now: f64) -> (ZoomTransform, bool) {
		if !(self.duration > 0.0) {
			return (self.to, true);
		}
		let t = ((now - self.start) / self.duration).clamp(0.0, 1.0);
		if t >= 1.0 {
			return (self.to, true);
		}
		(self.from.lerp(self.to, ease_cubic_in_out(t)), false)
	}
}
