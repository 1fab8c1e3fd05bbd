//! Zoom-dependent scaling for graph visuals.
//!
//! This module centralizes every zoom-dependent size, so it is easy to see
//! which parts of a glyph grow with the zoom and which stay a fixed number of
//! pixels on screen.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the simulation. Node radii,
//!   glow radii and satellite rings live here and grow when zoomed in.
//! - **Screen-space**: Pixel coordinates on the canvas. Link strokes, node
//!   outlines and connector dashes are given in pixels and divided by the
//!   zoom factor (`k`) every frame so they keep their on-screen width.

use super::config::{LinkStyleConfig, SatelliteConfig};

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// Use `f64::NEG_INFINITY` or `f64::INFINITY` for an open bound.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`, ready to draw after the
	/// canvas transform has been applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				base.clamp(min_screen / k, max_screen / k)
			}
		}
	}
}

/// How each zoom-sensitive size behaves.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Link base, overlay and hit widths.
	pub link_width: ScaleBehavior,
	/// Outline of node bodies and satellites.
	pub stroke_width: ScaleBehavior,
	/// Width and dash pattern of satellite connectors, in screen pixels.
	pub connector_width: f64,
	pub connector_dash: (f64, f64),
	/// Body radius of a node whose group has no style.
	pub fallback_radius: f64,
	pub fallback_behavior: ScaleBehavior,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			link_width: ScaleBehavior::Screen,
			stroke_width: ScaleBehavior::Screen,
			connector_width: 1.5,
			connector_dash: (4.0, 3.0),
			fallback_radius: 8.0,
			fallback_behavior: ScaleBehavior::Clamped {
				min_screen: 4.0,
				max_screen: f64::INFINITY,
			},
		}
	}
}

/// Pre-computed sizes for a specific zoom level.
///
/// Create this once per frame. All sizes are in world-space.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValues {
	pub k: f64,
	pub link_base_width: f64,
	pub link_overlay_width: f64,
	/// Half of this is the pointer tolerance around a link's arc.
	pub link_hit_width: f64,
	pub node_stroke_width: f64,
	pub satellite_stroke_width: f64,
	pub connector_width: f64,
	pub connector_dash: (f64, f64),
	pub fallback_radius: f64,
}

impl ScaledValues {
	pub fn new(
		config: &ScaleConfig,
		links: &LinkStyleConfig,
		satellites: &SatelliteConfig,
		node_stroke: f64,
		k: f64,
	) -> Self {
		let link = |w| config.link_width.apply(w, k);
		let stroke = |w| config.stroke_width.apply(w, k);
		Self {
			k,
			link_base_width: link(links.base_width),
			link_overlay_width: link(links.overlay_width),
			link_hit_width: link(links.hit_width),
			node_stroke_width: stroke(node_stroke),
			satellite_stroke_width: stroke(satellites.stroke_width),
			connector_width: config.connector_width / k,
			connector_dash: (config.connector_dash.0 / k, config.connector_dash.1 / k),
			fallback_radius: config.fallback_behavior.apply(config.fallback_radius, k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scaled(k: f64) -> ScaledValues {
		ScaledValues::new(
			&ScaleConfig::default(),
			&LinkStyleConfig::default(),
			&SatelliteConfig::default(),
			3.0,
			k,
		)
	}

	#[test]
	fn link_widths_keep_their_screen_size() {
		for k in [0.1, 0.85, 1.0, 4.0] {
			let s = scaled(k);
			assert!((s.link_base_width * k - 20.0).abs() < 1e-9);
			assert!((s.link_overlay_width * k - 12.0).abs() < 1e-9);
			assert!((s.node_stroke_width * k - 3.0).abs() < 1e-9);
		}
	}

	#[test]
	fn clamped_radius_never_shrinks_below_its_screen_minimum() {
		let zoomed_out = scaled(0.1);
		assert!((zoomed_out.fallback_radius * 0.1 - 4.0).abs() < 1e-9);
		let zoomed_in = scaled(4.0);
		assert_eq!(zoomed_in.fallback_radius, 8.0);
	}
}
