//! Radial placement of a hovered node's annotation satellites.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::config::{NodeGroupConfig, SatelliteConfig};
use super::types::{GraphNode, SatelliteKey};

/// One satellite glyph, positioned in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct Satellite {
	pub key: SatelliteKey,
	/// Short label drawn inside the glyph ("Who").
	pub label: String,
	/// The node's value for this key.
	pub text: String,
	pub x: f64,
	pub y: f64,
}

/// The configured keys that carry a non-blank value on `node`, in ring order.
pub fn present_keys(node: &GraphNode, config: &SatelliteConfig) -> Vec<SatelliteKey> {
	config
		.keys
		.iter()
		.copied()
		.filter(|&k| node.satellites.non_empty(k).is_some())
		.collect()
}

/// Lay out the ring around a host at `(cx, cy)`.
///
/// Satellite `i` of `n` sits at `-90° + i * 360°/n` (clockwise from straight
/// up) on a circle just outside the host's glow.
pub fn layout(
	node: &GraphNode,
	(cx, cy): (f64, f64),
	group: &NodeGroupConfig,
	config: &SatelliteConfig,
) -> Vec<Satellite> {
	let keys = present_keys(node, config);
	if keys.is_empty() {
		return Vec::new();
	}

	let ring = group.glow_radius + config.distance;
	let step = TAU / keys.len() as f64;
	keys.into_iter()
		.enumerate()
		.map(|(i, key)| {
			let angle = i as f64 * step - FRAC_PI_2;
			Satellite {
				key,
				label: key.label(),
				text: node.satellites.non_empty(key).unwrap_or_default().to_string(),
				x: cx + ring * angle.cos(),
				y: cy + ring * angle.sin(),
			}
		})
		.collect()
}
