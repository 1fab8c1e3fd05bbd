//! Smooth hover emphasis for nodes, links and satellites.
//!
//! Each hoverable element has its own intensity (0.0 to 1.0) that eases
//! toward 1 while the element is hovered and back to 0 afterwards, so glyphs
//! grow and shrink instead of snapping.
//!
//! Uses exponential smoothing for natural-feeling transitions that slow down
//! as they approach their target.

use std::collections::{HashMap, HashSet};

/// Something the pointer can rest on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoverTarget {
	Node(usize),
	Link(usize),
	/// Index into the current satellite ring.
	Satellite(usize),
}

/// Per-element hover intensity.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Elements currently under the pointer.
	target_set: HashSet<HoverTarget>,
	/// Elements not in this map have intensity 0.
	intensity: HashMap<HoverTarget, f64>,
}

impl HighlightState {
	/// Replace the set of hovered elements.
	pub fn set_targets(&mut self, targets: impl IntoIterator<Item = HoverTarget>) {
		self.target_set.clear();
		self.target_set.extend(targets);
	}

	/// Drop all emphasis immediately (e.g. when a drag starts).
	pub fn clear(&mut self) {
		self.target_set.clear();
		self.intensity.clear();
	}

	/// Animate every intensity toward its target.
	///
	/// `value += (target - value) * (1 - e^(-speed * dt))`; at speed 15 an
	/// element reaches ~95% in 200ms.
	pub fn tick(&mut self, dt: f64) {
		const SPEED: f64 = 15.0;
		let factor = 1.0 - (-SPEED * dt).exp();

		for &target in &self.target_set {
			let value = self.intensity.entry(target).or_insert(0.0);
			*value += (1.0 - *value) * factor;
		}

		self.intensity.retain(|target, value| {
			if self.target_set.contains(target) {
				true
			} else {
				*value -= *value * factor;
				*value > 0.005
			}
		});
	}

	pub fn intensity(&self, target: HoverTarget) -> f64 {
		self.intensity.get(&target).copied().unwrap_or(0.0)
	}

	/// Forget satellite intensities; ring indices are only valid for one host.
	pub fn forget_satellites(&mut self) {
		self.target_set
			.retain(|t| !matches!(t, HoverTarget::Satellite(_)));
		self.intensity
			.retain(|t, _| !matches!(t, HoverTarget::Satellite(_)));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn eases_in_and_out() {
		let mut h = HighlightState::default();
		let node = HoverTarget::Node(3);
		h.set_targets([node]);
		h.tick(0.016);
		let first = h.intensity(node);
		assert!(first > 0.0 && first < 0.5);
		for _ in 0..15 {
			h.tick(0.016);
		}
		assert!(h.intensity(node) > 0.95);

		h.set_targets([]);
		for _ in 0..60 {
			h.tick(0.016);
		}
		assert_eq!(h.intensity(node), 0.0);
	}

	#[test]
	fn satellites_are_forgotten_on_host_change() {
		let mut h = HighlightState::default();
		h.set_targets([HoverTarget::Satellite(0), HoverTarget::Node(1)]);
		h.tick(0.1);
		h.forget_satellites();
		assert_eq!(h.intensity(HoverTarget::Satellite(0)), 0.0);
		assert!(h.intensity(HoverTarget::Node(1)) > 0.0);
	}
}
