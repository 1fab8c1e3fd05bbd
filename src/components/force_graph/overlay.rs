//! Floating popovers: their contents and in-bounds placement.

/// Gap between the pointer and the popover.
pub const LEAD_OFFSET: f64 = 15.0;
/// Minimum distance between a popover and the container edge.
pub const MARGIN: f64 = 10.0;

/// Pixel position of a popover's top-left corner within its container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
	pub left: f64,
	pub top: f64,
}

/// Place a `size` popover near `anchor` inside a `container` box.
///
/// Prefers right of and below the pointer, flipping to the left or above when
/// that would cross the margin. The result is then clamped so the box stays
/// inside `[margin, container - margin]` on both axes whenever it fits.
pub fn place(anchor: (f64, f64), size: (f64, f64), container: (f64, f64)) -> Placement {
	Placement {
		left: place_axis(anchor.0, size.0, container.0),
		top: place_axis(anchor.1, size.1, container.1),
	}
}

fn place_axis(anchor: f64, size: f64, extent: f64) -> f64 {
	let mut pos = anchor + LEAD_OFFSET;
	if pos + size > extent - MARGIN {
		pos = anchor - size - LEAD_OFFSET;
	}
	// Far-side clamp first so the near margin wins for oversized popovers.
	pos = pos.min(extent - MARGIN - size);
	pos.max(MARGIN)
}

/// Detail popover for a hovered node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePopover {
	pub title: String,
	pub content: String,
}

/// Relationship popover for a hovered link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkPopover {
	pub source: String,
	pub target: String,
	pub relationship: String,
	pub description: String,
}

impl LinkPopover {
	/// Relationship falls back to the link type, then "connects to". The
	/// description falls back to a sentence built from the labels.
	pub fn new(
		source: &str,
		target: &str,
		kind: Option<&str>,
		relationship: Option<&str>,
		description: Option<&str>,
	) -> Self {
		let relationship = relationship.or(kind).unwrap_or("connects to").to_string();
		let description = description.map(str::to_string).unwrap_or_else(|| {
			format!("{} {} {}", source, relationship.to_lowercase(), target)
		});
		Self {
			source: source.to_string(),
			target: target.to_string(),
			relationship,
			description,
		}
	}
}

/// Question/answer tooltip for a hovered satellite.
#[derive(Clone, Debug, PartialEq)]
pub struct SatelliteTooltip {
	pub question: String,
	pub answer: String,
}

/// Everything that should currently float above the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlays {
	pub node: Option<NodePopover>,
	pub link: Option<LinkPopover>,
	pub satellite: Option<SatelliteTooltip>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn contained(p: Placement, size: (f64, f64), container: (f64, f64)) -> bool {
		p.left >= MARGIN
			&& p.top >= MARGIN
			&& p.left + size.0 <= container.0 - MARGIN + 1e-9
			&& p.top + size.1 <= container.1 - MARGIN + 1e-9
	}

	#[test]
	fn prefers_right_and_below() {
		let p = place((100.0, 100.0), (200.0, 80.0), (800.0, 600.0));
		assert_eq!(p, Placement { left: 115.0, top: 115.0 });
	}

	#[test]
	fn flips_near_the_far_edges() {
		let p = place((750.0, 580.0), (200.0, 80.0), (800.0, 600.0));
		assert_eq!(p, Placement { left: 535.0, top: 485.0 });
	}

	#[test]
	fn clamps_to_the_margin() {
		let p = place((-50.0, -50.0), (200.0, 80.0), (800.0, 600.0));
		assert_eq!(p, Placement { left: MARGIN, top: MARGIN });
	}

	#[test]
	fn stays_inside_for_any_anchor() {
		let container = (640.0, 360.0);
		let sizes = [(1.0, 1.0), (120.0, 60.0), (300.0, 200.0), (619.0, 339.0)];
		for &size in &sizes {
			for ax in (-200..=900).step_by(37) {
				for ay in (-200..=600).step_by(29) {
					let p = place((ax as f64, ay as f64), size, container);
					assert!(contained(p, size, container), "{ax},{ay} {size:?} -> {p:?}");
				}
			}
		}
	}

	#[test]
	fn link_popover_fallbacks() {
		let p = LinkPopover::new("Hub", "Care", Some("partOf"), None, None);
		assert_eq!(p.relationship, "partOf");
		assert_eq!(p.description, "Hub partof Care");

		let p = LinkPopover::new("Hub", "Care", None, None, None);
		assert_eq!(p.relationship, "connects to");
		assert_eq!(p.description, "Hub connects to Care");

		let p = LinkPopover::new("Hub", "Care", None, Some("Funds"), Some("Grants flow down."));
		assert_eq!(p.relationship, "Funds");
		assert_eq!(p.description, "Grants flow down.");
	}
}
