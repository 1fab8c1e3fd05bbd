//! Curved link geometry and pointer hit testing.

use std::f64::consts::TAU;

/// Arc radius as a multiple of the chord length.
pub const ARC_RADIUS_FACTOR: f64 = 1.1;

/// A circular arc drawn clockwise (in screen space) from `from` to `to`.
///
/// Because the radius is proportional to the chord, every link bows by the
/// same fraction of its length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkArc {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub center: (f64, f64),
	pub radius: f64,
	pub start_angle: f64,
	pub end_angle: f64,
}

impl LinkArc {
	/// Arc between two endpoints, `None` when they coincide.
	pub fn between(from: (f64, f64), to: (f64, f64)) -> Option<Self> {
		let (dx, dy) = (to.0 - from.0, to.1 - from.1);
		let chord = (dx * dx + dy * dy).sqrt();
		if !chord.is_finite() || chord < 1e-9 {
			return None;
		}

		let radius = chord * ARC_RADIUS_FACTOR;
		let (ux, uy) = (dx / chord, dy / chord);
		let h = (radius * radius - chord * chord / 4.0).sqrt();
		let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
		let center = (mid.0 - uy * h, mid.1 + ux * h);

		Some(Self {
			from,
			to,
			center,
			radius,
			start_angle: (from.1 - center.1).atan2(from.0 - center.0),
			end_angle: (to.1 - center.1).atan2(to.0 - center.0),
		})
	}

	/// Angle covered going clockwise from start to end, in `[0, TAU)`.
	pub fn sweep(&self) -> f64 {
		(self.end_angle - self.start_angle).rem_euclid(TAU)
	}

	/// Shortest distance from `p` to the arc.
	pub fn distance_to(&self, p: (f64, f64)) -> f64 {
		let (px, py) = (p.0 - self.center.0, p.1 - self.center.1);
		let offset = (py.atan2(px) - self.start_angle).rem_euclid(TAU);
		if offset <= self.sweep() {
			((px * px + py * py).sqrt() - self.radius).abs()
		} else {
			distance(p, self.from).min(distance(p, self.to))
		}
	}
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

pub fn in_circle(p: (f64, f64), center: (f64, f64), radius: f64) -> bool {
	distance(p, center) <= radius
}

#[cfg(test)]
mod tests {
	use super::*;

	fn apex(arc: &LinkArc) -> (f64, f64) {
		let mid_angle = arc.start_angle + arc.sweep() / 2.0;
		(
			arc.center.0 + arc.radius * mid_angle.cos(),
			arc.center.1 + arc.radius * mid_angle.sin(),
		)
	}

	#[test]
	fn radius_is_proportional_to_chord() {
		let arc = LinkArc::between((0.0, 0.0), (30.0, 40.0)).unwrap();
		assert!((arc.radius - 55.0).abs() < 1e-9);
		assert!((distance(arc.center, arc.from) - arc.radius).abs() < 1e-9);
		assert!((distance(arc.center, arc.to) - arc.radius).abs() < 1e-9);
	}

	#[test]
	fn curvature_is_the_same_fraction_of_length() {
		let short = LinkArc::between((0.0, 0.0), (10.0, 0.0)).unwrap();
		let long = LinkArc::between((0.0, 0.0), (400.0, 0.0)).unwrap();
		let bow_short = -apex(&short).1 / 10.0;
		let bow_long = -apex(&long).1 / 400.0;
		assert!(bow_short > 0.0, "arc bows above a left-to-right chord");
		assert!((bow_short - bow_long).abs() < 1e-9);
		assert!(short.sweep() < std::f64::consts::PI);
	}

	#[test]
	fn coincident_endpoints_have_no_arc() {
		assert!(LinkArc::between((5.0, 5.0), (5.0, 5.0)).is_none());
		assert!(LinkArc::between((f64::NAN, 0.0), (1.0, 0.0)).is_none());
	}

	#[test]
	fn distance_to_arc() {
		let arc = LinkArc::between((0.0, 0.0), (100.0, 0.0)).unwrap();
		let top = apex(&arc);
		assert!(arc.distance_to(top) < 1e-9);
		assert!((arc.distance_to((top.0, top.1 - 5.0)) - 5.0).abs() < 1e-6);
		// Past the endpoints the nearest point is the endpoint itself.
		assert!((arc.distance_to((-3.0, 4.0)) - 5.0).abs() < 1e-9);
		// The chord's far side is not on the arc.
		assert!(arc.distance_to((50.0, 10.0)) > 10.0);
	}
}
