//! Force simulation driving node positions.
//!
//! A velocity-decay integrator in the style of d3-force. Each tick decays the
//! simulation's activity (`alpha`) toward its target, applies the link,
//! charge, collision and centering forces to node velocities, then moves every
//! unpinned node. Once alpha drops below `alpha_min` the simulation settles
//! and stops ticking until something reheats it (a drag).
//!
//! Charge and collision are exact pairwise passes. The graphs this component
//! is built for are tens of nodes, not thousands.

use std::f64::consts::PI;

use log::debug;

use super::config::{FALLBACK_COLLISION_RADIUS, ForceConfig};
use super::model::GraphModel;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const INITIAL_RADIUS: f64 = 10.0;
/// Alpha target held while a node is dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Whether the simulation is still producing ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationStatus {
	Running,
	/// Activity decayed below the threshold; restartable.
	Settled,
	/// Explicitly stopped on teardown; never ticks again.
	Stopped,
}

/// Deterministic LCG used to separate coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = (self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) % 4_294_967_296;
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Per-link constants derived once from the force config.
#[derive(Clone, Debug)]
struct LinkForce {
	distance: f64,
	strength: f64,
	/// Share of the correction applied to the target end.
	bias: f64,
}

/// Owns the graph model and advances it one tick at a time.
pub struct Simulation {
	model: GraphModel,
	links: Vec<LinkForce>,
	collision_radii: Vec<f64>,
	charge_strength: f64,
	collision_strength: f64,
	collision_iterations: usize,
	center: (f64, f64),
	center_strength: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	status: SimulationStatus,
	ticks: u64,
	rng: Lcg,
}

impl Simulation {
	/// Seed positions around the canvas center and prepare the forces.
	pub fn new(mut model: GraphModel, force: &ForceConfig, width: f64, height: f64) -> Self {
		let center = (width / 2.0, height / 2.0);
		let initial_angle = PI * (3.0 - 5f64.sqrt());

		for (i, node) in model.nodes.iter_mut().enumerate() {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				node.x = fx;
				node.y = fy;
			}
			if node.x.is_nan() || node.y.is_nan() {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				node.x = center.0 + radius * angle.cos();
				node.y = center.1 + radius * angle.sin();
			}
			if node.vx.is_nan() || node.vy.is_nan() {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}

		let mut degree = vec![0usize; model.nodes.len()];
		for link in &model.links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let links = model
			.links
			.iter()
			.map(|link| {
				let (s, t) = (degree[link.source] as f64, degree[link.target] as f64);
				LinkForce {
					distance: force.link_distance.distance(
						&model.nodes[link.source].node.group,
						&model.nodes[link.target].node.group,
					),
					strength: 1.0 / s.min(t),
					bias: s / (s + t),
				}
			})
			.collect();

		let collision_radii = (0..model.nodes.len())
			.map(|i| {
				model
					.group_style(i)
					.map(|g| g.collision_radius)
					.unwrap_or(FALLBACK_COLLISION_RADIUS)
			})
			.collect();

		Self {
			model,
			links,
			collision_radii,
			charge_strength: force.charge_strength,
			collision_strength: force.collision_strength,
			collision_iterations: force.collision_iterations,
			center,
			center_strength: (force.center_strength.x, force.center_strength.y),
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			status: SimulationStatus::Running,
			ticks: 0,
			rng: Lcg(1),
		}
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn status(&self) -> SimulationStatus {
		self.status
	}

	pub fn is_running(&self) -> bool {
		self.status == SimulationStatus::Running
	}

	/// Number of ticks executed so far.
	pub fn tick_count(&self) -> u64 {
		self.ticks
	}

	/// Advance one step. Returns `false` once settled or stopped.
	pub fn tick(&mut self) -> bool {
		if self.status != SimulationStatus::Running {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		for _ in 0..self.collision_iterations {
			self.apply_collision();
		}
		self.apply_center();
		self.apply_axis_pull(alpha);

		for node in &mut self.model.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= 1.0 - VELOCITY_DECAY;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= 1.0 - VELOCITY_DECAY;
					node.y += node.vy;
				}
			}
		}

		self.ticks += 1;
		if self.alpha < ALPHA_MIN {
			self.status = SimulationStatus::Settled;
			debug!("satellite-graph: simulation settled after {} ticks", self.ticks);
		}
		true
	}

	/// Change the activity target. A settled simulation resumes ticking.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
		if self.status == SimulationStatus::Settled && target > 0.0 {
			self.status = SimulationStatus::Running;
		}
	}

	/// Halt permanently. Used on teardown and rebuild.
	pub fn stop(&mut self) {
		self.status = SimulationStatus::Stopped;
	}

	/// Fix a node's coordinates so the forces no longer move it.
	pub fn pin(&mut self, node: usize, x: f64, y: f64) {
		if let Some(n) = self.model.nodes.get_mut(node) {
			n.fx = Some(x);
			n.fy = Some(y);
		}
	}

	/// Release a pinned node where it currently stands.
	///
	/// The node's position is set to its fixed coordinates first, so it does
	/// not jump back to wherever the last tick left it.
	pub fn unpin(&mut self, node: usize) {
		if let Some(n) = self.model.nodes.get_mut(node) {
			if let Some(fx) = n.fx.take() {
				n.x = fx;
				n.vx = 0.0;
			}
			if let Some(fy) = n.fy.take() {
				n.y = fy;
				n.vy = 0.0;
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let nodes = &mut self.model.nodes;
		for (link, force) in self.model.links.iter().zip(&self.links) {
			let (s, t) = (link.source, link.target);
			let mut x = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
			let mut y = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let l = (l - force.distance) / l * alpha * force.strength;
			let (x, y) = (x * l, y * l);

			nodes[t].vx -= x * force.bias;
			nodes[t].vy -= y * force.bias;
			nodes[s].vx += x * (1.0 - force.bias);
			nodes[s].vy += y * (1.0 - force.bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		if self.charge_strength == 0.0 {
			return;
		}
		let n = self.model.nodes.len();
		for i in 0..n {
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let nodes = &self.model.nodes;
				let mut x = nodes[j].x - nodes[i].x;
				let mut y = nodes[j].y - nodes[i].y;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				// Soften the singularity below unit distance.
				if l < 1.0 {
					l = l.sqrt();
				}
				let w = self.charge_strength * alpha / l;
				dvx += x * w;
				dvy += y * w;
			}
			let node = &mut self.model.nodes[i];
			node.vx += dvx;
			node.vy += dvy;
		}
	}

	fn apply_collision(&mut self) {
		let n = self.model.nodes.len();
		for i in 0..n {
			let ri = self.collision_radii[i];
			let ri2 = ri * ri;
			let xi = self.model.nodes[i].x + self.model.nodes[i].vx;
			let yi = self.model.nodes[i].y + self.model.nodes[i].vy;

			for j in (i + 1)..n {
				let rj = self.collision_radii[j];
				let r = ri + rj;
				let other = &self.model.nodes[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let push = (r - d) / d * self.collision_strength;
				let (x, y) = (x * push, y * push);
				let share = rj * rj / (ri2 + rj * rj);

				let node = &mut self.model.nodes[i];
				node.vx += x * share;
				node.vy += y * share;
				let other = &mut self.model.nodes[j];
				other.vx -= x * (1.0 - share);
				other.vy -= y * (1.0 - share);
			}
		}
	}

	/// Translate the whole graph so its mean position sits on the center.
	fn apply_center(&mut self) {
		let n = self.model.nodes.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.model
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n as f64 - self.center.0, sy / n as f64 - self.center.1);
		for node in &mut self.model.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	/// Weak per-axis pull of every node toward the center.
	fn apply_axis_pull(&mut self, alpha: f64) {
		let (cx, cy) = self.center;
		let (kx, ky) = self.center_strength;
		for node in &mut self.model.nodes {
			node.vx += (cx - node.x) * kx * alpha;
			node.vy += (cy - node.y) * ky * alpha;
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::components::force_graph::config::{CenterStrength, LinkDistance};
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn model(nodes: &[(&str, &str)], links: &[(&str, &str)]) -> GraphModel {
		let data = GraphData {
			nodes: nodes
				.iter()
				.map(|(id, group)| GraphNode::new(*id, *id, *group))
				.collect(),
			links: links.iter().map(|(s, t)| GraphLink::new(*s, *t)).collect(),
		};
		GraphModel::build(&data, &HashMap::new()).unwrap()
	}

	fn run_to_settle(sim: &mut Simulation) {
		let mut guard = 0;
		while sim.tick() {
			guard += 1;
			assert!(guard < 10_000, "simulation never settled");
		}
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (ax, ay) = sim.model().position(a).unwrap();
		let (bx, by) = sim.model().position(b).unwrap();
		((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
	}

	#[test]
	fn settles_and_stops_ticking() {
		let m = model(&[("a", "hub"), ("b", "sub"), ("c", "sub")], &[("a", "b"), ("a", "c")]);
		let mut sim = Simulation::new(m, &ForceConfig::default(), 800.0, 600.0);
		run_to_settle(&mut sim);
		assert_eq!(sim.status(), SimulationStatus::Settled);
		let ticks = sim.tick_count();
		assert!((250..=350).contains(&ticks), "settled after {ticks} ticks");
		assert!(!sim.tick());
		assert_eq!(sim.tick_count(), ticks);
		for node in &sim.model().nodes {
			assert!(node.x.is_finite() && node.y.is_finite());
		}
	}

	#[test]
	fn links_relax_toward_group_distance() {
		let force = ForceConfig {
			charge_strength: 0.0,
			..ForceConfig::default()
		};
		let m = model(&[("a", "hub"), ("b", "sub")], &[("a", "b")]);
		let mut sim = Simulation::new(m, &force, 800.0, 600.0);
		run_to_settle(&mut sim);
		let d = distance(&sim, 0, 1);
		assert!((d - 255.0).abs() < 255.0 * 0.15, "distance {d}");
	}

	#[test]
	fn collision_keeps_unlinked_nodes_apart() {
		let force = ForceConfig {
			charge_strength: 0.0,
			link_distance: LinkDistance::constant(0.0),
			center_strength: CenterStrength { x: 0.05, y: 0.05 },
			..ForceConfig::default()
		};
		let m = model(&[("a", "x"), ("b", "x")], &[]);
		let mut sim = Simulation::new(m, &force, 800.0, 600.0);
		run_to_settle(&mut sim);
		let d = distance(&sim, 0, 1);
		assert!(d > 0.9 * 2.0 * FALLBACK_COLLISION_RADIUS, "distance {d}");
	}

	#[test]
	fn pinned_node_holds_its_coordinates() {
		let m = model(&[("a", "hub"), ("b", "sub")], &[("a", "b")]);
		let mut sim = Simulation::new(m, &ForceConfig::default(), 800.0, 600.0);
		sim.pin(0, 100.0, 120.0);
		for _ in 0..20 {
			sim.tick();
		}
		assert_eq!(sim.model().position(0), Some((100.0, 120.0)));

		sim.pin(0, 130.0, 140.0);
		sim.unpin(0);
		assert!(!sim.model().nodes[0].is_pinned());
		assert_eq!(sim.model().position(0), Some((130.0, 140.0)));
	}

	#[test]
	fn alpha_target_restarts_a_settled_simulation() {
		let m = model(&[("a", "hub"), ("b", "sub")], &[("a", "b")]);
		let mut sim = Simulation::new(m, &ForceConfig::default(), 800.0, 600.0);
		run_to_settle(&mut sim);
		sim.set_alpha_target(DRAG_ALPHA_TARGET);
		assert!(sim.tick());
		for _ in 0..200 {
			sim.tick();
		}
		assert!(sim.alpha() > 0.2);
		sim.set_alpha_target(0.0);
		run_to_settle(&mut sim);
		assert_eq!(sim.status(), SimulationStatus::Settled);
	}

	#[test]
	fn stopped_simulation_never_ticks() {
		let m = model(&[("a", "hub")], &[]);
		let mut sim = Simulation::new(m, &ForceConfig::default(), 800.0, 600.0);
		assert!(sim.tick());
		sim.stop();
		sim.set_alpha_target(DRAG_ALPHA_TARGET);
		assert!(!sim.tick());
		assert_eq!(sim.tick_count(), 1);
	}
}
