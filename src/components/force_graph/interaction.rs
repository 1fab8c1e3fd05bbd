//! Pointer interaction state machine: hover, click, drag and pan.
//!
//! All pointer input arrives in canvas (screen) coordinates and is hit tested
//! against the last [`Scene`] drawn. Satellites sit above nodes, nodes above
//! links. Node hover is debounced on exit: leaving a node arms a hide
//! deadline, and the ring and popover stay up until a frame polls past it
//! without the pointer coming back to the node or one of its satellites.
//!
//! A drag grants the controller exclusive ownership of one node's fixed
//! coordinates. Every path out of `Dragging` goes through
//! [`Controller::release_drag`], which unpins the node exactly once.

use log::debug;

use super::geometry::in_circle;
use super::highlight::HoverTarget;
use super::model::GraphModel;
use super::scene::Scene;
use super::simulation::{DRAG_ALPHA_TARGET, Simulation};
use super::types::GraphNode;
use super::zoom::ZoomTransform;

/// Debounce between leaving a node and hiding its satellites, in ms.
pub const HIDE_DELAY_MS: f64 = 100.0;
/// Pointer travel (screen px) that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Notifications for the component's caller.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// The hovered node changed; `None` once nothing is hovered.
	NodeHover(Option<GraphNode>),
	NodeClick(GraphNode),
}

/// A [`GraphEvent`] by node index, resolved against the model when taken.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Notice {
	Hover(Option<usize>),
	Click(usize),
}

/// What lies under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	/// Index into the open satellite ring.
	Satellite(usize),
	Node(usize),
	Link(usize),
	Background,
}

/// Hit test a world-space point against a scene, topmost glyph first.
pub fn hit_test(scene: &Scene, point: (f64, f64)) -> Hit {
	if let Some(ring) = &scene.ring {
		let hit = ring
			.satellites
			.iter()
			.rposition(|s| in_circle(point, (s.satellite.x, s.satellite.y), s.radius));
		if let Some(i) = hit {
			return Hit::Satellite(i);
		}
	}
	if let Some(node) = scene
		.nodes
		.iter()
		.rev()
		.find(|n| in_circle(point, (n.x, n.y), n.radius))
	{
		return Hit::Node(node.index);
	}
	scene
		.links
		.iter()
		.rev()
		.find(|l| l.arc.distance_to(point) <= l.hit_width / 2.0)
		.map_or(Hit::Background, |l| Hit::Link(l.index))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionState {
	Idle,
	Hovering {
		node: usize,
		/// Hovered satellite of this node's ring.
		satellite: Option<usize>,
		/// When set, the hover ends once a frame reaches this time.
		hide_at: Option<f64>,
	},
	/// Pointer is down on a node but hasn't moved far enough to drag.
	Pressed {
		node: usize,
		origin: (f64, f64),
		/// Node position minus pointer position, in world units.
		offset: (f64, f64),
	},
	Dragging {
		node: usize,
		offset: (f64, f64),
	},
	Panning {
		last: (f64, f64),
	},
}

/// Pointer input handling for one graph instance.
#[derive(Debug)]
pub struct Controller {
	state: InteractionState,
	hovered_link: Option<usize>,
	notices: Vec<Notice>,
	enable_drag: bool,
	enable_zoom: bool,
}

impl Controller {
	pub fn new(enable_drag: bool, enable_zoom: bool) -> Self {
		Self {
			state: InteractionState::Idle,
			hovered_link: None,
			notices: Vec::new(),
			enable_drag,
			enable_zoom,
		}
	}

	pub fn state(&self) -> InteractionState {
		self.state
	}

	pub fn hovered_link(&self) -> Option<usize> {
		self.hovered_link
	}

	/// Events raised since the last call.
	pub fn take_events(&mut self, model: &GraphModel) -> Vec<GraphEvent> {
		let node = |i: usize| model.nodes.get(i).map(|n| n.node.clone());
		self.notices
			.drain(..)
			.filter_map(|notice| match notice {
				Notice::Hover(None) => Some(GraphEvent::NodeHover(None)),
				Notice::Hover(Some(i)) => node(i).map(|n| GraphEvent::NodeHover(Some(n))),
				Notice::Click(i) => node(i).map(GraphEvent::NodeClick),
			})
			.collect()
	}

	/// The node whose satellites and popover are shown.
	pub fn ring_host(&self) -> Option<usize> {
		match self.state {
			InteractionState::Hovering { node, .. } | InteractionState::Pressed { node, .. } => {
				Some(node)
			}
			_ => None,
		}
	}

	pub fn hovered_satellite(&self) -> Option<usize> {
		match self.state {
			InteractionState::Hovering { satellite, .. } => satellite,
			_ => None,
		}
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.state, InteractionState::Dragging { .. })
	}

	/// Elements that should currently show hover emphasis.
	pub fn highlight_targets(&self) -> Vec<HoverTarget> {
		let mut targets = Vec::new();
		match self.state {
			InteractionState::Hovering {
				node,
				satellite,
				hide_at,
			} => {
				if hide_at.is_none() {
					targets.push(HoverTarget::Node(node));
				}
				targets.extend(satellite.map(HoverTarget::Satellite));
			}
			InteractionState::Pressed { node, .. } | InteractionState::Dragging { node, .. } => {
				targets.push(HoverTarget::Node(node));
			}
			_ => {}
		}
		targets.extend(self.hovered_link.map(HoverTarget::Link));
		targets
	}

	/// Pointer moved to `screen`. `buttons_down` is false when the browser
	/// reports no pressed button, which ends any drag or pan whose release
	/// event never arrived.
	#[allow(clippy::too_many_arguments)]
	pub fn pointer_move(
		&mut self,
		screen: (f64, f64),
		buttons_down: bool,
		now: f64,
		scene: &Scene,
		transform: &mut ZoomTransform,
		sim: &mut Simulation,
	) {
		let world = transform.screen_to_world(screen);
		match self.state {
			InteractionState::Dragging { node, offset } if buttons_down => {
				sim.pin(node, world.0 + offset.0, world.1 + offset.1);
				return;
			}
			InteractionState::Dragging { .. } => self.release_drag(sim),
			InteractionState::Panning { last } if buttons_down => {
				transform.x += screen.0 - last.0;
				transform.y += screen.1 - last.1;
				self.state = InteractionState::Panning { last: screen };
				return;
			}
			InteractionState::Panning { .. } => self.state = InteractionState::Idle,
			InteractionState::Pressed {
				node,
				origin,
				offset,
			} => {
				let moved = (screen.0 - origin.0).hypot(screen.1 - origin.1);
				if !buttons_down || moved <= DRAG_THRESHOLD {
					if !buttons_down {
						self.hover_node(node);
					}
					return;
				}
				if self.enable_drag {
					self.start_drag(node, offset, world, sim);
					return;
				}
				self.hover_node(node);
			}
			InteractionState::Idle | InteractionState::Hovering { .. } => {}
		}
		let hit = match hit_test(scene, world) {
			// A ring drawn for a host that is no longer hovered.
			Hit::Satellite(_) if scene.ring.as_ref().map(|r| r.host) != self.ring_host() => {
				Hit::Background
			}
			hit => hit,
		};
		self.update_hover(hit, now);
	}

	pub fn pointer_down(
		&mut self,
		screen: (f64, f64),
		scene: &Scene,
		transform: &ZoomTransform,
		sim: &mut Simulation,
	) {
		self.release_drag(sim);
		let world = transform.screen_to_world(screen);
		match hit_test(scene, world) {
			Hit::Node(node) => {
				let Some(glyph) = scene.node(node) else {
					return;
				};
				if self.ring_host() != Some(node) {
					self.notices.push(Notice::Hover(Some(node)));
				}
				self.state = InteractionState::Pressed {
					node,
					origin: screen,
					offset: (glyph.x - world.0, glyph.y - world.1),
				};
			}
			Hit::Satellite(_) => {}
			Hit::Link(_) | Hit::Background if self.enable_zoom => {
				self.state = InteractionState::Panning { last: screen };
			}
			Hit::Link(_) | Hit::Background => {}
		}
	}

	pub fn pointer_up(&mut self, sim: &mut Simulation) {
		match self.state {
			InteractionState::Pressed { node, .. } => {
				self.notices.push(Notice::Click(node));
				self.state = InteractionState::Hovering {
					node,
					satellite: None,
					hide_at: None,
				};
			}
			InteractionState::Dragging { .. } => self.release_drag(sim),
			InteractionState::Panning { .. } => self.state = InteractionState::Idle,
			_ => {}
		}
	}

	/// Pointer left the canvas: end gestures and arm the hide deadline.
	pub fn pointer_leave(&mut self, now: f64, sim: &mut Simulation) {
		self.release_drag(sim);
		self.hovered_link = None;
		match self.state {
			InteractionState::Hovering { node, hide_at: None, .. } => {
				self.state = InteractionState::Hovering {
					node,
					satellite: None,
					hide_at: Some(now + HIDE_DELAY_MS),
				};
			}
			InteractionState::Hovering { .. } => {}
			InteractionState::Pressed { node, .. } => {
				self.state = InteractionState::Hovering {
					node,
					satellite: None,
					hide_at: Some(now + HIDE_DELAY_MS),
				};
			}
			_ => self.state = InteractionState::Idle,
		}
	}

	/// End everything immediately: window blur and teardown.
	pub fn cancel(&mut self, sim: &mut Simulation) {
		self.release_drag(sim);
		self.hovered_link = None;
		if self.ring_host().is_some() {
			self.notices.push(Notice::Hover(None));
		}
		self.state = InteractionState::Idle;
	}

	/// Expire the hide deadline. Called once per frame.
	pub fn poll(&mut self, now: f64) {
		if let InteractionState::Hovering {
			hide_at: Some(at), ..
		} = self.state
		{
			if now >= at {
				self.state = InteractionState::Idle;
				self.notices.push(Notice::Hover(None));
			}
		}
	}

	/// Unpin the dragged node where it stands and let the graph cool down.
	/// No-op unless a drag is active, so a release is applied exactly once.
	pub fn release_drag(&mut self, sim: &mut Simulation) {
		let InteractionState::Dragging { node, .. } = self.state else {
			return;
		};
		sim.unpin(node);
		sim.set_alpha_target(0.0);
		debug!("satellite-graph: released node {node}");
		self.state = InteractionState::Hovering {
			node,
			satellite: None,
			hide_at: None,
		};
		self.notices.push(Notice::Hover(Some(node)));
	}

	fn start_drag(
		&mut self,
		node: usize,
		offset: (f64, f64),
		world: (f64, f64),
		sim: &mut Simulation,
	) {
		self.hovered_link = None;
		self.notices.push(Notice::Hover(None));
		sim.pin(node, world.0 + offset.0, world.1 + offset.1);
		sim.set_alpha_target(DRAG_ALPHA_TARGET);
		self.state = InteractionState::Dragging { node, offset };
	}

	fn hover_node(&mut self, node: usize) {
		self.state = InteractionState::Hovering {
			node,
			satellite: None,
			hide_at: None,
		};
	}

	fn update_hover(&mut self, hit: Hit, now: f64) {
		self.hovered_link = match hit {
			Hit::Link(link) => Some(link),
			_ => None,
		};

		let current = match self.state {
			InteractionState::Hovering { node, hide_at, .. } => Some((node, hide_at)),
			_ => None,
		};

		match (hit, current) {
			(Hit::Satellite(i), Some((node, _))) => {
				self.state = InteractionState::Hovering {
					node,
					satellite: Some(i),
					hide_at: None,
				};
			}
			(Hit::Node(node), Some((hovered, _))) if node == hovered => self.hover_node(node),
			(Hit::Node(node), _) => {
				self.hover_node(node);
				self.notices.push(Notice::Hover(Some(node)));
			}
			(_, Some((node, None))) => {
				self.state = InteractionState::Hovering {
					node,
					satellite: None,
					hide_at: Some(now + HIDE_DELAY_MS),
				};
			}
			(_, Some((node, Some(at)))) => {
				self.state = InteractionState::Hovering {
					node,
					satellite: None,
					hide_at: Some(at),
				};
			}
			(_, None) => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::{GraphConfig, GraphOptions};
	use crate::components::force_graph::highlight::HighlightState;
	use crate::components::force_graph::sample;
	use crate::components::force_graph::scale::{ScaleConfig, ScaledValues};
	use crate::components::force_graph::types::{GraphData, GraphLink, SatelliteKey};

	const FAR: (f64, f64) = (-5000.0, -5000.0);

	fn setup() -> (GraphConfig, Simulation) {
		let config = GraphOptions {
			node_groups: sample::node_groups(),
			..Default::default()
		}
		.resolve();
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a", "Alpha", "pillar")
					.with_satellite(SatelliteKey::Who, "People")
					.with_satellite(SatelliteKey::How, "Somehow"),
				GraphNode::new("b", "Beta", "sub"),
			],
			links: vec![GraphLink::new("a", "b").with_kind("partOf")],
		};
		let model = GraphModel::build(&data, &config.node_groups).unwrap();
		let mut sim = Simulation::new(model, &config.force, 800.0, 600.0);
		while sim.tick() {}
		(config, sim)
	}

	fn scene(config: &GraphConfig, sim: &Simulation, controller: &Controller) -> Scene {
		let scaled = ScaledValues::new(
			&ScaleConfig::default(),
			&config.link_style,
			&config.satellites,
			3.0,
			1.0,
		);
		Scene::build(
			sim.model(),
			config,
			&scaled,
			&HighlightState::default(),
			controller.ring_host(),
		)
	}

	fn position(sim: &Simulation, node: usize) -> (f64, f64) {
		sim.model().position(node).unwrap()
	}

	#[test]
	fn moving_onto_a_satellite_keeps_the_ring_open() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let mut t = ZoomTransform::IDENTITY;

		let s = scene(&config, &sim, &c);
		c.pointer_move(position(&sim, 0), false, 0.0, &s, &mut t, &mut sim);
		assert_eq!(c.ring_host(), Some(0));

		let s = scene(&config, &sim, &c);
		let ring = s.ring.as_ref().unwrap();
		assert_eq!(ring.satellites.len(), 2);
		let sat = (ring.satellites[0].satellite.x, ring.satellites[0].satellite.y);

		// Crossing empty space on the way arms the deadline...
		c.pointer_move(FAR, false, 10.0, &s, &mut t, &mut sim);
		// ...and reaching the satellite within it cancels the hide.
		c.pointer_move(sat, false, 60.0, &s, &mut t, &mut sim);
		c.poll(500.0);
		assert_eq!(
			c.state(),
			InteractionState::Hovering {
				node: 0,
				satellite: Some(0),
				hide_at: None
			}
		);

		c.pointer_move(FAR, false, 600.0, &s, &mut t, &mut sim);
		c.poll(650.0);
		assert_eq!(c.ring_host(), Some(0));
		c.poll(700.0);
		assert_eq!(c.state(), InteractionState::Idle);

		let events = c.take_events(sim.model());
		assert_eq!(
			events,
			vec![
				GraphEvent::NodeHover(Some(sim.model().nodes[0].node.clone())),
				GraphEvent::NodeHover(None),
			]
		);
	}

	#[test]
	fn press_without_movement_is_a_click() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);

		c.pointer_down(position(&sim, 1), &s, &t, &mut sim);
		c.pointer_up(&mut sim);
		let events = c.take_events(sim.model());
		assert_eq!(
			events.last(),
			Some(&GraphEvent::NodeClick(sim.model().nodes[1].node.clone()))
		);
		assert!(!sim.model().nodes[1].is_pinned());
	}

	#[test]
	fn small_jitter_does_not_start_a_drag() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let mut t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);
		let (x, y) = position(&sim, 0);

		c.pointer_down((x, y), &s, &t, &mut sim);
		c.pointer_move((x + 2.0, y + 1.0), true, 0.0, &s, &mut t, &mut sim);
		assert!(!c.is_dragging());
		c.pointer_move((x + 20.0, y), true, 0.0, &s, &mut t, &mut sim);
		assert!(c.is_dragging());
		assert_eq!(c.ring_host(), None);
		assert!(sim.model().nodes[0].is_pinned());
	}

	#[test]
	fn release_leaves_the_node_at_the_last_drag_position() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let mut t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);
		let (x, y) = position(&sim, 0);

		c.pointer_down((x, y), &s, &t, &mut sim);
		c.pointer_move((x + 40.0, y + 30.0), true, 0.0, &s, &mut t, &mut sim);
		assert!(sim.is_running(), "dragging reheats a settled graph");
		for _ in 0..5 {
			sim.tick();
		}
		c.pointer_move((x + 60.0, y + 45.0), true, 0.0, &s, &mut t, &mut sim);
		sim.tick();
		c.pointer_up(&mut sim);

		let node = &sim.model().nodes[0];
		assert!(!node.is_pinned());
		assert_eq!((node.x, node.y), (x + 60.0, y + 45.0));

		// A second release finds no drag to end.
		c.pointer_up(&mut sim);
		c.release_drag(&mut sim);
		let hovers = c
			.take_events(sim.model())
			.into_iter()
			.filter(|e| matches!(e, GraphEvent::NodeHover(Some(_))))
			.count();
		assert_eq!(hovers, 2, "one on press, one on release");
	}

	#[test]
	fn a_drag_without_a_release_event_still_ends() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let mut t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);
		let (x, y) = position(&sim, 1);

		c.pointer_down((x, y), &s, &t, &mut sim);
		c.pointer_move((x + 30.0, y), true, 0.0, &s, &mut t, &mut sim);
		assert!(sim.model().nodes[1].is_pinned());
		// Button released outside the window: next move reports no buttons.
		c.pointer_move((x + 35.0, y), false, 0.0, &s, &mut t, &mut sim);
		assert!(!c.is_dragging());
		assert!(!sim.model().nodes[1].is_pinned());
		assert_eq!(sim.model().nodes[1].x, x + 30.0);

		c.pointer_down((x + 30.0, y), &scene(&config, &sim, &c), &t, &mut sim);
		c.pointer_move((x + 60.0, y), true, 0.0, &s, &mut t, &mut sim);
		c.pointer_leave(0.0, &mut sim);
		assert!(!sim.model().nodes[1].is_pinned());
	}

	#[test]
	fn drag_disabled_still_clicks() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(false, true);
		let mut t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);
		let (x, y) = position(&sim, 0);

		c.pointer_down((x, y), &s, &t, &mut sim);
		c.pointer_move((x + 20.0, y), true, 0.0, &s, &mut t, &mut sim);
		assert!(!c.is_dragging());
		assert!(!sim.model().nodes[0].is_pinned());
	}

	#[test]
	fn background_drag_pans_when_zoom_is_enabled() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let mut t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);

		c.pointer_down(FAR, &s, &t, &mut sim);
		c.pointer_move((FAR.0 + 25.0, FAR.1 - 10.0), true, 0.0, &s, &mut t, &mut sim);
		c.pointer_up(&mut sim);
		assert_eq!((t.x, t.y), (25.0, -10.0));
		assert_eq!(c.state(), InteractionState::Idle);

		let mut c = Controller::new(true, false);
		let mut t = ZoomTransform::IDENTITY;
		c.pointer_down(FAR, &s, &t, &mut sim);
		c.pointer_move((FAR.0 + 25.0, FAR.1), true, 0.0, &s, &mut t, &mut sim);
		assert_eq!(t, ZoomTransform::IDENTITY);
	}

	#[test]
	fn link_hover_is_independent_of_node_hover() {
		let (config, mut sim) = setup();
		let mut c = Controller::new(true, true);
		let mut t = ZoomTransform::IDENTITY;
		let s = scene(&config, &sim, &c);

		let arc = s.links[0].arc;
		let mid = arc.start_angle + arc.sweep() / 2.0;
		let apex = (
			arc.center.0 + arc.radius * mid.cos(),
			arc.center.1 + arc.radius * mid.sin(),
		);
		c.pointer_move(apex, false, 0.0, &s, &mut t, &mut sim);
		assert_eq!(c.hovered_link(), Some(0));
		assert_eq!(c.ring_host(), None);
		assert!(c.highlight_targets().contains(&HoverTarget::Link(0)));

		c.pointer_move(FAR, false, 10.0, &s, &mut t, &mut sim);
		assert_eq!(c.hovered_link(), None);
	}
}
