//! Graph engine state for one component instance.
//!
//! Owns the simulation, the interaction controller, the pan/zoom transform
//! and the hover intensities. Created once when the component mounts, fed
//! pointer events by the component's handlers and advanced once per
//! animation frame by [`ForceGraphState::frame`]. Nothing here is shared
//! between instances.

use log::{debug, error, info};

use super::config::GraphConfig;
use super::highlight::HighlightState;
use super::interaction::{Controller, GraphEvent};
use super::model::GraphModel;
use super::overlay::{LinkPopover, NodePopover, Overlays, SatelliteTooltip};
use super::resize::effective_size;
use super::scale::{ScaleConfig, ScaledValues};
use super::scene::Scene;
use super::simulation::Simulation;
use super::theme::Theme;
use super::types::GraphData;
use super::zoom::{ZoomTransform, ZoomTransition, wheel_factor};

/// Longest frame gap fed to the hover easing, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

/// Core graph state combining physics simulation with interaction and
/// highlight tracking.
pub struct ForceGraphState {
	config: GraphConfig,
	scale: ScaleConfig,
	theme: Theme,
	data: GraphData,
	sim: Simulation,
	controller: Controller,
	transform: ZoomTransform,
	transition: Option<ZoomTransition>,
	highlight: HighlightState,
	scene: Scene,
	ring_host: Option<usize>,
	/// Events already resolved against a model that has since been replaced.
	pending_events: Vec<GraphEvent>,
	width: f64,
	height: f64,
	pointer: (f64, f64),
	last_frame: Option<f64>,
	torn_down: bool,
}

impl ForceGraphState {
	/// Build the engine for a canvas whose container measures
	/// `width` x `height`. Dimensions below the configured minimum are raised.
	pub fn new(data: &GraphData, config: GraphConfig, width: f64, height: f64) -> Self {
		let (width, height) = effective_size((width, height), (config.min_width, config.min_height));
		let sim = build_simulation(data, &config, width, height);
		let mut state = Self {
			controller: Controller::new(config.enable_drag, config.enable_zoom),
			transform: ZoomTransform::initial(&config.zoom, width, height),
			scale: ScaleConfig::default(),
			theme: Theme::default(),
			data: data.clone(),
			sim,
			config,
			transition: None,
			highlight: HighlightState::default(),
			scene: Scene::default(),
			ring_host: None,
			pending_events: Vec::new(),
			width,
			height,
			pointer: (0.0, 0.0),
			last_frame: None,
			torn_down: false,
		};
		state.rebuild_scene();
		state
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn transform(&self) -> ZoomTransform {
		self.transform
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	pub fn controller(&self) -> &Controller {
		&self.controller
	}

	/// Last pointer position, in canvas pixels.
	pub fn pointer(&self) -> (f64, f64) {
		self.pointer
	}

	/// Screen point just right of the node whose ring is open, where its
	/// popover attaches.
	pub fn node_anchor(&self) -> Option<(f64, f64)> {
		let glyph = self.scene.node(self.controller.ring_host()?)?;
		Some(self.transform.world_to_screen((glyph.x + glyph.radius, glyph.y)))
	}

	/// Advance one animation frame at time `now` (ms). Returns `false` once
	/// the engine has been torn down; the caller must not schedule another
	/// frame.
	pub fn frame(&mut self, now: f64) -> bool {
		if self.torn_down {
			return false;
		}
		let dt = self
			.last_frame
			.map_or(0.0, |last| ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT));
		self.last_frame = Some(now);

		self.controller.poll(now);
		if let Some(transition) = self.transition {
			let (transform, done) = transition.sample(now);
			self.transform = transform;
			if done {
				self.transition = None;
			}
		}

		self.sim.tick();
		self.highlight.set_targets(self.controller.highlight_targets());
		self.highlight.tick(dt);
		self.rebuild_scene();
		true
	}

	pub fn pointer_move(&mut self, screen: (f64, f64), buttons_down: bool, now: f64) {
		if self.torn_down {
			return;
		}
		self.pointer = screen;
		self.controller.pointer_move(
			screen,
			buttons_down,
			now,
			&self.scene,
			&mut self.transform,
			&mut self.sim,
		);
	}

	pub fn pointer_down(&mut self, screen: (f64, f64)) {
		if self.torn_down {
			return;
		}
		self.pointer = screen;
		// A press takes over from any running zoom animation.
		self.transition = None;
		self.controller
			.pointer_down(screen, &self.scene, &self.transform, &mut self.sim);
	}

	pub fn pointer_up(&mut self) {
		self.controller.pointer_up(&mut self.sim);
	}

	pub fn pointer_leave(&mut self, now: f64) {
		self.controller.pointer_leave(now, &mut self.sim);
	}

	/// Window lost focus: end any gesture immediately.
	pub fn blur(&mut self) {
		self.controller.cancel(&mut self.sim);
	}

	/// Zoom about the pointer. Returns whether the event was consumed.
	pub fn wheel(&mut self, screen: (f64, f64), delta_y: f64, delta_mode: u32, ctrl: bool) -> bool {
		if self.torn_down || !self.config.enable_zoom {
			return false;
		}
		self.transition = None;
		self.transform.scale_about(
			screen,
			wheel_factor(delta_y, delta_mode, ctrl),
			self.config.zoom.scale_extent,
		);
		true
	}

	/// Animate back to the initial transform.
	pub fn double_click(&mut self, now: f64) {
		if self.torn_down || !self.config.enable_zoom {
			return;
		}
		let target = ZoomTransform::initial(&self.config.zoom, self.width, self.height);
		self.transition = Some(ZoomTransition::new(
			self.transform,
			target,
			now,
			self.config.zoom.transition_duration,
		));
	}

	/// The container changed size. Rebuilds the simulation when the clamped
	/// size differs from the current one.
	pub fn resize(&mut self, observed_width: f64, observed_height: f64) {
		let (width, height) = effective_size(
			(observed_width, observed_height),
			(self.config.min_width, self.config.min_height),
		);
		if self.torn_down || (width == self.width && height == self.height) {
			return;
		}
		debug!("satellite-graph: resized to {width}x{height}");
		self.width = width;
		self.height = height;
		self.rebuild();
	}

	/// Replace the graph data and rebuild.
	pub fn set_data(&mut self, data: &GraphData) {
		if self.torn_down {
			return;
		}
		self.data = data.clone();
		self.rebuild();
	}

	/// Events raised since the last call.
	pub fn take_events(&mut self) -> Vec<GraphEvent> {
		let mut events = std::mem::take(&mut self.pending_events);
		events.extend(self.controller.take_events(self.sim.model()));
		events
	}

	/// Popover contents for the current hover state.
	pub fn overlays(&self) -> Overlays {
		let model = self.sim.model();
		let node = self
			.controller
			.ring_host()
			.and_then(|i| model.nodes.get(i))
			.and_then(|n| {
				n.node.detail.as_ref().map(|detail| NodePopover {
					title: n.node.label.clone(),
					content: detail.clone(),
				})
			});

		let satellite = self.controller.hovered_satellite().and_then(|i| {
			let glyph = self.scene.ring.as_ref()?.satellites.get(i)?;
			Some(SatelliteTooltip {
				question: self.config.satellites.question(glyph.satellite.key).to_string(),
				answer: glyph.satellite.text.clone(),
			})
		});

		let link = self.controller.hovered_link().and_then(|i| {
			let link = model.links.get(i)?;
			let label = |n: usize| model.nodes.get(n).map(|n| n.node.label.as_str());
			Some(LinkPopover::new(
				label(link.source)?,
				label(link.target)?,
				link.link.kind.as_deref(),
				link.link.relationship.as_deref(),
				link.link.description.as_deref(),
			))
		});

		Overlays {
			node,
			link,
			satellite,
		}
	}

	/// Stop the simulation, end any drag and drop the hide deadline. Every
	/// later call is a no-op, so no further ticks happen.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		self.controller.cancel(&mut self.sim);
		self.sim.stop();
		self.transition = None;
		self.highlight.clear();
		self.torn_down = true;
		debug!(
			"satellite-graph: torn down after {} ticks",
			self.sim.tick_count()
		);
	}

	fn rebuild(&mut self) {
		self.controller.cancel(&mut self.sim);
		// Controller events name nodes by index into the outgoing model.
		let resolved = self.controller.take_events(self.sim.model());
		self.pending_events.extend(resolved);
		self.sim.stop();
		self.sim = build_simulation(&self.data, &self.config, self.width, self.height);
		self.transition = None;
		self.highlight.clear();
		self.rebuild_scene();
	}

	fn rebuild_scene(&mut self) {
		let host = self.controller.ring_host();
		if host != self.ring_host {
			self.highlight.forget_satellites();
			self.ring_host = host;
		}
		let scaled = ScaledValues::new(
			&self.scale,
			&self.config.link_style,
			&self.config.satellites,
			self.theme.body_stroke_width,
			self.transform.k,
		);
		self.scene = Scene::build(self.sim.model(), &self.config, &scaled, &self.highlight, host);
	}
}

/// Ingest `data` and start a simulation. Invalid data is logged and replaced
/// by an empty graph.
fn build_simulation(data: &GraphData, config: &GraphConfig, width: f64, height: f64) -> Simulation {
	let model = match GraphModel::build(data, &config.node_groups) {
		Ok(model) => {
			info!(
				"satellite-graph: built {} nodes, {} links",
				model.nodes.len(),
				model.links.len()
			);
			model
		}
		Err(e) => {
			error!("satellite-graph: rejected graph data: {e}");
			GraphModel::default()
		}
	};
	Simulation::new(model, &config.force, width, height)
}
