//! Render descriptors for one frame.
//!
//! [`Scene::build`] is a pure function of the simulation's current positions,
//! the resolved config, the zoom scale and the hover intensities. The canvas
//! renderer draws a scene; pointer hit testing runs against the last scene
//! drawn, so what the user sees is exactly what they can hover.

use super::config::{GraphConfig, NodeGroupConfig};
use super::geometry::LinkArc;
use super::highlight::{HighlightState, HoverTarget};
use super::labels::{LabelLine, layout_label};
use super::model::GraphModel;
use super::satellites::{self, Satellite};
use super::scale::ScaledValues;

/// Growth of a fully hovered node's body and glow.
pub const NODE_HOVER_SCALE: f64 = 1.15;
/// Extra radius of a fully hovered satellite.
pub const SATELLITE_HOVER_GROWTH: f64 = 2.0;

/// The three coincident strokes of one link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkGlyph {
	/// Index into the model's links.
	pub index: usize,
	pub arc: LinkArc,
	pub base_color: String,
	pub base_width: f64,
	pub base_opacity: f64,
	/// Overlay color from the link type table.
	pub color: String,
	pub overlay_width: f64,
	pub overlay_opacity: f64,
	/// Invisible stroke width used for hit testing.
	pub hit_width: f64,
}

/// Body styling of a node whose group is configured.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub gradient: Vec<String>,
	pub stroke: String,
	pub stroke_width: f64,
	pub radius: f64,
	pub glow_radius: f64,
	pub font_size: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	/// Index into the model's nodes.
	pub index: usize,
	pub id: String,
	pub x: f64,
	pub y: f64,
	/// `None` for a node whose group has no config: drawn as a plain dot.
	pub style: Option<NodeStyle>,
	pub label: Vec<LabelLine>,
	/// Hit radius: the body radius, or the fallback dot radius.
	pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SatelliteGlyph {
	pub satellite: Satellite,
	pub radius: f64,
	pub glow_radius: f64,
	pub font_size: f64,
}

/// The satellites around the hovered host plus connector styling.
#[derive(Clone, Debug, PartialEq)]
pub struct SatelliteRing {
	pub host: usize,
	pub center: (f64, f64),
	pub gradient: Vec<String>,
	pub stroke: String,
	pub stroke_width: f64,
	pub connector_width: f64,
	pub connector_dash: (f64, f64),
	pub satellites: Vec<SatelliteGlyph>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub links: Vec<LinkGlyph>,
	pub nodes: Vec<NodeGlyph>,
	pub ring: Option<SatelliteRing>,
}

impl Scene {
	/// Describe the frame. `ring_host` is the node whose satellites are open.
	pub fn build(
		model: &GraphModel,
		config: &GraphConfig,
		scaled: &ScaledValues,
		highlight: &HighlightState,
		ring_host: Option<usize>,
	) -> Self {
		let style = &config.link_style;
		let links = model
			.links
			.iter()
			.enumerate()
			.filter_map(|(index, link)| {
				let from = model.position(link.source)?;
				let to = model.position(link.target)?;
				let arc = LinkArc::between(from, to)?;
				let t = highlight.intensity(HoverTarget::Link(index));
				Some(LinkGlyph {
					index,
					arc,
					base_color: style.base_color.clone(),
					base_width: scaled.link_base_width * (1.0 + 0.5 * t),
					base_opacity: style.base_opacity,
					color: style.color_for(link.link.kind.as_deref()).to_string(),
					overlay_width: scaled.link_overlay_width * (1.0 + t),
					overlay_opacity: style.overlay_opacity + (1.0 - style.overlay_opacity) * t,
					hit_width: scaled.link_hit_width,
				})
			})
			.collect();

		let nodes = model
			.nodes
			.iter()
			.enumerate()
			.map(|(index, sim)| {
				let grow = 1.0
					+ (NODE_HOVER_SCALE - 1.0) * highlight.intensity(HoverTarget::Node(index));
				let group = model.group_style(index);
				let style = group.map(|g| NodeStyle {
					gradient: g.gradient.clone(),
					stroke: g.stroke.clone(),
					stroke_width: scaled.node_stroke_width,
					radius: g.radius * grow,
					glow_radius: g.glow_radius * grow,
					font_size: g.font_size,
				});
				let label = group
					.map(|g| layout_label(&sim.node.label, g.max_chars, g.font_size))
					.unwrap_or_default();
				NodeGlyph {
					index,
					id: sim.node.id.clone(),
					x: sim.x,
					y: sim.y,
					radius: style.as_ref().map_or(scaled.fallback_radius, |s| s.radius),
					style,
					label,
				}
			})
			.collect();

		let ring = ring_host
			.filter(|_| config.enable_satellites)
			.and_then(|host| {
				let group = model.group_style(host)?;
				let center = model.position(host)?;
				Some(build_ring(model, config, scaled, highlight, host, center, group))
			})
			.filter(|ring| !ring.satellites.is_empty());

		Self { links, nodes, ring }
	}

	pub fn node(&self, index: usize) -> Option<&NodeGlyph> {
		self.nodes.iter().find(|n| n.index == index)
	}
}

fn build_ring(
	model: &GraphModel,
	config: &GraphConfig,
	scaled: &ScaledValues,
	highlight: &HighlightState,
	host: usize,
	center: (f64, f64),
	group: &NodeGroupConfig,
) -> SatelliteRing {
	let sat = &config.satellites;
	let satellites = satellites::layout(&model.nodes[host].node, center, group, sat)
		.into_iter()
		.enumerate()
		.map(|(i, satellite)| {
			let grow = SATELLITE_HOVER_GROWTH * highlight.intensity(HoverTarget::Satellite(i));
			SatelliteGlyph {
				satellite,
				radius: sat.radius + grow,
				glow_radius: sat.glow_radius + grow,
				font_size: sat.font_size,
			}
		})
		.collect();

	SatelliteRing {
		host,
		center,
		gradient: group.satellite_gradient.clone(),
		stroke: group.stroke.clone(),
		stroke_width: scaled.satellite_stroke_width,
		connector_width: scaled.connector_width,
		connector_dash: scaled.connector_dash,
		satellites,
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::components::force_graph::config::GraphOptions;
	use crate::components::force_graph::sample;
	use crate::components::force_graph::scale::ScaleConfig;
	use crate::components::force_graph::theme::Theme;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode, SatelliteKey};

	fn config() -> GraphConfig {
		GraphOptions {
			node_groups: sample::node_groups(),
			..Default::default()
		}
		.resolve()
	}

	fn scaled(config: &GraphConfig, k: f64) -> ScaledValues {
		ScaledValues::new(
			&ScaleConfig::default(),
			&config.link_style,
			&config.satellites,
			Theme::default().body_stroke_width,
			k,
		)
	}

	fn placed(data: &GraphData, config: &GraphConfig) -> GraphModel {
		let mut model = GraphModel::build(data, &config.node_groups).unwrap();
		for (i, node) in model.nodes.iter_mut().enumerate() {
			node.x = 100.0 * i as f64;
			node.y = 50.0;
		}
		model
	}

	#[test]
	fn every_node_appears_exactly_once() {
		let config = config();
		let mut data = sample::graph();
		data.nodes.push(GraphNode::new("stray", "Unstyled", "mystery"));
		let model = placed(&data, &config);
		let scene = Scene::build(&model, &config, &scaled(&config, 1.0), &HighlightState::default(), None);

		let ids: Vec<&str> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
		let unique: HashSet<&str> = ids.iter().copied().collect();
		assert_eq!(ids.len(), data.nodes.len());
		assert_eq!(unique.len(), data.nodes.len());

		let stray = scene.nodes.last().unwrap();
		assert!(stray.style.is_none());
		assert!(stray.label.is_empty());
	}

	#[test]
	fn link_stroke_width_is_base_over_k() {
		let config = config();
		let model = placed(&sample::graph(), &config);
		for k in [0.1, 0.85, 2.5, 4.0] {
			let scene = Scene::build(&model, &config, &scaled(&config, k), &HighlightState::default(), None);
			for link in &scene.links {
				assert!((link.base_width - config.link_style.base_width / k).abs() < 1e-9);
				assert!((link.overlay_width - config.link_style.overlay_width / k).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn untyped_and_unknown_links_use_the_default_color() {
		let config = config();
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a", "A", "hub"),
				GraphNode::new("b", "B", "sub"),
				GraphNode::new("c", "C", "sub"),
			],
			links: vec![
				GraphLink::new("a", "b").with_kind("mentions"),
				GraphLink::new("a", "c"),
				GraphLink::new("b", "c").with_kind("contains"),
			],
		};
		let model = placed(&data, &config);
		let scene = Scene::build(&model, &config, &scaled(&config, 1.0), &HighlightState::default(), None);
		let colors: Vec<&str> = scene.links.iter().map(|l| l.color.as_str()).collect();
		assert_eq!(colors, ["#90AEAD", "#90AEAD", "#E64833"]);
	}

	#[test]
	fn coincident_endpoints_draw_no_link() {
		let config = config();
		let data = GraphData {
			nodes: vec![GraphNode::new("a", "A", "hub"), GraphNode::new("b", "B", "sub")],
			links: vec![GraphLink::new("a", "b")],
		};
		let mut model = placed(&data, &config);
		model.nodes[1].x = model.nodes[0].x;
		let scene = Scene::build(&model, &config, &scaled(&config, 1.0), &HighlightState::default(), None);
		assert!(scene.links.is_empty());
		assert_eq!(scene.nodes.len(), 2);
	}

	#[test]
	fn ring_matches_present_keys() {
		let config = config();
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a", "A", "pillar")
					.with_satellite(SatelliteKey::Who, "People")
					.with_satellite(SatelliteKey::What, "")
					.with_satellite(SatelliteKey::How, "Somehow"),
				GraphNode::new("b", "B", "mystery").with_satellite(SatelliteKey::Who, "Someone"),
			],
			links: vec![],
		};
		let model = placed(&data, &config);
		let s = scaled(&config, 1.0);
		let highlight = HighlightState::default();

		let scene = Scene::build(&model, &config, &s, &highlight, Some(0));
		assert_eq!(scene.ring.as_ref().map(|r| r.satellites.len()), Some(2));

		// Unstyled host: no ring.
		let scene = Scene::build(&model, &config, &s, &highlight, Some(1));
		assert!(scene.ring.is_none());

		let disabled = GraphConfig {
			enable_satellites: false,
			..config.clone()
		};
		let scene = Scene::build(&model, &disabled, &s, &highlight, Some(0));
		assert!(scene.ring.is_none());
	}

	#[test]
	fn hovered_node_grows() {
		let config = config();
		let model = placed(&sample::graph(), &config);
		let mut highlight = HighlightState::default();
		highlight.set_targets([HoverTarget::Node(0)]);
		for _ in 0..120 {
			highlight.tick(0.016);
		}
		let scene = Scene::build(&model, &config, &scaled(&config, 1.0), &highlight, None);
		let hub = scene.node(0).unwrap();
		let expected = config.node_groups["hub"].radius * NODE_HOVER_SCALE;
		assert!((hub.radius - expected).abs() < 1e-6);
	}
}
