//! Built-in demo graph shown when the host page supplies no data.

use std::collections::HashMap;

use super::config::NodeGroupConfig;
use super::types::{GraphData, GraphLink, GraphNode, SatelliteKey};

fn group(
	gradient: [&str; 2],
	satellite_gradient: [&str; 2],
	stroke: &str,
	(radius, glow_radius, collision_radius): (f64, f64, f64),
	font_size: f64,
	max_chars: usize,
) -> NodeGroupConfig {
	NodeGroupConfig {
		gradient: gradient.iter().map(|s| s.to_string()).collect(),
		satellite_gradient: satellite_gradient.iter().map(|s| s.to_string()).collect(),
		stroke: stroke.to_string(),
		radius,
		glow_radius,
		collision_radius,
		font_size,
		max_chars,
	}
}

/// Three-tier styling: one large hub, mid-sized pillars, small sub-topics.
pub fn node_groups() -> HashMap<String, NodeGroupConfig> {
	[
		(
			"hub",
			group(["#244855", "#2d5a6b"], ["#5a7d8a", "#7a9aa8"], "#1a3540", (60.0, 72.0, 90.0), 14.0, 12),
		),
		(
			"pillar",
			group(["#E64833", "#f05a42"], ["#f28b7a", "#f7a698"], "#b8361f", (44.0, 56.0, 70.0), 13.0, 10),
		),
		(
			"sub",
			group(["#90AEAD", "#a5c3c2"], ["#b8d4d3", "#cde3e2"], "#6b8584", (32.0, 44.0, 55.0), 11.0, 9),
		),
	]
	.into_iter()
	.map(|(name, config)| (name.to_string(), config))
	.collect()
}

/// A small hub-and-spoke graph exercising every feature: detail popovers,
/// satellites, typed links with and without relationship text.
pub fn graph() -> GraphData {
	use SatelliteKey::*;

	let nodes = vec![
		GraphNode::new("hub", "Community Health Data", "hub")
			.with_detail("Linked records from clinics, hospitals and public programs.")
			.with_satellite(Who, "Patients, clinicians and analysts")
			.with_satellite(What, "A shared view of community health")
			.with_satellite(Why, "Gaps in care only show up across systems"),
		GraphNode::new("access", "Access to Care", "pillar")
			.with_detail("Where and how people reach primary care.")
			.with_satellite(Where, "Community health centers")
			.with_satellite(How, "Visit records joined to coverage data"),
		GraphNode::new("outcomes", "Health Outcomes", "pillar")
			.with_detail("Measured results across conditions.")
			.with_satellite(What, "Chronic disease and maternal outcomes")
			.with_satellite(When, "Tracked yearly"),
		GraphNode::new("linkage", "Record Linkage", "pillar")
			.with_satellite(How, "Probabilistic matching on demographics")
			.with_satellite(Which, "Deterministic or probabilistic methods"),
		GraphNode::new("centers", "Federally Qualified Health Centers", "sub")
			.with_satellite(Who, "Uninsured and underinsured patients"),
		GraphNode::new("maternal", "Maternal Health", "sub")
			.with_detail("Prenatal visits and birth outcomes."),
		GraphNode::new("respiratory", "Respiratory Disease", "sub")
			.with_satellite(What, "Asthma and COPD"),
		GraphNode::new("rates", "Match Rates", "sub"),
	];

	let links = vec![
		GraphLink::new("hub", "access").with_kind("partOf"),
		GraphLink::new("hub", "outcomes").with_kind("partOf"),
		GraphLink::new("hub", "linkage")
			.with_kind("partOf")
			.with_relationship("Powered by")
			.with_description("Every view of the data depends on linked records."),
		GraphLink::new("access", "centers").with_kind("contains"),
		GraphLink::new("outcomes", "maternal").with_kind("contains"),
		GraphLink::new("outcomes", "respiratory").with_kind("contains"),
		GraphLink::new("linkage", "rates").with_kind("contains"),
		GraphLink::new("centers", "maternal").with_relationship("Serves"),
	];

	GraphData { nodes, links }
}
