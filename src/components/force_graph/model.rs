//! Converts caller-owned [`GraphData`] into simulation-ready descriptors.
//!
//! The model owns independent copies of every node and link, so the physics
//! can mutate positions without touching the caller's data. Links are
//! resolved to node indices once, at build time; a link whose endpoint is not
//! among the nodes rejects the whole graph instead of feeding undefined
//! positions to the simulation.

use std::collections::{HashMap, HashSet};

use log::warn;

use super::config::NodeGroupConfig;
use super::error::{GraphError, LinkEnd};
use super::types::{GraphData, GraphLink, GraphNode};

/// A node plus the mutable state owned by the simulation.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub node: GraphNode,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Fixed coordinates while pinned by a drag.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	fn new(node: GraphNode) -> Self {
		Self {
			node,
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A link with both endpoints resolved to node indices.
#[derive(Clone, Debug)]
pub struct SimLink {
	pub link: GraphLink,
	pub source: usize,
	pub target: usize,
}

/// Simulation-ready nodes and links plus the group style lookup.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	pub nodes: Vec<SimNode>,
	pub links: Vec<SimLink>,
	pub groups: HashMap<String, NodeGroupConfig>,
}

impl GraphModel {
	/// Build the model, rejecting duplicate ids and dangling link endpoints.
	pub fn build(
		data: &GraphData,
		groups: &HashMap<String, NodeGroupConfig>,
	) -> Result<Self, GraphError> {
		let mut index = HashMap::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.as_str(), i).is_some() {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
		}

		let links = data
			.links
			.iter()
			.enumerate()
			.map(|(i, link)| {
				let resolve = |id: &str, end| {
					index
						.get(id)
						.copied()
						.ok_or_else(|| GraphError::UnknownEndpoint {
							link: i,
							end,
							id: id.to_string(),
						})
				};
				Ok(SimLink {
					source: resolve(&link.source, LinkEnd::Source)?,
					target: resolve(&link.target, LinkEnd::Target)?,
					link: link.clone(),
				})
			})
			.collect::<Result<Vec<_>, GraphError>>()?;

		let mut unstyled = HashSet::new();
		for node in &data.nodes {
			if !groups.contains_key(&node.group) && unstyled.insert(node.group.as_str()) {
				warn!(
					"satellite-graph: no style for group `{}`, its nodes render unstyled",
					node.group
				);
			}
		}

		Ok(Self {
			nodes: data.nodes.iter().cloned().map(SimNode::new).collect(),
			links,
			groups: groups.clone(),
		})
	}

	pub fn group_style(&self, node: usize) -> Option<&NodeGroupConfig> {
		self.nodes
			.get(node)
			.and_then(|n| self.groups.get(&n.node.group))
	}

	pub fn position(&self, node: usize) -> Option<(f64, f64)> {
		self.nodes.get(node).map(|n| (n.x, n.y))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::sample;

	fn data() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode::new("a", "Alpha", "hub"),
				GraphNode::new("b", "Beta", "sub"),
			],
			links: vec![GraphLink::new("a", "b")],
		}
	}

	#[test]
	fn builds_independent_copies() {
		let input = data();
		let mut model = GraphModel::build(&input, &HashMap::new()).unwrap();
		model.nodes[0].node.label = "Changed".into();
		model.nodes[0].x = 10.0;
		assert_eq!(input.nodes[0].label, "Alpha");
		assert_eq!(model.links[0].source, 0);
		assert_eq!(model.links[0].target, 1);
	}

	#[test]
	fn rejects_unknown_endpoint() {
		let mut input = data();
		input.links.push(GraphLink::new("b", "ghost"));
		let err = GraphModel::build(&input, &HashMap::new()).unwrap_err();
		assert_eq!(
			err,
			GraphError::UnknownEndpoint {
				link: 1,
				end: LinkEnd::Target,
				id: "ghost".into()
			}
		);
		assert_eq!(err.to_string(), "link 1 target references unknown node `ghost`");
	}

	#[test]
	fn rejects_duplicate_ids() {
		let mut input = data();
		input.nodes.push(GraphNode::new("a", "Again", "sub"));
		assert_eq!(
			GraphModel::build(&input, &HashMap::new()).unwrap_err(),
			GraphError::DuplicateNodeId("a".into())
		);
	}

	#[test]
	fn group_lookup_degrades_for_unknown_group() {
		let groups = sample::node_groups();
		let mut input = data();
		input.nodes.push(GraphNode::new("c", "Gamma", "mystery"));
		let model = GraphModel::build(&input, &groups).unwrap();
		assert!(model.group_style(0).is_some());
		assert!(model.group_style(2).is_none());
		assert_eq!(model.nodes[2].node.id, "c");
	}
}
