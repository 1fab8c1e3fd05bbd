//! Graph data structures for input to the force graph component.

use serde::Deserialize;

/// One of the recognized annotation attributes a node may carry.
///
/// Each present, non-empty attribute becomes a satellite around the node
/// while it is hovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SatelliteKey {
	Who,
	What,
	When,
	Where,
	Why,
	Which,
	How,
}

impl SatelliteKey {
	/// Every recognized key, in ring order.
	pub const ALL: [SatelliteKey; 7] = [
		SatelliteKey::Who,
		SatelliteKey::What,
		SatelliteKey::When,
		SatelliteKey::Where,
		SatelliteKey::Why,
		SatelliteKey::Which,
		SatelliteKey::How,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			SatelliteKey::Who => "who",
			SatelliteKey::What => "what",
			SatelliteKey::When => "when",
			SatelliteKey::Where => "where",
			SatelliteKey::Why => "why",
			SatelliteKey::Which => "which",
			SatelliteKey::How => "how",
		}
	}

	/// Display label drawn inside the satellite ("Who", "What", ...).
	pub fn label(self) -> String {
		let key = self.as_str();
		let mut chars = key.chars();
		match chars.next() {
			Some(first) => first.to_uppercase().chain(chars).collect(),
			None => String::new(),
		}
	}
}

/// The recognized satellite attributes of a node.
///
/// Deserialized flattened into the node object, so `{"id": "a", "who": "..."}`
/// fills `who`. Unrecognized extra attributes are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SatelliteFields {
	pub who: Option<String>,
	pub what: Option<String>,
	pub when: Option<String>,
	#[serde(rename = "where")]
	pub where_: Option<String>,
	pub why: Option<String>,
	pub which: Option<String>,
	pub how: Option<String>,
}

impl SatelliteFields {
	pub fn get(&self, key: SatelliteKey) -> Option<&str> {
		let value = match key {
			SatelliteKey::Who => &self.who,
			SatelliteKey::What => &self.what,
			SatelliteKey::When => &self.when,
			SatelliteKey::Where => &self.where_,
			SatelliteKey::Why => &self.why,
			SatelliteKey::Which => &self.which,
			SatelliteKey::How => &self.how,
		};
		value.as_deref()
	}

	/// The value for `key` if it is present and not blank.
	pub fn non_empty(&self, key: SatelliteKey) -> Option<&str> {
		self.get(key).filter(|v| !v.trim().is_empty())
	}

	pub fn set(&mut self, key: SatelliteKey, value: impl Into<String>) {
		let slot = match key {
			SatelliteKey::Who => &mut self.who,
			SatelliteKey::What => &mut self.what,
			SatelliteKey::When => &mut self.when,
			SatelliteKey::Where => &mut self.where_,
			SatelliteKey::Why => &mut self.why,
			SatelliteKey::Which => &mut self.which,
			SatelliteKey::How => &mut self.how,
		};
		*slot = Some(value.into());
	}
}

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display text, word-wrapped inside the node body.
	pub label: String,
	/// Optional long-form text shown in the hover popover.
	#[serde(default)]
	pub detail: Option<String>,
	/// Group name used to look up the node's [`NodeGroupConfig`](super::config::NodeGroupConfig).
	pub group: String,
	/// Annotation attributes shown as satellites on hover.
	#[serde(flatten)]
	pub satellites: SatelliteFields,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, label: impl Into<String>, group: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			detail: None,
			group: group.into(),
			satellites: SatelliteFields::default(),
		}
	}

	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}

	pub fn with_satellite(mut self, key: SatelliteKey, value: impl Into<String>) -> Self {
		self.satellites.set(key, value);
		self
	}
}

/// A connection between two nodes, drawn as a curved arc.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Category key into the link color table.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub relationship: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

impl GraphLink {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: None,
			relationship: None,
			description: None,
		}
	}

	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());
		self
	}

	pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
		self.relationship = Some(relationship.into());
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_json_flattens_satellite_fields() {
		let json = r#"{
			"id": "care",
			"label": "Primary Care",
			"group": "pillar",
			"who": "Clinicians",
			"where": "  ",
			"color": "ignored"
		}"#;
		let node: GraphNode = serde_json::from_str(json).unwrap();
		assert_eq!(node.satellites.get(SatelliteKey::Who), Some("Clinicians"));
		assert_eq!(node.satellites.get(SatelliteKey::Where), Some("  "));
		assert_eq!(node.satellites.non_empty(SatelliteKey::Where), None);
		assert_eq!(node.detail, None);
	}

	#[test]
	fn link_type_field_maps_to_kind() {
		let link: GraphLink =
			serde_json::from_str(r#"{"source": "a", "target": "b", "type": "partOf"}"#).unwrap();
		assert_eq!(link.kind.as_deref(), Some("partOf"));
		assert_eq!(link.relationship, None);
	}

	#[test]
	fn key_labels_are_capitalized() {
		assert_eq!(SatelliteKey::Which.label(), "Which");
		assert_eq!(SatelliteKey::ALL.len(), 7);
	}
}
