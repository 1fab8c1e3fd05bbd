//! Graph configuration: per-group node styling, link styling, forces,
//! satellites and zoom, with documented defaults.
//!
//! Every category has a resolved form (all fields set, `Default` holds the
//! documented defaults) and an `*Override` form with every field optional.
//! [`merge`] applies an override over the defaults shallowly: each top-level
//! field present in the override replaces the default field wholesale, and
//! absent fields keep the default. Nothing is validated; a nonsensical
//! override is the caller's responsibility.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use super::types::SatelliteKey;

/// Collision radius for nodes whose group has no config.
pub const FALLBACK_COLLISION_RADIUS: f64 = 50.0;

/// Link color used when the color table has no `default` entry either.
pub const FALLBACK_LINK_COLOR: &str = "#90AEAD";

/// A configuration category that can be shallowly overridden.
pub trait Resolve: Sized {
	type Override;

	/// Replace every field present in `over`, keep the rest.
	fn apply(self, over: Self::Override) -> Self;
}

/// Resolve `over` against `defaults`. A missing override yields the defaults.
pub fn merge<T: Resolve>(defaults: T, over: Option<T::Override>) -> T {
	match over {
		Some(over) => defaults.apply(over),
		None => defaults,
	}
}

macro_rules! take_present {
	($target:ident, $over:ident; $($field:ident),+ $(,)?) => {
		$(
			if let Some(value) = $over.$field {
				$target.$field = value;
			}
		)+
	};
}

/// Visual parameters shared by every node of one group.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroupConfig {
	/// Body/glow gradient stops (CSS colors), spread evenly along the diagonal.
	pub gradient: Vec<String>,
	/// Gradient stops for this group's satellites and connectors.
	pub satellite_gradient: Vec<String>,
	pub stroke: String,
	pub radius: f64,
	pub glow_radius: f64,
	pub collision_radius: f64,
	pub font_size: f64,
	/// Max characters per wrapped label line.
	pub max_chars: usize,
}

/// Styling for the two visible link layers and the hover target.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyleConfig {
	pub base_color: String,
	pub base_width: f64,
	pub base_opacity: f64,
	pub overlay_width: f64,
	pub overlay_opacity: f64,
	/// Width of the invisible stroke used for pointer hit testing.
	pub hit_width: f64,
	/// Overlay color per link type. The `default` entry is the fallback.
	pub colors: HashMap<String, String>,
}

impl LinkStyleConfig {
	/// Overlay color for a link type, falling back to the table's `default`.
	pub fn color_for(&self, kind: Option<&str>) -> &str {
		kind.and_then(|k| self.colors.get(k))
			.or_else(|| self.colors.get("default"))
			.map(String::as_str)
			.unwrap_or(FALLBACK_LINK_COLOR)
	}
}

impl Default for LinkStyleConfig {
	fn default() -> Self {
		Self {
			base_color: "#A4B6C1".into(),
			base_width: 20.0,
			base_opacity: 0.6,
			overlay_width: 12.0,
			overlay_opacity: 0.5,
			hit_width: 20.0,
			colors: [
				("partOf", "#244855"),
				("contains", "#E64833"),
				("default", FALLBACK_LINK_COLOR),
			]
			.into_iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect(),
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStyleOverride {
	pub base_color: Option<String>,
	pub base_width: Option<f64>,
	pub base_opacity: Option<f64>,
	pub overlay_width: Option<f64>,
	pub overlay_opacity: Option<f64>,
	pub hit_width: Option<f64>,
	pub colors: Option<HashMap<String, String>>,
}

impl Resolve for LinkStyleConfig {
	type Override = LinkStyleOverride;

	fn apply(mut self, over: LinkStyleOverride) -> Self {
		take_present!(self, over; base_color, base_width, base_opacity, overlay_width, overlay_opacity, hit_width, colors);
		self
	}
}

/// Target link length as a function of the two endpoint groups.
///
/// Cheap to clone; the function is shared.
#[derive(Clone)]
pub struct LinkDistance(Arc<dyn Fn(&str, &str) -> f64 + Send + Sync>);

impl LinkDistance {
	pub fn by_groups(f: impl Fn(&str, &str) -> f64 + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn constant(distance: f64) -> Self {
		Self::by_groups(move |_, _| distance)
	}

	pub fn distance(&self, source_group: &str, target_group: &str) -> f64 {
		(self.0)(source_group, target_group)
	}
}

impl Default for LinkDistance {
	/// Hub pairs sit furthest apart, pillar/sub pairs closest.
	fn default() -> Self {
		Self::by_groups(|a, b| {
			if a == "hub" || b == "hub" {
				255.0
			} else if (a == "pillar" && b == "sub") || (a == "sub" && b == "pillar") {
				173.0
			} else {
				210.0
			}
		})
	}
}

impl fmt::Debug for LinkDistance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("LinkDistance(<fn>)")
	}
}

/// Per-axis strength of the pull toward the canvas center.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct CenterStrength {
	pub x: f64,
	pub y: f64,
}

/// Parameters handed to the force simulation.
#[derive(Clone, Debug)]
pub struct ForceConfig {
	pub link_distance: LinkDistance,
	/// Many-body strength applied to every node. Negative repels.
	pub charge_strength: f64,
	pub collision_strength: f64,
	/// Collision passes per tick. More passes leave less residual overlap.
	pub collision_iterations: usize,
	pub center_strength: CenterStrength,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			link_distance: LinkDistance::default(),
			charge_strength: -520.0,
			collision_strength: 1.0,
			collision_iterations: 3,
			center_strength: CenterStrength { x: 0.05, y: 0.05 },
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceOverride {
	/// Code-only: functions can't come from JSON.
	#[serde(skip)]
	pub link_distance: Option<LinkDistance>,
	pub charge_strength: Option<f64>,
	pub collision_strength: Option<f64>,
	pub collision_iterations: Option<usize>,
	pub center_strength: Option<CenterStrength>,
}

impl Resolve for ForceConfig {
	type Override = ForceOverride;

	fn apply(mut self, over: ForceOverride) -> Self {
		take_present!(self, over; link_distance, charge_strength, collision_strength, collision_iterations, center_strength);
		self
	}
}

/// Satellite ring parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SatelliteConfig {
	/// Keys eligible for the ring, in ring order.
	pub keys: Vec<SatelliteKey>,
	/// Question text shown in a satellite's tooltip.
	pub question_map: HashMap<SatelliteKey, String>,
	/// Gap between the host's glow edge and the ring.
	pub distance: f64,
	pub radius: f64,
	pub glow_radius: f64,
	pub font_size: f64,
	pub stroke_width: f64,
}

impl SatelliteConfig {
	pub fn question(&self, key: SatelliteKey) -> &str {
		self.question_map
			.get(&key)
			.map(String::as_str)
			.unwrap_or(key.as_str())
	}
}

impl Default for SatelliteConfig {
	fn default() -> Self {
		Self {
			keys: SatelliteKey::ALL.to_vec(),
			question_map: [
				(SatelliteKey::Who, "Who is involved?"),
				(SatelliteKey::What, "What is it?"),
				(SatelliteKey::When, "When does it occur?"),
				(SatelliteKey::Where, "Where does it happen?"),
				(SatelliteKey::Why, "Why does it matter?"),
				(SatelliteKey::Which, "Which options are available?"),
				(SatelliteKey::How, "How does it work?"),
			]
			.into_iter()
			.map(|(k, v)| (k, v.to_string()))
			.collect(),
			distance: 30.0,
			radius: 16.0,
			glow_radius: 20.0,
			font_size: 9.0,
			stroke_width: 2.0,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteOverride {
	pub keys: Option<Vec<SatelliteKey>>,
	pub question_map: Option<HashMap<SatelliteKey, String>>,
	pub distance: Option<f64>,
	pub radius: Option<f64>,
	pub glow_radius: Option<f64>,
	pub font_size: Option<f64>,
	pub stroke_width: Option<f64>,
}

impl Resolve for SatelliteConfig {
	type Override = SatelliteOverride;

	fn apply(mut self, over: SatelliteOverride) -> Self {
		take_present!(self, over; keys, question_map, distance, radius, glow_radius, font_size, stroke_width);
		self
	}
}

/// Initial translation as a fraction of the canvas size.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TranslateFraction {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
	/// Allowed `(min, max)` zoom factor.
	pub scale_extent: (f64, f64),
	pub initial_scale: f64,
	pub initial_translate: TranslateFraction,
	/// Duration of the double-click reset animation, in milliseconds.
	pub transition_duration: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			scale_extent: (0.1, 4.0),
			initial_scale: 0.85,
			initial_translate: TranslateFraction { x: 0.1, y: 0.08 },
			transition_duration: 750.0,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomOverride {
	pub scale_extent: Option<(f64, f64)>,
	pub initial_scale: Option<f64>,
	pub initial_translate: Option<TranslateFraction>,
	pub transition_duration: Option<f64>,
}

impl Resolve for ZoomConfig {
	type Override = ZoomOverride;

	fn apply(mut self, over: ZoomOverride) -> Self {
		take_present!(self, over; scale_extent, initial_scale, initial_translate, transition_duration);
		self
	}
}

/// Fully resolved configuration for one graph instance.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	pub node_groups: HashMap<String, NodeGroupConfig>,
	pub link_style: LinkStyleConfig,
	pub force: ForceConfig,
	pub satellites: SatelliteConfig,
	pub zoom: ZoomConfig,
	pub min_width: f64,
	pub min_height: f64,
	pub enable_drag: bool,
	pub enable_zoom: bool,
	pub enable_satellites: bool,
}

impl Default for GraphConfig {
	fn default() -> Self {
		GraphOptions::default().resolve()
	}
}

/// Caller-facing configuration; everything except the group table is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
	pub node_groups: HashMap<String, NodeGroupConfig>,
	pub link_style: Option<LinkStyleOverride>,
	pub force: Option<ForceOverride>,
	pub satellites: Option<SatelliteOverride>,
	pub zoom: Option<ZoomOverride>,
	pub min_width: Option<f64>,
	pub min_height: Option<f64>,
	pub enable_drag: Option<bool>,
	pub enable_zoom: Option<bool>,
	pub enable_satellites: Option<bool>,
}

impl GraphOptions {
	pub fn resolve(self) -> GraphConfig {
		GraphConfig {
			node_groups: self.node_groups,
			link_style: merge(LinkStyleConfig::default(), self.link_style),
			force: merge(ForceConfig::default(), self.force),
			satellites: merge(SatelliteConfig::default(), self.satellites),
			zoom: merge(ZoomConfig::default(), self.zoom),
			min_width: self.min_width.unwrap_or(860.0),
			min_height: self.min_height.unwrap_or(400.0),
			enable_drag: self.enable_drag.unwrap_or(true),
			enable_zoom: self.enable_zoom.unwrap_or(true),
			enable_satellites: self.enable_satellites.unwrap_or(true),
		}
	}
}
