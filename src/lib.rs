//! satellite-graph: interactive force-directed graphs with satellite rings.
//!
//! This crate provides a WASM-based graph visualization component that lays
//! out grouped nodes with a physics simulation, draws curved links, and opens
//! a ring of question satellites around the node under the pointer.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, GraphConfig, GraphData, GraphError, GraphEvent, GraphLink, GraphNode,
	GraphOptions, NodeGroupConfig, SatelliteKey, sample,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("satellite-graph: logging initialized");
}

/// Parse the JSON body of the `<script>` element with the given id.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("satellite-graph: failed to parse #{id}: {e}");
			None
		}
	}
}

/// Graph data from `<script id="graph-data">`, or the bundled sample.
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> GraphData {
	match load_script_json::<GraphData>("graph-data") {
		Some(data) => {
			info!(
				"satellite-graph: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			data
		}
		None => {
			info!("satellite-graph: no graph data in page, showing sample");
			sample::graph()
		}
	}
}

/// Options from `<script id="graph-options">`. Pages that bring no group
/// table get the sample groups so the sample graph is styled.
fn load_graph_options() -> GraphOptions {
	let mut options = load_script_json::<GraphOptions>("graph-options").unwrap_or_default();
	if options.node_groups.is_empty() {
		options.node_groups = sample::node_groups();
	}
	options
}

/// Main application component.
/// Loads graph data and options from the DOM and renders the visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let options = load_graph_options();

	let on_node_click = Callback::new(|node: GraphNode| {
		info!("satellite-graph: clicked {}", node.id);
	});
	let on_node_hover = Callback::new(|node: Option<GraphNode>| match node {
		Some(node) => info!("satellite-graph: hovering {}", node.id),
		None => info!("satellite-graph: hover cleared"),
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Satellite Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="graph-page">
			<ForceGraphCanvas
				data=graph_signal
				options=options
				on_node_click=on_node_click
				on_node_hover=on_node_hover
			/>
			<p class="subtitle">
				"Hover a node for its questions. Drag nodes to reposition. Scroll to zoom, double-click to reset."
			</p>
		</div>
	}
}
