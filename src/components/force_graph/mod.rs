//! Force-directed graph visualization component.
//!
//! Renders an interactive graph on an HTML canvas with:
//! - Physics-based node positioning via a d3-style force simulation
//! - Group-styled nodes with wrapped labels and gradient fills
//! - Curved, two-layer links that thicken on hover
//! - A ring of satellite nodes around the hovered node
//! - Pan, zoom, node dragging and edge-aware popovers
//!
//! # Example
//!
//! ```ignore
//! use satellite_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode, GraphOptions};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::new("a", "Node A", "hub"),
//!         GraphNode::new("b", "Node B", "pillar"),
//!     ],
//!     links: vec![GraphLink::new("a", "b")],
//! };
//! let options = GraphOptions { node_groups, ..Default::default() };
//!
//! view! { <ForceGraphCanvas data=data options=options /> }
//! ```

mod component;
pub mod config;
mod error;
mod geometry;
mod highlight;
pub mod interaction;
mod labels;
mod model;
pub mod overlay;
mod render;
mod resize;
pub mod sample;
mod satellites;
mod scale;
mod scene;
mod simulation;
mod state;
pub mod theme;
mod types;
mod zoom;

pub use component::ForceGraphCanvas;
pub use config::{GraphConfig, GraphOptions, LinkDistance, NodeGroupConfig};
pub use error::GraphError;
pub use interaction::GraphEvent;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, SatelliteFields, SatelliteKey};
