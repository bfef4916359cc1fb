//! Renderer-agnostic view model and the adapter that resolves it.
//!
//! Nothing in here draws. A backend (the canvas component in this crate, or
//! an external 3D scene) consumes the [`ViewModel`] and only has to place
//! and paint what it describes.

mod palette;
mod resolve;

pub use palette::{
	Color, NEUTRAL, NodeShape, category_color, relationship_color, relationship_dash, type_shape,
};
pub use resolve::VisualResolver;

use serde::{Deserialize, Serialize};

use crate::graph::{Category, EdgeId, FilteredGraph, NodeType, Relationship};
use crate::interaction::ViewState;

/// Target display surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
	/// Flat canvas; anchors carry `z = 0`.
	#[default]
	#[serde(rename = "2d")]
	TwoD,
	/// Depth-aware scene.
	#[serde(rename = "3d")]
	ThreeD,
}

impl RenderMode {
	/// `"2d"` or `"3d"`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::TwoD => "2d",
			Self::ThreeD => "3d",
		}
	}

	/// The other mode.
	pub fn toggled(self) -> Self {
		match self {
			Self::TwoD => Self::ThreeD,
			Self::ThreeD => Self::TwoD,
		}
	}
}

/// Why an element is emphasised. Variants are ordered by precedence: when
/// several apply, the greatest wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualState {
	/// No emphasis; dimmed while focus is active.
	Default,
	/// One hop from the selected node.
	Highlighted,
	/// On the current path.
	OnPath,
	/// The selected node.
	Selected,
}

/// Resolved appearance of one visible node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
	/// Node id in the store.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Domain type, which picks the shape.
	pub node_type: NodeType,
	/// Domain category, which picks the base colour.
	pub category: Category,
	/// Winning emphasis.
	pub state: VisualState,
	/// Fill colour after emphasis.
	pub color: Color,
	/// Outline to trace.
	pub shape: NodeShape,
	/// Radius in world units.
	pub size: f64,
	/// Fraction of the confidence ring to draw, in [0,1].
	pub confidence_ring: f64,
	/// 1.0, or the dim opacity for unemphasised nodes under focus.
	pub opacity: f64,
	/// Cluster centroid to seed placement; z is 0 in 2D mode.
	pub anchor: Option<[f64; 3]>,
}

/// Resolved appearance of one visible edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeVisual {
	/// Edge identity in the store.
	pub id: EdgeId,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship kind, which picks colour and dash.
	pub relationship: Relationship,
	/// Winning emphasis.
	pub state: VisualState,
	/// Stroke colour after emphasis.
	pub color: Color,
	/// Stroke width in world units.
	pub width: f64,
	/// Line dash pattern; empty for solid.
	pub dash: &'static [f64],
	/// Draw an arrow head at the target (directed edges only).
	pub arrow: bool,
	/// 1.0, or the dim opacity for unemphasised edges under focus.
	pub opacity: f64,
}

/// A cluster with at least one visible member.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVisual {
	/// Cluster id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Tint, neutral when the snapshot colour is unreadable.
	pub color: Color,
	/// Centre; z is 0 in 2D mode.
	pub centroid: [f64; 3],
	/// Members that passed the filter.
	pub visible_members: usize,
	/// Clamped cluster importance.
	pub importance: f64,
}

/// Everything a backend needs to paint one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
	/// Surface the model was resolved for.
	pub mode: RenderMode,
	/// Revision of the view state it came from.
	pub revision: u64,
	/// True while a selection or path dims the rest of the graph.
	pub focus_active: bool,
	/// Visible nodes in load order.
	pub nodes: Vec<NodeVisual>,
	/// Visible edges in load order.
	pub edges: Vec<EdgeVisual>,
	/// Clusters with visible members.
	pub clusters: Vec<ClusterVisual>,
}

impl ViewModel {
	/// Visual for the node with this id, if visible.
	pub fn node(&self, id: &str) -> Option<&NodeVisual> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Visual for this edge, if visible.
	pub fn edge(&self, id: EdgeId) -> Option<&EdgeVisual> {
		self.edges.iter().find(|e| e.id == id)
	}
}

/// Translates interaction state into visual primitives.
pub trait RenderAdapter {
	/// Resolves every visible element of `graph` under `state`.
	fn translate(&self, graph: &FilteredGraph, state: &ViewState, mode: RenderMode) -> ViewModel;
}
