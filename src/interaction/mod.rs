//! Selection state machine and the immutable view states it produces.

mod controller;

pub use controller::{InteractionController, SnapshotRequest};

use crate::graph::{FilterSpec, FilteredGraph, HighlightSet, PathResult};
use crate::render::RenderMode;

/// Where the user's attention is.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	Idle,
	/// One node selected, its neighbourhood highlighted.
	NodeSelected {
		/// The selected node.
		node_id: String,
	},
	/// `path` is empty when the target is unreachable.
	PathHighlighted {
		/// Path start, also the selected node.
		source_id: String,
		/// Path end.
		target_id: String,
		/// Shortest path between them.
		path: PathResult,
	},
}

impl Selection {
	/// Human-readable state name.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::NodeSelected { .. } => "node selected",
			Self::PathHighlighted { .. } => "path highlighted",
		}
	}

	/// The selected node; the path source while a path is shown.
	pub fn selected_node(&self) -> Option<&str> {
		match self {
			Self::Idle => None,
			Self::NodeSelected { node_id } => Some(node_id),
			Self::PathHighlighted { source_id, .. } => Some(source_id),
		}
	}

	/// The path, while one is shown.
	pub fn path(&self) -> Option<&PathResult> {
		match self {
			Self::PathHighlighted { path, .. } => Some(path),
			_ => None,
		}
	}

	/// True in `Idle`.
	pub fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}
}

/// One immutable frame of interaction state. Every command produces a new
/// one; the previous value is never touched.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
	/// Monotonic id assigned by the controller.
	pub revision: u64,
	/// Where the user's attention is.
	pub selection: Selection,
	/// 1-hop neighbourhood of the selected node; empty when idle.
	pub highlight: HighlightSet,
	/// Subgraph the current filter admits.
	pub graph: FilteredGraph,
	/// Target surface.
	pub mode: RenderMode,
}

impl ViewState {
	/// The active filter.
	pub fn filter(&self) -> &FilterSpec {
		self.graph.spec()
	}
}
