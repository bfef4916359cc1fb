//! Graph engine: snapshot store, facet filtering, traversal and highlighting.

mod filter;
mod highlight;
mod path;
mod store;
mod types;

pub use filter::{FilterEngine, FilterSpec, FilteredGraph, ScoreRange};
pub use highlight::{HighlightSet, highlight};
pub use path::{PathResult, shortest_path, shortest_path_with_edges};
pub use store::{Adjacency, GraphDataStore, GraphStats};
pub use types::{
	Category, Cluster, Edge, EdgeId, GraphSnapshot, Insight, Node, NodeMetadata, NodeType,
	Relationship, clamp_unit,
};

/// A read-only view over a loaded store: either the full graph or a
/// filtered subgraph of it. Traversals only see what the view contains.
pub trait GraphView {
	/// The store backing this view.
	fn store(&self) -> &GraphDataStore;

	/// Whether the node at this store position is visible.
	fn contains_node_at(&self, idx: usize) -> bool;

	/// Whether the edge is visible.
	fn contains_edge(&self, id: EdgeId) -> bool;

	/// Whether the node with this id is visible.
	fn contains_node(&self, id: &str) -> bool {
		self.store()
			.node_index(id)
			.is_some_and(|idx| self.contains_node_at(idx))
	}

	/// Visible edges touching the node at `idx`, in insertion order.
	fn incident_edges(&self, idx: usize) -> impl Iterator<Item = EdgeId> + '_ {
		self.store()
			.adjacency_at(idx)
			.incident
			.iter()
			.copied()
			.filter(move |&e| self.contains_edge(e))
	}

	/// Visible nodes in load order.
	fn visible_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
		self.store()
			.nodes()
			.iter()
			.enumerate()
			.filter(move |&(idx, _)| self.contains_node_at(idx))
			.map(|(_, node)| node)
	}

	/// Visible edges in load order.
	fn visible_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
		self.store()
			.edges()
			.filter(move |&(id, _)| self.contains_edge(id))
	}
}
