use std::collections::BTreeSet;

use serde::Serialize;

use super::types::EdgeId;
use super::GraphView;

/// Nodes and edges emphasised around a focal node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSet {
	/// Focal node and its neighbours.
	pub nodes: BTreeSet<String>,
	/// Edges joining the focal node to its neighbours.
	pub edges: BTreeSet<EdgeId>,
}

impl HighlightSet {
	/// True when nothing is highlighted.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether the node is highlighted.
	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	/// Whether the edge is highlighted.
	pub fn contains_edge(&self, id: EdgeId) -> bool {
		self.edges.contains(&id)
	}
}

/// One-hop neighbourhood of `focal_id`: the focal node, every visible node
/// sharing a visible edge with it, and those edges. Edge direction is
/// ignored here, unlike in path search. Empty when the focal node is not
/// in `graph`.
pub fn highlight<G: GraphView>(graph: &G, focal_id: &str) -> HighlightSet {
	let store = graph.store();
	let Some(focal) = store.node_index(focal_id).filter(|&i| graph.contains_node_at(i)) else {
		return HighlightSet::default();
	};

	let mut set = HighlightSet::default();
	set.nodes.insert(focal_id.to_string());
	for edge_id in graph.incident_edges(focal) {
		let (src, tgt) = store.endpoints(edge_id);
		let other = if src == focal { tgt } else { src };
		set.edges.insert(edge_id);
		set.nodes.insert(store.node_at(other).id.clone());
	}
	set
}
