//! Breadth-first shortest paths.

use std::collections::VecDeque;

use log::debug;

use super::types::EdgeId;
use super::GraphView;

/// A path with the edge used for each hop; `edges.len() + 1 == nodes.len()`
/// unless the path is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathResult {
	/// Node ids from source to target.
	pub nodes: Vec<String>,
	/// Edge walked for each hop.
	pub edges: Vec<EdgeId>,
}

impl PathResult {
	/// True when no path exists.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of hops.
	pub fn len(&self) -> usize {
		self.edges.len()
	}
}

/// Minimum-hop path from `source_id` to `target_id` over `graph`.
///
/// See [`shortest_path_with_edges`].
pub fn shortest_path<G: GraphView>(graph: &G, source_id: &str, target_id: &str) -> Vec<String> {
	shortest_path_with_edges(graph, source_id, target_id).nodes
}

/// Minimum-hop path together with the edges walked.
///
/// Directed edges are only walked source to target; bidirectional edges
/// either way. Among equally short paths the first one discovered while
/// visiting each node's edges in insertion order wins. An empty result means
/// no path exists, or an endpoint is not in `graph`.
pub fn shortest_path_with_edges<G: GraphView>(
	graph: &G,
	source_id: &str,
	target_id: &str,
) -> PathResult {
	let store = graph.store();
	let (Some(src), Some(tgt)) = (store.node_index(source_id), store.node_index(target_id)) else {
		return PathResult::default();
	};
	if !graph.contains_node_at(src) || !graph.contains_node_at(tgt) {
		return PathResult::default();
	}
	if src == tgt {
		return PathResult {
			nodes: vec![source_id.to_string()],
			edges: Vec::new(),
		};
	}

	// parent[n] = (previous node, edge walked)
	let mut parent: Vec<Option<(usize, EdgeId)>> = vec![None; store.node_count()];
	let mut visited = vec![false; store.node_count()];
	let mut queue = VecDeque::new();
	visited[src] = true;
	queue.push_back(src);

	'search: while let Some(current) = queue.pop_front() {
		for edge_id in graph.incident_edges(current) {
			let Some(edge) = store.edge(edge_id) else {
				continue;
			};
			let (from, to) = store.endpoints(edge_id);
			let next = if from == current {
				to
			} else if edge.bidirectional {
				from
			} else {
				continue;
			};
			if visited[next] || !graph.contains_node_at(next) {
				continue;
			}
			visited[next] = true;
			parent[next] = Some((current, edge_id));
			if next == tgt {
				break 'search;
			}
			queue.push_back(next);
		}
	}

	if !visited[tgt] {
		debug!("No path from {source_id} to {target_id}");
		return PathResult::default();
	}

	let mut nodes = vec![tgt];
	let mut edges = Vec::new();
	let mut cursor = tgt;
	while let Some((prev, edge_id)) = parent[cursor] {
		nodes.push(prev);
		edges.push(edge_id);
		cursor = prev;
	}
	nodes.reverse();
	edges.reverse();
	debug!("Path {source_id} -> {target_id}: {} hops", edges.len());
	PathResult {
		nodes: nodes.into_iter().map(|i| store.node_at(i).id.clone()).collect(),
		edges,
	}
}
