//! Facet-based subgraph derivation.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use super::store::GraphDataStore;
use super::types::{Category, EdgeId, Node, NodeType, Relationship, clamp_unit};
use super::GraphView;

/// Inclusive score interval inside [0,1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
	/// Inclusive lower bound.
	pub min: f64,
	/// Inclusive upper bound.
	pub max: f64,
}

impl ScoreRange {
	/// The whole [0,1] interval; an inactive facet.
	pub const FULL: Self = Self { min: 0.0, max: 1.0 };

	/// Range as given; see [`ScoreRange::normalized`].
	pub fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// Clamps both bounds into [0,1] and swaps them when reversed.
	pub fn normalized(self) -> Self {
		let (min, max) = (clamp_unit(self.min), clamp_unit(self.max));
		if min > max {
			Self { min: max, max: min }
		} else {
			Self { min, max }
		}
	}

	/// Inclusive on both ends.
	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value <= self.max
	}

	/// True for the inactive `[0,1]` range.
	pub fn is_full(&self) -> bool {
		*self == Self::FULL
	}
}

impl Default for ScoreRange {
	fn default() -> Self {
		Self::FULL
	}
}

/// Which nodes and edges stay visible. Facets combine with AND; an empty
/// set, a blank search term or the full range leaves that facet inactive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
	/// Case-insensitive substring over label, description and tags.
	pub search_term: String,
	/// Allowed node types.
	pub types: BTreeSet<NodeType>,
	/// Allowed node categories.
	pub categories: BTreeSet<Category>,
	/// Edge-only facet; never hides nodes.
	pub relationships: BTreeSet<Relationship>,
	/// Allowed node importance.
	pub importance: ScoreRange,
	/// Allowed node confidence.
	pub confidence: ScoreRange,
}

impl FilterSpec {
	/// Sets the search term.
	pub fn with_search(mut self, term: impl Into<String>) -> Self {
		self.search_term = term.into();
		self
	}

	/// Restricts node types.
	pub fn with_types(mut self, types: impl IntoIterator<Item = NodeType>) -> Self {
		self.types = types.into_iter().collect();
		self
	}

	/// Restricts node categories.
	pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
		self.categories = categories.into_iter().collect();
		self
	}

	/// Restricts edge relationships.
	pub fn with_relationships(
		mut self,
		relationships: impl IntoIterator<Item = Relationship>,
	) -> Self {
		self.relationships = relationships.into_iter().collect();
		self
	}

	/// Restricts node importance.
	pub fn with_importance(mut self, min: f64, max: f64) -> Self {
		self.importance = ScoreRange::new(min, max);
		self
	}

	/// Restricts node confidence.
	pub fn with_confidence(mut self, min: f64, max: f64) -> Self {
		self.confidence = ScoreRange::new(min, max);
		self
	}

	/// Trimmed, lowercased search term and normalized ranges.
	pub fn normalized(&self) -> Self {
		Self {
			search_term: self.search_term.trim().to_lowercase(),
			types: self.types.clone(),
			categories: self.categories.clone(),
			relationships: self.relationships.clone(),
			importance: self.importance.normalized(),
			confidence: self.confidence.normalized(),
		}
	}

	/// True when at least one facet constrains the graph.
	pub fn is_active(&self) -> bool {
		let spec = self.normalized();
		!spec.search_term.is_empty()
			|| !spec.types.is_empty()
			|| !spec.categories.is_empty()
			|| !spec.relationships.is_empty()
			|| !spec.importance.is_full()
			|| !spec.confidence.is_full()
	}

	/// Node predicate; expects a normalized spec.
	fn admits(&self, node: &Node) -> bool {
		(self.search_term.is_empty() || node.matches_term(&self.search_term))
			&& (self.types.is_empty() || self.types.contains(&node.node_type))
			&& (self.categories.is_empty() || self.categories.contains(&node.category))
			&& self.importance.contains(node.importance)
			&& self.confidence.contains(node.confidence)
	}
}

/// The subgraph of a store that passed a filter.
#[derive(Clone, Debug)]
pub struct FilteredGraph {
	store: Arc<GraphDataStore>,
	spec: FilterSpec,
	nodes: Vec<bool>,
	edges: Vec<bool>,
	node_count: usize,
	edge_count: usize,
}

impl FilteredGraph {
	/// Everything in `store` visible.
	pub fn unfiltered(store: Arc<GraphDataStore>) -> Self {
		let (node_count, edge_count) = (store.node_count(), store.edge_count());
		Self {
			nodes: vec![true; node_count],
			edges: vec![true; edge_count],
			node_count,
			edge_count,
			spec: FilterSpec::default(),
			store,
		}
	}

	/// Shared handle to the backing store.
	pub fn store_handle(&self) -> &Arc<GraphDataStore> {
		&self.store
	}

	/// The normalized spec this graph was derived with.
	pub fn spec(&self) -> &FilterSpec {
		&self.spec
	}

	/// Visible node count.
	pub fn node_count(&self) -> usize {
		self.node_count
	}

	/// Visible edge count.
	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	/// Ids of the visible nodes in load order.
	pub fn node_ids(&self) -> Vec<&str> {
		self.visible_nodes().map(|n| n.id.as_str()).collect()
	}

	/// Ids of the visible edges in load order.
	pub fn edge_ids(&self) -> Vec<EdgeId> {
		self.visible_edges().map(|(id, _)| id).collect()
	}
}

impl PartialEq for FilteredGraph {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.store, &other.store)
			&& self.spec == other.spec
			&& self.nodes == other.nodes
			&& self.edges == other.edges
	}
}

impl GraphView for FilteredGraph {
	fn store(&self) -> &GraphDataStore {
		&self.store
	}

	fn contains_node_at(&self, idx: usize) -> bool {
		self.nodes.get(idx).copied().unwrap_or(false)
	}

	fn contains_edge(&self, id: EdgeId) -> bool {
		self.edges.get(id.0).copied().unwrap_or(false)
	}
}

/// Derives filtered subgraphs. Pure: the same store and spec always give
/// an equal result.
pub struct FilterEngine;

impl FilterEngine {
	/// Subgraph of `store` admitted by `spec`.
	pub fn apply(store: &Arc<GraphDataStore>, spec: &FilterSpec) -> FilteredGraph {
		let spec = spec.normalized();
		let nodes: Vec<bool> = store.nodes().iter().map(|n| spec.admits(n)).collect();
		let edges: Vec<bool> = store
			.edges()
			.map(|(id, edge)| {
				let (src, tgt) = store.endpoints(id);
				let relationship_ok = spec.relationships.is_empty()
					|| spec.relationships.contains(&edge.relationship);
				nodes[src] && nodes[tgt] && relationship_ok
			})
			.collect();
		let node_count = nodes.iter().filter(|&&v| v).count();
		let edge_count = edges.iter().filter(|&&v| v).count();
		debug!(
			"Filter kept {node_count}/{} nodes and {edge_count}/{} edges",
			store.node_count(),
			store.edge_count()
		);
		FilteredGraph {
			store: Arc::clone(store),
			spec,
			nodes,
			edges,
			node_count,
			edge_count,
		}
	}
}
