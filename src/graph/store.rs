//! Validated, indexed, immutable graph snapshot.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

use log::{info, warn};

use super::types::{
	Category, Cluster, Edge, EdgeId, GraphSnapshot, Insight, Node, NodeType, clamp_unit,
};
use super::GraphView;
use crate::error::IntegrityError;

/// Edges touching one node, each list in insertion order.
///
/// Directed edges land in `outgoing`/`incoming`; bidirectional edges land in
/// `bidirectional` on both endpoints. `incident` holds every touching edge once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacency {
	/// Directed edges leaving the node.
	pub outgoing: Vec<EdgeId>,
	/// Directed edges arriving at the node.
	pub incoming: Vec<EdgeId>,
	/// Bidirectional edges at either end.
	pub bidirectional: Vec<EdgeId>,
	/// Every touching edge.
	pub incident: Vec<EdgeId>,
}

/// Aggregate counts over a loaded snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStats {
	/// Nodes kept.
	pub node_count: usize,
	/// Edges kept.
	pub edge_count: usize,
	/// Clusters kept.
	pub cluster_count: usize,
	/// Directed density `E / (V * (V - 1))`, 0 for fewer than two nodes.
	pub density: f64,
	/// `2E / V`, 0 for an empty graph.
	pub average_degree: f64,
	/// Node count per type; absent types are omitted.
	pub nodes_per_type: BTreeMap<NodeType, usize>,
	/// Node count per category; absent categories are omitted.
	pub nodes_per_category: BTreeMap<Category, usize>,
}

/// A loaded snapshot with O(1) node and adjacency lookup.
///
/// Never mutated after construction; a new snapshot means a new store.
#[derive(Clone, Debug, Default)]
pub struct GraphDataStore {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	endpoints: Vec<(usize, usize)>,
	clusters: Vec<Cluster>,
	index: HashMap<String, usize>,
	adjacency: Vec<Adjacency>,
	node_cluster: Vec<Option<usize>>,
	metrics: BTreeMap<String, f64>,
	insights: Vec<Insight>,
	issues: Vec<IntegrityError>,
}

/// What a build does with an integrity violation.
trait IssuePolicy {
	type Error;

	fn reject(&mut self, issue: IntegrityError) -> Result<(), Self::Error>;

	/// Issues recorded for the integrity report.
	fn into_issues(self) -> Vec<IntegrityError>;
}

/// Fails on the first violation.
struct Strict;

impl IssuePolicy for Strict {
	type Error = IntegrityError;

	fn reject(&mut self, issue: IntegrityError) -> Result<(), IntegrityError> {
		Err(issue)
	}

	fn into_issues(self) -> Vec<IntegrityError> {
		Vec::new()
	}
}

/// Drops the offending item and keeps going.
#[derive(Default)]
struct Lenient {
	issues: Vec<IntegrityError>,
}

impl IssuePolicy for Lenient {
	type Error = Infallible;

	fn reject(&mut self, issue: IntegrityError) -> Result<(), Infallible> {
		warn!("Dropping invalid snapshot item: {issue}");
		self.issues.push(issue);
		Ok(())
	}

	fn into_issues(self) -> Vec<IntegrityError> {
		self.issues
	}
}

impl GraphDataStore {
	/// Builds the store, dropping and recording every integrity violation.
	pub fn load(nodes: Vec<Node>, edges: Vec<Edge>, clusters: Vec<Cluster>) -> Self {
		let Ok(store) = Self::build(nodes, edges, clusters, Lenient::default());
		store
	}

	/// Builds the store, failing on the first integrity violation.
	pub fn load_strict(
		nodes: Vec<Node>,
		edges: Vec<Edge>,
		clusters: Vec<Cluster>,
	) -> Result<Self, IntegrityError> {
		Self::build(nodes, edges, clusters, Strict)
	}

	/// Lenient load of a full snapshot, keeping its metrics and insights.
	pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
		let GraphSnapshot {
			nodes,
			edges,
			clusters,
			metrics,
			insights,
		} = snapshot;
		let mut store = Self::load(nodes, edges, clusters);
		store.metrics = metrics;
		store.insights = insights;
		store
	}

	fn build<P: IssuePolicy>(
		nodes: Vec<Node>,
		edges: Vec<Edge>,
		clusters: Vec<Cluster>,
		mut policy: P,
	) -> Result<Self, P::Error> {
		let mut reject = |issue: IntegrityError| policy.reject(issue);

		let mut index = HashMap::with_capacity(nodes.len());
		let mut kept = Vec::with_capacity(nodes.len());
		for mut node in nodes {
			if index.contains_key(&node.id) {
				reject(IntegrityError::DuplicateNode(node.id))?;
				continue;
			}
			node.importance = clamp_unit(node.importance);
			node.confidence = clamp_unit(node.confidence);
			node.connection_count = 0;
			index.insert(node.id.clone(), kept.len());
			kept.push(node);
		}
		let mut nodes = kept;

		let mut adjacency = vec![Adjacency::default(); nodes.len()];
		let mut kept_edges = Vec::with_capacity(edges.len());
		let mut endpoints = Vec::with_capacity(edges.len());
		for (edge_index, mut edge) in edges.into_iter().enumerate() {
			let (src, tgt) = match (index.get(&edge.source), index.get(&edge.target)) {
				(Some(&src), Some(&tgt)) => (src, tgt),
				(src, _) => {
					let missing = if src.is_none() {
						edge.source.clone()
					} else {
						edge.target.clone()
					};
					reject(IntegrityError::UnknownEndpoint {
						edge_index,
						source_id: edge.source,
						target_id: edge.target,
						missing,
					})?;
					continue;
				}
			};
			edge.strength = clamp_unit(edge.strength);
			edge.confidence = clamp_unit(edge.confidence);

			let id = EdgeId(kept_edges.len());
			if edge.bidirectional {
				adjacency[src].bidirectional.push(id);
				if tgt != src {
					adjacency[tgt].bidirectional.push(id);
				}
			} else {
				adjacency[src].outgoing.push(id);
				adjacency[tgt].incoming.push(id);
			}
			adjacency[src].incident.push(id);
			nodes[src].connection_count += 1;
			if tgt != src {
				adjacency[tgt].incident.push(id);
				nodes[tgt].connection_count += 1;
			}
			kept_edges.push(edge);
			endpoints.push((src, tgt));
		}

		let mut node_cluster = vec![None; nodes.len()];
		let mut kept_clusters = Vec::with_capacity(clusters.len());
		for mut cluster in clusters {
			let members = std::mem::take(&mut cluster.member_node_ids);
			for member in members {
				match index.get(&member) {
					Some(&idx) => {
						node_cluster[idx].get_or_insert(kept_clusters.len());
						cluster.member_node_ids.push(member);
					}
					None => reject(IntegrityError::UnknownClusterMember {
						cluster_id: cluster.id.clone(),
						node_id: member,
					})?,
				}
			}
			cluster.importance = clamp_unit(cluster.importance);
			kept_clusters.push(cluster);
		}

		let issues = policy.into_issues();
		let store = Self {
			nodes,
			edges: kept_edges,
			endpoints,
			clusters: kept_clusters,
			index,
			adjacency,
			node_cluster,
			metrics: BTreeMap::new(),
			insights: Vec::new(),
			issues,
		};
		let stats = store.stats();
		info!(
			"Loaded graph snapshot: {} nodes, {} edges, {} clusters, average degree {:.2} ({} items dropped)",
			stats.node_count,
			stats.edge_count,
			stats.cluster_count,
			stats.average_degree,
			store.issues.len()
		);
		Ok(store)
	}

	/// Position of the node with this id.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_index(id).map(|idx| &self.nodes[idx])
	}

	/// Node by position. Panics when out of range.
	pub fn node_at(&self, idx: usize) -> &Node {
		&self.nodes[idx]
	}

	/// All nodes in load order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edge by id.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(id.0)
	}

	/// All edges in load order, with their ids.
	pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
		self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
	}

	/// Resolved `(source, target)` node positions of an edge.
	pub fn endpoints(&self, id: EdgeId) -> (usize, usize) {
		self.endpoints[id.0]
	}

	/// Adjacency of the node with this id.
	pub fn adjacency(&self, id: &str) -> Option<&Adjacency> {
		self.node_index(id).map(|idx| &self.adjacency[idx])
	}

	/// Adjacency by node position.
	pub fn adjacency_at(&self, idx: usize) -> &Adjacency {
		&self.adjacency[idx]
	}

	/// Clusters with unknown members removed.
	pub fn clusters(&self) -> &[Cluster] {
		&self.clusters
	}

	/// First cluster listing the node at `idx` as a member.
	pub fn cluster_of(&self, idx: usize) -> Option<&Cluster> {
		self.node_cluster
			.get(idx)
			.copied()
			.flatten()
			.map(|c| &self.clusters[c])
	}

	/// Snapshot metrics as delivered.
	pub fn metrics(&self) -> &BTreeMap<String, f64> {
		&self.metrics
	}

	/// Snapshot insights as delivered.
	pub fn insights(&self) -> &[Insight] {
		&self.insights
	}

	/// Items dropped during a lenient load.
	pub fn integrity_issues(&self) -> &[IntegrityError] {
		&self.issues
	}

	/// Number of nodes kept.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges kept.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Aggregate counts, computed on demand.
	pub fn stats(&self) -> GraphStats {
		let (v, e) = (self.nodes.len() as f64, self.edges.len() as f64);
		let mut stats = GraphStats {
			node_count: self.nodes.len(),
			edge_count: self.edges.len(),
			cluster_count: self.clusters.len(),
			density: if v > 1.0 { e / (v * (v - 1.0)) } else { 0.0 },
			average_degree: if v > 0.0 { 2.0 * e / v } else { 0.0 },
			..GraphStats::default()
		};
		for node in &self.nodes {
			*stats.nodes_per_type.entry(node.node_type).or_default() += 1;
			*stats.nodes_per_category.entry(node.category).or_default() += 1;
		}
		stats
	}
}

impl GraphView for GraphDataStore {
	fn store(&self) -> &GraphDataStore {
		self
	}

	fn contains_node_at(&self, idx: usize) -> bool {
		idx < self.nodes.len()
	}

	fn contains_edge(&self, id: EdgeId) -> bool {
		id.0 < self.edges.len()
	}
}
