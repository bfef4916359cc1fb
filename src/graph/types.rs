//! Snapshot records and the closed enumerations they use.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of knowledge entity a node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
	/// An abstract idea or term.
	Concept,
	/// A stated requirement.
	Requirement,
	/// A system component.
	Component,
	/// A recorded decision.
	Decision,
	/// An open problem.
	Issue,
	/// A resolution to an issue.
	Solution,
	/// A person.
	Person,
	/// A source document.
	Document,
}

impl NodeType {
	/// Every variant, in declaration order.
	pub const ALL: [Self; 8] = [
		Self::Concept,
		Self::Requirement,
		Self::Component,
		Self::Decision,
		Self::Issue,
		Self::Solution,
		Self::Person,
		Self::Document,
	];

	/// Wire name of the variant.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Concept => "concept",
			Self::Requirement => "requirement",
			Self::Component => "component",
			Self::Decision => "decision",
			Self::Issue => "issue",
			Self::Solution => "solution",
			Self::Person => "person",
			Self::Document => "document",
		}
	}
}

/// Domain area a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	/// Requirements engineering.
	Requirements,
	/// Architecture.
	Architecture,
	/// Development.
	Development,
	/// Integration.
	Integration,
	/// Analytics.
	Analytics,
	/// Process.
	Process,
}

impl Category {
	/// Every variant, in declaration order.
	pub const ALL: [Self; 6] = [
		Self::Requirements,
		Self::Architecture,
		Self::Development,
		Self::Integration,
		Self::Analytics,
		Self::Process,
	];

	/// Wire name of the variant.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Requirements => "requirements",
			Self::Architecture => "architecture",
			Self::Development => "development",
			Self::Integration => "integration",
			Self::Analytics => "analytics",
			Self::Process => "process",
		}
	}
}

/// Relationship carried by an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
	/// Generic association.
	RelatesTo,
	/// Source needs target.
	DependsOn,
	/// Source realises target.
	Implements,
	/// Source contradicts target.
	ConflictsWith,
	/// Source affects target.
	Influences,
	/// Source was produced from target.
	DerivedFrom,
}

impl Relationship {
	/// Every variant, in declaration order.
	pub const ALL: [Self; 6] = [
		Self::RelatesTo,
		Self::DependsOn,
		Self::Implements,
		Self::ConflictsWith,
		Self::Influences,
		Self::DerivedFrom,
	];

	/// Wire name of the variant.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RelatesTo => "relates_to",
			Self::DependsOn => "depends_on",
			Self::Implements => "implements",
			Self::ConflictsWith => "conflicts_with",
			Self::Influences => "influences",
			Self::DerivedFrom => "derived_from",
		}
	}
}

macro_rules! display_as_str {
	($($ty:ty),*) => {
		$(impl fmt::Display for $ty {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		})*
	};
}

display_as_str!(NodeType, Category, Relationship);

fn default_score() -> f64 {
	0.5
}

/// Provenance information attached to a node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeMetadata {
	/// When the entity was first recorded.
	pub created_at: Option<DateTime<Utc>>,
	/// Last edit.
	pub last_modified: Option<DateTime<Utc>>,
	/// Who recorded it.
	pub author: String,
	/// Free-form tags; searched by the filter.
	pub tags: BTreeSet<String>,
	/// Where it came from (document, meeting, ticket).
	pub source: String,
}

/// A typed knowledge entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	/// Unique within a snapshot.
	pub id: String,
	/// Display label; searched by the filter.
	pub label: String,
	/// Kind of entity (`"type"` on the wire).
	#[serde(rename = "type")]
	pub node_type: NodeType,
	/// Domain area.
	pub category: Category,
	/// In [0,1]; drives node size.
	#[serde(default = "default_score")]
	pub importance: f64,
	/// In [0,1]; drives the confidence ring.
	#[serde(default = "default_score")]
	pub confidence: f64,
	/// Recomputed by the store from surviving edges; never read from input.
	#[serde(skip_deserializing)]
	pub connection_count: usize,
	/// Open key/value bag; a string `description` is searched by the filter.
	#[serde(default)]
	pub properties: BTreeMap<String, serde_json::Value>,
	/// Provenance.
	#[serde(default)]
	pub metadata: NodeMetadata,
}

impl Node {
	/// Node with neutral scores and empty metadata.
	pub fn new(
		id: impl Into<String>,
		label: impl Into<String>,
		node_type: NodeType,
		category: Category,
	) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			node_type,
			category,
			importance: default_score(),
			confidence: default_score(),
			connection_count: 0,
			properties: BTreeMap::new(),
			metadata: NodeMetadata::default(),
		}
	}

	/// The free-text `description` property, when it is a string.
	pub fn description(&self) -> Option<&str> {
		self.properties.get("description").and_then(|v| v.as_str())
	}

	/// Case-insensitive substring match over label, description and tags.
	/// `needle` must already be lowercase.
	pub fn matches_term(&self, needle: &str) -> bool {
		self.label.to_lowercase().contains(needle)
			|| self
				.description()
				.is_some_and(|d| d.to_lowercase().contains(needle))
			|| self
				.metadata
				.tags
				.iter()
				.any(|t| t.to_lowercase().contains(needle))
	}
}

/// A typed, weighted relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Kind of relationship.
	pub relationship: Relationship,
	/// In [0,1]; drives edge width.
	#[serde(default = "default_score")]
	pub strength: f64,
	/// Traversable target to source as well.
	#[serde(default)]
	pub bidirectional: bool,
	/// In [0,1].
	#[serde(default = "default_score")]
	pub confidence: f64,
	/// References backing the relationship.
	#[serde(default)]
	pub evidence: Vec<String>,
}

impl Edge {
	/// Directed edge with neutral strength and confidence.
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		relationship: Relationship,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship,
			strength: default_score(),
			bidirectional: false,
			confidence: default_score(),
			evidence: Vec::new(),
		}
	}

	/// Marks the edge as traversable in both directions.
	pub fn bidirectional(mut self) -> Self {
		self.bidirectional = true;
		self
	}

	/// Sets the strength.
	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = strength;
		self
	}
}

/// Position of an edge in the store's edge list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "e{}", self.0)
	}
}

/// A named grouping of nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
	/// Unique cluster id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Free text.
	#[serde(default)]
	pub description: String,
	/// Member node ids; unknown ones are dropped at load.
	#[serde(default)]
	pub member_node_ids: Vec<String>,
	/// Layout anchor for members.
	#[serde(default)]
	pub centroid: [f64; 3],
	/// Hex tint.
	#[serde(default)]
	pub color: String,
	/// In [0,1].
	#[serde(default = "default_score")]
	pub importance: f64,
}

/// A precomputed observation about part of the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Insight {
	/// Insight id.
	pub id: String,
	/// Headline.
	pub title: String,
	/// Body text.
	pub description: String,
	/// Nodes the insight is about.
	pub related_node_ids: Vec<String>,
	/// In [0,1].
	pub confidence: f64,
}

/// A complete graph as delivered by the data-fetching layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSnapshot {
	/// Nodes in load order.
	pub nodes: Vec<Node>,
	/// Edges in load order.
	pub edges: Vec<Edge>,
	/// Node groupings.
	pub clusters: Vec<Cluster>,
	/// Precomputed graph-wide numbers, passed through untouched.
	pub metrics: BTreeMap<String, f64>,
	/// Precomputed observations, passed through untouched.
	pub insights: Vec<Insight>,
}

impl GraphSnapshot {
	/// Parses a snapshot from its JSON form.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

/// Clamps a score into [0,1]; non-finite values become 0.
pub fn clamp_unit(value: f64) -> f64 {
	if value.is_finite() {
		value.clamp(0.0, 1.0)
	} else {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_snapshot_from_json() {
		let json = r#"{
			"nodes": [
				{"id": "a", "label": "Auth", "type": "component", "category": "architecture",
				 "importance": 0.9, "properties": {"description": "Login flow"},
				 "metadata": {"author": "kim", "tags": ["security"], "createdAt": "2024-01-02T03:04:05Z"}}
			],
			"edges": [
				{"source": "a", "target": "a", "relationship": "depends_on", "bidirectional": true}
			],
			"metrics": {"density": 0.25}
		}"#;
		let snapshot = GraphSnapshot::from_json(json).unwrap();
		let node = &snapshot.nodes[0];
		assert_eq!(node.node_type, NodeType::Component);
		assert_eq!(node.category, Category::Architecture);
		assert_eq!(node.confidence, 0.5);
		assert_eq!(node.description(), Some("Login flow"));
		assert!(node.metadata.created_at.is_some());
		assert_eq!(snapshot.edges[0].relationship, Relationship::DependsOn);
		assert!(snapshot.edges[0].bidirectional);
		assert!(snapshot.clusters.is_empty());
		assert_eq!(snapshot.metrics.get("density"), Some(&0.25));
	}

	#[test]
	fn test_connection_count_is_not_read_from_input() {
		let json = r#"{"nodes": [
			{"id": "a", "label": "A", "type": "concept", "category": "process", "connectionCount": -1},
			{"id": "b", "label": "B", "type": "concept", "category": "process", "connectionCount": 99}
		]}"#;
		let snapshot = GraphSnapshot::from_json(json).unwrap();
		assert!(snapshot.nodes.iter().all(|n| n.connection_count == 0));
	}

	#[test]
	fn test_snapshot_rejects_unknown_type() {
		let json = r#"{"nodes": [{"id": "a", "label": "A", "type": "widget", "category": "process"}]}"#;
		assert!(GraphSnapshot::from_json(json).is_err());
	}

	#[test]
	fn test_matches_term() {
		let mut node = Node::new("n", "Payment Gateway", NodeType::Component, Category::Integration);
		node.properties
			.insert("description".into(), "Talks to Stripe".into());
		node.metadata.tags.insert("Billing".into());
		assert!(node.matches_term("gateway"));
		assert!(node.matches_term("stripe"));
		assert!(node.matches_term("bill"));
		assert!(!node.matches_term("ledger"));
	}

	#[test]
	fn test_clamp_unit() {
		assert_eq!(clamp_unit(1.7), 1.0);
		assert_eq!(clamp_unit(-0.2), 0.0);
		assert_eq!(clamp_unit(f64::NAN), 0.0);
		assert_eq!(clamp_unit(0.3), 0.3);
	}

	#[test]
	fn test_enum_wire_names() {
		for ty in NodeType::ALL {
			let json = serde_json::to_string(&ty).unwrap();
			assert_eq!(json, format!("\"{}\"", ty.as_str()));
		}
		assert_eq!(Relationship::ConflictsWith.to_string(), "conflicts_with");
	}
}
