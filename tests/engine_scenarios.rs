use std::collections::BTreeSet;
use std::sync::Arc;

use knowledge_graph_explorer::graph::{
	Category, Edge, EdgeId, FilterEngine, FilterSpec, FilteredGraph, GraphDataStore, GraphSnapshot,
	GraphView, Node, NodeType, Relationship, highlight, shortest_path,
};
use knowledge_graph_explorer::render::VisualState;
use knowledge_graph_explorer::{ExplorerConfig, GraphError, InteractionController, RenderMode};

const SAMPLE: &str = include_str!("../assets/sample_graph.json");

fn node(id: &str, node_type: NodeType) -> Node {
	Node::new(id, id, node_type, Category::Architecture)
}

/// A -> B directed, B <-> C bidirectional.
fn chain() -> Arc<GraphDataStore> {
	Arc::new(GraphDataStore::load(
		vec![
			node("A", NodeType::Concept),
			node("B", NodeType::Concept),
			node("C", NodeType::Concept),
		],
		vec![
			Edge::new("A", "B", Relationship::DependsOn),
			Edge::new("B", "C", Relationship::RelatesTo)
				.bidirectional()
				.with_strength(0.5),
		],
		vec![],
	))
}

#[test]
fn test_directed_chain_paths() {
	let graph = FilteredGraph::unfiltered(chain());
	assert_eq!(shortest_path(&graph, "A", "C"), vec!["A", "B", "C"]);
	assert!(shortest_path(&graph, "C", "A").is_empty());
	assert_eq!(shortest_path(&graph, "C", "B"), vec!["C", "B"]);
}

#[test]
fn test_directed_chain_highlight() {
	let graph = FilteredGraph::unfiltered(chain());
	let set = highlight(&graph, "B");
	assert_eq!(
		set.nodes,
		BTreeSet::from(["A".to_string(), "B".to_string(), "C".to_string()])
	);
	assert_eq!(set.edges, BTreeSet::from([EdgeId(0), EdgeId(1)]));
}

#[test]
fn test_type_filter_isolates_concepts() {
	let store = Arc::new(GraphDataStore::load(
		vec![
			node("c1", NodeType::Concept),
			node("c2", NodeType::Concept),
			node("r1", NodeType::Requirement),
			node("d1", NodeType::Decision),
			node("p1", NodeType::Person),
		],
		vec![
			Edge::new("c1", "c2", Relationship::RelatesTo),
			Edge::new("c1", "r1", Relationship::Implements),
			Edge::new("d1", "c2", Relationship::Influences),
			Edge::new("p1", "r1", Relationship::RelatesTo),
		],
		vec![],
	));

	let spec = FilterSpec::default().with_types([NodeType::Concept]);
	let filtered = FilterEngine::apply(&store, &spec);
	assert_eq!(filtered.node_ids(), vec!["c1", "c2"]);
	assert_eq!(filtered.edge_ids(), vec![EdgeId(0)]);
	assert!(!filtered.contains_node("r1"));
}

#[test]
fn test_sample_snapshot_loads_cleanly() {
	let snapshot = GraphSnapshot::from_json(SAMPLE).unwrap();
	let store = GraphDataStore::from_snapshot(snapshot);
	assert!(store.integrity_issues().is_empty());
	assert_eq!(store.node_count(), 14);
	assert_eq!(store.edge_count(), 16);
	assert_eq!(store.clusters().len(), 2);
	assert_eq!(store.insights().len(), 1);
	assert!(store.metrics().contains_key("density"));
}

#[test]
fn test_sample_path_through_gateway() {
	let store = Arc::new(GraphDataStore::from_snapshot(
		GraphSnapshot::from_json(SAMPLE).unwrap(),
	));
	let graph = FilteredGraph::unfiltered(Arc::clone(&store));
	// the skew issue reaches the SSO requirement only via the gateway
	assert_eq!(
		shortest_path(&graph, "sol-leeway", "req-sso"),
		vec!["sol-leeway", "iss-clock", "cmp-gateway", "req-sso"]
	);

	let no_issues = FilterEngine::apply(
		&store,
		&FilterSpec::default().with_types(
			NodeType::ALL
				.into_iter()
				.filter(|t| *t != NodeType::Issue),
		),
	);
	assert!(shortest_path(&no_issues, "sol-leeway", "req-sso").is_empty());
}

#[test]
fn test_controller_session_over_sample() {
	let store = GraphDataStore::from_snapshot(GraphSnapshot::from_json(SAMPLE).unwrap());
	let mut ctl = InteractionController::new(Arc::new(store), &ExplorerConfig::default());

	ctl.select_node("cmp-gateway").unwrap();
	let model = ctl.view_model();
	assert!(model.focus_active);
	assert_eq!(
		model.node("cmp-gateway").map(|n| n.state),
		Some(VisualState::Selected)
	);
	assert_eq!(
		model.node("req-sso").map(|n| n.state),
		Some(VisualState::Highlighted)
	);

	let state = ctl.request_path("req-sso").unwrap();
	assert_eq!(state.selection.name(), "path highlighted");
	let on_path = ctl.view_model();
	assert_eq!(
		on_path.node("req-sso").map(|n| n.state),
		Some(VisualState::OnPath)
	);

	// compliance nodes are unreachable from the gateway
	let state = ctl.request_path("req-audit").unwrap();
	assert!(state.selection.path().is_some_and(|p| p.is_empty()));

	ctl.set_render_mode(RenderMode::ThreeD);
	assert_eq!(ctl.view_model().mode, RenderMode::ThreeD);

	ctl.undo().unwrap();
	assert_eq!(ctl.state().mode, RenderMode::TwoD);

	assert!(matches!(
		ctl.select_node("missing"),
		Err(GraphError::UnknownNode(_))
	));
}
