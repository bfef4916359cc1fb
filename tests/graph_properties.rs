use std::collections::VecDeque;
use std::sync::Arc;

use knowledge_graph_explorer::graph::{
	Category, Edge, FilterEngine, FilterSpec, FilteredGraph, GraphDataStore, GraphView, Node,
	NodeType, Relationship, highlight, shortest_path_with_edges,
};
use proptest::prelude::*;

const TERMS: [&str; 4] = ["", "alpha", "n1", "zzz"];

fn arb_store() -> impl Strategy<Value = GraphDataStore> {
	(1usize..10).prop_flat_map(|n| {
		let nodes = prop::collection::vec((0..NodeType::ALL.len(), 0.0f64..=1.0, any::<bool>()), n);
		let edges = prop::collection::vec(
			(0..n, 0..n, any::<bool>(), 0..Relationship::ALL.len()),
			0..20,
		);
		(nodes, edges).prop_map(|(nodes, edges)| {
			let nodes = nodes
				.into_iter()
				.enumerate()
				.map(|(i, (t, importance, alpha))| {
					let label = if alpha { format!("alpha {i}") } else { format!("n{i}") };
					let mut node = Node::new(format!("n{i}"), label, NodeType::ALL[t], Category::Process);
					node.importance = importance;
					node
				})
				.collect();
			let edges = edges
				.into_iter()
				.map(|(s, t, both, r)| {
					let edge = Edge::new(format!("n{s}"), format!("n{t}"), Relationship::ALL[r]);
					if both { edge.bidirectional() } else { edge }
				})
				.collect();
			GraphDataStore::load(nodes, edges, vec![])
		})
	})
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
	(
		prop::sample::select(TERMS.to_vec()),
		prop::sample::subsequence(NodeType::ALL.to_vec(), 0..=3),
		prop::sample::subsequence(Relationship::ALL.to_vec(), 0..=2),
		-0.5f64..1.5,
		-0.5f64..1.5,
	)
		.prop_map(|(term, types, relationships, lo, hi)| {
			FilterSpec::default()
				.with_search(term)
				.with_types(types)
				.with_relationships(relationships)
				.with_importance(lo, hi)
		})
}

/// Hop distance by plain BFS over the visible edge list.
fn bfs_distance(graph: &FilteredGraph, from: usize, to: usize) -> Option<usize> {
	let store = graph.store();
	let mut dist = vec![None; store.node_count()];
	let mut queue = VecDeque::from([from]);
	dist[from] = Some(0);
	while let Some(current) = queue.pop_front() {
		let d = dist[current]?;
		for (id, edge) in graph.visible_edges() {
			let (src, tgt) = store.endpoints(id);
			let next = if src == current {
				tgt
			} else if tgt == current && edge.bidirectional {
				src
			} else {
				continue;
			};
			if dist[next].is_none() {
				dist[next] = Some(d + 1);
				queue.push_back(next);
			}
		}
	}
	dist[to]
}

proptest! {
	#[test]
	fn filter_never_fabricates(store in arb_store(), spec in arb_spec()) {
		let store = Arc::new(store);
		let filtered = FilterEngine::apply(&store, &spec);
		for id in filtered.node_ids() {
			prop_assert!(store.node(id).is_some());
		}
		for id in filtered.edge_ids() {
			prop_assert!(store.edge(id).is_some());
		}
	}

	#[test]
	fn filter_leaves_no_dangling_edges(store in arb_store(), spec in arb_spec()) {
		let filtered = FilterEngine::apply(&Arc::new(store), &spec);
		for (_, edge) in filtered.visible_edges() {
			prop_assert!(filtered.contains_node(&edge.source));
			prop_assert!(filtered.contains_node(&edge.target));
		}
	}

	#[test]
	fn filter_is_idempotent(store in arb_store(), spec in arb_spec()) {
		let store = Arc::new(store);
		let once = FilterEngine::apply(&store, &spec);
		let twice = FilterEngine::apply(&store, &spec);
		prop_assert_eq!(&once, &twice);
		prop_assert_eq!(once.node_ids(), twice.node_ids());
	}

	#[test]
	fn path_to_self_is_single_node(store in arb_store(), pick in any::<prop::sample::Index>()) {
		let graph = FilteredGraph::unfiltered(Arc::new(store));
		let id = graph.store().nodes()[pick.index(graph.store().node_count())].id.clone();
		let path = shortest_path_with_edges(&graph, &id, &id);
		prop_assert_eq!(path.nodes, vec![id]);
		prop_assert!(path.edges.is_empty());
	}

	#[test]
	fn path_length_matches_bfs_distance(
		store in arb_store(),
		spec in arb_spec(),
		a in any::<prop::sample::Index>(),
		b in any::<prop::sample::Index>(),
	) {
		let graph = FilterEngine::apply(&Arc::new(store), &spec);
		let store = graph.store();
		let (from, to) = (a.index(store.node_count()), b.index(store.node_count()));
		let (from_id, to_id) = (store.node_at(from).id.clone(), store.node_at(to).id.clone());
		let path = shortest_path_with_edges(&graph, &from_id, &to_id);

		if !graph.contains_node_at(from) || !graph.contains_node_at(to) {
			prop_assert!(path.is_empty());
			return Ok(());
		}
		match bfs_distance(&graph, from, to) {
			None => prop_assert!(path.is_empty()),
			Some(hops) => {
				prop_assert_eq!(path.len(), hops);
				prop_assert_eq!(path.nodes.len(), hops + 1);
				prop_assert_eq!(path.nodes.first(), Some(&from_id));
				prop_assert_eq!(path.nodes.last(), Some(&to_id));
				for (step, id) in path.edges.iter().enumerate() {
					prop_assert!(graph.contains_edge(*id));
					let edge = store.edge(*id).unwrap();
					let (here, there) = (&path.nodes[step], &path.nodes[step + 1]);
					let forward = &edge.source == here && &edge.target == there;
					let backward = edge.bidirectional && &edge.target == here && &edge.source == there;
					prop_assert!(forward || backward);
				}
			}
		}
	}

	#[test]
	fn highlight_contains_focal_node(
		store in arb_store(),
		spec in arb_spec(),
		pick in any::<prop::sample::Index>(),
	) {
		let graph = FilterEngine::apply(&Arc::new(store), &spec);
		let idx = pick.index(graph.store().node_count());
		let id = graph.store().node_at(idx).id.clone();
		let set = highlight(&graph, &id);
		if graph.contains_node_at(idx) {
			prop_assert!(set.contains_node(&id));
			for node in &set.nodes {
				prop_assert!(graph.contains_node(node));
			}
		} else {
			prop_assert!(set.is_empty());
		}
	}
}
