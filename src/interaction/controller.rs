use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, info};

use super::{Selection, ViewState};
use crate::config::ExplorerConfig;
use crate::error::{GraphError, Result};
use crate::graph::{
	FilterEngine, FilterSpec, FilteredGraph, GraphDataStore, GraphSnapshot, GraphView,
	HighlightSet, PathResult, highlight, shortest_path_with_edges,
};
use crate::render::{RenderAdapter, RenderMode, ViewModel, VisualResolver};

/// Ticket for an in-flight snapshot fetch. Only the most recently issued
/// ticket is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotRequest(u64);

/// Owns the current [`ViewState`] and moves it through
/// `Idle -> NodeSelected -> PathHighlighted` in response to commands.
///
/// Every successful command swaps in a fresh `Arc<ViewState>`; a failed
/// command leaves the current one in place.
pub struct InteractionController<A: RenderAdapter = VisualResolver> {
	adapter: A,
	current: Arc<ViewState>,
	undo: VecDeque<Arc<ViewState>>,
	redo: Vec<Arc<ViewState>>,
	history_limit: usize,
	next_revision: u64,
	latest_request: u64,
	/// Ticket still waiting for its snapshot; cleared once one is accepted.
	pending_request: Option<u64>,
}

impl InteractionController<VisualResolver> {
	/// Controller with the built-in resolver, configured from `config`.
	pub fn new(store: Arc<GraphDataStore>, config: &ExplorerConfig) -> Self {
		Self::with_adapter(
			store,
			VisualResolver::new(&config.visual),
			config.interaction.history_limit,
		)
	}
}

impl<A: RenderAdapter> InteractionController<A> {
	/// Controller over `store`, starting `Idle` and unfiltered in 2D.
	pub fn with_adapter(store: Arc<GraphDataStore>, adapter: A, history_limit: usize) -> Self {
		Self {
			adapter,
			current: Arc::new(ViewState {
				revision: 0,
				selection: Selection::Idle,
				highlight: HighlightSet::default(),
				graph: FilteredGraph::unfiltered(store),
				mode: RenderMode::default(),
			}),
			undo: VecDeque::new(),
			redo: Vec::new(),
			history_limit,
			next_revision: 1,
			latest_request: 0,
			pending_request: None,
		}
	}

	/// The current view state.
	pub fn state(&self) -> &Arc<ViewState> {
		&self.current
	}

	/// The loaded store.
	pub fn store(&self) -> &Arc<GraphDataStore> {
		self.current.graph.store_handle()
	}

	/// The selected node, if any.
	pub fn selected_node(&self) -> Option<&str> {
		self.current.selection.selected_node()
	}

	/// The current highlight.
	pub fn highlight_state(&self) -> &HighlightSet {
		&self.current.highlight
	}

	/// The current path, if one is shown.
	pub fn path_state(&self) -> Option<&PathResult> {
		self.current.selection.path()
	}

	/// Resolves the current state through the render adapter.
	pub fn view_model(&self) -> ViewModel {
		self.adapter
			.translate(&self.current.graph, &self.current, self.current.mode)
	}

	/// True when [`Self::undo`] would succeed.
	pub fn can_undo(&self) -> bool {
		!self.undo.is_empty()
	}

	/// True when [`Self::redo`] would succeed.
	pub fn can_redo(&self) -> bool {
		!self.redo.is_empty()
	}

	/// Selects a visible node and highlights its neighbourhood.
	pub fn select_node(&mut self, id: &str) -> Result<Arc<ViewState>> {
		self.ensure_visible(id)?;
		let graph = self.current.graph.clone();
		Ok(self.commit(ViewState {
			revision: 0,
			highlight: highlight(&graph, id),
			selection: Selection::NodeSelected {
				node_id: id.to_string(),
			},
			graph,
			mode: self.current.mode,
		}))
	}

	/// Back to `Idle`. A no-op when already idle.
	pub fn clear_selection(&mut self) -> Arc<ViewState> {
		if self.current.selection.is_idle() {
			return Arc::clone(&self.current);
		}
		let graph = self.current.graph.clone();
		self.commit(ViewState {
			revision: 0,
			selection: Selection::Idle,
			highlight: HighlightSet::default(),
			graph,
			mode: self.current.mode,
		})
	}

	/// Shortest path from the selected node to `target_id`. Rejected while
	/// idle. An unreachable target still transitions, with an empty path.
	pub fn request_path(&mut self, target_id: &str) -> Result<Arc<ViewState>> {
		let Some(source_id) = self.current.selection.selected_node().map(str::to_owned) else {
			return Err(GraphError::InvalidTransition {
				command: "request a path",
				state: self.current.selection.name(),
			});
		};
		self.ensure_visible(target_id)?;
		let graph = self.current.graph.clone();
		Ok(self.commit(Self::path_state_for(
			graph,
			source_id,
			target_id.to_string(),
			self.current.mode,
		)))
	}

	/// Selects `source_id` and requests the path to `target_id` as a single
	/// transition, from any state.
	pub fn find_path(&mut self, source_id: &str, target_id: &str) -> Result<Arc<ViewState>> {
		self.ensure_visible(source_id)?;
		self.ensure_visible(target_id)?;
		let graph = self.current.graph.clone();
		Ok(self.commit(Self::path_state_for(
			graph,
			source_id.to_string(),
			target_id.to_string(),
			self.current.mode,
		)))
	}

	/// Re-filters the graph. A selection whose node(s) no longer pass the
	/// filter falls back to `Idle`; a surviving one is recomputed on the
	/// new subgraph.
	pub fn set_filter(&mut self, spec: FilterSpec) -> Arc<ViewState> {
		let graph = FilterEngine::apply(self.store(), &spec);
		let mode = self.current.mode;
		let next = match &self.current.selection {
			Selection::NodeSelected { node_id } if graph.contains_node(node_id) => ViewState {
				revision: 0,
				highlight: highlight(&graph, node_id),
				selection: Selection::NodeSelected {
					node_id: node_id.clone(),
				},
				graph,
				mode,
			},
			Selection::PathHighlighted {
				source_id,
				target_id,
				..
			} if graph.contains_node(source_id) && graph.contains_node(target_id) => {
				Self::path_state_for(graph, source_id.clone(), target_id.clone(), mode)
			}
			previous => {
				if !previous.is_idle() {
					info!("Selection filtered out, returning to idle");
				}
				ViewState {
					revision: 0,
					selection: Selection::Idle,
					highlight: HighlightSet::default(),
					graph,
					mode,
				}
			}
		};
		self.commit(next)
	}

	/// Switches between 2D and 3D. A no-op when the mode is unchanged.
	pub fn set_render_mode(&mut self, mode: RenderMode) -> Arc<ViewState> {
		if self.current.mode == mode {
			return Arc::clone(&self.current);
		}
		let mut next = ViewState::clone(&self.current);
		next.mode = mode;
		self.commit(next)
	}

	/// Steps back to the previous view state.
	pub fn undo(&mut self) -> Result<Arc<ViewState>> {
		let previous = self.undo.pop_back().ok_or(GraphError::NothingToUndo)?;
		let replaced = std::mem::replace(&mut self.current, previous);
		self.redo.push(replaced);
		debug!("Undo to revision {}", self.current.revision);
		Ok(Arc::clone(&self.current))
	}

	/// Re-applies the last undone view state.
	pub fn redo(&mut self) -> Result<Arc<ViewState>> {
		let next = self.redo.pop().ok_or(GraphError::NothingToRedo)?;
		let replaced = std::mem::replace(&mut self.current, next);
		self.undo.push_back(replaced);
		debug!("Redo to revision {}", self.current.revision);
		Ok(Arc::clone(&self.current))
	}

	/// Replaces the graph wholesale. The filter and render mode carry over;
	/// selection resets to `Idle` and history is dropped.
	pub fn load_store(&mut self, store: Arc<GraphDataStore>) -> Arc<ViewState> {
		let graph = FilterEngine::apply(&store, self.current.filter());
		self.undo.clear();
		self.redo.clear();
		let state = Arc::new(ViewState {
			revision: self.bump_revision(),
			selection: Selection::Idle,
			highlight: HighlightSet::default(),
			graph,
			mode: self.current.mode,
		});
		info!(
			"Snapshot swapped in at revision {} ({} nodes visible)",
			state.revision,
			state.graph.node_count()
		);
		self.current = Arc::clone(&state);
		state
	}

	/// [`Self::load_store`] for a raw snapshot, loaded leniently.
	pub fn load_snapshot(&mut self, snapshot: GraphSnapshot) -> Arc<ViewState> {
		self.load_store(Arc::new(GraphDataStore::from_snapshot(snapshot)))
	}

	/// Issues a ticket for a new fetch, superseding any earlier one.
	pub fn begin_snapshot_request(&mut self) -> SnapshotRequest {
		self.latest_request += 1;
		self.pending_request = Some(self.latest_request);
		SnapshotRequest(self.latest_request)
	}

	/// Loads `snapshot` if `request` is the latest ticket and nothing was
	/// delivered for it yet. Returns the new state, or `None` when the
	/// delivery was stale or repeated and ignored.
	pub fn accept_snapshot(
		&mut self,
		request: SnapshotRequest,
		snapshot: GraphSnapshot,
	) -> Option<Arc<ViewState>> {
		if self.pending_request != Some(request.0) {
			debug!(
				"Ignoring snapshot for request {} (latest is {}, pending: {})",
				request.0,
				self.latest_request,
				self.pending_request.is_some()
			);
			return None;
		}
		self.pending_request = None;
		Some(self.load_snapshot(snapshot))
	}

	fn ensure_visible(&self, id: &str) -> Result<()> {
		let graph = &self.current.graph;
		if graph.store().node_index(id).is_none() {
			return Err(GraphError::UnknownNode(id.to_string()));
		}
		if !graph.contains_node(id) {
			return Err(GraphError::NodeFilteredOut(id.to_string()));
		}
		Ok(())
	}

	fn path_state_for(
		graph: FilteredGraph,
		source_id: String,
		target_id: String,
		mode: RenderMode,
	) -> ViewState {
		let path = shortest_path_with_edges(&graph, &source_id, &target_id);
		ViewState {
			revision: 0,
			highlight: highlight(&graph, &source_id),
			selection: Selection::PathHighlighted {
				source_id,
				target_id,
				path,
			},
			graph,
			mode,
		}
	}

	fn bump_revision(&mut self) -> u64 {
		let revision = self.next_revision;
		self.next_revision += 1;
		revision
	}

	fn commit(&mut self, mut next: ViewState) -> Arc<ViewState> {
		next.revision = self.bump_revision();
		info!(
			"View state {} -> {}: {} -> {}",
			self.current.revision,
			next.revision,
			self.current.selection.name(),
			next.selection.name()
		);
		let next = Arc::new(next);
		let previous = std::mem::replace(&mut self.current, Arc::clone(&next));
		if self.history_limit > 0 {
			self.undo.push_back(previous);
			while self.undo.len() > self.history_limit {
				self.undo.pop_front();
			}
		}
		self.redo.clear();
		next
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::graph::{Category, Edge, EdgeId, Node, NodeType, Relationship};

	fn controller() -> InteractionController {
		let mut person = Node::new("d", "Dana", NodeType::Person, Category::Process);
		person.importance = 0.1;
		let store = GraphDataStore::load(
			vec![
				Node::new("a", "Alpha", NodeType::Concept, Category::Architecture),
				Node::new("b", "Beta", NodeType::Concept, Category::Architecture),
				Node::new("c", "Gamma", NodeType::Component, Category::Development),
				person,
			],
			vec![
				Edge::new("a", "b", Relationship::DependsOn),
				Edge::new("b", "c", Relationship::RelatesTo).bidirectional(),
				Edge::new("d", "a", Relationship::Influences),
			],
			vec![],
		);
		InteractionController::new(Arc::new(store), &ExplorerConfig::default())
	}

	#[test]
	fn test_starts_idle() {
		let ctl = controller();
		assert!(ctl.state().selection.is_idle());
		assert!(ctl.highlight_state().is_empty());
		assert_eq!(ctl.state().graph.node_count(), 4);
		assert!(!ctl.can_undo());
	}

	#[test]
	fn test_select_and_reselect() {
		let mut ctl = controller();
		let first = ctl.select_node("a").unwrap();
		assert_eq!(first.selection.selected_node(), Some("a"));
		assert_eq!(first.highlight.nodes.len(), 3);

		let second = ctl.select_node("c").unwrap();
		assert_eq!(ctl.selected_node(), Some("c"));
		assert_eq!(second.highlight.edges, BTreeSet::from([EdgeId(1)]));
		// the earlier state object is untouched
		assert_eq!(first.selection.selected_node(), Some("a"));
		assert!(second.revision > first.revision);
	}

	#[test]
	fn test_select_unknown_keeps_state() {
		let mut ctl = controller();
		let before = Arc::clone(ctl.state());
		let err = ctl.select_node("zz").unwrap_err();
		assert!(matches!(err, GraphError::UnknownNode(ref id) if id == "zz"));
		assert!(Arc::ptr_eq(&before, ctl.state()));
	}

	#[test]
	fn test_request_path_from_idle_is_rejected() {
		let mut ctl = controller();
		let err = ctl.request_path("c").unwrap_err();
		assert!(matches!(err, GraphError::InvalidTransition { state: "idle", .. }));
	}

	#[test]
	fn test_request_path() {
		let mut ctl = controller();
		ctl.select_node("d").unwrap();
		let state = ctl.request_path("c").unwrap();
		let path = state.selection.path().unwrap();
		assert_eq!(path.nodes, vec!["d", "a", "b", "c"]);
		assert_eq!(path.edges, vec![EdgeId(2), EdgeId(0), EdgeId(1)]);
		assert_eq!(ctl.selected_node(), Some("d"));
	}

	#[test]
	fn test_unreachable_path_is_empty_not_error() {
		let mut ctl = controller();
		ctl.select_node("c").unwrap();
		let state = ctl.request_path("d").unwrap();
		assert!(matches!(
			&state.selection,
			Selection::PathHighlighted { path, .. } if path.is_empty()
		));
	}

	#[test]
	fn test_find_path_from_idle() {
		let mut ctl = controller();
		let state = ctl.find_path("a", "c").unwrap();
		assert_eq!(ctl.path_state().unwrap().nodes, vec!["a", "b", "c"]);
		assert_eq!(state.selection.selected_node(), Some("a"));
	}

	#[test]
	fn test_clear_selection() {
		let mut ctl = controller();
		let idle = ctl.clear_selection();
		assert!(Arc::ptr_eq(&idle, ctl.state()));
		ctl.find_path("a", "c").unwrap();
		let cleared = ctl.clear_selection();
		assert!(cleared.selection.is_idle());
		assert!(cleared.highlight.is_empty());
	}

	#[test]
	fn test_filter_drops_hidden_selection() {
		let mut ctl = controller();
		ctl.select_node("c").unwrap();
		let state = ctl.set_filter(FilterSpec::default().with_types([NodeType::Concept]));
		assert!(state.selection.is_idle());
		assert_eq!(state.graph.node_count(), 2);
		assert!(matches!(
			ctl.select_node("c"),
			Err(GraphError::NodeFilteredOut(_))
		));
	}

	#[test]
	fn test_filter_keeps_and_recomputes_visible_selection() {
		let mut ctl = controller();
		ctl.select_node("a").unwrap();
		let state = ctl.set_filter(FilterSpec::default().with_importance(0.3, 1.0));
		assert_eq!(state.selection.selected_node(), Some("a"));
		assert!(!state.highlight.contains_node("d"));
		assert!(state.highlight.contains_node("b"));
	}

	#[test]
	fn test_filter_recomputes_path() {
		let mut ctl = controller();
		ctl.find_path("a", "c").unwrap();
		let state = ctl.set_filter(
			FilterSpec::default().with_relationships([Relationship::DependsOn]),
		);
		let path = state.selection.path().unwrap();
		assert!(path.is_empty());
	}

	#[test]
	fn test_filter_hiding_path_target_goes_idle() {
		let mut ctl = controller();
		ctl.find_path("a", "c").unwrap();
		let state = ctl.set_filter(FilterSpec::default().with_types([NodeType::Concept]));
		assert!(state.selection.is_idle());
		assert!(state.highlight.is_empty());
		assert!(ctl.path_state().is_none());
	}

	#[test]
	fn test_filter_hiding_path_source_goes_idle() {
		let mut ctl = controller();
		ctl.find_path("a", "c").unwrap();
		let state = ctl.set_filter(FilterSpec::default().with_types([NodeType::Component]));
		assert!(state.selection.is_idle());
		assert!(state.highlight.is_empty());
		assert_eq!(state.graph.node_ids(), vec!["c"]);
		// the path comes back once the filter is undone
		let back = ctl.undo().unwrap();
		assert_eq!(back.selection.path().map(|p| p.len()), Some(2));
	}

	#[test]
	fn test_render_mode() {
		let mut ctl = controller();
		let same = ctl.set_render_mode(RenderMode::TwoD);
		assert_eq!(same.revision, 0);
		let state = ctl.set_render_mode(RenderMode::ThreeD);
		assert_eq!(state.mode, RenderMode::ThreeD);
		assert_eq!(ctl.view_model().mode, RenderMode::ThreeD);
	}

	#[test]
	fn test_undo_redo() {
		let mut ctl = controller();
		assert!(matches!(ctl.undo(), Err(GraphError::NothingToUndo)));
		ctl.select_node("a").unwrap();
		ctl.select_node("b").unwrap();
		let back = ctl.undo().unwrap();
		assert_eq!(back.selection.selected_node(), Some("a"));
		let forward = ctl.redo().unwrap();
		assert_eq!(forward.selection.selected_node(), Some("b"));
		assert!(matches!(ctl.redo(), Err(GraphError::NothingToRedo)));

		ctl.undo().unwrap();
		ctl.clear_selection();
		assert!(!ctl.can_redo());
	}

	#[test]
	fn test_history_limit() {
		let store = Arc::clone(controller().store());
		let mut config = ExplorerConfig::default();
		config.interaction.history_limit = 2;
		let mut ctl = InteractionController::new(store, &config);
		for id in ["a", "b", "c", "d"] {
			ctl.select_node(id).unwrap();
		}
		ctl.undo().unwrap();
		ctl.undo().unwrap();
		assert_eq!(ctl.selected_node(), Some("b"));
		assert!(ctl.undo().is_err());
	}

	#[test]
	fn test_stale_snapshot_is_ignored() {
		let mut ctl = controller();
		ctl.set_filter(FilterSpec::default().with_search("gam"));
		let old = ctl.begin_snapshot_request();
		let new = ctl.begin_snapshot_request();

		let stale = GraphSnapshot {
			nodes: vec![Node::new("x", "Stale", NodeType::Issue, Category::Process)],
			..GraphSnapshot::default()
		};
		assert!(ctl.accept_snapshot(old, stale).is_none());
		assert_eq!(ctl.store().node_count(), 4);

		let fresh = GraphSnapshot {
			nodes: vec![
				Node::new("g", "Gamma ray", NodeType::Concept, Category::Analytics),
				Node::new("h", "Other", NodeType::Concept, Category::Analytics),
			],
			..GraphSnapshot::default()
		};
		let state = ctl.accept_snapshot(new, fresh).unwrap();
		assert!(state.selection.is_idle());
		assert_eq!(state.graph.node_ids(), vec!["g"]);
		assert!(!ctl.can_undo());
	}

	#[test]
	fn test_snapshot_ticket_is_used_once() {
		let mut ctl = controller();
		let request = ctl.begin_snapshot_request();
		let first = GraphSnapshot {
			nodes: vec![Node::new("x", "X", NodeType::Issue, Category::Process)],
			..GraphSnapshot::default()
		};
		assert!(ctl.accept_snapshot(request, first.clone()).is_some());
		let revision = ctl.state().revision;

		assert!(ctl.accept_snapshot(request, first).is_none());
		assert_eq!(ctl.state().revision, revision);
		assert_eq!(ctl.store().node_count(), 1);
	}
}
