use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::render::{NodeVisual, ViewModel};

/// Extra world-space slack around a node when hit testing.
pub const HIT_PADDING: f64 = 4.0;
/// Screen pixels a pointer may travel before a press stops being a click.
const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Canvas-side state: physics layout plus the latest view model.
///
/// The layout is rebuilt only when the set of visible nodes or edges
/// changes; surviving nodes keep their positions.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub model: ViewModel,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	/// Eased 0..1 progress of the focus dimming.
	pub focus_t: f64,
	node_visual: HashMap<DefaultNodeIdx, usize>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx, usize)>,
}

fn simulation() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

fn same_topology(a: &ViewModel, b: &ViewModel) -> bool {
	a.nodes.len() == b.nodes.len()
		&& a.edges.len() == b.edges.len()
		&& a.nodes.iter().zip(&b.nodes).all(|(x, y)| x.id == y.id)
		&& a.edges.iter().zip(&b.edges).all(|(x, y)| x.id == y.id)
}

impl ForceGraphState {
	pub fn new(model: ViewModel, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(simulation()),
			model,
			node_visual: HashMap::new(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			focus_t: 0.0,
		};
		state.rebuild(HashMap::new());
		state
	}

	/// Adopts a new view model, rebuilding the layout if the topology moved.
	pub fn sync(&mut self, model: ViewModel) {
		if same_topology(&self.model, &model) {
			self.model = model;
			return;
		}
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});
		self.model = model;
		self.rebuild(previous);
	}

	fn rebuild(&mut self, previous: HashMap<String, (f32, f32, bool)>) {
		let mut graph = ForceGraph::new(simulation());
		let mut id_to_idx = HashMap::new();
		self.node_visual.clear();
		self.edges.clear();

		let count = self.model.nodes.len().max(1) as f64;
		for (i, node) in self.model.nodes.iter().enumerate() {
			let (x, y, is_anchor) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count;
				let (cx, cy, radius) = match node.anchor {
					Some([ax, ay, _]) => (ax, ay, 20.0),
					None => (0.0, 0.0, 100.0),
				};
				(
					(cx + radius * angle.cos()) as f32,
					(cy + radius * angle.sin()) as f32,
					false,
				)
			});
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			self.node_visual.insert(idx, i);
		}

		for (i, edge) in self.model.edges.iter().enumerate() {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push((src, tgt, i));
			}
		}
		self.graph = graph;
	}

	pub fn visual(&self, idx: DefaultNodeIdx) -> Option<&NodeVisual> {
		self.node_visual.get(&idx).map(|&i| &self.model.nodes[i])
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		self.visual(idx).map(|v| v.id.clone())
	}

	/// `(source, target, index into model.edges)` for every laid-out edge.
	pub fn edges(&self) -> &[(DefaultNodeIdx, DefaultNodeIdx, usize)] {
		&self.edges
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::with_capacity(self.node_visual.len());
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let radius = self.visual(node.index()).map_or(0.0, |v| v.size) + HIT_PADDING;
			// hit radius is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// True once the pointer has left the click slop around the press.
	pub fn exceeds_slop(start_x: f64, start_y: f64, x: f64, y: f64) -> bool {
		(x - start_x).hypot(y - start_y) > CLICK_SLOP
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, speed) = if self.model.focus_active {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.focus_t += (target - self.focus_t) * speed * dt as f64;
		if target == 0.0 && self.focus_t < 0.01 {
			self.focus_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::config::ExplorerConfig;
	use crate::graph::{Category, Edge, EdgeId, GraphDataStore, Node, NodeType, Relationship};
	use crate::interaction::InteractionController;

	fn controller() -> InteractionController {
		let store = GraphDataStore::load(
			vec![
				Node::new("a", "A", NodeType::Concept, Category::Process),
				Node::new("b", "B", NodeType::Decision, Category::Process),
			],
			vec![Edge::new("a", "b", Relationship::RelatesTo)],
			vec![],
		);
		InteractionController::new(Arc::new(store), &ExplorerConfig::default())
	}

	#[test]
	fn test_layout_follows_view_model() {
		let mut ctl = controller();
		let mut state = ForceGraphState::new(ctl.view_model(), 800.0, 600.0);
		assert_eq!(state.positions().len(), 2);
		assert_eq!(state.edges().len(), 1);
		assert_eq!(state.model.edges[state.edges()[0].2].id, EdgeId(0));

		ctl.set_filter(crate::graph::FilterSpec::default().with_types([NodeType::Concept]));
		state.sync(ctl.view_model());
		assert_eq!(state.positions().len(), 1);
		assert!(state.edges().is_empty());
	}

	#[test]
	fn test_restyle_keeps_layout() {
		let mut ctl = controller();
		let mut state = ForceGraphState::new(ctl.view_model(), 800.0, 600.0);
		let before = state.positions();
		ctl.select_node("a").unwrap();
		state.sync(ctl.view_model());
		assert_eq!(state.positions(), before);
		assert!(state.model.focus_active);
	}

	#[test]
	fn test_click_slop() {
		assert!(!ForceGraphState::exceeds_slop(0.0, 0.0, 2.0, 2.0));
		assert!(ForceGraphState::exceeds_slop(0.0, 0.0, 3.0, 3.0));
	}
}
