use log::warn;

use super::palette::{
	Color, NEUTRAL, category_color, relationship_color, relationship_dash, type_shape,
};
use super::{ClusterVisual, EdgeVisual, NodeVisual, RenderAdapter, RenderMode, ViewModel, VisualState};
use crate::config::VisualConfig;
use crate::graph::{EdgeId, FilteredGraph, GraphView};
use crate::interaction::ViewState;

/// The built-in [`RenderAdapter`]: applies the precedence
/// selected > on-path > highlighted > default to every visible element.
#[derive(Clone, Debug)]
pub struct VisualResolver {
	config: VisualConfig,
	selected: Color,
	path: Color,
	highlight: Color,
}

impl VisualResolver {
	/// Resolver for `config`; unreadable colours fall back to the defaults.
	pub fn new(config: &VisualConfig) -> Self {
		let parse = |hex: &str, fallback: Color| {
			Color::from_hex(hex).unwrap_or_else(|| {
				warn!("Invalid color {hex:?} in visual config, using {fallback}");
				fallback
			})
		};
		let defaults = VisualConfig::default();
		Self {
			selected: parse(
				&config.selected_color,
				Color::from_hex(&defaults.selected_color).unwrap_or(NEUTRAL),
			),
			path: parse(
				&config.path_color,
				Color::from_hex(&defaults.path_color).unwrap_or(NEUTRAL),
			),
			highlight: parse(
				&config.highlight_color,
				Color::from_hex(&defaults.highlight_color).unwrap_or(NEUTRAL),
			),
			config: config.clone(),
		}
	}

	fn node_state(state: &ViewState, id: &str) -> VisualState {
		if state.selection.selected_node() == Some(id) {
			VisualState::Selected
		} else if state
			.selection
			.path()
			.is_some_and(|p| p.nodes.iter().any(|n| n == id))
		{
			VisualState::OnPath
		} else if state.highlight.contains_node(id) {
			VisualState::Highlighted
		} else {
			VisualState::Default
		}
	}

	fn edge_state(state: &ViewState, id: EdgeId) -> VisualState {
		if state.selection.path().is_some_and(|p| p.edges.contains(&id)) {
			VisualState::OnPath
		} else if state.highlight.contains_edge(id) {
			VisualState::Highlighted
		} else {
			VisualState::Default
		}
	}

	fn state_color(&self, visual: VisualState, default: Color) -> Color {
		match visual {
			VisualState::Selected => self.selected,
			VisualState::OnPath => self.path,
			VisualState::Highlighted => self.highlight,
			VisualState::Default => default,
		}
	}

	fn opacity(&self, focus_active: bool, visual: VisualState) -> f64 {
		if focus_active && visual == VisualState::Default {
			self.config.dim_opacity
		} else {
			1.0
		}
	}

	fn project(mode: RenderMode, [x, y, z]: [f64; 3]) -> [f64; 3] {
		match mode {
			RenderMode::TwoD => [x, y, 0.0],
			RenderMode::ThreeD => [x, y, z],
		}
	}
}

impl Default for VisualResolver {
	fn default() -> Self {
		Self::new(&VisualConfig::default())
	}
}

impl RenderAdapter for VisualResolver {
	fn translate(&self, graph: &FilteredGraph, state: &ViewState, mode: RenderMode) -> ViewModel {
		let store = graph.store();
		let cfg = &self.config;
		let focus_active = !state.selection.is_idle();
		let depth = match mode {
			RenderMode::TwoD => 1.0,
			RenderMode::ThreeD => cfg.depth_size_scale,
		};

		let mut nodes = Vec::with_capacity(graph.node_count());
		for (idx, node) in store.nodes().iter().enumerate() {
			if !graph.contains_node_at(idx) {
				continue;
			}
			let visual = Self::node_state(state, &node.id);
			let mut size = cfg.min_node_size + node.importance * (cfg.max_node_size - cfg.min_node_size);
			if visual == VisualState::Selected {
				size *= cfg.emphasis_scale;
			}
			let cluster = store.cluster_of(idx);
			nodes.push(NodeVisual {
				id: node.id.clone(),
				label: node.label.clone(),
				node_type: node.node_type,
				category: node.category,
				state: visual,
				color: self.state_color(visual, category_color(node.category)),
				shape: type_shape(node.node_type),
				size: size * depth,
				confidence_ring: node.confidence,
				opacity: self.opacity(focus_active, visual),
				anchor: cluster.map(|c| Self::project(mode, c.centroid)),
			});
		}

		let edges = graph
			.visible_edges()
			.map(|(id, edge)| {
				let visual = Self::edge_state(state, id);
				let mut width = cfg.base_edge_width + edge.strength * cfg.strength_width_scale;
				if visual != VisualState::Default {
					width *= cfg.emphasis_scale;
				}
				EdgeVisual {
					id,
					source: edge.source.clone(),
					target: edge.target.clone(),
					relationship: edge.relationship,
					state: visual,
					color: self.state_color(visual, relationship_color(edge.relationship)),
					width,
					dash: relationship_dash(edge.relationship),
					arrow: !edge.bidirectional,
					opacity: self.opacity(focus_active, visual),
				}
			})
			.collect();

		let clusters = store
			.clusters()
			.iter()
			.filter_map(|c| {
				let visible_members = c
					.member_node_ids
					.iter()
					.filter(|m| graph.contains_node(m))
					.count();
				(visible_members > 0).then(|| ClusterVisual {
					id: c.id.clone(),
					name: c.name.clone(),
					color: Color::from_hex(&c.color).unwrap_or(NEUTRAL),
					centroid: Self::project(mode, c.centroid),
					visible_members,
					importance: c.importance,
				})
			})
			.collect();

		ViewModel {
			mode,
			revision: state.revision,
			focus_active,
			nodes,
			edges,
			clusters,
		}
	}
}
