use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use crate::render::{NodeShape, NodeVisual, RenderMode, VisualState};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Cheap perspective for 3D view models on a flat canvas: nodes further
/// along z shrink.
fn depth_factor(mode: RenderMode, node: &NodeVisual) -> f64 {
	match (mode, node.anchor) {
		(RenderMode::ThreeD, Some([_, _, z])) => 400.0 / (400.0 + z.max(-200.0)),
		_ => 1.0,
	}
}

fn dash_array(dash: &[f64], k: f64) -> js_sys::Array {
	dash.iter().map(|d| JsValue::from_f64(d / k)).collect()
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.positions();
	draw_clusters(state, ctx);
	draw_edges(state, ctx, &positions);
	draw_nodes(state, ctx, &positions);
	ctx.restore();
}

fn draw_clusters(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for cluster in &state.model.clusters {
		let [x, y, _] = cluster.centroid;
		let radius = 40.0 + 10.0 * cluster.visible_members as f64;
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&cluster.color.to_rgba(0.06 + 0.08 * cluster.importance));
		ctx.fill();

		ctx.set_fill_style_str(&cluster.color.to_rgba(0.6));
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		let _ = ctx.fill_text(&cluster.name, x - radius * 0.5, y - radius - 4.0);
	}
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let k = state.transform.k;
	let arrow_size = 8.0 / k;
	let t = ease_out_cubic(state.focus_t);

	for &(src, tgt, i) in state.edges() {
		let edge = &state.model.edges[i];
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&src), positions.get(&tgt)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let r1 = state.visual(src).map_or(0.0, |v| v.size);
		let r2 = state.visual(tgt).map_or(0.0, |v| v.size);

		// dimmed edges fade in with the focus animation
		let alpha = 1.0 - (1.0 - edge.opacity) * t;
		ctx.set_stroke_style_str(&edge.color.to_rgba(0.8 * alpha));
		ctx.set_line_width(edge.width / k);
		let _ = ctx.set_line_dash(&dash_array(edge.dash, k));
		if edge.state == VisualState::OnPath {
			ctx.set_line_dash_offset(-(state.flow_time * 30.0));
		} else {
			ctx.set_line_dash_offset(0.0);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		let head = if edge.arrow { arrow_size } else { 0.0 };
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + head), y2 - uy * (r2 + head));
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if !edge.arrow {
			continue;
		}
		ctx.set_fill_style_str(&edge.color.to_rgba(alpha));
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn polygon(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, sides: usize, rotation: f64) {
	for i in 0..sides {
		let a = rotation + i as f64 * 2.0 * PI / sides as f64;
		let (px, py) = (x + r * a.cos(), y + r * a.sin());
		if i == 0 {
			ctx.move_to(px, py);
		} else {
			ctx.line_to(px, py);
		}
	}
	ctx.close_path();
}

fn trace_shape(ctx: &CanvasRenderingContext2d, shape: NodeShape, x: f64, y: f64, r: f64) {
	ctx.begin_path();
	match shape {
		NodeShape::Circle => {
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		}
		NodeShape::Square => ctx.rect(x - r * 0.85, y - r * 0.85, r * 1.7, r * 1.7),
		NodeShape::Rectangle => ctx.rect(x - r, y - r * 0.7, r * 2.0, r * 1.4),
		NodeShape::Diamond => polygon(ctx, x, y, r * 1.15, 4, 0.0),
		NodeShape::Triangle => polygon(ctx, x, y, r * 1.2, 3, -PI / 2.0),
		NodeShape::Pentagon => polygon(ctx, x, y, r * 1.05, 5, -PI / 2.0),
		NodeShape::Hexagon => polygon(ctx, x, y, r * 1.05, 6, 0.0),
		NodeShape::Star => {
			for i in 0..10 {
				let a = -PI / 2.0 + i as f64 * PI / 5.0;
				let radius = if i % 2 == 0 { r * 1.25 } else { r * 0.55 };
				let (px, py) = (x + radius * a.cos(), y + radius * a.sin());
				if i == 0 {
					ctx.move_to(px, py);
				} else {
					ctx.line_to(px, py);
				}
			}
			ctx.close_path();
		}
	}
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let (t, k) = (ease_out_cubic(state.focus_t), state.transform.k);

	// default nodes first so emphasised ones paint on top
	for emphasised in [false, true] {
		for (&idx, &(x, y)) in positions {
			let Some(node) = state.visual(idx) else {
				continue;
			};
			if (node.state != VisualState::Default) != emphasised {
				continue;
			}
			draw_node(ctx, node, x, y, t, k, state.model.mode);
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeVisual,
	x: f64,
	y: f64,
	t: f64,
	k: f64,
	mode: RenderMode,
) {
	let alpha = 1.0 - (1.0 - node.opacity) * t;
	let radius = node.size * depth_factor(mode, node);

	if node.state == VisualState::Selected && t > 0.01 {
		let glow_radius = radius * (1.8 + 1.2 * t);
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * t));
			let _ = gradient.add_color_stop(0.6, &node.color.to_rgba(0.1 * t));
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.set_global_alpha(alpha);
	trace_shape(ctx, node.shape, x, y, radius);
	ctx.set_fill_style_str(&node.color.to_hex());
	ctx.fill();

	// confidence ring, clockwise from twelve o'clock
	if node.confidence_ring > 0.0 {
		let start = -PI / 2.0;
		ctx.begin_path();
		let _ = ctx.arc(
			x,
			y,
			radius + 2.5 / k,
			start,
			start + 2.0 * PI * node.confidence_ring,
		);
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_line_width(1.2 / k);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	let label_alpha = if node.state == VisualState::Default {
		alpha * 0.8
	} else {
		1.0
	};
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", label_alpha));
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(&node.label, x + radius + 4.0, y + 3.0);
}
