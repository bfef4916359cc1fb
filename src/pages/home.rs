use std::sync::Arc;

use leptos::prelude::*;
use log::{error, warn};

use crate::components::force_graph::{CanvasEvent, ForceGraphCanvas};
use crate::config::ExplorerConfig;
use crate::graph::{GraphDataStore, GraphSnapshot, NodeType};
use crate::interaction::InteractionController;

const SAMPLE_SNAPSHOT: &str = include_str!("../../assets/sample_graph.json");
const EXPLORER_CONFIG: &str = include_str!("../../assets/explorer.toml");

fn load_config() -> ExplorerConfig {
	ExplorerConfig::from_toml_str(EXPLORER_CONFIG).unwrap_or_else(|err| {
		warn!("Falling back to default explorer config: {err}");
		ExplorerConfig::default()
	})
}

/// Routes canvas clicks to controller commands: click selects, shift-click
/// asks for a path from the current selection, background clears.
fn handle_canvas_event(controller: &mut InteractionController, event: CanvasEvent) {
	let outcome = match event {
		CanvasEvent::NodeClicked { id, extend: true } if controller.selected_node().is_some() => {
			controller.request_path(&id).map(|_| ())
		}
		CanvasEvent::NodeClicked { id, .. } => controller.select_node(&id).map(|_| ()),
		CanvasEvent::BackgroundClicked => {
			controller.clear_selection();
			Ok(())
		}
	};
	if let Err(err) = outcome {
		warn!("Canvas command rejected: {err}");
	}
}

#[component]
fn TypeToggle(node_type: NodeType, is_active: Signal<bool>, on_toggle: Callback<()>) -> impl IntoView {
	view! {
		<button
			class=move || if is_active.get() { "facet facet-active" } else { "facet" }
			on:click=move |_| on_toggle.run(())
		>
			{node_type.as_str()}
		</button>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = load_config();
	let controller = RwSignal::new(InteractionController::new(
		Arc::new(GraphDataStore::default()),
		&config,
	));

	controller.update(|c| {
		let request = c.begin_snapshot_request();
		match GraphSnapshot::from_json(SAMPLE_SNAPSHOT) {
			Ok(snapshot) => {
				c.accept_snapshot(request, snapshot);
			}
			Err(err) => error!("Sample snapshot is invalid: {err}"),
		}
	});

	let view_model = Memo::new(move |_| controller.with(|c| c.view_model()));
	let status = move || {
		controller.with(|c| {
			let state = c.state();
			let path = state
				.selection
				.path()
				.map(|p| {
					if p.is_empty() {
						" | no path".to_string()
					} else {
						format!(" | path: {}", p.nodes.join(" -> "))
					}
				})
				.unwrap_or_default();
			let filtered = if state.filter().is_active() { " (filtered)" } else { "" };
			format!(
				"{} of {} nodes{} | {}{}",
				state.graph.node_count(),
				c.store().node_count(),
				filtered,
				state.selection.name(),
				path
			)
		})
	};

	let toggle_type = move |node_type: NodeType| {
		controller.update(|c| {
			let mut spec = c.state().filter().clone();
			if !spec.types.remove(&node_type) {
				spec.types.insert(node_type);
			}
			c.set_filter(spec);
		});
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas
					view_model=view_model
					on_event=Callback::new(move |event: CanvasEvent| {
						controller.update(|c| handle_canvas_event(c, event))
					})
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Knowledge Graph Explorer"</h1>
					<p class="subtitle">
						"Click to select. Shift-click to find a path. Click the background to clear."
					</p>
					<input
						type="search"
						placeholder="Search labels, descriptions, tags"
						on:input=move |ev| {
							let term = event_target_value(&ev);
							controller.update(|c| {
								let spec = c.state().filter().clone().with_search(term);
								c.set_filter(spec);
							});
						}
					/>
					<div class="facets">
						{NodeType::ALL
							.into_iter()
							.map(|node_type| {
								view! {
									<TypeToggle
										node_type=node_type
										is_active=Signal::derive(move || {
											controller.with(|c| c.state().filter().types.contains(&node_type))
										})
										on_toggle=Callback::new(move |_| toggle_type(node_type))
									/>
								}
							})
							.collect_view()}
					</div>
					<div class="controls">
						<button on:click=move |_| {
							controller.update(|c| {
								let mode = c.state().mode.toggled();
								c.set_render_mode(mode);
							})
						}>
							{move || format!("Mode: {}", controller.with(|c| c.state().mode.as_str()))}
						</button>
						<button
							disabled=move || controller.with(|c| !c.can_undo())
							on:click=move |_| controller.update(|c| {
								if let Err(err) = c.undo() {
									warn!("{err}");
								}
							})
						>
							"Undo"
						</button>
						<button
							disabled=move || controller.with(|c| !c.can_redo())
							on:click=move |_| controller.update(|c| {
								if let Err(err) = c.redo() {
									warn!("{err}");
								}
							})
						>
							"Redo"
						</button>
					</div>
					<p class="status">{status}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
