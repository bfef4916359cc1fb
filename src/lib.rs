//! Knowledge-graph exploration engine with a Leptos canvas front end.
//!
//! The engine ([`graph`], [`interaction`], [`render`]) is pure and
//! synchronous: it filters, traverses and highlights a loaded snapshot and
//! resolves the result into a renderer-agnostic [`render::ViewModel`]. The
//! Leptos app wires that engine to a 2D canvas backend.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod config;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod render;

// Modules
mod components;
mod pages;

pub use config::ExplorerConfig;
pub use error::{GraphError, IntegrityError, Result};
pub use graph::{FilterEngine, FilterSpec, GraphDataStore, GraphSnapshot};
pub use interaction::{InteractionController, Selection, ViewState};
pub use render::{RenderAdapter, RenderMode, ViewModel, VisualResolver};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the explorer and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Knowledge Graph Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
