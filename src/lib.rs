//! node-graph-bg: ambient 3D node-graph background for web apps.
//!
//! This crate provides a WASM component that draws a slowly rotating point
//! cloud with proximity edges behind the page, plus a cursor node that links
//! itself to nearby points as the pointer moves.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::node_graph::{BackgroundConfig, BackgroundError, NodeGraphBackground};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("node-graph-bg: logging initialized");
}

/// Load configuration overrides from a script element with id="background-config".
/// Expected format: JSON matching [`BackgroundConfig`], any subset of fields.
fn load_config() -> Option<BackgroundConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("background-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match BackgroundConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"node-graph-bg: loaded config ({} nodes, {} cursor edges)",
				config.graph.node_count, config.cursor.max_edges
			);
			Some(config)
		}
		Err(e) => {
			warn!("node-graph-bg: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Places the background behind a simple foreground overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="node-graph-bg" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div
			class="app-shell"
			style="position: relative; width: 100vw; height: 100vh; overflow: hidden; background: #05070d;"
		>
			<NodeGraphBackground config=config />
			<div class="app-overlay" style="position: relative; z-index: 1; padding: 2rem; color: #e6f1ff;">
				<h1>"node-graph-bg"</h1>
				<p class="subtitle">"Move the pointer to link the cursor node to its neighbours."</p>
			</div>
		</div>
	}
}
