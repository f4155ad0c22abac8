//! Leptos component hosting the background.
//!
//! The component renders an absolutely positioned, full-size container that
//! ignores pointer events. Once mounted, it activates a [`Background`] inside
//! it; on unmount the background is deactivated before the owner is disposed.

use leptos::prelude::*;
use log::warn;
use web_sys::HtmlElement;

use super::config::BackgroundConfig;
use super::error::BackgroundError;
use super::lifecycle::Background;
use super::theme::Theme;
use super::web::{WebHost, entropy_rng};

const CONTAINER_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%; \
	z-index: 0; pointer-events: none;";

fn start(
	container: HtmlElement,
	config: BackgroundConfig,
) -> Result<Background<WebHost>, BackgroundError> {
	let host = WebHost::new(container)?;
	let mut background = Background::new(host, config, Theme::default());
	background.activate(&mut entropy_rng())?;
	Ok(background)
}

/// Renders the rotating node graph behind its siblings.
///
/// Place it first inside a positioned parent. If the browser cannot provide
/// a drawing context the background is simply not shown.
#[component]
pub fn NodeGraphBackground(#[prop(optional)] config: BackgroundConfig) -> impl IntoView {
	let mount_ref = NodeRef::<leptos::html::Div>::new();
	let background = StoredValue::new_local(None::<Background<WebHost>>);

	Effect::new(move |_| {
		let Some(container) = mount_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		let config = config.clone();

		background.update_value(|slot| {
			if slot.is_some() {
				return;
			}
			match start(container, config) {
				Ok(bg) => *slot = Some(bg),
				Err(err) => warn!("node-graph-bg: background disabled: {err}"),
			}
		});
	});

	on_cleanup(move || {
		background.try_update_value(|slot| {
			if let Some(mut bg) = slot.take() {
				bg.deactivate();
			}
		});
	});

	view! { <div node_ref=mount_ref class="node-graph-background" style=CONTAINER_STYLE /> }
}
