use leptos::either::Either;
use leptos::prelude::*;
use log::error;

use crate::components::network_graph::{NetworkGraphCanvas, NetworkView, bundled_config, load_bundled};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let network = match load_bundled().and_then(|graph| NetworkView::new(graph, bundled_config()?)) {
		Ok(network) => network,
		Err(err) => {
			error!("Agent network failed to load: {err}");
			return Either::Left(view! {
				<div class="graph-error">
					<h1>"Unable to load the agent network"</h1>
					<p>{err.to_string()}</p>
				</div>
			});
		}
	};

	Either::Right(view! {
		<div class="fullscreen-graph">
			<NetworkGraphCanvas network=network fullscreen=true />
			<div class="graph-overlay">
				<h1>"AI Sales Agent Network"</h1>
				<p class="subtitle">
					"Hover to trace connections. Click a node to inspect it. Scroll to zoom."
				</p>
			</div>
		</div>
	})
}
