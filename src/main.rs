//! Browser entry point: mounts the dashboard app.

use agent_network_viz::{App, init_logging};
use leptos::prelude::*;

fn main() {
	init_logging();
	mount_to_body(App)
}
