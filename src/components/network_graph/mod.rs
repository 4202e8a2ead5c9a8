//! Interactive agent-network view: graph store, filtering, camera, node
//! statistics and the scene handed to the canvas renderer.

mod camera;
mod component;
mod config;
mod dataset;
mod error;
mod filter;
mod interaction;
mod metrics;
mod render;
mod scene;
mod stats;
mod store;
mod types;

pub use component::NetworkGraphCanvas;
pub use dataset::{bundled_config, load_bundled};
pub use interaction::NetworkView;
