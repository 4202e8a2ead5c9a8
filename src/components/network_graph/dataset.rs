use super::config::VizConfig;
use super::error::VizResult;
use super::store::Graph;

/// Hand-placed demo network of the sales agent and its collaborators.
pub const AGENT_NETWORK_JSON: &str = include_str!("../../../data/agent_network.json");

pub const VIZ_CONFIG_JSON: &str = include_str!("../../../data/viz_config.json");

pub fn load_bundled() -> VizResult<Graph> {
	Graph::from_json(AGENT_NETWORK_JSON)
}

/// Defaults overridden by the bundled config file.
pub fn bundled_config() -> VizResult<VizConfig> {
	VizConfig::from_json(VIZ_CONFIG_JSON)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::interaction::NetworkView;
	use crate::components::network_graph::filter::{DerivedFilter, FilterState, compute_visible_set};
	use crate::components::network_graph::stats::{ImportanceTier, compute_stats};

	#[test]
	fn bundled_graph_loads_with_hub() {
		let graph = load_bundled().unwrap();
		let config = VizConfig::default();
		assert!(graph.contains(&config.hub_node_id));

		let hub = compute_stats(&graph, &config.hub_node_id, &config).unwrap();
		assert_eq!(hub.importance_tier, ImportanceTier::Critical);
		assert_eq!(hub.top_connections[0].neighbor_id, "sales-agent");
	}

	#[test]
	fn bundled_config_fits_bundled_graph() {
		let config = bundled_config().unwrap();
		assert_eq!(config.hub_node_id, "crm");
		assert_eq!(config.min_zoom, VizConfig::default().min_zoom);
		assert!(NetworkView::new(load_bundled().unwrap(), config).is_ok());
	}

	#[test]
	fn bundled_graph_derived_filters() {
		let graph = load_bundled().unwrap();
		let config = VizConfig::default();
		let visible = |derived| {
			let filters = FilterState {
				derived_filter: Some(derived),
				..Default::default()
			};
			compute_visible_set(&graph, &filters, &config)
				.nodes
				.iter()
				.map(|n| n.id.clone())
				.collect::<Vec<_>>()
		};

		assert_eq!(
			visible(DerivedFilter::HighConnection),
			["crm", "sales-agent", "outreach-agent", "negotiation-agent"]
		);
		assert_eq!(visible(DerivedFilter::TargetConnected).len(), 8);
	}
}
