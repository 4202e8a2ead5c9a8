use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::config::VizConfig;
use super::error::{VizError, VizResult};
use super::store::Graph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ImportanceTier {
	Standard,
	Important,
	Critical,
}

impl ImportanceTier {
	pub fn from_connections(count: usize, config: &VizConfig) -> Self {
		if count > config.critical_above {
			Self::Critical
		} else if count > config.important_above {
			Self::Important
		} else {
			Self::Standard
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Standard => "Standard",
			Self::Important => "Important",
			Self::Critical => "Critical",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Connection {
	pub neighbor_id: String,
	pub strength: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeStats {
	pub connection_count: usize,
	pub importance_tier: ImportanceTier,
	/// Strongest neighbors, strength descending.
	pub top_connections: Vec<Connection>,
}

/// Derived statistics for `node_id`.
///
/// A neighbor reached by several parallel links is listed once with its
/// strongest weight; ties are ordered by neighbor id.
pub fn compute_stats(graph: &Graph, node_id: &str, config: &VizConfig) -> VizResult<NodeStats> {
	if !graph.contains(node_id) {
		return Err(VizError::UnknownNode(node_id.to_string()));
	}

	let mut strongest: HashMap<&str, f64> = HashMap::new();
	let mut connection_count = 0;
	for link in graph.incident_links(node_id) {
		connection_count += 1;
		if let Some(neighbor) = link.other_end(node_id) {
			let entry = strongest.entry(neighbor).or_insert(link.weight);
			*entry = entry.max(link.weight);
		}
	}

	let mut top_connections: Vec<Connection> = strongest
		.into_iter()
		.map(|(id, strength)| Connection {
			neighbor_id: id.to_string(),
			strength,
		})
		.collect();
	top_connections.sort_by(|a, b| {
		b.strength
			.partial_cmp(&a.strength)
			.unwrap_or(Ordering::Equal)
			.then_with(|| a.neighbor_id.cmp(&b.neighbor_id))
	});
	top_connections.truncate(config.top_connections_limit);

	Ok(NodeStats {
		connection_count,
		importance_tier: ImportanceTier::from_connections(connection_count, config),
		top_connections,
	})
}

/// Tier for every node, used when composing a frame.
pub fn tiers(graph: &Graph, config: &VizConfig) -> HashMap<String, ImportanceTier> {
	graph
		.nodes()
		.iter()
		.map(|n| {
			let tier = ImportanceTier::from_connections(graph.degree(&n.id), config);
			(n.id.clone(), tier)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::network_graph::store::tests::{link, node};
	use crate::components::network_graph::types::{GraphData, NodeGroup};

	fn star(spokes: usize) -> Graph {
		let mut nodes = vec![node("hub", NodeGroup::Data, 0.0, 0.0)];
		let mut links = Vec::new();
		for i in 0..spokes {
			let id = format!("n{i}");
			nodes.push(node(&id, NodeGroup::Agent, i as f64 * 10.0, 50.0));
			links.push(link("hub", &id, (i + 1) as f64 / 10.0));
		}
		Graph::load(GraphData { nodes, links }).unwrap()
	}

	#[test]
	fn tiers_follow_thresholds() {
		let config = VizConfig::default();
		let tier = |n| ImportanceTier::from_connections(n, &config);
		assert_eq!(tier(0), ImportanceTier::Standard);
		assert_eq!(tier(3), ImportanceTier::Standard);
		assert_eq!(tier(4), ImportanceTier::Important);
		assert_eq!(tier(5), ImportanceTier::Important);
		assert_eq!(tier(6), ImportanceTier::Critical);
	}

	#[test]
	fn top_connections_are_strongest_first_and_capped() {
		let graph = star(7);
		let stats = compute_stats(&graph, "hub", &VizConfig::default()).unwrap();

		assert_eq!(stats.connection_count, 7);
		assert_eq!(stats.importance_tier, ImportanceTier::Critical);
		let ids: Vec<_> = stats.top_connections.iter().map(|c| c.neighbor_id.as_str()).collect();
		assert_eq!(ids, ["n6", "n5", "n4", "n3", "n2"]);

		let leaf = compute_stats(&graph, "n0", &VizConfig::default()).unwrap();
		assert_eq!(leaf.connection_count, 1);
		assert_eq!(leaf.top_connections[0].neighbor_id, "hub");
	}

	#[test]
	fn parallel_links_keep_strongest_weight() {
		let graph = Graph::load(GraphData {
			nodes: vec![
				node("a", NodeGroup::Agent, 0.0, 0.0),
				node("b", NodeGroup::Data, 1.0, 0.0),
			],
			links: vec![link("a", "b", 0.3), link("b", "a", 0.8)],
		})
		.unwrap();
		let stats = compute_stats(&graph, "a", &VizConfig::default()).unwrap();
		assert_eq!(stats.connection_count, 2);
		assert_eq!(
			stats.top_connections,
			vec![Connection {
				neighbor_id: "b".into(),
				strength: 0.8
			}]
		);
	}

	#[test]
	fn unknown_node_is_an_error() {
		let graph = star(1);
		assert!(matches!(
			compute_stats(&graph, "nope", &VizConfig::default()),
			Err(VizError::UnknownNode(_))
		));
	}

	fn arb_graph() -> impl Strategy<Value = Graph> {
		(2usize..12)
			.prop_flat_map(|n| {
				let edges = prop::collection::vec((0..n, 0..n, 0.01f64..10.0), 0..30);
				(Just(n), edges)
			})
			.prop_map(|(n, edges)| {
				let nodes = (0..n)
					.map(|i| node(&format!("v{i}"), NodeGroup::ALL[i % 4], i as f64, (i * 7 % 5) as f64))
					.collect();
				let links = edges
					.into_iter()
					.map(|(s, t, w)| link(&format!("v{s}"), &format!("v{t}"), w))
					.collect();
				Graph::load(GraphData { nodes, links }).unwrap()
			})
	}

	proptest! {
		#[test]
		fn stats_agree_with_link_scan(graph in arb_graph()) {
			let config = VizConfig::default();
			for n in graph.nodes() {
				let stats = compute_stats(&graph, &n.id, &config).unwrap();
				let expected = graph
					.links()
					.iter()
					.filter(|l| l.source_id == n.id || l.target_id == n.id)
					.count();
				prop_assert_eq!(stats.connection_count, expected);
				prop_assert!(stats.top_connections.len() <= 5);
				prop_assert!(stats
					.top_connections
					.windows(2)
					.all(|w| w[0].strength >= w[1].strength));
			}
		}
	}
}
