use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::VizConfig;
use super::error::VizError;
use super::store::Graph;
use super::types::{GraphLink, GraphNode, NodeGroup};

/// Structural predicates computed from the graph rather than node attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedFilter {
	/// More links than `high_connection_threshold`.
	HighConnection,
	/// Directly linked to the hub node (or the hub itself).
	TargetConnected,
}

impl DerivedFilter {
	pub const ALL: [DerivedFilter; 2] = [Self::HighConnection, Self::TargetConnected];

	pub fn key(self) -> &'static str {
		match self {
			Self::HighConnection => "highConnection",
			Self::TargetConnected => "targetConnected",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::HighConnection => "High connection",
			Self::TargetConnected => "Connected to CRM",
		}
	}
}

impl fmt::Display for DerivedFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

impl FromStr for DerivedFilter {
	type Err = VizError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		Self::ALL
			.into_iter()
			.find(|d| d.key().eq_ignore_ascii_case(s))
			.ok_or_else(|| VizError::InvalidFilterState(format!("unknown derived filter '{s}'")))
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
	pub search_text: String,
	pub active_category: Option<NodeGroup>,
	pub derived_filter: Option<DerivedFilter>,
}

impl FilterState {
	pub fn is_empty(&self) -> bool {
		self.search_text.is_empty()
			&& self.active_category.is_none()
			&& self.derived_filter.is_none()
	}
}

#[derive(Clone, Debug, Default)]
pub struct VisibleSet<'g> {
	pub nodes: Vec<&'g GraphNode>,
	/// Links with at least one visible endpoint.
	pub links: Vec<&'g GraphLink>,
}

fn matches_search(node: &GraphNode, needle: &str) -> bool {
	needle.is_empty()
		|| node.label.to_lowercase().contains(needle)
		|| node.id.to_lowercase().contains(needle)
}

fn matches_derived(graph: &Graph, node: &GraphNode, filter: DerivedFilter, config: &VizConfig) -> bool {
	match filter {
		DerivedFilter::HighConnection => graph.degree(&node.id) > config.high_connection_threshold,
		DerivedFilter::TargetConnected => {
			node.id == config.hub_node_id || graph.are_linked(&node.id, &config.hub_node_id)
		}
	}
}

/// Nodes passing every active predicate, plus the links touching them.
///
/// Predicates are ANDed: search, then category, then the derived filter.
pub fn compute_visible_set<'g>(
	graph: &'g Graph,
	filters: &FilterState,
	config: &VizConfig,
) -> VisibleSet<'g> {
	let needle = filters.search_text.to_lowercase();

	let nodes: Vec<&GraphNode> = graph
		.nodes()
		.iter()
		.filter(|n| matches_search(n, &needle))
		.filter(|n| filters.active_category.is_none_or(|g| n.group == g))
		.filter(|n| {
			filters
				.derived_filter
				.is_none_or(|d| matches_derived(graph, n, d, config))
		})
		.collect();

	let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let links = graph
		.links()
		.iter()
		.filter(|l| ids.contains(l.source_id.as_str()) || ids.contains(l.target_id.as_str()))
		.collect();

	VisibleSet { nodes, links }
}
