use std::collections::HashSet;

use super::camera::CameraState;
use super::config::VizConfig;
use super::filter::{FilterState, compute_visible_set};
use super::interaction::InteractionState;
use super::stats::{ImportanceTier, tiers};
use super::store::Graph;
use super::types::{GraphLink, GraphNode, Point};

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode<'g> {
	pub node: &'g GraphNode,
	pub screen_position: Point,
	pub screen_radius: f64,
	pub is_highlighted: bool,
	pub is_hovered: bool,
	pub is_selected: bool,
	pub tier: ImportanceTier,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneLink<'g> {
	pub link: &'g GraphLink,
	pub screen_from: Point,
	pub screen_to: Point,
	pub is_highlighted: bool,
}

/// Fully transformed frame for the drawing layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescriptor<'g> {
	pub nodes: Vec<SceneNode<'g>>,
	pub links: Vec<SceneLink<'g>>,
	/// A node is hovered or selected, so non-highlighted items should dim.
	pub has_focus_target: bool,
	/// Eased 0..1 strength of the hover/selection highlight.
	pub highlight_level: f64,
	/// Seconds of animated link flow.
	pub flow_time: f64,
}

impl SceneDescriptor<'_> {
	/// Topmost node whose base-space disc (plus `slack`) contains `base`.
	pub fn node_at(&self, base: Point, slack: f64) -> Option<&str> {
		self.nodes
			.iter()
			.rev()
			.find(|n| n.node.base_position.distance(base) <= n.node.base_size + slack)
			.map(|n| n.node.id.as_str())
	}
}

/// Builds a frame without touching the graph or filter state.
///
/// Links are kept when either endpoint is visible; their far end is still
/// positioned through the camera so partial edges point the right way.
pub fn compose_scene<'g>(
	graph: &'g Graph,
	filters: &FilterState,
	camera: &CameraState,
	interaction: &InteractionState,
	config: &VizConfig,
) -> SceneDescriptor<'g> {
	let visible = compute_visible_set(graph, filters, config);
	let tier_of = tiers(graph, config);

	let anchors: Vec<&str> = [
		interaction.hovered_node_id.as_deref(),
		interaction.selected_node_id.as_deref(),
	]
	.into_iter()
	.flatten()
	.collect();

	let mut lit: HashSet<&str> = anchors.iter().copied().collect();
	for &anchor in &anchors {
		lit.extend(graph.incident_links(anchor).filter_map(|l| l.other_end(anchor)));
	}

	let links = visible
		.links
		.iter()
		.filter_map(|&link| {
			let (from, to) = (graph.node(&link.source_id)?, graph.node(&link.target_id)?);
			Some(SceneLink {
				link,
				screen_from: camera.to_screen(from.base_position),
				screen_to: camera.to_screen(to.base_position),
				is_highlighted: anchors.iter().any(|a| link.touches(a)),
			})
		})
		.collect();

	let mut nodes: Vec<SceneNode> = visible
		.nodes
		.iter()
		.map(|&node| SceneNode {
			node,
			screen_position: camera.to_screen(node.base_position),
			screen_radius: node.base_size * camera.zoom(),
			is_highlighted: lit.contains(node.id.as_str()),
			is_hovered: interaction.hovered_node_id.as_deref() == Some(node.id.as_str()),
			is_selected: interaction.selected_node_id.as_deref() == Some(node.id.as_str()),
			tier: tier_of.get(&node.id).copied().unwrap_or(ImportanceTier::Standard),
		})
		.collect();
	// highlighted nodes draw (and hit-test) above the rest
	nodes.sort_by_key(|n| (n.is_highlighted, n.is_hovered || n.is_selected));

	SceneDescriptor {
		nodes,
		links,
		has_focus_target: !anchors.is_empty(),
		highlight_level: 0.0,
		flow_time: 0.0,
	}
}
