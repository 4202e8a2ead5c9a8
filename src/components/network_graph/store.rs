use std::collections::HashMap;

use log::info;

use super::error::{MalformedGraph, VizResult};
use super::types::{GraphData, GraphLink, GraphNode, Point};

/// Immutable, validated node/link dataset.
///
/// Links refer to nodes strictly by id; every endpoint is checked at load so
/// later lookups never fall back to positional matching.
#[derive(Clone, Debug)]
pub struct Graph {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	index: HashMap<String, usize>,
	// link indices touching each node, parallel to `nodes`
	incident: Vec<Vec<usize>>,
	center: Point,
}

impl Graph {
	pub fn load(data: GraphData) -> VizResult<Self> {
		let GraphData { nodes, links } = data;
		if nodes.is_empty() {
			return Err(MalformedGraph::Empty.into());
		}

		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if !node.base_position.is_finite() || !node.base_size.is_finite() {
				return Err(MalformedGraph::InvalidNodeGeometry(node.id.clone()).into());
			}
			if index.insert(node.id.clone(), i).is_some() {
				return Err(MalformedGraph::DuplicateNode(node.id.clone()).into());
			}
		}

		let mut incident = vec![Vec::new(); nodes.len()];
		for (i, link) in links.iter().enumerate() {
			let lookup = |id: &String| {
				index.get(id).copied().ok_or_else(|| MalformedGraph::UnknownEndpoint {
					index: i,
					node_id: id.clone(),
				})
			};
			let (src, tgt) = (lookup(&link.source_id)?, lookup(&link.target_id)?);
			if !(link.weight > 0.0 && link.weight.is_finite()) {
				return Err(MalformedGraph::InvalidWeight {
					index: i,
					source_id: link.source_id.clone(),
					target_id: link.target_id.clone(),
					weight: link.weight,
				}
				.into());
			}
			incident[src].push(i);
			if tgt != src {
				incident[tgt].push(i);
			}
		}

		let center = bounding_center(&nodes);
		info!(
			"Loaded graph: {} nodes, {} links, center ({:.1}, {:.1})",
			nodes.len(),
			links.len(),
			center.x,
			center.y
		);

		Ok(Self {
			nodes,
			links,
			index,
			incident,
			center,
		})
	}

	pub fn from_json(json: &str) -> VizResult<Self> {
		Self::load(serde_json::from_str(json)?)
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Links with `id` as source or target. Empty for unknown ids.
	pub fn incident_links(&self, id: &str) -> impl Iterator<Item = &GraphLink> + '_ {
		self.index
			.get(id)
			.into_iter()
			.flat_map(move |&i| self.incident[i].iter().map(move |&l| &self.links[l]))
	}

	pub fn degree(&self, id: &str) -> usize {
		self.index.get(id).map_or(0, |&i| self.incident[i].len())
	}

	/// True if any link joins `a` and `b`, in either direction.
	pub fn are_linked(&self, a: &str, b: &str) -> bool {
		self.incident_links(a).any(|l| l.other_end(a) == Some(b))
	}

	/// Center of the bounding box of all base positions.
	pub fn center(&self) -> Point {
		self.center
	}
}

fn bounding_center(nodes: &[GraphNode]) -> Point {
	let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
	let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
	for node in nodes {
		let p = node.base_position;
		min_x = min_x.min(p.x);
		min_y = min_y.min(p.y);
		max_x = max_x.max(p.x);
		max_y = max_y.max(p.y);
	}
	Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::components::network_graph::error::VizError;
	use crate::components::network_graph::types::NodeGroup;

	pub(crate) fn node(id: &str, group: NodeGroup, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			group,
			base_position: Point::new(x, y),
			base_size: 10.0,
		}
	}

	pub(crate) fn link(source: &str, target: &str, weight: f64) -> GraphLink {
		GraphLink {
			source_id: source.into(),
			target_id: target.into(),
			weight,
		}
	}

	fn malformed(result: VizResult<Graph>) -> MalformedGraph {
		match result {
			Err(VizError::MalformedGraph(reason)) => reason,
			other => panic!("expected malformed graph, got {other:?}"),
		}
	}

	#[test]
	fn indexes_links_by_id() {
		let graph = Graph::load(GraphData {
			nodes: vec![
				node("a", NodeGroup::Agent, 0.0, 0.0),
				node("b", NodeGroup::Data, 100.0, 50.0),
				node("c", NodeGroup::User, 40.0, 200.0),
			],
			links: vec![link("a", "b", 0.9), link("c", "a", 0.2)],
		})
		.unwrap();

		assert_eq!(graph.degree("a"), 2);
		assert_eq!(graph.degree("b"), 1);
		assert_eq!(graph.degree("missing"), 0);
		assert!(graph.are_linked("b", "a"));
		assert!(!graph.are_linked("b", "c"));
		assert_eq!(graph.center(), Point::new(50.0, 100.0));
		assert_eq!(graph.node("c").map(|n| n.group), Some(NodeGroup::User));
	}

	#[test]
	fn nodes_sharing_a_coordinate_stay_distinct() {
		let graph = Graph::load(GraphData {
			nodes: vec![
				node("a", NodeGroup::Agent, 10.0, 0.0),
				node("b", NodeGroup::Agent, 10.0, 90.0),
				node("c", NodeGroup::Data, 60.0, 40.0),
			],
			links: vec![link("b", "c", 1.0)],
		})
		.unwrap();

		assert_eq!(graph.degree("a"), 0);
		assert_eq!(graph.degree("b"), 1);
	}

	#[test]
	fn rejects_unknown_endpoint() {
		let reason = malformed(Graph::load(GraphData {
			nodes: vec![node("a", NodeGroup::Agent, 0.0, 0.0)],
			links: vec![link("a", "ghost", 1.0)],
		}));
		assert_eq!(
			reason,
			MalformedGraph::UnknownEndpoint {
				index: 0,
				node_id: "ghost".into()
			}
		);
	}

	#[test]
	fn rejects_duplicate_ids_and_bad_weights() {
		let dup = malformed(Graph::load(GraphData {
			nodes: vec![
				node("a", NodeGroup::Agent, 0.0, 0.0),
				node("a", NodeGroup::Data, 1.0, 1.0),
			],
			links: vec![],
		}));
		assert_eq!(dup, MalformedGraph::DuplicateNode("a".into()));

		let weight = malformed(Graph::load(GraphData {
			nodes: vec![
				node("a", NodeGroup::Agent, 0.0, 0.0),
				node("b", NodeGroup::Data, 1.0, 1.0),
			],
			links: vec![link("a", "b", 0.0)],
		}));
		assert!(matches!(weight, MalformedGraph::InvalidWeight { index: 0, .. }));

		assert_eq!(malformed(Graph::load(GraphData::default())), MalformedGraph::Empty);
	}

	#[test]
	fn self_loop_counts_once() {
		let graph = Graph::load(GraphData {
			nodes: vec![node("a", NodeGroup::System, 0.0, 0.0)],
			links: vec![link("a", "a", 1.0)],
		})
		.unwrap();
		assert_eq!(graph.degree("a"), 1);
	}

	#[test]
	fn decodes_json() {
		let json = r#"{
			"nodes": [
				{"id": "a", "label": "A", "group": "agent", "basePosition": {"x": 0, "y": 0}, "baseSize": 12},
				{"id": "b", "label": "B", "group": "data", "basePosition": {"x": 10, "y": 0}, "baseSize": 8}
			],
			"links": [{"sourceId": "a", "targetId": "b", "weight": 0.4}]
		}"#;
		let graph = Graph::from_json(json).unwrap();
		assert_eq!(graph.links().len(), 1);

		let bad_group = json.replace("\"data\"", "\"robot\"");
		assert!(matches!(Graph::from_json(&bad_group), Err(VizError::Parse(_))));
	}
}
