use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::VizError;

/// A point in base (dataset) or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Role of a node in the agent network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
	Agent,
	Data,
	System,
	User,
}

struct GroupInfo {
	key: &'static str,
	label: &'static str,
	color: &'static str,
	capabilities: &'static [&'static str],
}

static GROUP_TABLE: [GroupInfo; 4] = [
	GroupInfo {
		key: "agent",
		label: "AI Agents",
		color: "#6366f1",
		capabilities: &[
			"Lead qualification",
			"Personalized outreach",
			"Objection handling",
			"Meeting scheduling",
		],
	},
	GroupInfo {
		key: "data",
		label: "Data Sources",
		color: "#10b981",
		capabilities: &["Record storage", "Enrichment", "Sync with agents"],
	},
	GroupInfo {
		key: "system",
		label: "Systems",
		color: "#f59e0b",
		capabilities: &["Workflow automation", "Event routing", "Reporting"],
	},
	GroupInfo {
		key: "user",
		label: "People",
		color: "#ec4899",
		capabilities: &["Review agent output", "Approve deals", "Give feedback"],
	},
];

impl NodeGroup {
	pub const ALL: [NodeGroup; 4] = [Self::Agent, Self::Data, Self::System, Self::User];

	fn info(self) -> &'static GroupInfo {
		&GROUP_TABLE[self as usize]
	}

	/// Wire/key form, e.g. `"agent"`.
	pub fn key(self) -> &'static str {
		self.info().key
	}

	pub fn label(self) -> &'static str {
		self.info().label
	}

	pub fn color(self) -> &'static str {
		self.info().color
	}

	/// What nodes of this group do, shown in the detail panel.
	pub fn capabilities(self) -> &'static [&'static str] {
		self.info().capabilities
	}
}

impl fmt::Display for NodeGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

impl FromStr for NodeGroup {
	type Err = VizError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		Self::ALL
			.into_iter()
			.find(|g| g.key().eq_ignore_ascii_case(s))
			.ok_or_else(|| VizError::InvalidFilterState(format!("unknown category '{s}'")))
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub group: NodeGroup,
	pub base_position: Point,
	pub base_size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
	pub source_id: String,
	pub target_id: String,
	pub weight: f64,
}

impl GraphLink {
	pub fn touches(&self, id: &str) -> bool {
		self.source_id == id || self.target_id == id
	}

	/// The endpoint opposite `id`, if the link touches it.
	pub fn other_end(&self, id: &str) -> Option<&str> {
		if self.source_id == id {
			Some(&self.target_id)
		} else if self.target_id == id {
			Some(&self.source_id)
		} else {
			None
		}
	}
}

/// Unvalidated dataset as supplied by the data-loading layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
