use thiserror::Error;

/// Why a dataset was rejected at load time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedGraph {
	#[error("graph has no nodes")]
	Empty,

	#[error("node id '{0}' appears more than once")]
	DuplicateNode(String),

	#[error("node '{0}' has a non-finite position or size")]
	InvalidNodeGeometry(String),

	#[error("link #{index} references unknown node '{node_id}'")]
	UnknownEndpoint { index: usize, node_id: String },

	#[error("link #{index} ({source_id} -> {target_id}) has non-positive weight {weight}")]
	InvalidWeight {
		index: usize,
		source_id: String,
		target_id: String,
		weight: f64,
	},
}

/// Errors surfaced by the network visualization.
#[derive(Error, Debug)]
pub enum VizError {
	#[error("malformed graph: {0}")]
	MalformedGraph(#[from] MalformedGraph),

	#[error("invalid filter state: {0}")]
	InvalidFilterState(String),

	#[error("unknown node '{0}'")]
	UnknownNode(String),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("failed to decode JSON: {0}")]
	Parse(#[from] serde_json::Error),
}

pub type VizResult<T> = Result<T, VizError>;
