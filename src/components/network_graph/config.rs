use serde::Deserialize;

use super::error::{VizError, VizResult};

/// Policy constants for the network view.
///
/// The tier and filter thresholds are presentation policy, not derived from
/// the graph; hosts may override any of them from JSON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VizConfig {
	pub min_zoom: f64,
	pub max_zoom: f64,
	pub default_zoom: f64,
	pub zoom_step: f64,
	/// Zoom applied when a node is selected.
	pub inspect_zoom: f64,
	/// Degrees advanced per animation frame while rotating.
	pub rotation_step_deg: f64,
	/// `highConnection` passes nodes with strictly more links than this.
	pub high_connection_threshold: usize,
	/// `Critical` tier: strictly more links than this.
	pub critical_above: usize,
	/// `Important` tier: strictly more links than this (and not critical).
	pub important_above: usize,
	pub top_connections_limit: usize,
	/// Node every `targetConnected` match must link to.
	pub hub_node_id: String,
	pub viewport_width: f64,
	pub viewport_height: f64,
	/// Extra screen-space slack around a node for pointer hits.
	pub hit_radius: f64,
}

impl Default for VizConfig {
	fn default() -> Self {
		Self {
			min_zoom: 0.5,
			max_zoom: 3.0,
			default_zoom: 1.0,
			zoom_step: 0.2,
			inspect_zoom: 1.8,
			rotation_step_deg: 0.15,
			high_connection_threshold: 4,
			critical_above: 5,
			important_above: 3,
			top_connections_limit: 5,
			hub_node_id: "crm".into(),
			viewport_width: 800.0,
			viewport_height: 600.0,
			hit_radius: 4.0,
		}
	}
}

impl VizConfig {
	pub fn from_json(json: &str) -> VizResult<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> VizResult<()> {
		let invalid = |msg: String| Err(VizError::InvalidConfig(msg));

		if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
			return invalid(format!(
				"zoom bounds [{}, {}] must be positive and ordered",
				self.min_zoom, self.max_zoom
			));
		}
		for (name, zoom) in [("defaultZoom", self.default_zoom), ("inspectZoom", self.inspect_zoom)] {
			if !(self.min_zoom..=self.max_zoom).contains(&zoom) {
				return invalid(format!(
					"{name} {zoom} outside [{}, {}]",
					self.min_zoom, self.max_zoom
				));
			}
		}
		if !(self.zoom_step > 0.0 && self.zoom_step.is_finite()) {
			return invalid(format!("zoomStep {} must be positive", self.zoom_step));
		}
		if !self.rotation_step_deg.is_finite() {
			return invalid("rotationStepDeg must be finite".into());
		}
		if self.important_above > self.critical_above {
			return invalid(format!(
				"importantAbove {} exceeds criticalAbove {}",
				self.important_above, self.critical_above
			));
		}
		if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
			return invalid("viewport must have a positive size".into());
		}
		Ok(())
	}
}
