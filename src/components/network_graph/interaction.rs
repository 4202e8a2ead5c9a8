use log::{debug, info, warn};
use serde::Serialize;

use super::camera::{CameraState, TickToken};
use super::config::VizConfig;
use super::error::{VizError, VizResult};
use super::filter::{DerivedFilter, FilterState, VisibleSet, compute_visible_set};
use super::metrics::{MetricsProvider, NodeMetrics, SeededMetrics};
use super::scene::{SceneDescriptor, compose_scene};
use super::stats::{NodeStats, compute_stats};
use super::store::Graph;
use super::types::{GraphNode, NodeGroup, Point};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	pub hovered_node_id: Option<String>,
	pub selected_node_id: Option<String>,
}

/// User input understood by [`NetworkView::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
	Hover(Option<String>),
	Select(Option<String>),
	Search(String),
	ToggleCategory(Option<NodeGroup>),
	ToggleDerivedFilter(Option<DerivedFilter>),
	ZoomIn,
	ZoomOut,
	Reset,
}

/// Everything the detail panel shows for the selected node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeDetails {
	pub node: GraphNode,
	pub stats: NodeStats,
	pub capabilities: Vec<&'static str>,
	pub metrics: NodeMetrics,
}

/// Eased highlight strength, 0 (none) to 1 (full).
#[derive(Clone, Debug, Default)]
struct HighlightFade {
	t: f64,
	delay_t: f64,
}

/// One visualization session: the graph plus all state mutated by input.
pub struct NetworkView {
	graph: Graph,
	config: VizConfig,
	filters: FilterState,
	camera: CameraState,
	interaction: InteractionState,
	details: Option<NodeDetails>,
	metrics: Box<dyn MetricsProvider>,
	fade: HighlightFade,
	flow_time: f64,
}

impl NetworkView {
	/// Rejects configs that fail [`VizConfig::validate`] or name a hub the
	/// graph does not contain.
	pub fn new(graph: Graph, config: VizConfig) -> VizResult<Self> {
		config.validate()?;
		if !graph.contains(&config.hub_node_id) {
			return Err(VizError::InvalidConfig(format!(
				"hub node '{}' is not in the graph",
				config.hub_node_id
			)));
		}
		let camera = CameraState::new(&config, graph.center());
		Ok(Self {
			graph,
			config,
			filters: FilterState::default(),
			camera,
			interaction: InteractionState::default(),
			details: None,
			metrics: Box::new(SeededMetrics::default()),
			fade: HighlightFade::default(),
			flow_time: 0.0,
		})
	}

	#[allow(dead_code)]
	pub fn with_metrics(mut self, provider: impl MetricsProvider + 'static) -> Self {
		self.metrics = Box::new(provider);
		self
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn config(&self) -> &VizConfig {
		&self.config
	}

	pub fn filters(&self) -> &FilterState {
		&self.filters
	}

	pub fn camera(&self) -> &CameraState {
		&self.camera
	}

	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	/// Details for the selected node, if any.
	pub fn selected_details(&self) -> Option<&NodeDetails> {
		self.details.as_ref()
	}

	pub fn apply(&mut self, event: ViewEvent) -> VizResult<()> {
		match event {
			ViewEvent::Hover(id) => self.hover(id.as_deref())?,
			ViewEvent::Select(id) => self.select(id.as_deref())?,
			ViewEvent::Search(text) => self.search(&text),
			ViewEvent::ToggleCategory(group) => self.toggle_category(group),
			ViewEvent::ToggleDerivedFilter(kind) => self.toggle_derived_filter(kind),
			ViewEvent::ZoomIn => {
				self.zoom_in();
			}
			ViewEvent::ZoomOut => {
				self.zoom_out();
			}
			ViewEvent::Reset => self.reset(),
		}
		Ok(())
	}

	fn require_node(&self, id: &str) -> VizResult<()> {
		if self.graph.contains(id) {
			Ok(())
		} else {
			warn!("Ignoring interaction with unknown node '{id}'");
			Err(VizError::UnknownNode(id.to_string()))
		}
	}

	pub fn hover(&mut self, id: Option<&str>) -> VizResult<()> {
		if self.interaction.hovered_node_id.as_deref() == id {
			return Ok(());
		}
		if let Some(id) = id {
			self.require_node(id)?;
			if self.interaction.hovered_node_id.is_none() {
				self.fade.delay_t = 0.0;
			}
		}
		self.interaction.hovered_node_id = id.map(str::to_string);
		Ok(())
	}

	/// Selecting a node focuses the camera on it; `None` acts as reset.
	pub fn select(&mut self, id: Option<&str>) -> VizResult<()> {
		let Some(id) = id else {
			self.reset();
			return Ok(());
		};
		self.require_node(id)?;

		let stats = compute_stats(&self.graph, id, &self.config)?;
		let Some(node) = self.graph.node(id) else {
			return Err(VizError::UnknownNode(id.to_string()));
		};
		self.camera.focus_on(id, node.base_position);
		self.details = Some(NodeDetails {
			node: node.clone(),
			capabilities: node.group.capabilities().to_vec(),
			metrics: self.metrics.metrics(node),
			stats,
		});
		self.interaction.selected_node_id = Some(id.to_string());
		info!("Selected '{id}'");
		Ok(())
	}

	pub fn search(&mut self, text: &str) {
		if self.filters.search_text != text {
			debug!("Search text set to '{text}'");
			self.filters.search_text = text.to_string();
		}
	}

	/// Sets the category; choosing the active one (or `None`) clears it.
	pub fn toggle_category(&mut self, group: Option<NodeGroup>) {
		self.filters.active_category = match group {
			Some(g) if self.filters.active_category != Some(g) => Some(g),
			_ => None,
		};
		debug!("Category filter: {:?}", self.filters.active_category);
	}

	/// String form used by the host UI; `""` or `"all"` clears.
	///
	/// Unknown values leave the current filters untouched.
	pub fn toggle_category_str(&mut self, value: &str) -> VizResult<()> {
		let group = match value.trim() {
			"" | "all" => None,
			other => Some(other.parse::<NodeGroup>().inspect_err(|e| warn!("{e}"))?),
		};
		self.apply(ViewEvent::ToggleCategory(group))
	}

	/// Sets the derived filter; choosing the active one (or `None`) clears it.
	pub fn toggle_derived_filter(&mut self, kind: Option<DerivedFilter>) {
		self.filters.derived_filter = match kind {
			Some(k) if self.filters.derived_filter != Some(k) => Some(k),
			_ => None,
		};
		debug!("Derived filter: {:?}", self.filters.derived_filter);
	}

	pub fn toggle_derived_filter_str(&mut self, value: &str) -> VizResult<()> {
		let kind = match value.trim() {
			"" | "none" => None,
			other => Some(other.parse::<DerivedFilter>().inspect_err(|e| warn!("{e}"))?),
		};
		self.apply(ViewEvent::ToggleDerivedFilter(kind))
	}

	pub fn zoom_in(&mut self) -> f64 {
		self.camera.zoom_in()
	}

	pub fn zoom_out(&mut self) -> f64 {
		self.camera.zoom_out()
	}

	/// Clears selection and filters, returning the camera to idle rotation.
	pub fn reset(&mut self) {
		self.interaction.selected_node_id = None;
		self.details = None;
		self.filters = FilterState::default();
		self.camera.reset();
		info!("View reset");
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.camera.resize(width, height);
	}

	/// Token to hand to the next scheduled frame, if rotation is running.
	pub fn rotation_token(&self) -> Option<TickToken> {
		self.camera.rotation_token()
	}

	/// Per-frame update: rotation (if `token` is still current), link flow,
	/// and the highlight fade.
	pub fn advance_frame(&mut self, token: Option<TickToken>, dt: f64) {
		if let Some(token) = token {
			self.camera.tick(token);
		}
		self.flow_time += dt;

		let focused = self.interaction.hovered_node_id.is_some()
			|| self.interaction.selected_node_id.is_some();
		let (target, delay, speed) = if focused {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if focused {
			self.fade.delay_t = (self.fade.delay_t + dt).min(delay);
			if self.fade.delay_t >= delay {
				self.fade.t += (target - self.fade.t) * speed * dt;
			}
		} else {
			self.fade.t += (target - self.fade.t) * speed * dt;
			if self.fade.t < 0.01 {
				self.fade.t = 0.0;
			}
		}
	}

	pub fn visible_set(&self) -> VisibleSet<'_> {
		compute_visible_set(&self.graph, &self.filters, &self.config)
	}

	pub fn compose_scene(&self) -> SceneDescriptor<'_> {
		let mut scene = compose_scene(
			&self.graph,
			&self.filters,
			&self.camera,
			&self.interaction,
			&self.config,
		);
		scene.highlight_level = self.fade.t.clamp(0.0, 1.0);
		scene.flow_time = self.flow_time;
		scene
	}

	/// Node under a screen point in the current frame.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<String> {
		let base = self.camera.to_base(Point::new(x, y));
		// hit radius is in pixels
		let slack = self.config.hit_radius / self.camera.zoom();
		self.compose_scene().node_at(base, slack).map(str::to_string)
	}
}
