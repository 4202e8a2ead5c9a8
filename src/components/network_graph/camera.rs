use log::debug;

use super::config::VizConfig;
use super::types::Point;

#[derive(Clone, Debug, PartialEq)]
pub enum CameraMode {
	/// Rotating freely, nothing selected.
	Idle,
	/// Centered on a selected node; rotation paused.
	Focused { node_id: String },
}

/// Handle for one scheduled rotation frame.
///
/// Only a token from the current generation advances the angle, so a frame
/// requested before rotation was stopped or restarted does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken(u64);

#[derive(Clone, Debug)]
pub struct CameraState {
	zoom: f64,
	focus: Point,
	rotation_angle: f64,
	rotation_enabled: bool,
	mode: CameraMode,
	generation: u64,
	pivot: Point,
	viewport: (f64, f64),
	min_zoom: f64,
	max_zoom: f64,
	default_zoom: f64,
	zoom_step: f64,
	inspect_zoom: f64,
	rotation_step: f64,
}

fn rotate(p: Point, pivot: Point, degrees: f64) -> Point {
	let (sin, cos) = degrees.to_radians().sin_cos();
	let (dx, dy) = (p.x - pivot.x, p.y - pivot.y);
	Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

impl CameraState {
	/// Idle camera looking at `pivot`, the dataset's logical center.
	pub fn new(config: &VizConfig, pivot: Point) -> Self {
		Self {
			zoom: config.default_zoom,
			focus: pivot,
			rotation_angle: 0.0,
			rotation_enabled: true,
			mode: CameraMode::Idle,
			generation: 0,
			pivot,
			viewport: (config.viewport_width, config.viewport_height),
			min_zoom: config.min_zoom,
			max_zoom: config.max_zoom,
			default_zoom: config.default_zoom,
			zoom_step: config.zoom_step,
			inspect_zoom: config.inspect_zoom,
			rotation_step: config.rotation_step_deg,
		}
	}

	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	pub fn mode(&self) -> &CameraMode {
		&self.mode
	}

	pub fn viewport_center(&self) -> Point {
		Point::new(self.viewport.0 / 2.0, self.viewport.1 / 2.0)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		if width > 0.0 && height > 0.0 {
			self.viewport = (width, height);
		}
	}

	fn set_zoom(&mut self, zoom: f64) -> f64 {
		let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
		if clamped != zoom {
			debug!("Zoom {zoom:.2} clamped to {clamped:.2}");
		}
		self.zoom = clamped;
		clamped
	}

	pub fn zoom_in(&mut self) -> f64 {
		self.set_zoom(self.zoom + self.zoom_step)
	}

	pub fn zoom_out(&mut self) -> f64 {
		self.set_zoom(self.zoom - self.zoom_step)
	}

	/// Idle -> Focused: center on `position` at inspect zoom and stop rotating.
	pub fn focus_on(&mut self, node_id: &str, position: Point) {
		self.mode = CameraMode::Focused {
			node_id: node_id.to_string(),
		};
		self.focus = position;
		self.set_zoom(self.inspect_zoom);
		self.stop_rotation();
		debug!("Camera focused on '{node_id}' at ({:.1}, {:.1})", position.x, position.y);
	}

	/// Back to Idle with default zoom and focus; rotation restarts from zero.
	pub fn reset(&mut self) -> TickToken {
		self.mode = CameraMode::Idle;
		self.focus = self.pivot;
		self.zoom = self.default_zoom;
		self.rotation_angle = 0.0;
		debug!("Camera reset");
		self.start_rotation()
	}

	/// Enables rotation under a fresh generation, invalidating earlier tokens.
	pub(crate) fn start_rotation(&mut self) -> TickToken {
		self.generation += 1;
		self.rotation_enabled = true;
		TickToken(self.generation)
	}

	pub(crate) fn stop_rotation(&mut self) {
		self.generation += 1;
		self.rotation_enabled = false;
	}

	/// Token for the next frame, if rotation is running.
	pub fn rotation_token(&self) -> Option<TickToken> {
		self.rotation_enabled.then_some(TickToken(self.generation))
	}

	/// Advances the angle by one step. Stale or cancelled tokens are ignored.
	pub fn tick(&mut self, token: TickToken) -> bool {
		if !self.rotation_enabled || token.0 != self.generation {
			return false;
		}
		self.rotation_angle = (self.rotation_angle + self.rotation_step).rem_euclid(360.0);
		true
	}

	/// Rotation is live and nothing is selected.
	fn rotation_applies(&self) -> bool {
		self.rotation_enabled && self.mode == CameraMode::Idle
	}

	/// Base -> screen: rotate about the pivot, move focus to the viewport
	/// center, then scale by zoom.
	pub fn to_screen(&self, base: Point) -> Point {
		let p = if self.rotation_applies() {
			rotate(base, self.pivot, self.rotation_angle)
		} else {
			base
		};
		let center = self.viewport_center();
		Point::new(
			center.x + (p.x - self.focus.x) * self.zoom,
			center.y + (p.y - self.focus.y) * self.zoom,
		)
	}

	/// Inverse of [`Self::to_screen`].
	pub fn to_base(&self, screen: Point) -> Point {
		let center = self.viewport_center();
		let p = Point::new(
			(screen.x - center.x) / self.zoom + self.focus.x,
			(screen.y - center.y) / self.zoom + self.focus.y,
		);
		if self.rotation_applies() {
			rotate(p, self.pivot, -self.rotation_angle)
		} else {
			p
		}
	}
}

#[cfg(test)]
impl CameraState {
	pub(crate) fn focus(&self) -> Point {
		self.focus
	}

	pub(crate) fn rotation_angle(&self) -> f64 {
		self.rotation_angle
	}

	pub(crate) fn rotation_enabled(&self) -> bool {
		self.rotation_enabled
	}

	pub(crate) fn default_zoom(&self) -> f64 {
		self.default_zoom
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn camera() -> CameraState {
		let config = VizConfig {
			viewport_width: 200.0,
			viewport_height: 200.0,
			..VizConfig::default()
		};
		CameraState::new(&config, Point::new(50.0, 50.0))
	}

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-6
	}

	#[test]
	fn idle_camera_centers_pivot() {
		let cam = camera();
		assert!(close(cam.to_screen(Point::new(50.0, 50.0)), Point::new(100.0, 100.0)));
		assert!(close(cam.to_screen(Point::new(60.0, 50.0)), Point::new(110.0, 100.0)));
	}

	#[test]
	fn rotates_before_translating_and_scaling() {
		let mut cam = camera();
		cam.set_zoom(2.0);
		cam.rotation_angle = 90.0;
		assert!(close(cam.to_screen(Point::new(100.0, 50.0)), Point::new(100.0, 200.0)));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut cam = camera();
		for _ in 0..50 {
			cam.zoom_in();
		}
		assert_eq!(cam.zoom(), 3.0);
		for _ in 0..50 {
			cam.zoom_out();
		}
		assert_eq!(cam.zoom(), 0.5);
	}

	#[test]
	fn focus_stops_rotation_and_reset_restores_defaults() {
		let mut cam = camera();
		let token = cam.rotation_token().unwrap();
		assert!(cam.tick(token));

		cam.focus_on("a", Point::new(10.0, 20.0));
		assert!(!cam.rotation_enabled());
		assert_eq!(cam.rotation_token(), None);
		assert!(close(cam.to_screen(Point::new(10.0, 20.0)), Point::new(100.0, 100.0)));
		assert_eq!(cam.zoom(), 1.8);

		cam.reset();
		assert_eq!(cam.mode(), &CameraMode::Idle);
		assert!(cam.rotation_enabled());
		assert_eq!(cam.zoom(), cam.default_zoom());
		assert_eq!(cam.focus(), Point::new(50.0, 50.0));
		assert_eq!(cam.rotation_angle(), 0.0);
	}

	#[test]
	fn stale_tokens_do_not_rotate() {
		let mut cam = camera();
		let before_stop = cam.rotation_token().unwrap();
		cam.stop_rotation();
		assert!(!cam.tick(before_stop));

		let first = cam.start_rotation();
		let second = cam.start_rotation();
		assert!(!cam.tick(first));
		assert!(cam.tick(second));
		assert_eq!(cam.rotation_angle(), 0.15);
	}

	#[test]
	fn stopped_rotation_draws_unrotated() {
		let mut cam = camera();
		cam.rotation_angle = 90.0;
		let rotated = cam.to_screen(Point::new(100.0, 50.0));
		assert!(close(rotated, Point::new(100.0, 150.0)));

		cam.stop_rotation();
		assert_eq!(cam.mode(), &CameraMode::Idle);
		let p = cam.to_screen(Point::new(100.0, 50.0));
		assert!(close(p, Point::new(150.0, 100.0)));
		assert!(close(cam.to_base(p), Point::new(100.0, 50.0)));
	}

	#[test]
	fn angle_wraps_at_360() {
		let mut cam = camera();
		cam.rotation_angle = 359.9;
		let token = cam.rotation_token().unwrap();
		cam.tick(token);
		assert!((cam.rotation_angle() - 0.05).abs() < 1e-9);
	}

	proptest! {
		#[test]
		fn transform_round_trips(
			x in -1000.0f64..1000.0,
			y in -1000.0f64..1000.0,
			angle in 0.0f64..360.0,
			zooms in 0usize..8,
			focused in any::<bool>(),
		) {
			let mut cam = camera();
			cam.rotation_angle = angle;
			for _ in 0..zooms {
				cam.zoom_in();
			}
			if focused {
				cam.focus_on("n", Point::new(x / 3.0, y / 2.0));
			}
			let p = Point::new(x, y);
			prop_assert!(cam.to_base(cam.to_screen(p)).distance(p) < 1e-6);
			prop_assert!(cam.to_screen(cam.to_base(p)).distance(p) < 1e-6);
		}
	}
}
