use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::camera::{CameraMode, TickToken};
use super::filter::{DerivedFilter, FilterState};
use super::interaction::{NetworkView, NodeDetails, ViewEvent};
use super::render;
use super::types::NodeGroup;

const FRAME_DT: f64 = 0.016;

/// Write side of the reactive panel state mirrored from the view.
#[derive(Clone, Copy)]
struct Panel {
	filters: WriteSignal<FilterState>,
	details: WriteSignal<Option<NodeDetails>>,
	zoom: WriteSignal<f64>,
	mode: WriteSignal<CameraMode>,
	/// Visible and total node counts.
	shown: WriteSignal<(usize, usize)>,
}

impl Panel {
	fn publish(&self, view: &NetworkView) {
		self.filters.set(view.filters().clone());
		self.details.set(view.selected_details().cloned());
		self.zoom.set(view.camera().zoom());
		self.mode.set(view.camera().mode().clone());
		self.shown.set((view.visible_set().nodes.len(), view.graph().nodes().len()));
	}

	/// Applies `event` and mirrors the result; rejected events change nothing.
	fn dispatch(&self, state: &RefCell<NetworkView>, event: ViewEvent) {
		let mut view = state.borrow_mut();
		let _ = view.apply(event);
		self.publish(&view);
	}
}

fn status_text(mode: &CameraMode) -> String {
	match mode {
		CameraMode::Idle => "Auto-rotating".to_string(),
		CameraMode::Focused { node_id } => format!("Inspecting {node_id}"),
	}
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Canvas view over an already validated [`NetworkView`].
#[component]
pub fn NetworkGraphCanvas(
	network: NetworkView,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let default_size = (network.config().viewport_width, network.config().viewport_height);
	let state = Rc::new(RefCell::new(network));

	let (filters, set_filters) = signal(FilterState::default());
	let (details, set_details) = signal(None::<NodeDetails>);
	let (zoom, set_zoom) = signal(0.0);
	let (mode, set_mode) = signal(CameraMode::Idle);
	let (shown, set_shown) = signal((0, 0));
	let (hovering, set_hovering) = signal(false);
	let panel = Panel {
		filters: set_filters,
		details: set_details,
		zoom: set_zoom,
		mode: set_mode,
		shown: set_shown,
	};
	panel.publish(&state.borrow());

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let size = Rc::new(Cell::new(default_size));
	let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let pending: Rc<Cell<Option<TickToken>>> = Rc::new(Cell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, size_init, frame_init, pending_init, animate_init, resize_cb_init) = (
		state.clone(),
		size.clone(),
		frame_id.clone(),
		pending.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			warn!("No window; network graph not started");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or(default_size)
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.filter(|&(w, h)| w > 0.0 && h > 0.0)
				.unwrap_or(default_size)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		size_init.set((w, h));
		state_init.borrow_mut().resize(w, h);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			warn!("Canvas 2d context unavailable");
			return;
		};

		if let Some(old) = resize_cb_init.borrow_mut().take() {
			let _ = window.remove_event_listener_with_callback("resize", old.as_ref().unchecked_ref());
		}
		if fullscreen {
			let (state_resize, size_resize, canvas_resize) =
				(state_init.clone(), size_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				size_resize.set((nw, nh));
				state_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// one frame loop at a time
		if let Some(id) = frame_init.take() {
			let _ = window.cancel_animation_frame(id);
		}

		let (state_anim, size_anim, frame_anim, pending_anim, animate_inner) = (
			state_init.clone(),
			size_init.clone(),
			frame_init.clone(),
			pending_init.clone(),
			animate_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut view = state_anim.borrow_mut();
				// token was taken when this frame was requested; stale if rotation stopped since
				view.advance_frame(pending_anim.take(), FRAME_DT);
				let (w, h) = size_anim.get();
				render::render(&view.compose_scene(), &ctx, w, h);
				pending_anim.set(view.rotation_token());
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let next = web_sys::window()
					.and_then(|win| win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
				frame_anim.set(next);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			pending_init.set(state_init.borrow().rotation_token());
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			info!("Network graph animation started ({w}x{h})");
		}
	});

	// cleanups run before the arena drops stored values
	let teardown = StoredValue::new_local((frame_id, animate, resize_cb));
	on_cleanup(move || {
		teardown.try_with_value(|(frame_id, animate, resize_cb)| {
			let Some(window) = web_sys::window() else {
				return;
			};
			if let Some(id) = frame_id.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = resize_cb.borrow_mut().take() {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			// the frame closure holds a handle to itself
			animate.borrow_mut().take();
			info!("Network graph animation stopped");
		});
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let mut view = state_mm.borrow_mut();
		let hovered = view.node_at_position(x, y);
		// hover only affects the canvas, so the panel is left alone
		let _ = view.apply(ViewEvent::Hover(hovered));
		set_hovering.set(view.interaction().hovered_node_id.is_some());
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let hit = state_click.borrow().node_at_position(x, y);
		panel.dispatch(&state_click, ViewEvent::Select(hit));
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let _ = state_ml.borrow_mut().apply(ViewEvent::Hover(None));
		set_hovering.set(false);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let event = if ev.delta_y() > 0.0 {
			ViewEvent::ZoomOut
		} else {
			ViewEvent::ZoomIn
		};
		panel.dispatch(&state_wh, event);
	};

	let (state_search, state_category, state_derived) = (state.clone(), state.clone(), state.clone());
	let (state_in, state_out, state_reset) = (state.clone(), state.clone(), state.clone());

	view! {
		<div class="network-graph">
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousemove=on_mousemove
				on:click=on_click
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style=move || {
					let cursor = if hovering.get() { "pointer" } else { "default" };
					format!("display: block; cursor: {cursor};")
				}
			/>
			<div class="graph-controls">
				<input
					type="search"
					placeholder="Search nodes..."
					prop:value=move || filters.get().search_text
					on:input=move |ev| {
						panel.dispatch(&state_search, ViewEvent::Search(event_target_value(&ev)));
					}
				/>
				<select
					on:change=move |ev| {
						let mut view = state_category.borrow_mut();
						// rejected values keep the previous filters
						let _ = view.toggle_category_str(&event_target_value(&ev));
						panel.publish(&view);
					}
					prop:value=move || filters.get().active_category.map_or("all", |g| g.key())
				>
					<option value="all">"All categories"</option>
					{NodeGroup::ALL
						.into_iter()
						.map(|g| view! { <option value=g.key()>{g.label()}</option> })
						.collect_view()}
				</select>
				<select
					on:change=move |ev| {
						let mut view = state_derived.borrow_mut();
						let _ = view.toggle_derived_filter_str(&event_target_value(&ev));
						panel.publish(&view);
					}
					prop:value=move || filters.get().derived_filter.map_or("none", |d| d.key())
				>
					<option value="none">"No highlight filter"</option>
					{DerivedFilter::ALL
						.into_iter()
						.map(|d| view! { <option value=d.key()>{d.label()}</option> })
						.collect_view()}
				</select>
				<span class="visible-count">
					{move || {
						let (visible, total) = shown.get();
						(!filters.get().is_empty()).then(|| format!("{visible} of {total} nodes"))
					}}
				</span>
				<button on:click=move |_| panel.dispatch(&state_in, ViewEvent::ZoomIn)>"+"</button>
				<span class="zoom-level">{move || format!("{:.0}%", zoom.get() * 100.0)}</span>
				<button on:click=move |_| panel.dispatch(&state_out, ViewEvent::ZoomOut)>"-"</button>
				<button on:click=move |_| panel.dispatch(&state_reset, ViewEvent::Reset)>"Reset"</button>
				<span class="camera-status">{move || status_text(&mode.get())}</span>
			</div>
			<DetailPanel details=details />
		</div>
	}
}

#[component]
fn DetailPanel(details: ReadSignal<Option<NodeDetails>>) -> impl IntoView {
	move || {
		details.get().map(|NodeDetails { node, stats, capabilities, metrics }| {
			view! {
				<aside class="detail-panel">
					<h2>{node.label}</h2>
					<p class="detail-group" style=format!("color: {}", node.group.color())>
						{node.group.label()}
					</p>
					<dl>
						<dt>"Connections"</dt>
						<dd>{stats.connection_count}</dd>
						<dt>"Importance"</dt>
						<dd>{stats.importance_tier.label()}</dd>
						<dt>"Success rate"</dt>
						<dd>{format!("{:.1}%", metrics.success_rate)}</dd>
						<dt>"Response time"</dt>
						<dd>{format!("{} ms", metrics.response_time_ms)}</dd>
						<dt>"ROI"</dt>
						<dd>{format!("{:.1}x", metrics.roi)}</dd>
					</dl>
					<h3>"Strongest connections"</h3>
					<ul>
						{stats
							.top_connections
							.into_iter()
							.map(|c| {
								view! {
									<li>
										{c.neighbor_id}
										<span class="strength">
											{format!(" {:.0}%", c.strength * 100.0)}
										</span>
									</li>
								}
							})
							.collect_view()}
					</ul>
					<h3>"Capabilities"</h3>
					<ul>
						{capabilities.into_iter().map(|c| view! { <li>{c}</li> }).collect_view()}
					</ul>
				</aside>
			}
		})
	}
}
