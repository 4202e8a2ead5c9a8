use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{SceneDescriptor, SceneLink, SceneNode};
use super::stats::ImportanceTier;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Draws a composed frame. Positions are already in screen space.
pub fn render(scene: &SceneDescriptor, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, width, height);

	let t = if scene.has_focus_target {
		ease_out_cubic(scene.highlight_level)
	} else {
		0.0
	};
	for link in &scene.links {
		draw_link(link, scene.flow_time, t, ctx);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	for node in &scene.nodes {
		draw_node(node, t, ctx);
	}
}

fn draw_link(link: &SceneLink, flow_time: f64, t: f64, ctx: &CanvasRenderingContext2d) {
	let (from, to) = (link.screen_from, link.screen_to);
	if from.distance(to) < 0.001 {
		return;
	}

	// t=0: every link at base alpha; t=1: highlighted brighten, others dim
	let base_width = 1.0 + 2.0 * link.link.weight;
	let (alpha, width) = if link.is_highlighted {
		(0.5 + 0.4 * t, base_width * (1.0 + 0.5 * t))
	} else {
		(0.5 - 0.35 * t, base_width * (1.0 - 0.3 * t))
	};
	ctx.set_stroke_style_str(&format!("rgba(148, 163, 184, {alpha})"));
	ctx.set_line_width(width);

	if link.is_highlighted {
		let (dash, gap) = (8.0, 4.0);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(-(flow_time * 30.0) % (dash + gap));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(to.x, to.y);
	ctx.stroke();
}

fn draw_node(node: &SceneNode, t: f64, ctx: &CanvasRenderingContext2d) {
	let (p, color) = (node.screen_position, node.node.group.color());
	let lit = node.is_highlighted || node.is_hovered || node.is_selected;
	let (alpha, radius) = if lit {
		(1.0, node.screen_radius * (1.0 + 0.2 * t))
	} else {
		(1.0 - 0.7 * t, node.screen_radius * (1.0 - 0.15 * t))
	};

	if lit && t > 0.01 {
		let glow_radius = radius * if node.is_hovered || node.is_selected { 2.2 } else { 1.6 };
		if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.3, p.x, p.y, glow_radius) {
			let glow = 0.3 * t;
			let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {glow})"));
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();

	let ring = match node.tier {
		ImportanceTier::Critical => Some("#f87171"),
		ImportanceTier::Important => Some("#fbbf24"),
		ImportanceTier::Standard => None,
	};
	if let Some(ring) = ring {
		ctx.set_stroke_style_str(ring);
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
	if node.is_selected {
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius + 4.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str("white");
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
	ctx.set_font("11px sans-serif");
	let _ = ctx.fill_text(&node.node.label, p.x + radius + 4.0, p.y + 4.0);
	ctx.set_global_alpha(1.0);
}
