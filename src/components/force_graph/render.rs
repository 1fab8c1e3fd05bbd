//! Canvas rendering for the force graph.
//!
//! Draws a [`Scene`] in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Link base strokes, then link overlays (world space)
//! 3. Node glows, bodies and labels
//! 4. Satellite connectors, then satellites on top

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::geometry::LinkArc;
use super::scene::{LinkGlyph, NodeGlyph, SatelliteRing, Scene};
use super::theme::Theme;
use super::zoom::ZoomTransform;

/// Renders the complete scene to the canvas.
pub fn render(
	ctx: &CanvasRenderingContext2d,
	scene: &Scene,
	transform: &ZoomTransform,
	theme: &Theme,
	(width, height): (f64, f64),
) {
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	ctx.set_line_cap("round");
	for link in &scene.links {
		stroke_arc(ctx, &link.arc, &link.base_color, link.base_width, link.base_opacity);
	}
	for link in &scene.links {
		draw_link_overlay(ctx, link);
	}

	for node in &scene.nodes {
		draw_node(ctx, node, theme);
	}

	if let Some(ring) = &scene.ring {
		draw_ring(ctx, ring, theme);
	}

	ctx.restore();
	ctx.set_global_alpha(1.0);
}

fn stroke_arc(ctx: &CanvasRenderingContext2d, arc: &LinkArc, color: &str, width: f64, alpha: f64) {
	ctx.begin_path();
	let _ = ctx.arc(arc.center.0, arc.center.1, arc.radius, arc.start_angle, arc.end_angle);
	ctx.set_global_alpha(alpha);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.stroke();
}

// The hit stroke is never painted: hit testing measures distance to the arc.
fn draw_link_overlay(ctx: &CanvasRenderingContext2d, link: &LinkGlyph) {
	stroke_arc(ctx, &link.arc, &link.color, link.overlay_width, link.overlay_opacity);
}

/// Gradient with `stops` spread evenly from `from` to `to`. `None` if a stop
/// is not a valid CSS color.
fn linear_gradient(
	ctx: &CanvasRenderingContext2d,
	stops: &[String],
	from: (f64, f64),
	to: (f64, f64),
) -> Option<CanvasGradient> {
	let gradient = ctx.create_linear_gradient(from.0, from.1, to.0, to.1);
	let last = stops.len().saturating_sub(1).max(1) as f32;
	for (i, stop) in stops.iter().enumerate() {
		gradient.add_color_stop(i as f32 / last, stop).ok()?;
	}
	Some(gradient)
}

/// Fill a circle with the diagonal gradient of `stops`, or the first stop
/// as a solid color when the gradient can't be built.
fn fill_circle(ctx: &CanvasRenderingContext2d, (x, y): (f64, f64), radius: f64, stops: &[String]) {
	match linear_gradient(ctx, stops, (x - radius, y - radius), (x + radius, y + radius)) {
		Some(gradient) => {
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(stops.first().map(String::as_str).unwrap_or("#888")),
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, TAU);
	ctx.fill();
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeGlyph, theme: &Theme) {
	let center = (node.x, node.y);
	if !center.0.is_finite() || !center.1.is_finite() {
		return;
	}

	let Some(style) = &node.style else {
		ctx.set_global_alpha(theme.body_opacity);
		ctx.set_fill_style_str(&theme.fallback_node_color.to_css());
		ctx.begin_path();
		let _ = ctx.arc(center.0, center.1, node.radius, 0.0, TAU);
		ctx.fill();
		return;
	};

	ctx.set_global_alpha(theme.glow_opacity);
	fill_circle(ctx, center, style.glow_radius, &style.gradient);

	ctx.set_global_alpha(theme.body_opacity);
	fill_circle(ctx, center, style.radius, &style.gradient);
	ctx.set_global_alpha(1.0);
	ctx.set_stroke_style_str(&style.stroke);
	ctx.set_line_width(style.stroke_width);
	ctx.stroke();

	ctx.set_fill_style_str(&theme.label_color.to_css());
	ctx.set_font(&theme.font(style.font_size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for line in &node.label {
		let _ = ctx.fill_text(&line.text, center.0, center.1 + line.dy);
	}
}

fn draw_ring(ctx: &CanvasRenderingContext2d, ring: &SatelliteRing, theme: &Theme) {
	let (cx, cy) = ring.center;

	ctx.set_global_alpha(1.0);
	ctx.set_line_width(ring.connector_width);
	let dash = js_sys::Array::of2(
		&JsValue::from_f64(ring.connector_dash.0),
		&JsValue::from_f64(ring.connector_dash.1),
	);
	let _ = ctx.set_line_dash(&dash);
	for glyph in &ring.satellites {
		let (sx, sy) = (glyph.satellite.x, glyph.satellite.y);
		match linear_gradient(ctx, &ring.gradient, (cx, cy), (sx, sy)) {
			Some(gradient) => {
				#[allow(deprecated)]
				ctx.set_stroke_style(&gradient);
			}
			None => ctx.set_stroke_style_str(&ring.stroke),
		}
		ctx.begin_path();
		ctx.move_to(cx, cy);
		ctx.line_to(sx, sy);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for glyph in &ring.satellites {
		let center = (glyph.satellite.x, glyph.satellite.y);
		ctx.set_global_alpha(theme.glow_opacity);
		fill_circle(ctx, center, glyph.glow_radius, &ring.gradient);

		ctx.set_global_alpha(1.0);
		fill_circle(ctx, center, glyph.radius, &ring.gradient);
		ctx.set_stroke_style_str(&ring.stroke);
		ctx.set_line_width(ring.stroke_width);
		ctx.stroke();

		ctx.set_fill_style_str(&theme.satellite_label_color.to_css());
		ctx.set_font(&theme.font(glyph.font_size));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&glyph.satellite.label, center.0, center.1);
	}
}
