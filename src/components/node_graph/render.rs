//! Canvas rendering for the background.
//!
//! Each frame is drawn in passes, back to front:
//! 1. Clear to transparent so the application behind stays visible
//! 2. Static edges as one low-opacity line set
//! 3. Node halos, then node cores
//! 4. Cursor edges, cursor halo, cursor core

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::camera::ScreenPoint;
use super::driver::Renderer;
use super::error::{BackgroundError, js_error_text};
use super::scene::{SceneState, SurfaceSize};
use super::theme::{Color, LineStyle};

/// Draws a [`SceneState`] onto a 2D canvas appended to the container.
pub struct CanvasRenderer {
	canvas: Option<HtmlCanvasElement>,
	ctx: Option<CanvasRenderingContext2d>,
	pixel_ratio: f64,
	size: SurfaceSize,
	/// Per-node screen positions, reused across frames.
	projected: Vec<Option<ScreenPoint>>,
}

impl CanvasRenderer {
	/// Create the canvas, acquire its context and append it to `container`.
	pub fn attach(
		document: &Document,
		container: &HtmlElement,
		size: SurfaceSize,
		pixel_ratio: f64,
	) -> Result<Self, BackgroundError> {
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(BackgroundError::dom)?
			.dyn_into()
			.map_err(|_| BackgroundError::Dom("created element is not a canvas".into()))?;

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| BackgroundError::ContextUnavailable(js_error_text(&e)))?
			.ok_or_else(|| {
				BackgroundError::ContextUnavailable("2d context not supported".into())
			})?
			.dyn_into()
			.map_err(|_| BackgroundError::ContextUnavailable("unexpected context type".into()))?;

		let _ = canvas.style().set_property("display", "block");
		container.append_child(&canvas).map_err(BackgroundError::dom)?;

		let mut renderer = Self {
			canvas: Some(canvas),
			ctx: Some(ctx),
			pixel_ratio,
			size,
			projected: Vec::new(),
		};
		renderer.resize(size.width, size.height);
		Ok(renderer)
	}

	pub fn canvas(&self) -> Option<&HtmlCanvasElement> {
		self.canvas.as_ref()
	}
}

impl Renderer for CanvasRenderer {
	fn resize(&mut self, width: f64, height: f64) {
		self.size = SurfaceSize::new(width, height);
		let Some(canvas) = &self.canvas else {
			return;
		};
		canvas.set_width((width * self.pixel_ratio).round().max(0.0) as u32);
		canvas.set_height((height * self.pixel_ratio).round().max(0.0) as u32);
		let style = canvas.style();
		let _ = style.set_property("width", &format!("{width}px"));
		let _ = style.set_property("height", &format!("{height}px"));
	}

	fn render(&mut self, scene: &SceneState) {
		let Some(ctx) = &self.ctx else {
			return;
		};
		let (w, h) = (self.size.width, self.size.height);

		// Draw in CSS pixels; the backing store carries the pixel ratio.
		let _ = ctx.set_transform(self.pixel_ratio, 0.0, 0.0, self.pixel_ratio, 0.0, 0.0);
		ctx.clear_rect(0.0, 0.0, w, h);

		self.projected.clear();
		self.projected.extend(
			scene
				.live_nodes()
				.iter()
				.map(|&p| scene.camera.project(p, w, h)),
		);

		draw_static_edges(ctx, scene, &self.projected);
		draw_nodes(ctx, scene, &self.projected, h);
		draw_cursor(ctx, scene, w, h);
	}

	fn dispose(&mut self) {
		self.ctx = None;
		if let Some(canvas) = self.canvas.take() {
			// Zero-sized backing store lets the browser drop the pixels now.
			canvas.set_width(0);
			canvas.set_height(0);
			canvas.remove();
		}
		self.projected = Vec::new();
	}

	fn retained_resources(&self) -> usize {
		usize::from(self.canvas.is_some()) + usize::from(self.ctx.is_some())
	}
}

fn stroke_style(ctx: &CanvasRenderingContext2d, style: &LineStyle) {
	ctx.set_stroke_style_str(&style.color.to_css());
	ctx.set_line_width(style.width);
}

fn draw_static_edges(
	ctx: &CanvasRenderingContext2d,
	scene: &SceneState,
	projected: &[Option<ScreenPoint>],
) {
	stroke_style(ctx, &scene.theme.static_edge);
	ctx.begin_path();
	for edge in &scene.graph.edges {
		if let (Some(Some(a)), Some(Some(b))) = (projected.get(edge.a), projected.get(edge.b)) {
			ctx.move_to(a.x, a.y);
			ctx.line_to(b.x, b.y);
		}
	}
	ctx.stroke();
}

fn draw_nodes(
	ctx: &CanvasRenderingContext2d,
	scene: &SceneState,
	projected: &[Option<ScreenPoint>],
	height: f64,
) {
	let style = &scene.theme.node;

	// Pass 1: halos
	for (node, point) in scene.graph.nodes.iter().zip(projected) {
		if let Some(p) = point {
			let scale = scene.camera.pixels_per_unit(p.depth, height);
			let halo = node.color.with_alpha(style.halo_alpha);
			fill_circle(ctx, p, style.halo_radius as f64 * scale, halo);
		}
	}

	// Pass 2: cores
	for (node, point) in scene.graph.nodes.iter().zip(projected) {
		if let Some(p) = point {
			let scale = scene.camera.pixels_per_unit(p.depth, height);
			fill_circle(ctx, p, style.core_radius as f64 * scale, node.color);
		}
	}
}

fn draw_cursor(ctx: &CanvasRenderingContext2d, scene: &SceneState, w: f64, h: f64) {
	let visuals = &scene.cursor_visuals;
	if !visuals.any_visible() {
		return;
	}
	let camera = &scene.camera;

	if visuals.edges {
		stroke_style(ctx, &scene.theme.cursor_edge);
		ctx.begin_path();
		for [from, to] in scene.cursor_edges.active() {
			if let (Some(a), Some(b)) = (camera.project(*from, w, h), camera.project(*to, w, h)) {
				ctx.move_to(a.x, a.y);
				ctx.line_to(b.x, b.y);
			}
		}
		ctx.stroke();
	}

	let Some(center) = camera.project(visuals.position, w, h) else {
		return;
	};
	let style = &scene.theme.cursor;
	let scale = visuals.scale as f64 * camera.pixels_per_unit(center.depth, h);
	if visuals.halo {
		let halo = scene.theme.cursor_halo_color.with_alpha(style.halo_alpha);
		fill_circle(ctx, &center, style.halo_radius as f64 * scale, halo);
	}
	if visuals.marker {
		let core = scene.theme.cursor_core_color;
		fill_circle(ctx, &center, style.core_radius as f64 * scale, core);
	}
}

fn fill_circle(ctx: &CanvasRenderingContext2d, at: &ScreenPoint, radius: f64, color: Color) {
	if radius <= 0.0 {
		return;
	}
	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}
