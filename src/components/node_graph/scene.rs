//! Render set shared by the frame tick and the input handlers.
//!
//! Created once per activation, then mutated by pointer/resize events and
//! by each tick. Both run on the same single-threaded event loop, so they
//! never interleave.

use glam::Vec3;
use rand::Rng;

use super::camera::{PerspectiveCamera, surface_to_ndc};
use super::config::BackgroundConfig;
use super::cursor::{self, CursorEdgeBuffer, CursorState, CursorVisuals};
use super::generator::{self, GraphData};
use super::motion::GraphTransform;
use super::theme::Theme;

/// Pixel size of the rendering surface (CSS pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
	pub width: f64,
	pub height: f64,
}

impl SurfaceSize {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Everything the renderer needs to draw one frame.
pub struct SceneState {
	pub config: BackgroundConfig,
	pub theme: Theme,
	pub graph: GraphData,
	pub camera: PerspectiveCamera,
	pub size: SurfaceSize,
	pub transform: GraphTransform,
	/// Node positions under `transform`, refreshed in place each tick.
	live_nodes: Vec<Vec3>,
	pub cursor: CursorState,
	pub cursor_edges: CursorEdgeBuffer,
	pub cursor_visuals: CursorVisuals,
	/// Seconds since activation at the last tick.
	pub elapsed: f64,
}

impl SceneState {
	/// Generate a fresh graph and allocate the cursor edge buffer.
	pub fn new<R: Rng>(
		config: BackgroundConfig,
		theme: Theme,
		size: SurfaceSize,
		rng: &mut R,
	) -> Self {
		let graph = generator::generate(&config.graph, &theme.palette, rng);
		let live_nodes = graph.nodes.iter().map(|n| n.position).collect();
		let camera = PerspectiveCamera::new(&config.camera, size.width, size.height);
		let cursor_edges = CursorEdgeBuffer::with_capacity(config.cursor.max_edges);

		Self {
			config,
			theme,
			graph,
			camera,
			size,
			transform: GraphTransform::default(),
			live_nodes,
			cursor: CursorState::default(),
			cursor_edges,
			cursor_visuals: CursorVisuals::hidden(),
			elapsed: 0.0,
		}
	}

	/// Node positions as of the last tick.
	pub fn live_nodes(&self) -> &[Vec3] {
		&self.live_nodes
	}

	/// Advance to `elapsed` seconds: rotate the graph, then resolve the cursor.
	pub fn advance(&mut self, elapsed: f64) {
		self.elapsed = elapsed;
		self.transform = GraphTransform::at(elapsed, &self.config.motion);
		for (live, node) in self.live_nodes.iter_mut().zip(&self.graph.nodes) {
			*live = self.transform.apply(node.position);
		}

		self.cursor_visuals = cursor::update(
			&mut self.cursor,
			&mut self.cursor_edges,
			&self.camera,
			&self.live_nodes,
			elapsed,
			&self.config.cursor,
		);
	}

	/// Pointer moved to `(x, y)` relative to the surface.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.cursor.ndc = surface_to_ndc(x, y, self.size.width, self.size.height);
		self.cursor.active = true;
	}

	/// Pointer left the surface: hide the cursor now rather than next tick.
	pub fn pointer_leave(&mut self) {
		self.cursor.active = false;
		self.cursor.world = None;
		self.cursor_edges.clear();
		self.cursor_visuals = CursorVisuals::hidden();
	}

	/// Refit the camera to a new surface size. Graph data is untouched.
	pub fn resize(&mut self, size: SurfaceSize) {
		self.size = size;
		self.camera.set_viewport(size.width, size.height);
	}
}
