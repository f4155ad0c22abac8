//! Pointer-driven cursor node and its edges to nearby nodes.
//!
//! The cursor lives in unrotated world space: it is where the pointer ray
//! meets the cursor plane. Every tick it is linked to the first nodes (in
//! generation order) whose live position lies within reach.

use glam::{Vec2, Vec3};

use super::camera::{PerspectiveCamera, Plane};
use super::config::CursorConfig;

/// Where the pointer is and whether it is over the surface.
#[derive(Clone, Debug)]
pub struct CursorState {
	/// Last pointer position in NDC.
	pub ndc: Vec2,
	/// Cleared on pointer-leave, set on pointer-move.
	pub active: bool,
	/// Resolved intersection for the current frame.
	pub world: Option<Vec3>,
}

impl Default for CursorState {
	fn default() -> Self {
		// Far off-surface until the first pointer-move arrives.
		Self {
			ndc: Vec2::splat(9999.0),
			active: false,
			world: None,
		}
	}
}

/// One cursor edge: `(cursor point, node point)`.
pub type Segment = [Vec3; 2];

/// Fixed-capacity segment storage reused across frames.
///
/// Writing never reallocates. Slots past [`active_len`](Self::active_len)
/// may hold stale data from earlier frames and are never exposed.
#[derive(Clone, Debug)]
pub struct CursorEdgeBuffer {
	slots: Box<[Segment]>,
	active_len: usize,
}

impl CursorEdgeBuffer {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			slots: vec![[Vec3::ZERO; 2]; capacity].into_boxed_slice(),
			active_len: 0,
		}
	}

	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	pub fn active_len(&self) -> usize {
		self.active_len
	}

	pub fn is_full(&self) -> bool {
		self.active_len == self.slots.len()
	}

	/// Forget all drawn segments. Slot contents are left in place.
	pub fn clear(&mut self) {
		self.active_len = 0;
	}

	/// Write into the next free slot. Returns `false` when full.
	pub fn push(&mut self, segment: Segment) -> bool {
		match self.slots.get_mut(self.active_len) {
			Some(slot) => {
				*slot = segment;
				self.active_len += 1;
				true
			}
			None => false,
		}
	}

	/// The segments to draw this frame.
	pub fn active(&self) -> &[Segment] {
		&self.slots[..self.active_len]
	}

	/// Flattened `[x0, y0, z0, x1, y1, z1, ...]` of the active segments.
	pub fn active_vertices(&self) -> impl Iterator<Item = f32> + '_ {
		self.active()
			.iter()
			.flat_map(|[a, b]| a.to_array().into_iter().chain(b.to_array()))
	}
}

/// What the renderer shows for the cursor this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorVisuals {
	/// Marker core visibility.
	pub marker: bool,
	/// Marker halo visibility.
	pub halo: bool,
	/// Cursor edge line set visibility.
	pub edges: bool,
	pub position: Vec3,
	/// Pulse factor applied to marker and halo size.
	pub scale: f32,
}

impl CursorVisuals {
	pub fn hidden() -> Self {
		Self::default()
	}

	pub fn any_visible(&self) -> bool {
		self.marker || self.halo || self.edges
	}
}

/// Cosmetic size oscillation of the cursor marker.
pub fn pulse(elapsed: f64, config: &CursorConfig) -> f32 {
	1.0 + config.pulse_amplitude * (elapsed as f32 * config.pulse_frequency).sin()
}

/// Per-tick cursor resolution and cursor-edge rebuild.
///
/// `live_nodes` are node positions already rotated by this frame's
/// transform, in generation order.
pub fn update(
	cursor: &mut CursorState,
	edges: &mut CursorEdgeBuffer,
	camera: &PerspectiveCamera,
	live_nodes: &[Vec3],
	elapsed: f64,
	config: &CursorConfig,
) -> CursorVisuals {
	cursor.world = None;
	edges.clear();

	if !cursor.active {
		return CursorVisuals::hidden();
	}

	// A miss hides this frame without touching `active`.
	let Some(point) = camera
		.ray_through(cursor.ndc)
		.intersect_plane(&Plane::CURSOR)
	else {
		return CursorVisuals::hidden();
	};
	cursor.world = Some(point);

	for &node in live_nodes {
		if edges.is_full() {
			break;
		}
		if point.distance(node) < config.connect_distance {
			edges.push([point, node]);
		}
	}

	CursorVisuals {
		marker: true,
		halo: true,
		edges: true,
		position: point,
		scale: pulse(elapsed, config),
	}
}
