//! Perspective camera and the pointer-to-world mapping.
//!
//! # Coordinate Spaces
//!
//! - **Surface**: CSS pixels relative to the canvas top-left, y down.
//! - **NDC**: normalized device coordinates, `[-1, 1]` on both axes, y up.
//! - **World**: the 3D space nodes live in. The camera sits on +Z looking at
//!   the origin; the cursor plane is `z = 0`.

use glam::{Mat4, Vec2, Vec3};

use super::config::CameraConfig;

/// Below this `|normal · direction|` a ray counts as parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Half-line from `origin` along unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	pub origin: Vec3,
	pub direction: Vec3,
}

/// Plane `normal · p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
	pub normal: Vec3,
	pub constant: f32,
}

impl Plane {
	/// The plane through the origin facing the camera's default view axis.
	pub const CURSOR: Plane = Plane {
		normal: Vec3::Z,
		constant: 0.0,
	};
}

impl Ray {
	/// First point where the ray meets `plane`, if any.
	///
	/// `None` when the ray runs parallel to the plane or the plane lies
	/// behind the origin.
	pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
		let denom = plane.normal.dot(self.direction);
		if denom.abs() < PARALLEL_EPSILON {
			return None;
		}
		let t = -(self.origin.dot(plane.normal) + plane.constant) / denom;
		if t < 0.0 {
			return None;
		}
		Some(self.origin + self.direction * t)
	}
}

/// A point projected onto the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	pub x: f64,
	pub y: f64,
	/// Distance in front of the camera along its view axis.
	pub depth: f32,
}

/// Perspective camera on +Z looking at the origin.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
	pub position: Vec3,
	fov_y: f32,
	near: f32,
	far: f32,
	aspect: f32,
	view: Mat4,
	view_proj: Mat4,
	inverse_view_proj: Mat4,
}

impl PerspectiveCamera {
	pub fn new(config: &CameraConfig, width: f64, height: f64) -> Self {
		let position = Vec3::new(0.0, 0.0, config.distance);
		let mut camera = Self {
			position,
			fov_y: config.fov_degrees.to_radians(),
			near: config.near,
			far: config.far,
			aspect: 1.0,
			view: Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y),
			view_proj: Mat4::IDENTITY,
			inverse_view_proj: Mat4::IDENTITY,
		};
		camera.set_viewport(width, height);
		camera
	}

	pub fn aspect(&self) -> f32 {
		self.aspect
	}

	/// Recompute aspect ratio and projection for a new surface size.
	pub fn set_viewport(&mut self, width: f64, height: f64) {
		// A collapsed container still needs a finite projection.
		self.aspect = if width > 0.0 && height > 0.0 {
			(width / height) as f32
		} else {
			1.0
		};
		let proj = Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far);
		self.view_proj = proj * self.view;
		self.inverse_view_proj = self.view_proj.inverse();
	}

	/// Ray from the camera through an NDC position.
	pub fn ray_through(&self, ndc: Vec2) -> Ray {
		let near = self
			.inverse_view_proj
			.project_point3(Vec3::new(ndc.x, ndc.y, -1.0));
		let far = self
			.inverse_view_proj
			.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
		Ray {
			origin: self.position,
			direction: (far - near).normalize_or_zero(),
		}
	}

	/// Project a world point onto a `width` x `height` surface.
	///
	/// `None` for points behind the camera or outside the depth range.
	pub fn project(&self, point: Vec3, width: f64, height: f64) -> Option<ScreenPoint> {
		let depth = -self.view.transform_point3(point).z;
		if depth < self.near || depth > self.far {
			return None;
		}
		let ndc = self.view_proj.project_point3(point);
		Some(ScreenPoint {
			x: (ndc.x as f64 + 1.0) * 0.5 * width,
			y: (1.0 - ndc.y as f64) * 0.5 * height,
			depth,
		})
	}

	/// Pixels covered by one world unit seen at `depth`.
	pub fn pixels_per_unit(&self, depth: f32, height: f64) -> f64 {
		height * 0.5 / ((self.fov_y * 0.5).tan() * depth) as f64
	}
}

/// Convert a surface position to NDC for a surface of the given size.
pub fn surface_to_ndc(x: f64, y: f64, width: f64, height: f64) -> Vec2 {
	if width <= 0.0 || height <= 0.0 {
		return Vec2::new(f32::MAX, f32::MAX);
	}
	Vec2::new(
		((x / width) * 2.0 - 1.0) as f32,
		(-(y / height) * 2.0 + 1.0) as f32,
	)
}
