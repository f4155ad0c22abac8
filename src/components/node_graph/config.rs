//! Tunable parameters for the background.
//!
//! Every section deserializes with `#[serde(default)]`, so a host page can
//! override any subset of values and leave the rest at their defaults:
//!
//! ```json
//! { "graph": { "node_count": 60 }, "cursor": { "max_edges": 4 } }
//! ```

use serde::Deserialize;

/// Graph generation parameters (see [`generate`](super::generator::generate)).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
	/// Number of nodes generated per activation.
	pub node_count: usize,
	/// Half-extent of the sampling box on X and Y (world units).
	pub spread_xy: f32,
	/// Half-extent of the sampling box on Z (world units).
	pub spread_z: f32,
	/// Two nodes closer than this get a static edge.
	pub connect_distance: f32,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			node_count: 100,
			spread_xy: 9.0,
			spread_z: 5.0,
			connect_distance: 3.2,
		}
	}
}

/// Rigid rotation of the graph over time.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
	/// Yaw rate in radians per second.
	pub yaw_speed: f32,
	/// Peak pitch in radians.
	pub pitch_amplitude: f32,
	/// Angular frequency of the pitch sway (radians per second).
	pub pitch_frequency: f32,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			yaw_speed: 0.04,
			pitch_amplitude: 0.18,
			pitch_frequency: 0.025,
		}
	}
}

/// Cursor node behaviour.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CursorConfig {
	/// Nodes closer than this to the cursor point get a cursor edge.
	pub connect_distance: f32,
	/// Capacity of the cursor edge buffer.
	pub max_edges: usize,
	/// Relative size swing of the cursor marker.
	pub pulse_amplitude: f32,
	/// Angular frequency of the pulse (radians per second).
	pub pulse_frequency: f32,
}

impl Default for CursorConfig {
	fn default() -> Self {
		Self {
			connect_distance: 5.0,
			max_edges: 8,
			pulse_amplitude: 0.18,
			pulse_frequency: 4.0,
		}
	}
}

/// Perspective camera placed on +Z looking at the origin.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov_degrees: f32,
	/// Near clip distance.
	pub near: f32,
	/// Far clip distance.
	pub far: f32,
	/// Distance from the origin along +Z.
	pub distance: f32,
	/// Upper bound applied to `devicePixelRatio` when sizing the backing store.
	pub max_pixel_ratio: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			fov_degrees: 55.0,
			near: 0.1,
			far: 100.0,
			distance: 14.0,
			max_pixel_ratio: 2.0,
		}
	}
}

/// Complete configuration for one background instance.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundConfig {
	pub graph: GraphConfig,
	pub motion: MotionConfig,
	pub cursor: CursorConfig,
	pub camera: CameraConfig,
}

impl BackgroundConfig {
	/// Parse a (possibly partial) JSON override.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
