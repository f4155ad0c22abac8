//! Rigid rotation applied to all nodes and static edges.

use glam::{Quat, Vec3};

use super::config::MotionConfig;

/// Yaw/pitch of the graph at one instant.
///
/// Always derived from elapsed time, never accumulated per frame, so a
/// given elapsed time yields the same pose at any frame rate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphTransform {
	/// Rotation about Y, radians.
	pub yaw: f32,
	/// Rotation about X, radians.
	pub pitch: f32,
	rotation: Quat,
}

impl GraphTransform {
	/// Pose at `elapsed` seconds since activation.
	pub fn at(elapsed: f64, motion: &MotionConfig) -> Self {
		let t = elapsed as f32;
		let yaw = t * motion.yaw_speed;
		let pitch = (t * motion.pitch_frequency).sin() * motion.pitch_amplitude;
		Self {
			yaw,
			pitch,
			// X then Y intrinsic: pitch is applied on top of the yaw.
			rotation: Quat::from_rotation_x(pitch) * Quat::from_rotation_y(yaw),
		}
	}

	/// Live world position of a static point.
	pub fn apply(&self, point: Vec3) -> Vec3 {
		self.rotation * point
	}
}
