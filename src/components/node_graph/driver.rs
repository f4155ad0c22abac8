//! Per-frame tick driver.
//!
//! [`FrameLoop`] abstracts the display's frame callback so the tick can be
//! driven by `requestAnimationFrame` in the browser or by hand in tests.
//! [`AnimationDriver`] turns host timestamps into elapsed time and runs one
//! tick: advance the scene, then render it.

use super::scene::SceneState;

/// Callback invoked once per display frame with a host timestamp (ms).
pub type TickFn = Box<dyn FnMut(f64)>;

/// A self-rescheduling frame callback chain.
pub trait FrameLoop {
	/// Begin calling `tick` once per frame until [`stop`](Self::stop).
	fn start(&mut self, tick: TickFn);
	/// Cancel the pending frame request and drop the callback.
	///
	/// Stopping an already stopped loop is a no-op.
	fn stop(&mut self);
	fn is_running(&self) -> bool;
}

/// Draws a scene and owns whatever drawing resources that takes.
pub trait Renderer {
	/// Refit the drawing surface to a new CSS size.
	fn resize(&mut self, width: f64, height: f64);
	/// Submit one frame.
	fn render(&mut self, scene: &SceneState);
	/// Release all drawing resources and detach the surface.
	///
	/// Must tolerate being called more than once.
	fn dispose(&mut self);
	/// Number of drawing resource handles still held.
	fn retained_resources(&self) -> usize;
}

/// Converts frame timestamps to elapsed time since the first tick.
#[derive(Clone, Debug, Default)]
pub struct AnimationDriver {
	origin_ms: Option<f64>,
	ticks: u64,
}

impl AnimationDriver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seconds since the first tick for a frame at `now_ms`.
	pub fn elapsed(&mut self, now_ms: f64) -> f64 {
		let origin = *self.origin_ms.get_or_insert(now_ms);
		((now_ms - origin) / 1000.0).max(0.0)
	}

	/// Run one tick: advance the scene to `now_ms`, then render it.
	pub fn tick<R: Renderer + ?Sized>(
		&mut self,
		now_ms: f64,
		scene: &mut SceneState,
		renderer: &mut R,
	) {
		let elapsed = self.elapsed(now_ms);
		scene.advance(elapsed);
		renderer.render(scene);
		self.ticks += 1;
	}

	/// Ticks run so far.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}
}
