//! Browser implementation of [`Host`].
//!
//! Pointer-move is tracked on the window and pointer-leave on the document,
//! since the background container itself ignores pointer events so the UI
//! above it stays interactive.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::config::BackgroundConfig;
use super::driver::{FrameLoop, TickFn};
use super::error::{BackgroundError, js_error_text};
use super::lifecycle::{EventFn, Host, HostEvent, ListenerKind, Subscription};
use super::render::CanvasRenderer;
use super::scene::SurfaceSize;

/// Fresh random source for one activation.
pub fn entropy_rng() -> StdRng {
	let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64 ^ js_sys::Date::now() as u64;
	StdRng::seed_from_u64(seed)
}

/// Host backed by a DOM container element.
pub struct WebHost {
	window: Window,
	document: Document,
	container: HtmlElement,
	/// Surface created by the last `create_renderer`, for pointer offsets.
	canvas: Rc<RefCell<Option<HtmlCanvasElement>>>,
}

impl WebHost {
	pub fn new(container: HtmlElement) -> Result<Self, BackgroundError> {
		let window = web_sys::window().ok_or(BackgroundError::NoWindow)?;
		let document = window.document().ok_or(BackgroundError::NoWindow)?;
		Ok(Self {
			window,
			document,
			container,
			canvas: Rc::default(),
		})
	}

	fn listen(
		kind: ListenerKind,
		target: EventTarget,
		event: &'static str,
		callback: Closure<dyn FnMut(Event)>,
	) -> Result<Subscription, BackgroundError> {
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|e| BackgroundError::Listener {
				kind,
				reason: js_error_text(&e),
			})?;

		Ok(Subscription::new(kind, move || {
			let _ = target.remove_event_listener_with_callback(
				event,
				callback.as_ref().unchecked_ref(),
			);
			// `callback` is dropped only after it is no longer registered.
			drop(callback);
		}))
	}
}

impl Host for WebHost {
	type Renderer = CanvasRenderer;
	type Frames = AnimationFrameLoop;

	fn container_size(&self) -> Result<SurfaceSize, BackgroundError> {
		Ok(SurfaceSize::new(
			self.container.client_width() as f64,
			self.container.client_height() as f64,
		))
	}

	fn create_renderer(
		&mut self,
		size: SurfaceSize,
		config: &BackgroundConfig,
	) -> Result<Self::Renderer, BackgroundError> {
		let pixel_ratio = self
			.window
			.device_pixel_ratio()
			.min(config.camera.max_pixel_ratio)
			.max(1.0);
		let renderer = CanvasRenderer::attach(&self.document, &self.container, size, pixel_ratio)?;
		*self.canvas.borrow_mut() = renderer.canvas().cloned();
		Ok(renderer)
	}

	fn subscribe(
		&mut self,
		kind: ListenerKind,
		mut handler: EventFn,
	) -> Result<Subscription, BackgroundError> {
		match kind {
			ListenerKind::PointerMove => {
				let (canvas, container) = (self.canvas.clone(), self.container.clone());
				let callback: Closure<dyn FnMut(Event)> = Closure::new(move |ev: Event| {
					let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
						return;
					};
					let rect = match canvas.borrow().as_ref() {
						Some(c) => c.get_bounding_client_rect(),
						None => container.get_bounding_client_rect(),
					};
					handler(HostEvent::PointerMove {
						x: ev.client_x() as f64 - rect.left(),
						y: ev.client_y() as f64 - rect.top(),
					});
				});
				Self::listen(kind, self.window.clone().into(), "mousemove", callback)
			}
			ListenerKind::PointerLeave => {
				let callback: Closure<dyn FnMut(Event)> =
					Closure::new(move |_: Event| handler(HostEvent::PointerLeave));
				Self::listen(kind, self.document.clone().into(), "mouseleave", callback)
			}
			ListenerKind::Resize => {
				let container = self.container.clone();
				let callback: Closure<dyn FnMut(Event)> = Closure::new(move |_: Event| {
					handler(HostEvent::Resize(SurfaceSize::new(
						container.client_width() as f64,
						container.client_height() as f64,
					)));
				});
				Self::listen(kind, self.window.clone().into(), "resize", callback)
			}
		}
	}

	fn frame_loop(&mut self) -> Self::Frames {
		AnimationFrameLoop::new(self.window.clone())
	}
}

/// [`FrameLoop`] over `requestAnimationFrame`.
///
/// Each frame runs the tick and then requests the next frame. `stop`
/// cancels the outstanding request and drops the callback chain.
pub struct AnimationFrameLoop {
	window: Window,
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	pending: Rc<Cell<Option<i32>>>,
}

impl AnimationFrameLoop {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: Rc::default(),
			pending: Rc::default(),
		}
	}

	fn request(
		window: &Window,
		callback: &RefCell<Option<Closure<dyn FnMut(f64)>>>,
		pending: &Cell<Option<i32>>,
	) {
		if let Some(cb) = callback.borrow().as_ref() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => pending.set(Some(id)),
				Err(e) => warn!(
					"node-graph-bg: requestAnimationFrame failed: {}",
					js_error_text(&e)
				),
			}
		}
	}
}

impl FrameLoop for AnimationFrameLoop {
	fn start(&mut self, mut tick: TickFn) {
		self.stop();

		let (window, callback, pending) =
			(self.window.clone(), self.callback.clone(), self.pending.clone());
		*self.callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			pending.set(None);
			tick(now);
			Self::request(&window, &callback, &pending);
		}));

		Self::request(&self.window, &self.callback, &self.pending);
	}

	fn stop(&mut self) {
		if let Some(id) = self.pending.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// Breaks the closure's reference back to itself.
		self.callback.borrow_mut().take();
	}

	fn is_running(&self) -> bool {
		self.callback.borrow().is_some()
	}
}

impl Drop for AnimationFrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}
