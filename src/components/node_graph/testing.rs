//! In-memory host, renderer and frame loop for native tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::config::BackgroundConfig;
use super::driver::{FrameLoop, Renderer, TickFn};
use super::error::BackgroundError;
use super::lifecycle::{EventFn, Host, HostEvent, ListenerKind, Subscription};
use super::scene::{SceneState, SurfaceSize};

/// Handles a renderer holds: context, static geometry, cursor geometry.
const HANDLES_PER_RENDERER: usize = 3;

/// Counters shared between a [`MockHost`] and everything it hands out.
#[derive(Debug, Default)]
pub struct Ledger {
	pub listeners: Cell<usize>,
	pub resources: Cell<usize>,
	pub frames: Cell<usize>,
	pub last_active_len: Cell<usize>,
	pub last_cursor_visible: Cell<bool>,
	pub last_resize: Cell<(f64, f64)>,
}

/// Renderer that records what it was asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
	pub frames: usize,
	handles: usize,
	ledger: Option<Rc<Ledger>>,
}

impl RecordingRenderer {
	fn allocate(ledger: Rc<Ledger>) -> Self {
		ledger
			.resources
			.set(ledger.resources.get() + HANDLES_PER_RENDERER);
		Self {
			frames: 0,
			handles: HANDLES_PER_RENDERER,
			ledger: Some(ledger),
		}
	}
}

impl Renderer for RecordingRenderer {
	fn resize(&mut self, width: f64, height: f64) {
		if let Some(ledger) = &self.ledger {
			ledger.last_resize.set((width, height));
		}
	}

	fn render(&mut self, scene: &SceneState) {
		self.frames += 1;
		if let Some(ledger) = &self.ledger {
			ledger.frames.set(ledger.frames.get() + 1);
			ledger.last_active_len.set(scene.cursor_edges.active_len());
			ledger
				.last_cursor_visible
				.set(scene.cursor_visuals.any_visible());
		}
	}

	fn dispose(&mut self) {
		if let Some(ledger) = &self.ledger {
			ledger.resources.set(ledger.resources.get() - self.handles);
		}
		self.handles = 0;
	}

	fn retained_resources(&self) -> usize {
		self.handles
	}
}

/// Frame loop fired by hand through [`MockHost::fire_frame`].
pub struct ManualFrames {
	tick: Rc<RefCell<Option<TickFn>>>,
}

impl FrameLoop for ManualFrames {
	fn start(&mut self, tick: TickFn) {
		*self.tick.borrow_mut() = Some(tick);
	}

	fn stop(&mut self) {
		self.tick.borrow_mut().take();
	}

	fn is_running(&self) -> bool {
		self.tick.borrow().is_some()
	}
}

type HandlerTable = Rc<RefCell<Vec<(u64, ListenerKind, EventFn)>>>;

/// Host backed by plain memory.
pub struct MockHost {
	size: SurfaceSize,
	ledger: Rc<Ledger>,
	handlers: HandlerTable,
	tick: Rc<RefCell<Option<TickFn>>>,
	next_id: u64,
	/// Refuse to create a renderer.
	pub fail_context: bool,
	/// Refuse to attach this listener kind.
	pub fail_listener: Option<ListenerKind>,
}

impl MockHost {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			size: SurfaceSize::new(width, height),
			ledger: Rc::default(),
			handlers: Rc::default(),
			tick: Rc::default(),
			next_id: 0,
			fail_context: false,
			fail_listener: None,
		}
	}

	pub fn ledger(&self) -> Rc<Ledger> {
		self.ledger.clone()
	}

	pub fn frames_running(&self) -> bool {
		self.tick.borrow().is_some()
	}

	/// Deliver an event to every handler of its kind.
	pub fn dispatch(&self, event: HostEvent) {
		let kind = event.kind();
		for (_, k, handler) in self.handlers.borrow_mut().iter_mut() {
			if *k == kind {
				handler(event);
			}
		}
	}

	/// Run one frame at host time `now_ms`, if the loop is running.
	pub fn fire_frame(&self, now_ms: f64) {
		if let Some(tick) = self.tick.borrow_mut().as_mut() {
			tick(now_ms);
		}
	}
}

impl Host for MockHost {
	type Renderer = RecordingRenderer;
	type Frames = ManualFrames;

	fn container_size(&self) -> Result<SurfaceSize, BackgroundError> {
		Ok(self.size)
	}

	fn create_renderer(
		&mut self,
		_size: SurfaceSize,
		_config: &BackgroundConfig,
	) -> Result<Self::Renderer, BackgroundError> {
		if self.fail_context {
			return Err(BackgroundError::ContextUnavailable("mock".into()));
		}
		Ok(RecordingRenderer::allocate(self.ledger.clone()))
	}

	fn subscribe(
		&mut self,
		kind: ListenerKind,
		handler: EventFn,
	) -> Result<Subscription, BackgroundError> {
		if self.fail_listener == Some(kind) {
			return Err(BackgroundError::Listener {
				kind,
				reason: "mock".into(),
			});
		}

		let id = self.next_id;
		self.next_id += 1;
		self.handlers.borrow_mut().push((id, kind, handler));
		self.ledger.listeners.set(self.ledger.listeners.get() + 1);

		let (handlers, ledger) = (self.handlers.clone(), self.ledger.clone());
		Ok(Subscription::new(kind, move || {
			handlers.borrow_mut().retain(|(h, _, _)| *h != id);
			ledger.listeners.set(ledger.listeners.get() - 1);
		}))
	}

	fn frame_loop(&mut self) -> Self::Frames {
		ManualFrames {
			tick: self.tick.clone(),
		}
	}
}
