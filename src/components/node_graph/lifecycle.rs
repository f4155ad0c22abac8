//! Activation and teardown of the background.
//!
//! [`Background`] is a two-state machine (inactive/active). Activation
//! allocates the drawing surface, generates the graph, attaches the
//! pointer and resize listeners, and starts the frame loop. Deactivation
//! undoes each of those, in reverse, on every exit path.
//!
//! Everything platform-specific sits behind [`Host`], so the same state
//! machine runs in the browser and in native tests.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::Rng;

use super::config::BackgroundConfig;
use super::driver::{AnimationDriver, FrameLoop, Renderer};
use super::error::BackgroundError;
use super::scene::{SceneState, SurfaceSize};
use super::theme::Theme;

/// Listeners attached for the lifetime of an activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
	PointerMove,
	PointerLeave,
	Resize,
}

impl ListenerKind {
	pub const ALL: [ListenerKind; 3] = [Self::PointerMove, Self::PointerLeave, Self::Resize];
}

/// Input delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
	/// Pointer position relative to the surface, CSS pixels.
	PointerMove { x: f64, y: f64 },
	PointerLeave,
	/// New container size.
	Resize(SurfaceSize),
}

impl HostEvent {
	pub fn kind(&self) -> ListenerKind {
		match self {
			Self::PointerMove { .. } => ListenerKind::PointerMove,
			Self::PointerLeave => ListenerKind::PointerLeave,
			Self::Resize(_) => ListenerKind::Resize,
		}
	}
}

/// Handler the host calls for each event of a subscribed kind.
pub type EventFn = Box<dyn FnMut(HostEvent)>;

/// An attached listener together with the call that removes it.
///
/// The removal is captured when the listener is attached, so every
/// listener has exactly one way out. Dropping a subscription detaches it.
pub struct Subscription {
	kind: ListenerKind,
	detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub fn new(kind: ListenerKind, detach: impl FnOnce() + 'static) -> Self {
		Self {
			kind,
			detach: Some(Box::new(detach)),
		}
	}

	pub fn kind(&self) -> ListenerKind {
		self.kind
	}

	/// Remove the listener from the host.
	pub fn detach(mut self) {
		self.run_detach();
	}

	fn run_detach(&mut self) {
		if let Some(detach) = self.detach.take() {
			detach();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.run_detach();
	}
}

/// Platform services the background needs.
pub trait Host {
	type Renderer: Renderer + 'static;
	type Frames: FrameLoop;

	/// Current pixel size of the mounting container.
	fn container_size(&self) -> Result<SurfaceSize, BackgroundError>;

	/// Allocate a drawing surface sized to the container and attach it.
	fn create_renderer(
		&mut self,
		size: SurfaceSize,
		config: &BackgroundConfig,
	) -> Result<Self::Renderer, BackgroundError>;

	/// Attach a listener for `kind`.
	fn subscribe(
		&mut self,
		kind: ListenerKind,
		handler: EventFn,
	) -> Result<Subscription, BackgroundError>;

	/// A fresh, stopped frame loop.
	fn frame_loop(&mut self) -> Self::Frames;
}

/// Resources owned for the duration of one activation.
struct Activation<H: Host> {
	scene: Rc<RefCell<SceneState>>,
	renderer: Rc<RefCell<H::Renderer>>,
	frames: H::Frames,
	subscriptions: Vec<Subscription>,
}

impl<H: Host> Activation<H> {
	fn attach_listeners(&mut self, host: &mut H) -> Result<(), BackgroundError> {
		for kind in ListenerKind::ALL {
			let (scene, renderer) = (self.scene.clone(), self.renderer.clone());
			let handler: EventFn = Box::new(move |event| match event {
				HostEvent::PointerMove { x, y } => scene.borrow_mut().pointer_move(x, y),
				HostEvent::PointerLeave => scene.borrow_mut().pointer_leave(),
				HostEvent::Resize(size) => {
					scene.borrow_mut().resize(size);
					renderer.borrow_mut().resize(size.width, size.height);
				}
			});
			let subscription = host.subscribe(kind, handler)?;
			self.subscriptions.push(subscription);
		}
		Ok(())
	}

	fn start(&mut self) {
		let (scene, renderer) = (self.scene.clone(), self.renderer.clone());
		let mut driver = AnimationDriver::new();
		self.frames.start(Box::new(move |now_ms| {
			driver.tick(now_ms, &mut scene.borrow_mut(), &mut *renderer.borrow_mut());
		}));
	}

	fn teardown(&mut self) {
		self.frames.stop();
		for subscription in self.subscriptions.drain(..) {
			subscription.detach();
		}
		let mut renderer = self.renderer.borrow_mut();
		renderer.dispose();
		debug_assert_eq!(renderer.retained_resources(), 0);
	}
}

/// The background visualization bound to one host container.
pub struct Background<H: Host> {
	host: H,
	config: BackgroundConfig,
	theme: Theme,
	active: Option<Activation<H>>,
}

impl<H: Host> Background<H> {
	pub fn new(host: H, config: BackgroundConfig, theme: Theme) -> Self {
		Self {
			host,
			config,
			theme,
			active: None,
		}
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn is_active(&self) -> bool {
		self.active.is_some()
	}

	/// Read the current scene, if active.
	pub fn with_scene<T>(&self, f: impl FnOnce(&SceneState) -> T) -> Option<T> {
		self.active.as_ref().map(|a| f(&a.scene.borrow()))
	}

	/// Inactive → active. A no-op when already active.
	///
	/// On failure everything allocated so far is released again before the
	/// error is returned.
	pub fn activate<R: Rng>(&mut self, rng: &mut R) -> Result<(), BackgroundError> {
		if self.active.is_some() {
			debug!("node-graph-bg: already active");
			return Ok(());
		}

		let size = self.host.container_size()?;
		let renderer = self.host.create_renderer(size, &self.config)?;
		let scene = SceneState::new(self.config.clone(), self.theme.clone(), size, rng);
		let (nodes, edges) = (scene.graph.nodes.len(), scene.graph.edges.len());

		let mut activation = Activation::<H> {
			scene: Rc::new(RefCell::new(scene)),
			renderer: Rc::new(RefCell::new(renderer)),
			frames: self.host.frame_loop(),
			subscriptions: Vec::with_capacity(ListenerKind::ALL.len()),
		};

		if let Err(err) = activation.attach_listeners(&mut self.host) {
			warn!("node-graph-bg: activation failed: {err}");
			activation.teardown();
			return Err(err);
		}
		activation.start();
		self.active = Some(activation);

		info!(
			"node-graph-bg: active at {}x{} with {} nodes, {} edges",
			size.width, size.height, nodes, edges
		);
		Ok(())
	}

	/// Active → inactive. Safe to call in any state, any number of times.
	pub fn deactivate(&mut self) {
		if let Some(mut activation) = self.active.take() {
			activation.teardown();
			info!("node-graph-bg: deactivated");
		}
	}
}

impl<H: Host> Drop for Background<H> {
	fn drop(&mut self) {
		self.deactivate();
	}
}

#[cfg(test)]
mod tests {
	use glam::Vec3;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::node_graph::testing::MockHost;

	fn background(host: MockHost) -> Background<MockHost> {
		Background::new(host, BackgroundConfig::default(), Theme::default())
	}

	/// Seed whose default graph has at least 8 nodes near the origin at t=0.
	fn dense_seed() -> u64 {
		(0..64)
			.find(|&seed| {
				let scene = SceneState::new(
					BackgroundConfig::default(),
					Theme::default(),
					SurfaceSize::new(800.0, 600.0),
					&mut StdRng::seed_from_u64(seed),
				);
				scene
					.graph
					.nodes
					.iter()
					.filter(|n| n.position.length() < 5.0)
					.count() >= 8
			})
			.unwrap()
	}

	#[test]
	fn repeated_cycles_return_to_baseline() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		let mut rng = StdRng::seed_from_u64(0);

		for _ in 0..10 {
			bg.activate(&mut rng).unwrap();
			let ledger = bg.host().ledger();
			assert_eq!(ledger.listeners.get(), 3);
			assert!(ledger.resources.get() > 0);
			assert!(bg.host().frames_running());

			bg.deactivate();
			let ledger = bg.host().ledger();
			assert_eq!(ledger.listeners.get(), 0);
			assert_eq!(ledger.resources.get(), 0);
			assert!(!bg.host().frames_running());
			assert!(!bg.is_active());
		}
	}

	#[test]
	fn deactivate_is_idempotent() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		bg.deactivate();
		bg.activate(&mut StdRng::seed_from_u64(1)).unwrap();
		bg.deactivate();
		bg.deactivate();
		assert_eq!(bg.host().ledger().listeners.get(), 0);
		assert_eq!(bg.host().ledger().resources.get(), 0);
	}

	#[test]
	fn activate_twice_keeps_single_set_of_listeners() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		let mut rng = StdRng::seed_from_u64(1);
		bg.activate(&mut rng).unwrap();
		bg.activate(&mut rng).unwrap();
		assert_eq!(bg.host().ledger().listeners.get(), 3);
	}

	#[test]
	fn missing_context_fails_cleanly() {
		let mut host = MockHost::new(800.0, 600.0);
		host.fail_context = true;
		let mut bg = background(host);

		let err = bg.activate(&mut StdRng::seed_from_u64(1)).unwrap_err();

		assert!(matches!(err, BackgroundError::ContextUnavailable(_)));
		assert!(!bg.is_active());
		assert_eq!(bg.host().ledger().listeners.get(), 0);
		assert_eq!(bg.host().ledger().resources.get(), 0);
		bg.deactivate();
	}

	#[test]
	fn listener_failure_rolls_back_partial_setup() {
		let mut host = MockHost::new(800.0, 600.0);
		host.fail_listener = Some(ListenerKind::Resize);
		let mut bg = background(host);

		let err = bg.activate(&mut StdRng::seed_from_u64(1)).unwrap_err();

		assert!(matches!(
			err,
			BackgroundError::Listener {
				kind: ListenerKind::Resize,
				..
			}
		));
		assert_eq!(bg.host().ledger().listeners.get(), 0);
		assert_eq!(bg.host().ledger().resources.get(), 0);
		assert!(!bg.host().frames_running());
	}

	#[test]
	fn drop_releases_everything() {
		let host = MockHost::new(800.0, 600.0);
		let ledger = host.ledger();
		{
			let mut bg = background(host);
			bg.activate(&mut StdRng::seed_from_u64(1)).unwrap();
			assert_eq!(ledger.listeners.get(), 3);
		}
		assert_eq!(ledger.listeners.get(), 0);
		assert_eq!(ledger.resources.get(), 0);
	}

	#[test]
	fn pointer_drives_cursor_edges_through_frames() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		bg.activate(&mut StdRng::seed_from_u64(dense_seed())).unwrap();

		bg.host().dispatch(HostEvent::PointerMove { x: 400.0, y: 300.0 });
		bg.host().fire_frame(1000.0);

		let ledger = bg.host().ledger();
		assert_eq!(ledger.frames.get(), 1);
		assert_eq!(ledger.last_active_len.get(), 8);
		bg.with_scene(|scene| {
			let point = scene.cursor.world.unwrap();
			assert!(point.abs_diff_eq(Vec3::ZERO, 1e-4));
			assert!(scene.cursor_edges.active().iter().all(|s| s[0] == point));
		})
		.unwrap();
	}

	#[test]
	fn pointer_leave_hides_cursor_before_next_frame() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		bg.activate(&mut StdRng::seed_from_u64(dense_seed())).unwrap();
		bg.host().dispatch(HostEvent::PointerMove { x: 400.0, y: 300.0 });
		bg.host().fire_frame(0.0);
		assert_eq!(bg.host().ledger().last_active_len.get(), 8);

		bg.host().dispatch(HostEvent::PointerLeave);

		bg.with_scene(|scene| {
			assert!(!scene.cursor.active);
			assert!(!scene.cursor_visuals.any_visible());
			assert_eq!(scene.cursor_edges.active_len(), 0);
		})
		.unwrap();

		bg.host().fire_frame(16.0);
		assert_eq!(bg.host().ledger().last_active_len.get(), 0);
		assert!(!bg.host().ledger().last_cursor_visible.get());
	}

	#[test]
	fn resize_refits_without_regenerating() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		bg.activate(&mut StdRng::seed_from_u64(4)).unwrap();
		let before = bg.with_scene(|s| s.graph.nodes.clone()).unwrap();

		bg.host()
			.dispatch(HostEvent::Resize(SurfaceSize::new(1024.0, 256.0)));

		bg.with_scene(|s| {
			assert_eq!(s.graph.nodes, before);
			assert_eq!(s.size, SurfaceSize::new(1024.0, 256.0));
			assert!((s.camera.aspect() - 4.0).abs() < 1e-6);
		})
		.unwrap();
		assert_eq!(bg.host().ledger().last_resize.get(), (1024.0, 256.0));
	}

	#[test]
	fn reactivation_regenerates_graph() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		let mut rng = StdRng::seed_from_u64(8);
		bg.activate(&mut rng).unwrap();
		let first = bg.with_scene(|s| s.graph.nodes.clone()).unwrap();
		bg.deactivate();
		assert!(bg.with_scene(|_| ()).is_none());

		bg.activate(&mut rng).unwrap();
		let second = bg.with_scene(|s| s.graph.nodes.clone()).unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn events_after_deactivation_reach_nothing() {
		let mut bg = background(MockHost::new(800.0, 600.0));
		bg.activate(&mut StdRng::seed_from_u64(2)).unwrap();
		bg.deactivate();

		bg.host().dispatch(HostEvent::PointerMove { x: 1.0, y: 1.0 });
		bg.host().fire_frame(100.0);
		assert_eq!(bg.host().ledger().frames.get(), 0);
	}
}
