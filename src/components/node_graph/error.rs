//! Failure modes of bringing the background up.
//!
//! Only activation can fail. Frame ticks and input handlers are infallible:
//! a missing ray/plane intersection is a normal "nothing to draw" frame.

use thiserror::Error;
use wasm_bindgen::JsValue;

use super::lifecycle::ListenerKind;

/// Errors surfaced by [`Background::activate`](super::lifecycle::Background::activate).
#[derive(Debug, Error)]
pub enum BackgroundError {
	/// No `window` or `document` is reachable (e.g. running outside a browser).
	#[error("browser window or document is not available")]
	NoWindow,
	/// The surface could not hand out a drawing context.
	#[error("rendering context unavailable: {0}")]
	ContextUnavailable(String),
	/// A DOM call threw.
	#[error("DOM operation failed: {0}")]
	Dom(String),
	/// The host refused to attach a listener.
	#[error("could not attach {kind:?} listener: {reason}")]
	Listener {
		/// Which listener was being attached.
		kind: ListenerKind,
		/// Host-provided failure text.
		reason: String,
	},
}

impl BackgroundError {
	/// Wrap a thrown JS value as a [`BackgroundError::Dom`].
	pub fn dom(err: JsValue) -> Self {
		Self::Dom(js_error_text(&err))
	}
}

/// Best-effort readable text for a thrown JS value.
pub fn js_error_text(err: &JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
