//! Ambient node-graph background.
//!
//! Renders a procedurally generated 3D point cloud behind the application:
//! - Nodes sampled inside a box and linked to neighbours within reach
//! - A slow rigid rotation driven purely by elapsed time
//! - A pulsing cursor node where the pointer ray meets the `z = 0` plane,
//!   linked to up to `max_edges` nearby nodes every frame
//!
//! The lifecycle, tick and cursor logic are platform independent; the
//! browser pieces live in `web`, `render` and `component`.
//!
//! # Example
//!
//! ```ignore
//! use node_graph_bg::NodeGraphBackground;
//!
//! view! {
//!     <div style="position: relative">
//!         <NodeGraphBackground />
//!         <main>"app content"</main>
//!     </div>
//! }
//! ```

pub mod camera;
mod component;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod motion;
mod render;
pub mod scene;
#[cfg(test)]
mod testing;
pub mod theme;
mod web;

pub use component::NodeGraphBackground;
pub use config::BackgroundConfig;
pub use error::BackgroundError;
pub use lifecycle::{Background, Host};
pub use render::CanvasRenderer;
pub use theme::Theme;
pub use web::{AnimationFrameLoop, WebHost};
