//! # Virus Field
//!
//! An interactive particle-network effect: a density-adaptive set of 2D
//! particles drifting under friction, bouncing off the surface edges and
//! drawn towards the pointer, linked by lines that fade with distance.
//!
//! ## Features
//!
//! - **Density-adaptive count**: particle count follows the surface area within fixed bounds
//! - **Pointer attraction**: capped inverse-distance pull, skipped when the pointer is outside
//! - **Host-agnostic lifecycle**: activate / deactivate / resize over an injected surface and frame scheduler
//! - **Backends**: command recording, software raster (PNG export), and HTML canvas on wasm32
//!
//! ### Example
//!
//! ```ignore
//! let mut engine = FieldEngine::seeded(FieldConfig::default(), 2.0, ManualScheduler::new(), 42);
//! engine.mount(RasterSurface::new(LogicalSize::new(640.0, 360.0)));
//! engine.activate();
//! while engine.step(pointer.as_ref()) && frames_left() {}
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors and frame scheduling
//! - [`config`]: Tuning constants and file/env configuration
//! - [`render`]: Surfaces, colours and the particle field engine
//! - `web`: Browser canvas binding (wasm32 only)

/// Errors, frame scheduling and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Drawing surfaces and the particle field
pub mod render;
/// Browser host binding
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{AppConfig, FieldConfig};
pub use crate::core::{FieldError, FieldResult, FrameHandle, FrameScheduler, ManualScheduler};
pub use render::{FieldEngine, PointerSample, RasterSurface, RecordingSurface, Surface};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
