//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A renderer never mutates simulation state; it reads transforms and a
//!   view and produces output.
//! - Render state derives entirely from `SimulationState` plus the view.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "tidepool-render v0.1.0"
}
