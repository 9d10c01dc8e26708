//! wgpu render backend for the tidepool scene.
//!
//! Renders the environment backdrop (an equirectangular image sampled by
//! view direction), the swarm as instanced cuboids, and the chain as a stack
//! of segment cuboids. Camera is an orbit camera around a fixed target.
//!
//! # Invariants
//! - The renderer never mutates simulation state.
//! - Camera motion is pointer-driven and lives outside the kernel.
//! - A missing or failed backdrop falls back to a flat clear color; nothing
//!   else changes.

mod backdrop;
mod camera;
mod gpu;
mod shaders;

pub use backdrop::{Backdrop, BackdropError};
pub use camera::OrbitCamera;
pub use gpu::SceneRenderer;
