//! Shared identifiers and spatial types used across the tidepool crates.

pub mod types;

pub use types::{BodyId, Placement};
