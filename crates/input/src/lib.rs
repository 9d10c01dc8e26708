//! Input mapping: raw window events become high-level actions.
//!
//! # Invariants
//! - The camera and simulation consume actions, never raw events.

pub mod action;

pub use action::Action;

pub fn crate_info() -> &'static str {
    "tidepool-input v0.1.0"
}
