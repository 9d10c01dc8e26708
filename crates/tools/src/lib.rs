//! Developer tooling: read-only scene inspection for overlays and the CLI.
//!
//! # Invariants
//! - Tools never mutate simulation state.

pub mod inspector;

pub use inspector::{BodyInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "tidepool-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
