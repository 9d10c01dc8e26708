//! Display-side components attached to swarm bodies.
//!
//! The kernel owns motion; everything a renderer or overlay wants to know
//! about a body beyond its transform lives here. Components are stored in
//! BTreeMaps keyed by `BodyId`, so iteration order matches the kernel's.
//!
//! # Invariants
//! - Component storage never influences simulation state.
//! - Iteration order is deterministic (BTreeMap).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tidepool_common::BodyId;

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Per-body display color, linear RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint(pub [f32; 4]);

impl Tint {
    /// Derive a stable color from a body id, the way the scene originally
    /// gave every cube its own random color. Same id, same tint.
    pub fn from_id(id: BodyId) -> Self {
        let bytes = id.0.as_bytes();
        let channel = |b: u8| 0.25 + (b as f32 / 255.0) * 0.75;
        Self([channel(bytes[0]), channel(bytes[1]), channel(bytes[2]), 1.0])
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self([0.7, 0.7, 0.7, 1.0])
    }
}

/// Component storage for all display component types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    names: BTreeMap<BodyId, Name>,
    tints: BTreeMap<BodyId, Tint>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Name ---
    pub fn set_name(&mut self, body: BodyId, name: impl Into<String>) {
        self.names.insert(body, Name(name.into()));
    }

    pub fn get_name(&self, body: BodyId) -> Option<&Name> {
        self.names.get(&body)
    }

    pub fn names(&self) -> &BTreeMap<BodyId, Name> {
        &self.names
    }

    // --- Tint ---
    pub fn set_tint(&mut self, body: BodyId, tint: Tint) {
        self.tints.insert(body, tint);
    }

    pub fn get_tint(&self, body: BodyId) -> Option<Tint> {
        self.tints.get(&body).copied()
    }

    /// Remove all components for a body.
    pub fn remove_body(&mut self, body: BodyId) {
        self.names.remove(&body);
        self.tints.remove(&body);
    }
}

pub fn crate_info() -> &'static str {
    "tidepool-ecs v0.1.0"
}
