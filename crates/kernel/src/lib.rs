//! Simulation kernel: swarm stepping, articulated-chain posing, and the
//! frame driver that owns both.
//!
//! # Invariants
//! - Every `step` is a total function: empty collections are valid no-ops.
//! - All scene state lives in an explicit [`SimulationState`]; there are no
//!   module-level globals.
//! - Body iteration order is deterministic (BTreeMap), which fixes the
//!   pairwise order of the collision pass within a tick.

pub mod bounds;
pub mod chain;
pub mod clock;
pub mod driver;
pub mod swarm;

pub use bounds::Aabb;
pub use chain::{ChainAnimator, Joint, joint_pose};
pub use clock::SimClock;
pub use driver::{FrameDriver, SimulationState};
pub use swarm::{Body, Swarm, SwarmConfig};
