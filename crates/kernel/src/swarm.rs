use crate::bounds::Aabb;
use glam::{Quat, Vec3};
use std::collections::BTreeMap;
use tidepool_common::{BodyId, Placement};

/// Yaw applied to every body each tick, radians.
const SPIN_STEP: f32 = 0.01;

/// A simulated cuboid: mutable position and orientation, fixed half extents.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec3,
    pub orientation: Quat,
    half_extents: Vec3,
}

impl Body {
    /// Panics if any half-extent component is not strictly positive.
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        assert!(
            half_extents.cmpgt(Vec3::ZERO).all(),
            "half_extents must be strictly positive"
        );
        Self {
            position,
            orientation: Quat::IDENTITY,
            half_extents,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn placement(&self) -> Placement {
        Placement {
            position: self.position,
            rotation: self.orientation,
        }
    }

    /// Current world-axis-aligned bounds. Orientation is ignored; see [`Aabb`].
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// Tuning for the swarm step.
#[derive(Debug, Clone, Copy)]
pub struct SwarmConfig {
    /// Point every body drifts toward.
    pub attractor: Vec3,
    /// Length of the drift step and of the collision push, per tick.
    pub step_length: f32,
    /// Resolve collisions against a position snapshot taken at the start of
    /// the pass instead of live positions. Off by default: the live,
    /// iteration-order-dependent response is the observed behavior this
    /// simulation reproduces.
    pub double_buffered: bool,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            attractor: Vec3::ZERO,
            step_length: 0.005,
            double_buffered: false,
        }
    }
}

/// The fixed population of drifting bodies.
///
/// Keyed by `BodyId` in a BTreeMap so iteration order is stable within a
/// tick, which fixes the pairwise comparison order of the collision pass.
/// Bodies are created at scene setup and never removed during a session.
#[derive(Debug, Default)]
pub struct Swarm {
    bodies: BTreeMap<BodyId, Body>,
    config: SwarmConfig,
    // Scratch reused across ticks so step() never grows allocations.
    order: Vec<BodyId>,
    pushes: Vec<(BodyId, Vec3)>,
}

impl Swarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SwarmConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SwarmConfig {
        &mut self.config
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &BTreeMap<BodyId, Body> {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Add a body at an explicit position. Returns its id.
    pub fn spawn(&mut self, position: Vec3, half_extents: Vec3) -> BodyId {
        let id = BodyId::new();
        self.bodies.insert(id, Body::new(position, half_extents));
        id
    }

    /// Scatter `count` bodies inside a cube of radius `spread` around the
    /// origin. Positions come from a seeded splitmix64 sequence, so the same
    /// seed always produces the same scatter.
    pub fn spawn_scattered(
        &mut self,
        count: usize,
        seed: u64,
        spread: f32,
        half_extents: Vec3,
    ) -> Vec<BodyId> {
        let mut state = seed;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            state = splitmix64(state);
            let x = centered_unit(state);
            state = splitmix64(state);
            let y = centered_unit(state);
            state = splitmix64(state);
            let z = centered_unit(state);
            ids.push(self.spawn(Vec3::new(x, y, z) * spread, half_extents));
        }
        ids
    }

    /// Advance the swarm one tick: drift toward the attractor, resolve
    /// pairwise overlaps, spin. An empty swarm is a no-op.
    pub fn step(&mut self) {
        self.drift();
        if self.config.double_buffered {
            self.resolve_overlaps_buffered();
        } else {
            self.resolve_overlaps();
        }
        self.spin();
    }

    fn drift(&mut self) {
        let attractor = self.config.attractor;
        let step = self.config.step_length;
        for body in self.bodies.values_mut() {
            // A body already at the attractor stays put; zero vectors are
            // never normalized.
            if let Some(dir) = (attractor - body.position).try_normalize() {
                body.position += dir * step;
            }
        }
    }

    /// Pairwise overlap resolution over live positions.
    ///
    /// Every ordered pair `(anchor, other)` is checked, so an unordered pair
    /// is visited twice with the roles swapped. Bounds are read from the
    /// positions as mutated so far this tick, which makes the response a
    /// function of iteration order and asymmetric within a single tick.
    fn resolve_overlaps(&mut self) {
        self.order.clear();
        self.order.extend(self.bodies.keys().copied());
        let step = self.config.step_length;
        for i in 0..self.order.len() {
            let anchor_id = self.order[i];
            let Some(anchor) = self.bodies.get(&anchor_id) else {
                continue;
            };
            let anchor_pos = anchor.position;
            let anchor_bounds = anchor.bounds();
            for j in 0..self.order.len() {
                if i == j {
                    continue;
                }
                let other_id = self.order[j];
                let Some(other) = self.bodies.get(&other_id) else {
                    continue;
                };
                if !anchor_bounds.intersects(&other.bounds()) {
                    continue;
                }
                // Coincident centers have no push direction; skip.
                let Some(dir) = (other.position - anchor_pos).try_normalize() else {
                    continue;
                };
                if let Some(other) = self.bodies.get_mut(&other_id) {
                    other.position += dir * step;
                }
            }
        }
    }

    /// Snapshot variant: overlaps and push directions are computed against
    /// the positions frozen at pass start, then all pushes apply at once.
    fn resolve_overlaps_buffered(&mut self) {
        self.pushes.clear();
        let step = self.config.step_length;
        for (anchor_id, anchor) in &self.bodies {
            let anchor_bounds = anchor.bounds();
            for (other_id, other) in &self.bodies {
                if other_id == anchor_id {
                    continue;
                }
                if !anchor_bounds.intersects(&other.bounds()) {
                    continue;
                }
                let Some(dir) = (other.position - anchor.position).try_normalize() else {
                    continue;
                };
                self.pushes.push((*other_id, dir * step));
            }
        }
        for (id, delta) in self.pushes.drain(..) {
            if let Some(body) = self.bodies.get_mut(&id) {
                body.position += delta;
            }
        }
    }

    fn spin(&mut self) {
        let spin = Quat::from_rotation_y(SPIN_STEP);
        for body in self.bodies.values_mut() {
            body.orientation = (spin * body.orientation).normalize();
        }
    }
}

/// Splitmix64 ... a fast, high-quality deterministic PRNG step function.
/// Drives the scatter so spawn layouts reproduce from a seed.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Map the top 24 bits of a PRNG word to [-1, 1).
fn centered_unit(bits: u64) -> f32 {
    (bits >> 40) as f32 / (1u64 << 23) as f32 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: f32 = 0.05;

    fn x_overlap(a: &Aabb, b: &Aabb) -> f32 {
        (a.max.x.min(b.max.x) - a.min.x.max(b.min.x)).max(0.0)
    }

    #[test]
    #[should_panic(expected = "strictly positive")]
    fn body_rejects_degenerate_extents() {
        Body::new(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.1));
    }

    #[test]
    fn empty_swarm_step_is_noop() {
        let mut swarm = Swarm::new();
        swarm.step();
        assert!(swarm.is_empty());
    }

    #[test]
    fn scatter_is_seed_deterministic() {
        let mut a = Swarm::new();
        let mut b = Swarm::new();
        let ids_a = a.spawn_scattered(16, 7, 2.0, Vec3::splat(HALF));
        let ids_b = b.spawn_scattered(16, 7, 2.0, Vec3::splat(HALF));
        let pos = |s: &Swarm, ids: &[BodyId]| -> Vec<Vec3> {
            ids.iter().map(|id| s.body(*id).unwrap().position).collect()
        };
        assert_eq!(pos(&a, &ids_a), pos(&b, &ids_b));
        // Bodies stay inside the scatter cube
        for p in pos(&a, &ids_a) {
            assert!(p.abs().max_element() <= 2.0);
        }
    }

    #[test]
    fn drift_decreases_distance_by_exactly_one_step() {
        let mut swarm = Swarm::new();
        let id = swarm.spawn(Vec3::new(0.2, 0.0, 0.0), Vec3::splat(HALF));
        let step = swarm.config().step_length;
        let before = swarm.body(id).unwrap().position.length();
        swarm.step();
        let after = swarm.body(id).unwrap().position.length();
        assert!((before - after - step).abs() < 1e-6);
    }

    #[test]
    fn body_at_attractor_does_not_move() {
        let mut swarm = Swarm::new();
        let id = swarm.spawn(Vec3::ZERO, Vec3::splat(HALF));
        swarm.step();
        let p = swarm.body(id).unwrap().position;
        assert_eq!(p, Vec3::ZERO);
        assert!(p.is_finite());
    }

    #[test]
    fn overlapping_pair_separates() {
        let mut swarm = Swarm::new();
        let left = swarm.spawn(Vec3::ZERO, Vec3::splat(HALF));
        let right = swarm.spawn(Vec3::new(0.05, 0.0, 0.0), Vec3::splat(HALF));

        let before = x_overlap(
            &swarm.body(left).unwrap().bounds(),
            &swarm.body(right).unwrap().bounds(),
        );
        swarm.step();
        let after = x_overlap(
            &swarm.body(left).unwrap().bounds(),
            &swarm.body(right).unwrap().bounds(),
        );

        // The fixed-length nudge shrinks the overlap without eliminating it.
        assert!(after < before);
        assert!(after > 0.0);
    }

    #[test]
    fn colinear_triple_pushes_outer_bodies_outward() {
        // Outer bodies overlap the middle one; the middle sits exactly at
        // the attractor so it only ever moves from collision pushes.
        let half = Vec3::splat(0.15);
        let mut swarm = Swarm::new();
        let left = swarm.spawn(Vec3::new(-0.2, 0.0, 0.0), half);
        let middle = swarm.spawn(Vec3::ZERO, half);
        let right = swarm.spawn(Vec3::new(0.2, 0.0, 0.0), half);
        swarm.step();

        // Control: the same outer bodies with nothing to collide with end up
        // one drift step closer to the origin.
        let mut control = Swarm::new();
        let lone = control.spawn(Vec3::new(-0.2, 0.0, 0.0), half);
        control.step();
        let drifted = control.body(lone).unwrap().position.x;

        let l = swarm.body(left).unwrap().position.x;
        let r = swarm.body(right).unwrap().position.x;
        let m = swarm.body(middle).unwrap().position;

        // Collision pushed the outer bodies back out past the drift-only
        // position, away from the middle body.
        assert!(l < drifted);
        assert!(r > -drifted);
        // The middle body's pushes cancel; it never drifted to begin with.
        assert!(m.length() < 1e-6);
    }

    #[test]
    fn double_buffered_pass_reads_frozen_positions() {
        let spawn_pair = |config: SwarmConfig| {
            let mut swarm = Swarm::with_config(config);
            let a = swarm.spawn(Vec3::new(-0.02, 0.0, 0.0), Vec3::splat(HALF));
            let b = swarm.spawn(Vec3::new(0.02, 0.0, 0.0), Vec3::splat(HALF));
            swarm.step();
            (
                swarm.body(a).unwrap().position,
                swarm.body(b).unwrap().position,
            )
        };

        let (a_live, b_live) = spawn_pair(SwarmConfig::default());
        let (a_buf, b_buf) = spawn_pair(SwarmConfig {
            double_buffered: true,
            ..SwarmConfig::default()
        });

        // The buffered variant pushes both bodies apart symmetrically from
        // the frozen snapshot; centers end up mirrored.
        assert!((a_buf.x + b_buf.x).abs() < 1e-6);
        // Both variants leave the pair separated in the same direction.
        assert!(a_live.x < b_live.x);
        assert!(a_buf.x < b_buf.x);
    }

    #[test]
    fn coincident_centers_do_not_produce_nan() {
        let mut swarm = Swarm::new();
        let a = swarm.spawn(Vec3::ZERO, Vec3::splat(HALF));
        let b = swarm.spawn(Vec3::ZERO, Vec3::splat(HALF));
        swarm.step();
        assert!(swarm.body(a).unwrap().position.is_finite());
        assert!(swarm.body(b).unwrap().position.is_finite());
    }

    #[test]
    fn spin_keeps_orientation_normalized() {
        let mut swarm = Swarm::new();
        let id = swarm.spawn(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(HALF));
        for _ in 0..500 {
            swarm.step();
        }
        let body = swarm.body(id).unwrap();
        assert!((body.orientation.length() - 1.0).abs() < 1e-4);
        // Yaw about +Y accumulated; the body is no longer identity-oriented.
        assert!(body.orientation != Quat::IDENTITY);
    }

    #[test]
    fn population_is_stable_across_steps() {
        let mut swarm = Swarm::new();
        swarm.spawn_scattered(8, 3, 1.0, Vec3::splat(HALF));
        for _ in 0..50 {
            swarm.step();
        }
        assert_eq!(swarm.body_count(), 8);
    }
}
