use crate::clock::SimClock;
use glam::Quat;

/// Peak sway angle, radians.
const SWAY_AMPLITUDE: f32 = 0.3;
/// Phase offset between successive joints, radians of simulation time.
const SWAY_PHASE_STEP: f32 = 0.5;
/// Wall-clock milliseconds to wobble phase.
const WOBBLE_RATE: f64 = 0.002;
/// Base wobble angle, radians, scaled up the chain by index / 3.
const WOBBLE_AMPLITUDE: f32 = 0.1;

/// One articulated segment. Its position in the chain is its pose index.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub local_orientation: Quat,
}

impl Joint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_orientation: Quat::IDENTITY,
        }
    }
}

/// Closed-form pose for the joint at `index`.
///
/// Two independent clocks drive the pose: the deterministic simulation clock
/// sways the joint about +Z with an index-dependent phase offset, and a
/// near-real-time wall-clock sample (milliseconds) adds a finer wobble about
/// +X whose amplitude grows down the chain. Joints are posed independently
/// (no pose feeds into the next), yet the phase offsets read as a cascading
/// wave. Pure in all three arguments.
pub fn joint_pose(sim_time: f32, wall_ms: f64, index: usize) -> Quat {
    let sway = (sim_time + index as f32 * SWAY_PHASE_STEP).sin() * SWAY_AMPLITUDE;
    let wobble =
        (wall_ms * WOBBLE_RATE).sin() as f32 * WOBBLE_AMPLITUDE * index as f32 / 3.0;
    Quat::from_rotation_z(sway) * Quat::from_rotation_x(wobble)
}

/// Owns the ordered joint chain and the simulation clock that drives it.
///
/// The chain starts empty and stays empty until a scene description is
/// installed; stepping an empty chain still advances the clock.
#[derive(Debug, Default)]
pub struct ChainAnimator {
    joints: Vec<Joint>,
    clock: SimClock,
}

impl ChainAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole chain at once. The frame loop only calls this
    /// between ticks, so a tick never observes a partially installed chain.
    pub fn install(&mut self, joints: Vec<Joint>) {
        tracing::debug!(joints = joints.len(), "chain installed");
        self.joints = joints;
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn sim_time(&self) -> f32 {
        self.clock.time()
    }

    /// Advance the simulation clock, then pose every joint from the
    /// post-advance time and the supplied wall-clock sample.
    pub fn step(&mut self, wall_ms: f64) {
        let t = self.clock.advance();
        for (index, joint) in self.joints.iter_mut().enumerate() {
            joint.local_orientation = joint_pose(t, wall_ms, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_chain(n: usize) -> ChainAnimator {
        let mut chain = ChainAnimator::new();
        chain.install((0..n).map(|i| Joint::named(format!("seg_{i}"))).collect());
        chain
    }

    #[test]
    fn pose_is_deterministic() {
        let a = joint_pose(1.25, 480.0, 3);
        let b = joint_pose(1.25, 480.0, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn pose_matches_closed_form_sway() {
        // Root joint has no wobble (amplitude scales with index), so its pose
        // is exactly the sway rotation.
        let t = 0.7;
        let pose = joint_pose(t, 12345.0, 0);
        let expected = Quat::from_rotation_z(t.sin() * 0.3);
        assert!(pose.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn successive_joints_are_phase_offset() {
        let t = 2.0;
        let p0 = joint_pose(t, 0.0, 0);
        let p1 = joint_pose(t, 0.0, 1);
        assert!(!p0.abs_diff_eq(p1, 1e-6));
    }

    #[test]
    fn wobble_grows_down_the_chain() {
        // Wall sample at the wobble peak; at wall = 0 the wobble vanishes,
        // so the rotation between the two poses isolates the wobble term.
        let wall_ms = std::f64::consts::FRAC_PI_2 / 0.002;
        let wobble_of = |index: usize| {
            let base = joint_pose(0.0, 0.0, index);
            let peak = joint_pose(0.0, wall_ms, index);
            (base.inverse() * peak).to_axis_angle().1.abs()
        };
        assert!((wobble_of(3) - 0.1).abs() < 1e-3);
        assert!((wobble_of(9) - 0.3).abs() < 1e-3);
    }

    #[test]
    fn step_poses_every_joint() {
        let mut chain = test_chain(4);
        chain.step(100.0);
        for joint in chain.joints() {
            assert!((joint.local_orientation.length() - 1.0).abs() < 1e-5);
        }
        // At t = 0.01 every sway angle is nonzero, so no joint is identity.
        for joint in chain.joints() {
            assert!(joint.local_orientation != Quat::IDENTITY);
        }
    }

    #[test]
    fn empty_chain_still_advances_clock() {
        let mut chain = ChainAnimator::new();
        assert!(chain.is_empty());
        chain.step(0.0);
        chain.step(0.0);
        assert!(chain.sim_time() > 0.0);
    }

    #[test]
    fn install_replaces_chain_wholesale() {
        let mut chain = test_chain(3);
        chain.install(vec![Joint::named("root")]);
        assert_eq!(chain.joint_count(), 1);
        assert_eq!(chain.joints()[0].name, "root");
    }

    #[test]
    fn same_clocks_same_poses() {
        let mut a = test_chain(5);
        let mut b = test_chain(5);
        for tick in 0..50 {
            let wall = tick as f64 * 16.0;
            a.step(wall);
            b.step(wall);
        }
        for (ja, jb) in a.joints().iter().zip(b.joints()) {
            assert_eq!(ja.local_orientation, jb.local_orientation);
        }
    }
}
