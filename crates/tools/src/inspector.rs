use tidepool_common::{BodyId, Placement};
use tidepool_kernel::{FrameDriver, SimulationState};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the driver and its state for the overlay, the
/// CLI, and tests.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the running scene.
    pub fn summary(driver: &FrameDriver) -> SceneSummary {
        let state = driver.state();
        SceneSummary {
            ticks: driver.ticks(),
            sim_time: state.chain.sim_time(),
            body_count: state.swarm.body_count(),
            joint_count: state.chain.joint_count(),
            running: driver.is_running(),
        }
    }

    /// Snapshot a single body's transform.
    pub fn inspect_body(state: &SimulationState, id: BodyId) -> Option<BodyInfo> {
        state.swarm.body(id).map(|body| BodyInfo {
            id,
            placement: body.placement(),
            half_extents: [
                body.half_extents().x,
                body.half_extents().y,
                body.half_extents().z,
            ],
        })
    }

    /// List all body ids in iteration order.
    pub fn list_bodies(state: &SimulationState) -> Vec<BodyId> {
        state.swarm.bodies().keys().copied().collect()
    }
}

/// Summary of the running scene.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub ticks: u64,
    pub sim_time: f32,
    pub body_count: usize,
    pub joint_count: usize,
    pub running: bool,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: ticks={} sim_time={:.3} bodies={} joints={} running={}",
            self.ticks, self.sim_time, self.body_count, self.joint_count, self.running
        )
    }
}

/// Detailed info about a single body.
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub id: BodyId,
    pub placement: Placement,
    pub half_extents: [f32; 3],
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.placement.position;
        write!(
            f,
            "Body [{:.8}] pos=({:.3}, {:.3}, {:.3}) extents=({:.2}, {:.2}, {:.2})",
            &self.id.0.to_string()[..8],
            p.x,
            p.y,
            p.z,
            self.half_extents[0] * 2.0,
            self.half_extents[1] * 2.0,
            self.half_extents[2] * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tidepool_kernel::Joint;

    #[test]
    fn summary_empty_scene() {
        let driver = FrameDriver::default();
        let summary = SceneInspector::summary(&driver);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.body_count, 0);
        assert!(summary.running);
    }

    #[test]
    fn summary_reflects_scene_contents() {
        let mut state = SimulationState::default();
        state.swarm.spawn(Vec3::ONE, Vec3::splat(0.1));
        state.swarm.spawn(-Vec3::ONE, Vec3::splat(0.1));
        state.chain.install(vec![Joint::named("root"), Joint::named("tip")]);

        let mut driver = FrameDriver::new(state);
        driver.tick(16.0);

        let summary = SceneInspector::summary(&driver);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.body_count, 2);
        assert_eq!(summary.joint_count, 2);
        assert!(summary.sim_time > 0.0);
    }

    #[test]
    fn inspect_body_found() {
        let mut state = SimulationState::default();
        let id = state.swarm.spawn(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.25));
        let info = SceneInspector::inspect_body(&state, id).unwrap();
        assert_eq!(info.placement.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(info.half_extents, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn inspect_body_not_found() {
        let state = SimulationState::default();
        assert!(SceneInspector::inspect_body(&state, BodyId::new()).is_none());
    }

    #[test]
    fn list_bodies_is_sorted() {
        let mut state = SimulationState::default();
        for _ in 0..20 {
            state.swarm.spawn(Vec3::ZERO, Vec3::splat(0.1));
        }
        let ids = SceneInspector::list_bodies(&state);
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn summary_display() {
        let driver = FrameDriver::default();
        let text = format!("{}", SceneInspector::summary(&driver));
        assert!(text.contains("ticks=0"));
        assert!(text.contains("running=true"));
    }
}
