use crate::chain::ChainAnimator;
use crate::swarm::Swarm;

/// Everything the frame driver steps each refresh.
///
/// Scene state is owned here and passed by reference into the step calls;
/// nothing in the kernel reaches for module-level state.
#[derive(Debug, Default)]
pub struct SimulationState {
    pub swarm: Swarm,
    pub chain: ChainAnimator,
}

/// Decides when ticks happen. No other component owns timing.
///
/// The hosting event loop calls [`FrameDriver::tick`] once per display
/// refresh and re-arms itself, forever. [`FrameDriver::stop`] parks the
/// simulation without tearing anything down; [`FrameDriver::resume`] picks it
/// back up. Both collections may be empty at any point; asset loads that
/// never complete leave a perfectly steppable scene.
#[derive(Debug, Default)]
pub struct FrameDriver {
    state: SimulationState,
    stopped: bool,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(state: SimulationState) -> Self {
        Self {
            state,
            stopped: false,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Ticks issued since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub fn stop(&mut self) {
        tracing::debug!(ticks = self.ticks, "frame driver stopped");
        self.stopped = true;
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Step the swarm, then the chain, with the given wall-clock sample in
    /// milliseconds. Returns false (and does nothing) while stopped.
    pub fn tick(&mut self, wall_ms: f64) -> bool {
        if self.stopped {
            return false;
        }
        self.ticks += 1;
        self.state.swarm.step();
        self.state.chain.step(wall_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Joint;
    use glam::Vec3;

    #[test]
    fn tick_steps_swarm_and_chain() {
        let mut state = SimulationState::default();
        let id = state.swarm.spawn(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.1));
        state.chain.install(vec![Joint::named("root")]);

        let mut driver = FrameDriver::new(state);
        assert!(driver.tick(16.0));
        assert_eq!(driver.ticks(), 1);

        let state = driver.state();
        assert!(state.swarm.body(id).unwrap().position.x < 1.0);
        assert!(state.chain.sim_time() > 0.0);
    }

    #[test]
    fn empty_state_ticks_cleanly() {
        let mut driver = FrameDriver::default();
        for _ in 0..10 {
            assert!(driver.tick(0.0));
        }
        assert_eq!(driver.ticks(), 10);
        assert!(driver.state().chain.sim_time() > 0.0);
    }

    #[test]
    fn stop_halts_ticks_and_resume_continues() {
        let mut driver = FrameDriver::default();
        driver.tick(0.0);
        driver.stop();
        assert!(!driver.is_running());
        assert!(!driver.tick(16.0));
        assert_eq!(driver.ticks(), 1);

        driver.resume();
        assert!(driver.tick(32.0));
        assert_eq!(driver.ticks(), 2);
    }

    #[test]
    fn stopped_driver_does_not_advance_sim_time() {
        let mut driver = FrameDriver::default();
        driver.stop();
        driver.tick(16.0);
        assert_eq!(driver.state().chain.sim_time(), 0.0);
    }
}
