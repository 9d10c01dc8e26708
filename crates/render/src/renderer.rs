use glam::Vec3;
use tidepool_kernel::SimulationState;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-1.8, 0.6, 2.7),
            target: Vec3::new(0.0, 0.0, -0.2),
            fov_degrees: 73.0,
        }
    }
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// The renderer reads simulation state and a view configuration, then
/// produces output. It never mutates the state; that is kernel-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given state and view.
    fn render(&self, state: &SimulationState, view: &RenderView) -> Self::Output;
}

/// Text renderer for headless runs, logging, and tests.
///
/// Produces a human-readable snapshot of the scene: every body's position
/// and every joint's name. The wgpu backend replaces this on desktop.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, state: &SimulationState, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (sim_time={:.3}) ===\n",
            state.chain.sim_time()
        ));
        out.push_str(&format!(
            "Bodies: {}  Joints: {}\n",
            state.swarm.body_count(),
            state.chain.joint_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (id, body) in state.swarm.bodies() {
            let p = body.position;
            out.push_str(&format!(
                "  [{:.8}] pos=({:.3}, {:.3}, {:.3})\n",
                &id.0.to_string()[..8],
                p.x,
                p.y,
                p.z
            ));
        }
        for (index, joint) in state.chain.joints().iter().enumerate() {
            let (_, angle) = joint.local_orientation.to_axis_angle();
            out.push_str(&format!(
                "  joint {index} '{}' angle={:.3}\n",
                joint.name, angle
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidepool_kernel::Joint;

    #[test]
    fn debug_renderer_empty_scene() {
        let state = SimulationState::default();
        let output = DebugTextRenderer::new().render(&state, &RenderView::default());
        assert!(output.contains("sim_time=0.000"));
        assert!(output.contains("Bodies: 0"));
        assert!(output.contains("Joints: 0"));
    }

    #[test]
    fn debug_renderer_lists_bodies_and_joints() {
        let mut state = SimulationState::default();
        state.swarm.spawn(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.25));
        state.chain.install(vec![Joint::named("tentacle_root")]);

        let output = DebugTextRenderer::new().render(&state, &RenderView::default());
        assert!(output.contains("Bodies: 1"));
        assert!(output.contains("pos=(1.000, 2.000, 3.000)"));
        assert!(output.contains("joint 0 'tentacle_root'"));
    }

    #[test]
    fn render_view_default_looks_at_scene_center() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 73.0);
        assert_eq!(view.target, Vec3::new(0.0, 0.0, -0.2));
    }
}
