use glam::{Mat4, Vec3};

/// Orbit camera: yaw/pitch/distance around a fixed target.
///
/// Pointer drags orbit, scroll zooms. Distance is clamped so the camera can
/// neither enter the swarm nor drift out of the scene.
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub sensitivity: f32,
    pub zoom_rate: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 0.0, -0.2),
            yaw: 2.13,
            pitch: 0.17,
            distance: 3.5,
            fov: 73.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.25,
            far: 20.0,
            min_distance: 2.0,
            max_distance: 15.0,
            sensitivity: 0.005,
            zoom_rate: 0.4,
        }
    }
}

impl OrbitCamera {
    /// Camera position derived from the orbit parameters.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        ) * self.distance;
        self.target + offset
    }

    /// Orbit by a pointer delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Zoom by a scroll delta in lines; positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance - scroll * self.zoom_rate).clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_produces_valid_matrices() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
        assert!((cam.eye() - cam.target).length() > 0.0);
    }

    #[test]
    fn orbit_moves_the_eye() {
        let mut cam = OrbitCamera::default();
        let start = cam.eye();
        cam.orbit(120.0, -40.0);
        assert_ne!(cam.eye(), start);
        // Orbiting never changes the distance to the target
        assert!(((cam.eye() - cam.target).length() - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 1e6);
        assert!(cam.pitch <= 89.0_f32.to_radians());
        cam.orbit(0.0, -1e7);
        assert!(cam.pitch >= -89.0_f32.to_radians());
    }

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1e4);
        assert_eq!(cam.distance, cam.min_distance);
        cam.zoom(-1e4);
        assert_eq!(cam.distance, cam.max_distance);
    }
}
