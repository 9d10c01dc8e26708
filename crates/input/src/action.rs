use glam::Vec2;

/// A high-level action produced from raw pointer/keyboard events.
///
/// The camera and frame driver consume actions, never winit events, so a
/// different windowing host maps its own events without forking scene logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit the camera by a pointer delta (pixels).
    Orbit(Vec2),
    /// Zoom the camera by a scroll delta (lines).
    Zoom(f32),
    /// Pause or resume the frame driver.
    TogglePause,
    /// Show or hide the inspector overlay.
    ToggleOverlay,
    /// No-op (unbound input).
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_carries_delta() {
        let a = Action::Orbit(Vec2::new(4.0, -2.0));
        assert!(matches!(a, Action::Orbit(d) if d.x == 4.0 && d.y == -2.0));
    }

    #[test]
    fn zoom_carries_scroll() {
        assert!(matches!(Action::Zoom(1.5), Action::Zoom(z) if z == 1.5));
    }

    #[test]
    fn toggles_are_constructible() {
        assert!(matches!(Action::TogglePause, Action::TogglePause));
        assert!(matches!(Action::ToggleOverlay, Action::ToggleOverlay));
    }
}
