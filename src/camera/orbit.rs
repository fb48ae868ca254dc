use nalgebra_glm as glm;
use winit::event::MouseButton;

use super::CameraState;

const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;

/// Orbit-style camera manipulation around `state.target`.
///
/// Mouse input is dropped entirely while `enabled` is false, which is how an
/// automated transition keeps user drags from fighting it.
pub struct OrbitControls {
    state: CameraState,
    saved: CameraState,
    pub enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    rotate_speed: f32,
    left_mouse_pressed: bool,
    middle_mouse_pressed: bool,
    right_mouse_pressed: bool,
    shift_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl OrbitControls {
    pub fn new(state: CameraState) -> Self {
        Self {
            saved: state.clone(),
            state,
            enabled: true,
            min_distance: 0.5,
            max_distance: 50.0,
            rotate_speed: 0.005,
            left_mouse_pressed: false,
            middle_mouse_pressed: false,
            right_mouse_pressed: false,
            shift_pressed: false,
            last_mouse_pos: None,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CameraState {
        &mut self.state
    }

    pub fn target(&self) -> glm::Vec3 {
        self.state.target
    }

    /// Re-derive input state after position or target were moved from code.
    /// The pose is kept exactly as given: distance and polar limits only
    /// bound user input, so a programmatic pose outside them is legal.
    pub fn update(&mut self) {
        self.last_mouse_pos = None;
    }

    /// Remember the current pose for a later `reset()`.
    pub fn save_state(&mut self) {
        self.saved = self.state.clone();
    }

    /// Return to the pose captured by the last `save_state()`. Ignored while
    /// input is locked.
    pub fn reset(&mut self) {
        if !self.enabled {
            return;
        }
        self.state = self.saved.clone();
        self.last_mouse_pos = None;
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left_mouse_pressed = pressed,
            MouseButton::Middle => self.middle_mouse_pressed = pressed,
            MouseButton::Right => self.right_mouse_pressed = pressed,
            _ => return,
        }
        if !pressed {
            self.last_mouse_pos = None;
        }
    }

    pub fn on_modifiers(&mut self, shift: bool) {
        self.shift_pressed = shift;
    }

    /// Returns true if the camera moved.
    pub fn on_mouse_move(&mut self, position: (f64, f64)) -> bool {
        let should_pan = self.middle_mouse_pressed
            || self.right_mouse_pressed
            || (self.shift_pressed && self.left_mouse_pressed);
        let should_rotate = self.left_mouse_pressed && !self.shift_pressed;

        if !should_pan && !should_rotate {
            self.last_mouse_pos = None;
            return false;
        }

        let last = self.last_mouse_pos.replace(position);
        if !self.enabled {
            return false;
        }
        let Some(last) = last else {
            return false;
        };

        let delta_x = (position.0 - last.0) as f32;
        let delta_y = (position.1 - last.1) as f32;
        if should_pan {
            self.pan(delta_x, delta_y);
        } else {
            self.rotate(delta_x, delta_y);
        }
        true
    }

    /// Wheel zoom; positive delta moves closer.
    pub fn on_scroll(&mut self, delta: f32) -> bool {
        if !self.enabled {
            return false;
        }
        self.zoom(delta);
        true
    }

    fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        let offset = self.state.position - self.state.target;
        let radius = glm::length(&offset);
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) - delta_x * self.rotate_speed;
        let current = (offset.y / radius).clamp(-1.0, 1.0).acos();
        // A pose already past a limit may stay there but not go further
        let polar = (current - delta_y * self.rotate_speed)
            .clamp(MIN_POLAR.min(current), MAX_POLAR.max(current));
        self.state.position = self.state.target + spherical(radius, polar, azimuth);
    }

    fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = glm::normalize(&(self.state.target - self.state.position));
        let right = glm::normalize(&glm::cross(&forward, &self.state.up()));
        let up = glm::cross(&right, &forward);

        let pan_speed = self.state.distance() * 0.002;
        let translation = right * (-delta_x * pan_speed) + up * (delta_y * pan_speed);
        self.state.position += translation;
        self.state.target += translation;
    }

    fn zoom(&mut self, delta: f32) {
        let offset = self.state.position - self.state.target;
        let radius = glm::length(&offset);
        if radius <= f32::EPSILON {
            return;
        }
        let new_radius = (radius * 0.95_f32.powf(delta))
            .clamp(self.min_distance.min(radius), self.max_distance.max(radius));
        self.state.position = self.state.target + offset * (new_radius / radius);
    }
}

fn spherical(radius: f32, polar: f32, azimuth: f32) -> glm::Vec3 {
    glm::vec3(
        radius * polar.sin() * azimuth.sin(),
        radius * polar.cos(),
        radius * polar.sin() * azimuth.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(orbit: &mut OrbitControls, button: MouseButton, from: (f64, f64), to: (f64, f64)) {
        orbit.on_mouse_button(button, true);
        orbit.on_mouse_move(from);
        orbit.on_mouse_move(to);
        orbit.on_mouse_button(button, false);
    }

    #[test]
    fn rotate_keeps_distance_to_target() {
        let mut orbit = OrbitControls::new(CameraState::default());
        drag(&mut orbit, MouseButton::Left, (100.0, 100.0), (160.0, 130.0));
        assert!((orbit.state().distance() - 5.0).abs() < 1e-4);
        assert_ne!(orbit.state().position, glm::vec3(0.0, 0.0, 5.0));
        assert_eq!(orbit.target(), glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn rotate_never_crosses_the_pole() {
        let mut orbit = OrbitControls::new(CameraState::default());
        drag(&mut orbit, MouseButton::Left, (0.0, 0.0), (0.0, 10_000.0));
        let offset = orbit.state().position - orbit.target();
        let polar = (offset.y / glm::length(&offset)).acos();
        assert!(polar >= MIN_POLAR - 1e-4);
    }

    #[test]
    fn pan_moves_position_and_target_together() {
        let mut orbit = OrbitControls::new(CameraState::default());
        let before = orbit.state().position - orbit.target();
        drag(&mut orbit, MouseButton::Right, (10.0, 10.0), (50.0, 30.0));
        let after = orbit.state().position - orbit.target();
        assert!(glm::distance(&before, &after) < 1e-5);
        assert_ne!(orbit.target(), glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn zoom_clamps_distance() {
        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.on_scroll(1000.0);
        assert!((orbit.state().distance() - orbit.min_distance).abs() < 1e-4);
        orbit.on_scroll(-1000.0);
        assert!((orbit.state().distance() - orbit.max_distance).abs() < 1e-3);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.enabled = false;
        drag(&mut orbit, MouseButton::Left, (0.0, 0.0), (200.0, 50.0));
        assert!(!orbit.on_scroll(3.0));
        assert_eq!(orbit.state(), &CameraState::default());
    }

    #[test]
    fn reset_returns_to_saved_pose() {
        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.state_mut().position = glm::vec3(1.0, 2.0, 3.0);
        orbit.save_state();
        drag(&mut orbit, MouseButton::Left, (0.0, 0.0), (80.0, 0.0));
        orbit.reset();
        assert_eq!(orbit.state().position, glm::vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn reset_ignored_while_locked() {
        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.save_state();
        orbit.state_mut().position = glm::vec3(0.0, 3.0, 1.0);
        orbit.enabled = false;
        orbit.reset();
        assert_eq!(orbit.state().position, glm::vec3(0.0, 3.0, 1.0));
    }

    #[test]
    fn update_leaves_valid_pose_alone() {
        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.state_mut().position = glm::vec3(0.05, 0.0375, 4.925);
        orbit.update();
        assert_eq!(orbit.state().position, glm::vec3(0.05, 0.0375, 4.925));
    }

    #[test]
    fn update_keeps_pose_outside_input_limits() {
        let mut orbit = OrbitControls::new(CameraState::default());
        for position in [
            glm::vec3(0.0, 0.0, 80.0),
            glm::vec3(0.0, 0.0, 0.2),
            glm::vec3(0.0, 20.0, 0.0),
        ] {
            orbit.state_mut().position = position;
            orbit.update();
            assert_eq!(orbit.state().position, position);
        }
    }

    #[test]
    fn update_drops_drag_anchor() {
        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.on_mouse_button(MouseButton::Left, true);
        orbit.on_mouse_move((0.0, 0.0));
        orbit.state_mut().position = glm::vec3(0.0, 1.0, 4.0);
        orbit.update();
        // First move after update only re-anchors
        assert!(!orbit.on_mouse_move((300.0, 0.0)));
        assert_eq!(orbit.state().position, glm::vec3(0.0, 1.0, 4.0));
    }

    #[test]
    fn input_from_far_pose_does_not_snap_to_limit() {
        let mut orbit = OrbitControls::new(CameraState::new(
            glm::vec3(0.0, 0.0, 60.0),
            glm::vec3(0.0, 0.0, 0.0),
        ));
        orbit.on_scroll(-1.0);
        assert!((orbit.state().distance() - 60.0).abs() < 1e-3);
        orbit.on_scroll(1.0);
        assert!((orbit.state().distance() - 57.0).abs() < 1e-3);
    }

    #[test]
    fn pan_from_top_down_pose_stays_finite() {
        let mut orbit = OrbitControls::new(CameraState::new(
            glm::vec3(0.0, 20.0, 0.0),
            glm::vec3(0.0, 0.0, 0.0),
        ));
        drag(&mut orbit, MouseButton::Right, (0.0, 0.0), (40.0, 10.0));
        let position = orbit.state().position;
        assert!(position.iter().all(|v| v.is_finite()));
        assert!((position.y - 20.0).abs() < 1e-4);
        assert_ne!(orbit.target(), glm::vec3(0.0, 0.0, 0.0));
    }
}
