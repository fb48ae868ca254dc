//! Animated hand-over between camera presets.
//!
//! Each frame the camera covers a fixed fraction of the remaining distance to
//! the selected preset (exponential approach, tied to frame count rather than
//! wall time). Orbit input is locked while a transition runs and released once
//! the camera is within [`CONVERGENCE_EPSILON`] of the target.

use log::debug;
use nalgebra_glm as glm;

use super::{OrbitControls, PresetError, PresetTable};

pub const LERP_FACTOR: f32 = 0.025;
pub const CONVERGENCE_EPSILON: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Transitioning,
}

pub struct CameraTransition {
    presets: PresetTable,
    target_position: glm::Vec3,
    target_look_at: glm::Vec3,
    active: bool,
}

impl CameraTransition {
    pub fn new(presets: PresetTable) -> Self {
        Self {
            presets,
            target_position: glm::Vec3::zeros(),
            target_look_at: glm::Vec3::zeros(),
            active: false,
        }
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> TransitionPhase {
        if self.is_active() {
            TransitionPhase::Transitioning
        } else {
            TransitionPhase::Idle
        }
    }

    /// Start (or restart) a transition toward preset `id`. The newest
    /// selection always wins; an unknown id leaves everything untouched.
    pub fn select_preset(&mut self, id: &str) -> Result<(), PresetError> {
        let preset = self
            .presets
            .get(id)
            .ok_or_else(|| PresetError::Unknown(id.to_string()))?;
        self.target_position = preset.position();
        self.target_look_at = preset.look_at();
        self.active = true;
        debug!("Camera transition to preset '{}' started", id);
        Ok(())
    }

    /// Advance one rendered frame. Does nothing while idle.
    pub fn on_frame(&mut self, orbit: &mut OrbitControls) {
        if !self.active {
            return;
        }

        orbit.enabled = false;

        let focus = glm::lerp(&orbit.target(), &self.target_look_at, LERP_FACTOR);
        let state = orbit.state_mut();
        state.position = glm::lerp(&state.position, &self.target_position, LERP_FACTOR);
        state.target = focus;
        orbit.update();

        let remaining = glm::distance(&orbit.state().position, &self.target_position);
        if remaining < CONVERGENCE_EPSILON {
            self.active = false;
            orbit.enabled = true;
            // Later resets return here, not to the pose before the transition.
            orbit.save_state();
            debug!("Camera transition converged ({remaining:.4} from target)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraState;
    use crate::camera::preset::PresetEntry;
    use winit::event::MouseButton;

    fn setup() -> (CameraTransition, OrbitControls) {
        (
            CameraTransition::new(PresetTable::builtin()),
            OrbitControls::new(CameraState::default()),
        )
    }

    fn run_until_idle(transition: &mut CameraTransition, orbit: &mut OrbitControls) -> usize {
        let mut frames = 0;
        while transition.is_active() {
            transition.on_frame(orbit);
            frames += 1;
            assert!(frames < 500, "transition did not converge");
        }
        frames
    }

    fn close(a: glm::Vec3, b: glm::Vec3, tolerance: f32) -> bool {
        glm::distance(&a, &b) < tolerance
    }

    #[test]
    fn starts_idle() {
        let (transition, orbit) = setup();
        assert_eq!(transition.phase(), TransitionPhase::Idle);
        assert!(orbit.enabled);
    }

    #[test]
    fn first_frame_toward_right_preset() {
        let (mut transition, mut orbit) = setup();
        transition.select_preset("right").unwrap();
        assert_eq!(transition.phase(), TransitionPhase::Transitioning);

        transition.on_frame(&mut orbit);
        assert!(close(
            orbit.state().position,
            glm::vec3(0.05, 0.0375, 4.925),
            1e-5
        ));
        assert!(close(orbit.target(), glm::vec3(0.0025, 0.0125, -0.0025), 1e-6));
        assert!(transition.is_active());
    }

    #[test]
    fn converges_within_bound() {
        for id in ["left", "right"] {
            let (mut transition, mut orbit) = setup();
            transition.select_preset(id).unwrap();
            let frames = run_until_idle(&mut transition, &mut orbit);
            assert!(frames > 1);

            let preset = transition.presets().get(id).unwrap();
            assert!(close(orbit.state().position, preset.position(), CONVERGENCE_EPSILON));
            assert_eq!(transition.phase(), TransitionPhase::Idle);
        }
    }

    #[test]
    fn distance_strictly_decreases() {
        let (mut transition, mut orbit) = setup();
        transition.select_preset("left").unwrap();
        let mut previous = glm::distance(&orbit.state().position, &transition.target_position);
        while transition.is_active() {
            transition.on_frame(&mut orbit);
            let current = glm::distance(&orbit.state().position, &transition.target_position);
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let (mut transition, mut orbit) = setup();
        let before = orbit.state().clone();
        let target_before = transition.target_position;
        for _ in 0..10 {
            transition.on_frame(&mut orbit);
        }
        assert_eq!(orbit.state(), &before);
        assert_eq!(transition.target_position, target_before);
        assert!(orbit.enabled);

        orbit.enabled = false;
        transition.on_frame(&mut orbit);
        assert!(!orbit.enabled);
    }

    #[test]
    fn retarget_mid_transition_follows_latest() {
        let (mut transition, mut orbit) = setup();
        transition.select_preset("right").unwrap();
        for _ in 0..30 {
            transition.on_frame(&mut orbit);
        }
        assert!(transition.is_active());

        transition.select_preset("left").unwrap();
        let left = *transition.presets().get("left").unwrap();
        assert_eq!(transition.target_position, left.position());
        assert_eq!(transition.target_look_at, left.look_at());

        run_until_idle(&mut transition, &mut orbit);
        let right = transition.presets().get("right").unwrap();
        assert!(close(orbit.state().position, left.position(), CONVERGENCE_EPSILON));
        assert!(!close(orbit.state().position, right.position(), 1.0));
    }

    #[test]
    fn orbit_locked_until_converged() {
        let (mut transition, mut orbit) = setup();
        transition.select_preset("right").unwrap();
        transition.on_frame(&mut orbit);
        while transition.is_active() {
            assert!(!orbit.enabled);
            transition.on_frame(&mut orbit);
        }
        assert!(orbit.enabled);
    }

    #[test]
    fn unknown_preset_is_rejected_without_side_effects() {
        let (mut transition, mut orbit) = setup();
        assert_eq!(
            transition.select_preset("top"),
            Err(PresetError::Unknown("top".to_string()))
        );
        assert!(!transition.is_active());
        transition.on_frame(&mut orbit);
        assert_eq!(orbit.state(), &CameraState::default());
    }

    #[test]
    fn drag_during_transition_is_ignored() {
        let (mut transition, mut orbit) = setup();
        let (mut reference, mut reference_orbit) = setup();
        transition.select_preset("right").unwrap();
        reference.select_preset("right").unwrap();

        transition.on_frame(&mut orbit);
        reference.on_frame(&mut reference_orbit);

        orbit.on_mouse_button(MouseButton::Left, true);
        orbit.on_mouse_move((10.0, 10.0));
        orbit.on_mouse_move((300.0, 120.0));
        orbit.on_scroll(4.0);

        for _ in 0..5 {
            transition.on_frame(&mut orbit);
            reference.on_frame(&mut reference_orbit);
        }
        assert_eq!(orbit.state(), reference_orbit.state());
    }

    #[test]
    fn reset_after_convergence_keeps_new_pose() {
        let (mut transition, mut orbit) = setup();
        transition.select_preset("left").unwrap();
        run_until_idle(&mut transition, &mut orbit);
        let converged = orbit.state().clone();

        orbit.on_scroll(2.0);
        orbit.reset();
        assert_eq!(orbit.state(), &converged);
    }

    #[test]
    fn reset_mid_transition_does_not_interrupt() {
        let (mut transition, mut orbit) = setup();
        let (mut reference, mut reference_orbit) = setup();
        transition.select_preset("left").unwrap();
        reference.select_preset("left").unwrap();
        for _ in 0..10 {
            transition.on_frame(&mut orbit);
            reference.on_frame(&mut reference_orbit);
        }
        orbit.reset();
        assert_eq!(orbit.state(), reference_orbit.state());
    }

    #[test]
    fn custom_table_is_honoured() {
        let table = PresetTable::new(vec![PresetEntry::new(
            "top",
            "^",
            [0.0, 4.0, 0.5],
            [0.0, 0.0, 0.0],
        )])
        .unwrap();
        let mut transition = CameraTransition::new(table);
        let mut orbit = OrbitControls::new(CameraState::default());
        transition.select_preset("top").unwrap();
        run_until_idle(&mut transition, &mut orbit);
        assert!(close(orbit.state().position, glm::vec3(0.0, 4.0, 0.5), CONVERGENCE_EPSILON));
    }

    fn converge_single(
        id: &str,
        position: [f32; 3],
        look_at: [f32; 3],
    ) -> (CameraTransition, OrbitControls) {
        let table = PresetTable::new(vec![PresetEntry::new(id, id, position, look_at)]).unwrap();
        let mut transition = CameraTransition::new(table);
        let mut orbit = OrbitControls::new(CameraState::default());
        transition.select_preset(id).unwrap();
        run_until_idle(&mut transition, &mut orbit);
        (transition, orbit)
    }

    #[test]
    fn presets_beyond_orbit_input_limits_converge() {
        let cases = [
            ("top-down", [0.0, 20.0, 0.0], [0.0, 0.0, 0.0]),
            ("close-up", [0.0, 0.8, 0.3], [0.0, 0.8, 0.0]),
            ("far", [0.0, 1.0, 60.0], [0.0, 0.0, 0.0]),
            ("below", [0.0, -6.0, 0.0], [0.0, 0.5, 0.0]),
        ];
        for (id, position, look_at) in cases {
            let (transition, orbit) = converge_single(id, position, look_at);
            assert_eq!(transition.phase(), TransitionPhase::Idle, "{id}");
            assert!(orbit.enabled, "{id}");
            assert!(
                close(orbit.state().position, glm::make_vec3(&position), CONVERGENCE_EPSILON),
                "{id}"
            );
            assert!(orbit.state().view_matrix().iter().all(|v| v.is_finite()), "{id}");
        }
    }

    #[test]
    fn distance_strictly_decreases_for_far_preset() {
        let table =
            PresetTable::new(vec![PresetEntry::new("far", "far", [0.0, 1.0, 60.0], [0.0; 3])])
                .unwrap();
        let mut transition = CameraTransition::new(table);
        let mut orbit = OrbitControls::new(CameraState::default());
        transition.select_preset("far").unwrap();
        let mut previous = glm::distance(&orbit.state().position, &transition.target_position);
        while transition.is_active() {
            transition.on_frame(&mut orbit);
            let current = glm::distance(&orbit.state().position, &transition.target_position);
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn json_table_presets_converge() {
        let json = r#"[
            {"id": "overhead", "label": "^", "camera_position": [0, 20, 0], "look_at": [0, 0, 0]},
            {"id": "macro", "camera_position": [0.22, 0.5, 0.6], "look_at": [0.22, 0.45, 0.35]},
            {"id": "wide", "camera_position": [-40, 30, 40], "look_at": [0, 0.5, 0]}
        ]"#;
        let table = PresetTable::from_json(json).unwrap();
        let ids: Vec<String> = table.iter().map(|e| e.id.clone()).collect();
        let mut transition = CameraTransition::new(table);
        let mut orbit = OrbitControls::new(CameraState::default());
        for id in &ids {
            transition.select_preset(id).unwrap();
            run_until_idle(&mut transition, &mut orbit);
            let preset = *transition.presets().get(id).unwrap();
            assert!(close(orbit.state().position, preset.position(), CONVERGENCE_EPSILON), "{id}");
            assert!(orbit.enabled);
        }
    }
}
