use nalgebra_glm as glm;

/// Live camera pose: eye position plus the orbit focus it looks at (Y up).
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: glm::Vec3,
    pub target: glm::Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraState {
    pub fn new(position: glm::Vec3, target: glm::Vec3) -> Self {
        Self {
            position,
            target,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn distance(&self) -> f32 {
        glm::distance(&self.position, &self.target)
    }

    /// World Y, or -Z when looking (almost) straight up or down.
    pub fn up(&self) -> glm::Vec3 {
        let forward = self.target - self.position;
        let sideways = glm::length(&glm::cross(&forward, &glm::Vec3::y()));
        if sideways <= 1e-4 * glm::length(&forward) {
            glm::vec3(0.0, 0.0, -1.0)
        } else {
            glm::Vec3::y()
        }
    }

    pub fn view_matrix(&self) -> glm::Mat4 {
        glm::look_at(&self.position, &self.target, &self.up())
    }

    /// Depth range is [0, 1] to match wgpu clip space.
    pub fn projection_matrix(&self, aspect: f32) -> glm::Mat4 {
        glm::perspective_rh_zo(aspect, self.fov_y_degrees.to_radians(), self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> glm::Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// View-projection of the same camera seen in a horizontal mirror at `plane_y`.
    pub fn mirrored_view_proj(&self, aspect: f32, plane_y: f32) -> glm::Mat4 {
        self.projection_matrix(aspect) * self.view_matrix() * mirror_matrix(plane_y)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(glm::vec3(0.0, 0.0, 5.0), glm::vec3(0.0, 0.0, 0.0))
    }
}

/// Reflection about the plane `y = plane_y`.
pub fn mirror_matrix(plane_y: f32) -> glm::Mat4 {
    let translate = glm::translation(&glm::vec3(0.0, 2.0 * plane_y, 0.0));
    glm::scale(&translate, &glm::vec3(1.0, -1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(m: &glm::Mat4, p: glm::Vec3) -> glm::Vec3 {
        let v = m * glm::vec4(p.x, p.y, p.z, 1.0);
        glm::vec3(v.x / v.w, v.y / v.w, v.z / v.w)
    }

    #[test]
    fn default_pose_matches_scene_start() {
        let state = CameraState::default();
        assert_eq!(state.position, glm::vec3(0.0, 0.0, 5.0));
        assert_eq!(state.target, glm::vec3(0.0, 0.0, 0.0));
        assert!((state.distance() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn mirror_reflects_about_floor() {
        let m = mirror_matrix(-0.1);
        let p = transform(&m, glm::vec3(1.0, 0.4, -2.0));
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y - (-0.6)).abs() < 1e-6);
        assert!((p.z + 2.0).abs() < 1e-6);
    }

    #[test]
    fn mirrored_view_proj_sees_reflected_point() {
        let state = CameraState::new(glm::vec3(2.0, 1.5, 2.0), glm::vec3(0.1, 0.5, -0.1));
        let point = glm::vec3(0.3, 0.8, 0.2);
        let reflected = glm::vec3(0.3, 2.0 * -0.1 - 0.8, 0.2);
        let a = transform(&state.mirrored_view_proj(1.5, -0.1), point);
        let b = transform(&state.view_proj(1.5), reflected);
        assert!(glm::distance(&a, &b) < 1e-4);
    }

    #[test]
    fn top_down_view_is_well_defined() {
        let state = CameraState::new(glm::vec3(0.0, 20.0, 0.0), glm::vec3(0.0, 0.0, 0.0));
        assert_eq!(state.up(), glm::vec3(0.0, 0.0, -1.0));
        let view = state.view_matrix();
        assert!(view.iter().all(|v| v.is_finite()));
        let ndc = transform(&state.view_proj(1.0), state.target);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let state = CameraState::new(glm::vec3(-2.0, 1.5, 2.0), glm::vec3(-0.1, 0.5, -0.1));
        let ndc = transform(&state.view_proj(16.0 / 9.0), state.target);
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
