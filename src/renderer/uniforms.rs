use nalgebra_glm as glm;

use crate::camera::CameraState;
use crate::scene::light::SpotLight;
use crate::settings::{BloomSettings, EnvironmentSettings, ToneMappingSettings};

fn mat4_cols(m: &glm::Mat4) -> [[f32; 4]; 4] {
    let s = m.as_slice();
    [
        [s[0], s[1], s[2], s[3]],
        [s[4], s[5], s[6], s[7]],
        [s[8], s[9], s[10], s[11]],
        [s[12], s[13], s[14], s[15]],
    ]
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
    /// Fragments with `dot(p, xyz) + w < 0` are discarded.
    pub clip_plane: [f32; 4],
}

impl CameraUniform {
    pub fn new(camera: &CameraState, aspect: f32) -> Self {
        let view_proj = camera.view_proj(aspect);
        Self::from_matrix(view_proj, camera.position, [0.0, 0.0, 0.0, 1.0])
    }

    /// Camera mirrored about the horizontal plane `y = plane_y`, clipping
    /// everything below it.
    pub fn mirrored(camera: &CameraState, aspect: f32, plane_y: f32) -> Self {
        let view_proj = camera.mirrored_view_proj(aspect, plane_y);
        let mut position = camera.position;
        position.y = 2.0 * plane_y - position.y;
        Self::from_matrix(view_proj, position, [0.0, 1.0, 0.0, -plane_y])
    }

    fn from_matrix(view_proj: glm::Mat4, position: glm::Vec3, clip_plane: [f32; 4]) -> Self {
        let inv_view_proj = glm::inverse(&view_proj);
        Self {
            view_proj: mat4_cols(&view_proj),
            inv_view_proj: mat4_cols(&inv_view_proj),
            position: [position.x, position.y, position.z, 1.0],
            clip_plane,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    /// rgb, intensity
    pub color: [f32; 4],
    /// cos outer, cos inner, decay, unused
    pub cone: [f32; 4],
}

impl From<&SpotLight> for LightUniform {
    fn from(light: &SpotLight) -> Self {
        let dir = light.direction();
        Self {
            position: [light.position.x, light.position.y, light.position.z, 1.0],
            direction: [dir.x, dir.y, dir.z, 0.0],
            color: [light.color[0], light.color[1], light.color[2], light.intensity],
            cone: [light.cos_outer(), light.cos_inner(), light.decay, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub lights: [LightUniform; 2],
    /// rgb, intensity
    pub ambient: [f32; 4],
    /// env intensity, background blur, background intensity, rotation
    pub environment: [f32; 4],
    /// mip count, unused x3
    pub environment_info: [f32; 4],
}

impl SceneUniform {
    pub fn new(
        lights: &[SpotLight; 2],
        ambient_intensity: f32,
        env: &EnvironmentSettings,
        env_mip_count: u32,
    ) -> Self {
        Self {
            lights: [LightUniform::from(&lights[0]), LightUniform::from(&lights[1])],
            ambient: [1.0, 1.0, 1.0, ambient_intensity],
            environment: [env.env_intensity, env.blur, env.bg_intensity, env.rotation],
            environment_info: [env_mip_count as f32, 0.0, 0.0, 0.0],
        }
    }
}

/// Per-draw data. Groups of four floats keep the WGSL layout trivial.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    /// metallic, roughness, has texture, unlit
    pub pbr: [f32; 4],
    /// transmission, thickness, distortion, chromatic aberration
    pub transmission: [f32; 4],
    /// anisotropy, unused x3
    pub extra: [f32; 4],
    /// reflection strength, blur x, blur y, distortion
    pub floor: [f32; 4],
}

impl DrawUniform {
    pub fn new(model: &glm::Mat4, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        let normal = glm::transpose(&glm::inverse(model));
        Self {
            model: mat4_cols(model),
            normal: mat4_cols(&normal),
            base_color,
            pbr: [metallic, roughness, 0.0, 0.0],
            transmission: [0.0; 4],
            extra: [0.0; 4],
            floor: [0.0; 4],
        }
    }

    pub fn textured(mut self, has_texture: bool) -> Self {
        self.pbr[2] = if has_texture { 1.0 } else { 0.0 };
        self
    }

    pub fn unlit(mut self) -> Self {
        self.pbr[3] = 1.0;
        self
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniform {
    /// focus distance, focal length, bokeh scale, unused
    pub depth_of_field: [f32; 4],
    /// threshold, smoothing, opacity, unused
    pub bloom: [f32; 4],
    /// offset, darkness, unused x2
    pub vignette: [f32; 4],
    /// middle grey, max luminance, average luminance, unused
    pub tone_mapping: [f32; 4],
    /// near, far, width, height
    pub viewport: [f32; 4],
}

pub const DOF_FOCUS_DISTANCE: f32 = 0.0;
pub const DOF_FOCAL_LENGTH: f32 = 0.1;
pub const DOF_BOKEH_SCALE: f32 = 2.0;
pub const VIGNETTE_OFFSET: f32 = 0.1;
pub const VIGNETTE_DARKNESS: f32 = 0.75;

impl PostUniform {
    pub fn new(
        bloom: &BloomSettings,
        tone: &ToneMappingSettings,
        camera: &CameraState,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            depth_of_field: [DOF_FOCUS_DISTANCE, DOF_FOCAL_LENGTH, DOF_BOKEH_SCALE, 0.0],
            bloom: [
                bloom.luminance_threshold,
                bloom.luminance_smoothing,
                bloom.opacity,
                0.0,
            ],
            vignette: [VIGNETTE_OFFSET, VIGNETTE_DARKNESS, 0.0, 0.0],
            tone_mapping: [tone.middle_grey, tone.max_luminance, tone.avg_luminance, 0.0],
            viewport: [camera.near, camera.far, width as f32, height as f32],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_uniform_aligned() {
        for size in [
            std::mem::size_of::<CameraUniform>(),
            std::mem::size_of::<LightUniform>(),
            std::mem::size_of::<SceneUniform>(),
            std::mem::size_of::<DrawUniform>(),
            std::mem::size_of::<PostUniform>(),
        ] {
            assert_eq!(size % 16, 0, "size {size}");
        }
        assert_eq!(std::mem::size_of::<DrawUniform>(), 208);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 160);
    }

    #[test]
    fn mirrored_camera_sits_below_floor() {
        let camera = CameraState::new(glm::vec3(0.0, 2.0, 3.0), glm::vec3(0.0, 0.0, 0.0));
        let uniform = CameraUniform::mirrored(&camera, 1.0, -0.1);
        assert!((uniform.position[1] - (-2.2)).abs() < 1e-5);
        assert_eq!(uniform.clip_plane, [0.0, 1.0, 0.0, 0.1]);
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let model = glm::scale(&glm::Mat4::identity(), &glm::vec3(2.0, 1.0, 1.0));
        let draw = DrawUniform::new(&model, [1.0; 4], 0.0, 1.0);
        assert!((draw.normal[0][0] - 0.5).abs() < 1e-6);
        assert_eq!(draw.model[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn builders_set_flags() {
        let draw = DrawUniform::new(&glm::Mat4::identity(), [1.0; 4], 0.3, 0.7)
            .textured(true)
            .unlit();
        assert_eq!(draw.pbr, [0.3, 0.7, 1.0, 1.0]);
    }
}
