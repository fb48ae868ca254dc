//! Fixed layout of the showcase: where each asset sits and how large it is.

pub mod light;
pub mod model;
pub mod primitives;

use nalgebra_glm as glm;

pub const FLOOR_Y: f32 = -0.1;
pub const FLOOR_SIZE: f32 = 100.0;
pub const BULB_RADIUS: f32 = 0.1;
pub const CUP_MESH_NAME: &str = "cup";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: [f32; 3],
    pub scale: f32,
}

impl Placement {
    pub fn matrix(&self) -> glm::Mat4 {
        let translate = glm::translation(&glm::make_vec3(&self.position));
        glm::scale(&translate, &glm::vec3(self.scale, self.scale, self.scale))
    }
}

pub const MACHINE_PLACEMENT: Placement = Placement {
    position: [0.0, -0.2, 0.5],
    scale: 5.0,
};

pub const CUP_PLACEMENT: Placement = Placement {
    position: [0.22, 0.38, 0.35],
    scale: 0.09,
};

pub const FLOOR_PLACEMENT: Placement = Placement {
    position: [0.0, FLOOR_Y, 0.0],
    scale: 1.0,
};
