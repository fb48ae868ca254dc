use nalgebra_glm as glm;

use crate::settings::LightSettings;

/// A spot light aimed at the origin, drawn as a small glowing bulb.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub position: glm::Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Outer cone half-angle in radians.
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
}

impl SpotLight {
    pub fn new(position: glm::Vec3, color: [f32; 3], intensity: f32, angle: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            angle,
            penumbra: 1.0,
            decay: 1.0,
        }
    }

    pub fn direction(&self) -> glm::Vec3 {
        let to_origin = -self.position;
        if glm::length(&to_origin) <= f32::EPSILON {
            return glm::vec3(0.0, -1.0, 0.0);
        }
        glm::normalize(&to_origin)
    }

    pub fn cos_outer(&self) -> f32 {
        self.angle.cos()
    }

    pub fn cos_inner(&self) -> f32 {
        (self.angle * (1.0 - self.penumbra)).cos()
    }
}

pub const BULB_POSITIONS: [[f32; 3]; 2] = [[-2.0, 4.0, -2.0], [3.0, 2.0, 1.0]];

/// The two bulbs with their current tuning.
pub fn bulbs(settings: &LightSettings) -> [SpotLight; 2] {
    [
        SpotLight::new(
            glm::make_vec3(&BULB_POSITIONS[0]),
            settings.spot_light_color1,
            settings.intensity1,
            settings.angle1,
        ),
        SpotLight::new(
            glm::make_vec3(&BULB_POSITIONS[1]),
            settings.spot_light_color2,
            settings.intensity2,
            settings.angle2,
        ),
    ]
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa` to RGB in [0, 1]. Alpha is dropped.
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    match digits.len() {
        3 => {
            let mut rgb = [0.0; 3];
            for (i, c) in digits.chars().enumerate() {
                let doubled: String = [c, c].iter().collect();
                rgb[i] = channel(&doubled)?;
            }
            Some(rgb)
        }
        6 | 8 => Some([
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        ]),
        _ => None,
    }
}
