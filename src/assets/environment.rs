use half::f16;
use image::imageops::FilterType;

use crate::error::SceneError;

/// One mip level of an equirectangular HDR map, RGBA half floats.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentLevel {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<f16>,
}

/// Full mip chain down to 1x1; coarser levels stand in for background blur
/// and rough reflections.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub levels: Vec<EnvironmentLevel>,
}

impl EnvironmentMap {
    pub fn from_rgba32f(image: image::Rgba32FImage) -> Self {
        let mut levels = vec![to_level(&image)];
        let mut current = image;
        while current.width() > 1 || current.height() > 1 {
            let width = (current.width() / 2).max(1);
            let height = (current.height() / 2).max(1);
            current = image::imageops::resize(&current, width, height, FilterType::Triangle);
            levels.push(to_level(&current));
        }
        Self { levels }
    }

    pub fn width(&self) -> u32 {
        self.levels.first().map_or(0, |l| l.width)
    }

    pub fn height(&self) -> u32 {
        self.levels.first().map_or(0, |l| l.height)
    }

    pub fn mip_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

fn to_level(image: &image::Rgba32FImage) -> EnvironmentLevel {
    EnvironmentLevel {
        width: image.width(),
        height: image.height(),
        texels: image.as_raw().iter().map(|&v| f16::from_f32(v)).collect(),
    }
}

pub fn decode_hdr(bytes: &[u8]) -> Result<EnvironmentMap, SceneError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Hdr)
        .map_err(|e| SceneError::new("hdr-decode").push_std(e))?
        .into_rgba32f();
    Ok(EnvironmentMap::from_rgba32f(image))
}
