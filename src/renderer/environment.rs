use crate::assets::EnvironmentMap;
use crate::renderer::texture::HDR_FORMAT;

pub struct GpuEnvironment {
    pub view: wgpu::TextureView,
    pub mip_count: u32,
}

impl GpuEnvironment {
    /// Black 1x1 map used until the HDR arrives or when it fails to load.
    pub fn fallback(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let zero = half::f16::from_f32(0.0);
        let one = half::f16::from_f32(1.0);
        let map = EnvironmentMap {
            levels: vec![crate::assets::environment::EnvironmentLevel {
                width: 1,
                height: 1,
                texels: vec![zero, zero, zero, one],
            }],
        };
        Self::upload(device, queue, &map)
    }

    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, map: &EnvironmentMap) -> Self {
        let mip_count = map.mip_count().max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Environment Map"),
            size: wgpu::Extent3d {
                width: map.width().max(1),
                height: map.height().max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip, level) in map.levels.iter().enumerate() {
            let mut data = Vec::with_capacity(level.texels.len() * 2);
            for texel in &level.texels {
                data.extend_from_slice(&texel.to_le_bytes());
            }
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(level.width * 8),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view, mip_count }
    }
}
