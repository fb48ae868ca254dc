use crate::scene::model::TextureImage;

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    }
}

pub fn create_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(width, height),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

pub fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &TextureImage,
    srgb: bool,
) -> (wgpu::Texture, wgpu::TextureView) {
    let format = if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(image.width, image.height),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        extent(image.width, image.height),
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// 1x1 texture of a single colour, used where an optional map is missing.
pub fn solid_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    rgba: [u8; 4],
) -> (wgpu::Texture, wgpu::TextureView) {
    let image = TextureImage {
        width: 1,
        height: 1,
        pixels: rgba.to_vec(),
    };
    upload_rgba8(device, queue, label, &image, false)
}

pub fn linear_sampler(device: &wgpu::Device, label: &str, mode: wgpu::AddressMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Offscreen targets that depend on the surface size.
pub struct RenderTargets {
    pub width: u32,
    pub height: u32,
    pub hdr: wgpu::Texture,
    pub hdr_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub reflection_view: wgpu::TextureView,
    pub reflection_depth_view: wgpu::TextureView,
    pub opaque_copy: wgpu::Texture,
    pub opaque_copy_view: wgpu::TextureView,
}

impl RenderTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let sampled = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr, hdr_view) = create_target(
            device,
            "HDR Scene Target",
            width,
            height,
            HDR_FORMAT,
            sampled | wgpu::TextureUsages::COPY_SRC,
        );
        let (_, depth_view) = create_target(device, "Scene Depth", width, height, DEPTH_FORMAT, sampled);
        let (_, reflection_view) =
            create_target(device, "Reflection Target", width, height, HDR_FORMAT, sampled);
        let (_, reflection_depth_view) = create_target(
            device,
            "Reflection Depth",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (opaque_copy, opaque_copy_view) = create_target(
            device,
            "Opaque Copy",
            width,
            height,
            HDR_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );

        Self {
            width: width.max(1),
            height: height.max(1),
            hdr,
            hdr_view,
            depth_view,
            reflection_view,
            reflection_depth_view,
            opaque_copy,
            opaque_copy_view,
        }
    }

    /// Snapshot of the opaque scene, sampled by the transmission material.
    pub fn copy_opaque(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.hdr,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: &self.opaque_copy,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            extent(self.width, self.height),
        );
    }
}
