use egui_wgpu::ScreenDescriptor;
use nalgebra_glm as glm;

use crate::camera::CameraState;
use crate::renderer::renderer::{DrawSlot, GpuMesh, GpuPrimitive, Renderer};
use crate::renderer::uniforms::{CameraUniform, DrawUniform, PostUniform, SceneUniform};
use crate::scene::light::bulbs;
use crate::scene::{CUP_PLACEMENT, FLOOR_PLACEMENT, FLOOR_Y, MACHINE_PLACEMENT, Placement};
use crate::settings::Settings;

const FLOOR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const FLOOR_METALNESS: f32 = 0.25;
const FLOOR_ROUGHNESS: f32 = 0.45;
const CUP_METALNESS: f32 = 0.1;
const CUP_ROUGHNESS: f32 = 0.15;

fn draw_mesh(pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh, slot: &DrawSlot) {
    pass.set_bind_group(1, &slot.bind_group, &[]);
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
}

fn color_attachment(
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
) -> Option<wgpu::RenderPassColorAttachment<'_>> {
    Some(wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        },
        depth_slice: None,
    })
}

fn depth_attachment(
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<f32>,
) -> Option<wgpu::RenderPassDepthStencilAttachment<'_>> {
    Some(wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    })
}

impl Renderer {
    fn update_draws(&self, settings: &Settings) {
        let place = |placement: &Placement, primitive: &GpuPrimitive| placement.matrix() * primitive.local;

        for primitive in &self.machine {
            let uniform = DrawUniform::new(
                &place(&MACHINE_PLACEMENT, primitive),
                primitive.base_color,
                primitive.metallic,
                primitive.roughness,
            )
            .textured(primitive.textured);
            self.write_draw(&primitive.slot, &uniform);
        }

        let cup = &settings.cup;
        for primitive in &self.cup {
            let mut uniform = DrawUniform::new(
                &place(&CUP_PLACEMENT, primitive),
                [cup.color[0], cup.color[1], cup.color[2], primitive.base_color[3]],
                CUP_METALNESS,
                CUP_ROUGHNESS,
            );
            uniform.transmission = [
                cup.transmission,
                cup.thickness,
                cup.distortion,
                cup.chromatic_aberration,
            ];
            uniform.extra[0] = cup.anisotropy;
            self.write_draw(&primitive.slot, &uniform);
        }

        let floor = &settings.floor;
        let mut floor_uniform = DrawUniform::new(
            &FLOOR_PLACEMENT.matrix(),
            FLOOR_COLOR,
            FLOOR_METALNESS,
            FLOOR_ROUGHNESS,
        );
        let distortion = if self.has_distortion { floor.distortion } else { 0.0 };
        floor_uniform.floor = [floor.strength, floor.blur[0], floor.blur[1], distortion];
        self.write_draw(&self.floor.1, &floor_uniform);

        for (light, slot) in bulbs(&settings.light).iter().zip(&self.bulb_slots) {
            let model = glm::translation(&light.position);
            let color = [light.color[0], light.color[1], light.color[2], 1.0];
            self.write_draw(slot, &DrawUniform::new(&model, color, 0.0, 1.0).unlit());
        }
    }

    fn draw_opaque(&self, pass: &mut wgpu::RenderPass<'_>, frame: &wgpu::BindGroup) {
        pass.set_pipeline(&self.background_pipeline);
        pass.set_bind_group(0, frame, &[]);
        pass.draw(0..3, 0..1);

        pass.set_pipeline(&self.opaque_pipeline);
        pass.set_bind_group(0, frame, &[]);
        for primitive in &self.machine {
            draw_mesh(pass, &primitive.mesh, &primitive.slot);
        }
        for slot in &self.bulb_slots {
            draw_mesh(pass, &self.bulb_mesh, slot);
        }
    }

    pub fn render(
        &mut self,
        camera: &CameraState,
        settings: &Settings,
        paint_jobs: Vec<egui::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
        screen_descriptor: ScreenDescriptor,
    ) -> Result<(), wgpu::SurfaceError> {
        // Minimized windows report a zero size
        if self.config.width == 0 || self.config.height == 0 {
            return Ok(());
        }

        let aspect = self.config.width as f32 / self.config.height as f32;
        let lights = bulbs(&settings.light);
        self.write_frame(
            &CameraUniform::new(camera, aspect),
            &CameraUniform::mirrored(camera, aspect, FLOOR_Y),
            &SceneUniform::new(
                &lights,
                settings.light.ambient_light_intensity,
                &settings.environment,
                self.environment.mip_count,
            ),
            &PostUniform::new(
                &settings.bloom,
                &settings.tone_mapping,
                camera,
                self.config.width,
                self.config.height,
            ),
        );
        self.update_draws(settings);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Mirrored scene for the floor, without the floor itself or the cup
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Reflection Pass"),
                color_attachments: &[color_attachment(
                    &self.targets.reflection_view,
                    wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                )],
                depth_stencil_attachment: depth_attachment(
                    &self.targets.reflection_depth_view,
                    wgpu::LoadOp::Clear(1.0),
                ),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.draw_opaque(&mut pass, &self.mirrored_frame_bind_group);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Opaque Pass"),
                color_attachments: &[color_attachment(
                    &self.targets.hdr_view,
                    wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                )],
                depth_stencil_attachment: depth_attachment(
                    &self.targets.depth_view,
                    wgpu::LoadOp::Clear(1.0),
                ),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.draw_opaque(&mut pass, &self.frame_bind_group);

            pass.set_pipeline(&self.floor_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(2, &self.surface_bind_group, &[]);
            draw_mesh(&mut pass, &self.floor.0, &self.floor.1);
        }

        self.targets.copy_opaque(&mut encoder);

        if !self.cup.is_empty() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Transmission Pass"),
                color_attachments: &[color_attachment(&self.targets.hdr_view, wgpu::LoadOp::Load)],
                depth_stencil_attachment: depth_attachment(
                    &self.targets.depth_view,
                    wgpu::LoadOp::Load,
                ),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.transmission_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(2, &self.surface_bind_group, &[]);
            for primitive in &self.cup {
                draw_mesh(&mut pass, &primitive.mesh, &primitive.slot);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[color_attachment(
                    &view,
                    wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                )],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.composite_pipeline);
            pass.set_bind_group(0, &self.composite_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui render pass"),
                    color_attachments: &[color_attachment(&view, wgpu::LoadOp::Load)],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut egui_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
