use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use egui_wgpu::ScreenDescriptor;
use egui_winit::State;
use log::{error, info};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use winit::window::Window;

use crate::assets::{AssetKind, AssetLoadResult, AssetManager, AssetPayload, spawn_load};
use crate::camera::{CameraState, CameraTransition, OrbitControls, PresetTable};
use crate::error::SceneError;
use crate::renderer::{ModelSlot, Renderer};
use crate::settings::Settings;
use crate::ui::stats::FrameTimer;
use crate::ui::{Ui, UiResponse};

const EGUI_MAX_PASSES: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(passes) => passes,
    None => NonZeroUsize::MIN,
};

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

impl EventResponse {
    fn idle(repaint: bool) -> Self {
        Self {
            repaint,
            exit: false,
        }
    }

    fn exit() -> Self {
        Self {
            repaint: false,
            exit: true,
        }
    }
}

pub struct App {
    pub window: Arc<Window>,
    ui: Ui,
    renderer: Renderer,
    orbit: OrbitControls,
    transition: CameraTransition,
    assets: AssetManager,
    asset_sender: UnboundedSender<AssetLoadResult>,
    asset_receiver: UnboundedReceiver<AssetLoadResult>,
    runtime: tokio::runtime::Handle,
    egui_state: State,
    egui_wants_pointer: bool,
    settings: Settings,
    timer: FrameTimer,
}

impl App {
    pub async fn new(
        window: Arc<Window>,
        runtime: tokio::runtime::Handle,
        asset_dir: &Path,
    ) -> Result<Self, SceneError> {
        let renderer = Renderer::new(window.clone()).await?;

        let egui_ctx = renderer.egui_context();
        // Windows that change size on their first frame need a second layout pass
        egui_ctx.options_mut(|options| {
            options.max_passes = EGUI_MAX_PASSES;
        });
        let egui_state = State::new(
            egui_ctx,
            egui::viewport::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let mut orbit = OrbitControls::new(CameraState::default());
        orbit.save_state();

        let (asset_sender, asset_receiver) = unbounded_channel();

        Ok(Self {
            window,
            ui: Ui::new(),
            renderer,
            orbit,
            transition: CameraTransition::new(PresetTable::load_or_builtin(asset_dir)),
            assets: AssetManager::new(asset_dir),
            asset_sender,
            asset_receiver,
            runtime,
            egui_state,
            egui_wants_pointer: false,
            settings: Settings::load(),
            timer: FrameTimer::new(),
        })
    }

    pub fn start_loading(&mut self) {
        for kind in AssetKind::ALL {
            self.load_asset(kind);
        }
    }

    fn load_asset(&mut self, kind: AssetKind) {
        if self.assets.mark_loading(kind) {
            spawn_load(
                &self.runtime,
                kind,
                self.assets.directory().to_path_buf(),
                self.asset_sender.clone(),
            );
        }
    }

    fn apply_asset_results(&mut self) {
        while let Ok(result) = self.asset_receiver.try_recv() {
            match result {
                AssetLoadResult::Success { kind, payload } => {
                    let detail = match payload {
                        AssetPayload::Model(model) => {
                            let slot = if kind == AssetKind::CupModel {
                                ModelSlot::Cup
                            } else {
                                ModelSlot::Machine
                            };
                            self.renderer.set_model(slot, &model);
                            format!(
                                "{} vertices, {} triangles",
                                model.vertex_count(),
                                model.triangle_count()
                            )
                        }
                        AssetPayload::Environment(env) => {
                            self.renderer.set_environment(&env);
                            format!("{}x{}, {} mips", env.width(), env.height(), env.mip_count())
                        }
                        AssetPayload::Image(image) => {
                            self.renderer.set_distortion_map(&image);
                            format!("{}x{}", image.width, image.height)
                        }
                    };
                    info!("{} ready: {}", kind.label(), detail);
                    self.assets.mark_loaded(kind, detail);
                }
                AssetLoadResult::Error { kind, error } => {
                    self.assets.mark_error(kind, error);
                }
            }
        }
    }

    pub fn reconfigure_surface(&mut self) {
        let size = self.window.inner_size();
        if self.renderer.size() == (size.width, size.height) {
            self.renderer.reconfigure();
        } else {
            self.renderer.resize(size);
        }
    }

    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> EventResponse {
        use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

        let egui_response = self.egui_state.on_window_event(&self.window, event);

        match event {
            WindowEvent::CloseRequested => return EventResponse::exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{Key, NamedKey};

                if egui_response.consumed || event.state != ElementState::Pressed {
                    return EventResponse::idle(egui_response.repaint);
                }
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => return EventResponse::exit(),
                    Key::Character(c) if c.eq_ignore_ascii_case("r") => self.orbit.reset(),
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.orbit.on_modifiers(modifiers.state().shift_key());
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                // Releases always go through so a drag that ends over a window doesn't stick
                if pressed && self.egui_wants_pointer {
                    return EventResponse::idle(egui_response.repaint);
                }
                self.orbit.on_mouse_button(*button, pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.egui_wants_pointer {
                    return EventResponse::idle(egui_response.repaint);
                }
                self.orbit.on_mouse_move((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if self.egui_wants_pointer {
                    return EventResponse::idle(egui_response.repaint);
                }
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                self.orbit.on_scroll(amount);
            }
            _ => {}
        }

        EventResponse::idle(egui_response.repaint)
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.apply_asset_results();
        self.timer.tick();
        self.transition.on_frame(&mut self.orbit);

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.renderer.egui_context();

        let mut response = UiResponse::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            response = self.ui.show(
                ctx,
                &mut self.settings,
                &self.transition,
                &self.assets,
                &self.timer,
            );
        });
        self.egui_wants_pointer = egui_ctx.wants_pointer_input();

        if let Some(id) = response.preset {
            if let Err(e) = self.transition.select_preset(&id) {
                error!("Camera preset request '{id}' rejected: {e}");
            }
        }
        for kind in response.retry_assets {
            self.load_asset(kind);
        }

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = self.window.inner_size();
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        self.renderer.render(
            self.orbit.state(),
            &self.settings,
            paint_jobs,
            full_output.textures_delta,
            screen_descriptor,
        )
    }
}
