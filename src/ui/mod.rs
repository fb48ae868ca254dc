mod assets_panel;
pub mod stats;

use std::f32::consts::{FRAC_PI_2, PI};

use crate::assets::{AssetKind, AssetManager};
use crate::camera::{CameraTransition, PresetTable};
use crate::settings::Settings;
use stats::FrameTimer;

/// What the user asked for this frame.
#[derive(Debug, Default)]
pub struct UiResponse {
    pub preset: Option<String>,
    pub retry_assets: Vec<AssetKind>,
}

fn window_toggle(ui: &mut egui::Ui, label: &str, open: &mut bool) -> bool {
    let text = if *open {
        format!("✅ {label}")
    } else {
        format!("⬜ {label}")
    };
    if ui.button(text).clicked() {
        *open = !*open;
        return true;
    }
    false
}

fn slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    step: f64,
) -> bool {
    ui.add(egui::Slider::new(value, range).step_by(step).text(label))
        .changed()
}

pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        camera: &CameraTransition,
        assets: &AssetManager,
        timer: &FrameTimer,
    ) -> UiResponse {
        let mut response = UiResponse::default();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label("📋 Windows:");
                let ui_settings = &mut settings.ui;
                let mut changed = false;
                changed |= window_toggle(ui, "Cup", &mut ui_settings.show_cup);
                changed |= window_toggle(ui, "Floor", &mut ui_settings.show_floor);
                changed |= window_toggle(ui, "Environment", &mut ui_settings.show_environment);
                changed |= window_toggle(ui, "Light", &mut ui_settings.show_light);
                changed |= window_toggle(ui, "Bloom", &mut ui_settings.show_bloom);
                changed |= window_toggle(ui, "ToneMapping", &mut ui_settings.show_tone_mapping);
                ui.separator();
                changed |= window_toggle(ui, "Assets", &mut ui_settings.show_assets);
                changed |= window_toggle(ui, "Stats", &mut ui_settings.show_stats);
                if changed {
                    ui_settings.save();
                }
            });
        });

        let before = settings.ui.clone();

        if settings.ui.show_cup {
            self.show_cup_window(ctx, settings);
        }
        if settings.ui.show_floor {
            self.show_floor_window(ctx, settings);
        }
        if settings.ui.show_environment {
            self.show_environment_window(ctx, settings);
        }
        if settings.ui.show_light {
            self.show_light_window(ctx, settings);
        }
        if settings.ui.show_bloom {
            self.show_bloom_window(ctx, settings);
        }
        if settings.ui.show_tone_mapping {
            self.show_tone_mapping_window(ctx, settings);
        }
        if settings.ui.show_assets {
            response.retry_assets =
                assets_panel::show_assets_window(ctx, &mut settings.ui.show_assets, assets);
        }
        if settings.ui.show_stats {
            stats::show_stats_overlay(ctx, timer, camera.phase());
        }

        // A window closed through its title-bar button
        if settings.ui != before {
            settings.ui.save();
        }

        response.preset = self.show_preset_buttons(ctx, camera.presets());
        response
    }

    fn show_preset_buttons(&self, ctx: &egui::Context, presets: &PresetTable) -> Option<String> {
        let mut clicked = None;
        egui::Area::new(egui::Id::new("camera_presets"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -32.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 24.0;
                    for entry in presets.iter() {
                        let button = egui::Button::new(
                            egui::RichText::new(entry.label()).size(22.0).strong(),
                        )
                        .min_size(egui::vec2(48.0, 48.0))
                        .corner_radius(24.0);
                        if ui.add(button).on_hover_text(entry.id.as_str()).clicked() {
                            clicked = Some(entry.id.clone());
                        }
                    }
                });
            });
        clicked
    }

    fn show_cup_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        let cup = &mut settings.cup;
        egui::Window::new("🥤 Cup")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_cup)
            .show(ctx, |ui| {
                let mut changed = false;
                changed |= slider(ui, "distortion", &mut cup.distortion, 0.0..=1.0, 0.01);
                ui.horizontal(|ui| {
                    ui.label("color");
                    changed |= ui.color_edit_button_rgb(&mut cup.color).changed();
                });
                changed |= slider(ui, "thickness", &mut cup.thickness, 0.0..=1.0, 0.01);
                changed |= slider(ui, "anisotropy", &mut cup.anisotropy, 0.0..=1.0, 0.01);
                changed |= slider(ui, "transmission", &mut cup.transmission, 0.0..=1.0, 0.01);
                changed |= slider(
                    ui,
                    "chromatic aberration",
                    &mut cup.chromatic_aberration,
                    0.0..=1.0,
                    0.01,
                );
                if changed {
                    cup.save();
                }
            });
    }

    fn show_floor_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        let floor = &mut settings.floor;
        egui::Window::new("🪞 Floor")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_floor)
            .show(ctx, |ui| {
                let mut changed = false;
                changed |= slider(ui, "strength", &mut floor.strength, 0.0..=1.0, 0.01);
                ui.horizontal(|ui| {
                    ui.label("blur");
                    for (axis, value) in ["x: ", "y: "].into_iter().zip(floor.blur.iter_mut()) {
                        changed |= ui
                            .add(egui::DragValue::new(value).prefix(axis).range(0.0..=2000.0))
                            .changed();
                    }
                });
                changed |= slider(ui, "distortion", &mut floor.distortion, 0.0..=1.0, 0.01);
                if changed {
                    floor.save();
                }
            });
    }

    fn show_environment_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        let env = &mut settings.environment;
        egui::Window::new("🌄 Environment")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_environment)
            .show(ctx, |ui| {
                let mut changed = false;
                changed |= slider(ui, "env intensity", &mut env.env_intensity, 0.0..=10.0, 0.1);
                changed |= slider(ui, "blur", &mut env.blur, 0.0..=1.0, 0.01);
                changed |= slider(ui, "bg intensity", &mut env.bg_intensity, 0.0..=1.0, 0.01);
                changed |= slider(ui, "rotation", &mut env.rotation, -PI..=PI, 0.01);
                if changed {
                    env.save();
                }
            });
    }

    fn show_light_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        let light = &mut settings.light;
        egui::Window::new("💡 Light")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_light)
            .show(ctx, |ui| {
                let mut changed = false;
                ui.horizontal(|ui| {
                    ui.label("spot light color 1");
                    changed |= ui.color_edit_button_rgb(&mut light.spot_light_color1).changed();
                });
                changed |= slider(ui, "intensity 1", &mut light.intensity1, 0.0..=50.0, 0.1);
                changed |= slider(ui, "angle 1", &mut light.angle1, 0.0..=FRAC_PI_2, 0.01);
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("spot light color 2");
                    changed |= ui.color_edit_button_rgb(&mut light.spot_light_color2).changed();
                });
                changed |= slider(ui, "intensity 2", &mut light.intensity2, 0.0..=50.0, 0.1);
                changed |= slider(ui, "angle 2", &mut light.angle2, 0.0..=FRAC_PI_2, 0.01);
                ui.separator();
                changed |= slider(
                    ui,
                    "ambient intensity",
                    &mut light.ambient_light_intensity,
                    0.0..=10.0,
                    0.1,
                );
                if changed {
                    light.save();
                }
            });
    }

    fn show_bloom_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        let bloom = &mut settings.bloom;
        egui::Window::new("✨ Bloom")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_bloom)
            .show(ctx, |ui| {
                if slider(ui, "opacity", &mut bloom.opacity, 0.0..=1.0, 0.01) {
                    bloom.save();
                }
            });
    }

    fn show_tone_mapping_window(&mut self, ctx: &egui::Context, settings: &mut Settings) {
        let tone = &mut settings.tone_mapping;
        egui::Window::new("🎞 ToneMapping")
            .default_width(300.0)
            .resizable(true)
            .open(&mut settings.ui.show_tone_mapping)
            .show(ctx, |ui| {
                let mut changed = false;
                changed |= slider(ui, "middle grey", &mut tone.middle_grey, 0.0..=1.0, 0.1);
                changed |= slider(ui, "max luminance", &mut tone.max_luminance, 0.0..=64.0, 1.0);
                changed |= slider(ui, "avg luminance", &mut tone.avg_luminance, 0.0..=5.0, 0.1);
                if changed {
                    tone.save();
                }
            });
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_frame_requests_nothing() {
        let ctx = egui::Context::default();
        let mut ui = Ui::new();
        let mut settings = Settings::default();
        let camera = CameraTransition::new(PresetTable::builtin());
        let assets = AssetManager::new(std::path::Path::new("assets"));
        let timer = FrameTimer::new();

        let mut response = UiResponse::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            response = ui.show(ctx, &mut settings, &camera, &assets, &timer);
        });
        assert!(response.preset.is_none());
        assert!(response.retry_assets.is_empty());
    }

    #[test]
    fn overlay_renders_during_transition() {
        let ctx = egui::Context::default();
        let mut ui = Ui::new();
        let mut settings = Settings::default();
        settings.ui.show_stats = true;
        let mut camera = CameraTransition::new(PresetTable::builtin());
        camera.select_preset("left").unwrap();
        let assets = AssetManager::new(std::path::Path::new("assets"));
        let timer = FrameTimer::new();

        let mut response = UiResponse::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            response = ui.show(ctx, &mut settings, &camera, &assets, &timer);
        });
        assert!(response.preset.is_none());
    }
}
