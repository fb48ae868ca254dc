use std::time::{Duration, Instant};

use crate::camera::TransitionPhase;

/// Smoothed frame rate for the stats overlay.
pub struct FrameTimer {
    last_frame: Instant,
    smoothed_fps: f32,
    frame_ms: f32,
    /// Weight of the newest sample in the moving average.
    smoothing: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            frame_ms: 1000.0 / 60.0,
            smoothing: 0.05,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.record(elapsed);
    }

    pub fn record(&mut self, elapsed: Duration) {
        let frame_time = elapsed.as_secs_f32();
        if frame_time <= 0.0 {
            return;
        }
        self.frame_ms = frame_time * 1000.0;
        self.smoothed_fps =
            self.smoothed_fps * (1.0 - self.smoothing) + (1.0 / frame_time) * self.smoothing;
    }

    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

fn camera_label(phase: TransitionPhase) -> &'static str {
    match phase {
        TransitionPhase::Idle => "camera: free",
        TransitionPhase::Transitioning => "camera: moving",
    }
}

pub fn show_stats_overlay(ctx: &egui::Context, timer: &FrameTimer, camera: TransitionPhase) {
    egui::Area::new(egui::Id::new("stats_overlay"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 36.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{:.0} FPS ({:.1} ms)",
                        timer.fps(),
                        timer.frame_ms()
                    ))
                    .monospace()
                    .color(egui::Color32::from_rgb(0, 255, 128)),
                );
                ui.label(egui::RichText::new(camera_label(camera)).monospace().weak());
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_towards_steady_rate() {
        let mut timer = FrameTimer::new();
        for _ in 0..500 {
            timer.record(Duration::from_millis(10));
        }
        assert!((timer.fps() - 100.0).abs() < 0.5);
        assert!((timer.frame_ms() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut timer = FrameTimer::new();
        timer.record(Duration::ZERO);
        assert_eq!(timer.fps(), 60.0);
    }

    #[test]
    fn camera_label_follows_transition_phase() {
        assert_eq!(camera_label(TransitionPhase::Idle), "camera: free");
        assert_eq!(camera_label(TransitionPhase::Transitioning), "camera: moving");
    }
}
