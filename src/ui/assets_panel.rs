use crate::assets::{AssetKind, AssetManager};

/// Asset status window. Returns the assets the user asked to reload.
pub fn show_assets_window(
    ctx: &egui::Context,
    open: &mut bool,
    assets: &AssetManager,
) -> Vec<AssetKind> {
    let mut retry = Vec::new();

    egui::Window::new("📦 Assets")
        .default_width(360.0)
        .resizable(true)
        .open(open)
        .show(ctx, |ui| {
            ui.label(format!("Directory: {}", assets.directory().display()));
            ui.label(format!(
                "{} loaded, {} loading, {} failed",
                assets.loaded_count(),
                assets.loading_count(),
                assets.error_count()
            ));
            ui.separator();

            egui::Grid::new("assets_grid")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui| {
                    for info in &assets.assets {
                        ui.label(info.kind.label())
                            .on_hover_text(info.kind.file_name());
                        ui.colored_label(info.status_color(), info.status_text());
                        if info.has_error() {
                            if ui.small_button("Retry").clicked() {
                                retry.push(info.kind);
                            }
                        } else {
                            ui.label("");
                        }
                        ui.end_row();
                    }
                });
        });

    retry
}
