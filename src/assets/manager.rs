use std::path::{Path, PathBuf};

use super::loader::AssetKind;

#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus {
    NotLoaded,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct AssetInfo {
    pub kind: AssetKind,
    pub status: AssetStatus,
    /// Short description once loaded, e.g. triangle count or resolution.
    pub detail: String,
}

impl AssetInfo {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            status: AssetStatus::NotLoaded,
            detail: String::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, AssetStatus::Loaded)
    }

    pub fn has_error(&self) -> bool {
        matches!(self.status, AssetStatus::Error(_))
    }

    pub fn status_text(&self) -> String {
        match &self.status {
            AssetStatus::NotLoaded => "Not Loaded".to_string(),
            AssetStatus::Loading => "Loading...".to_string(),
            AssetStatus::Loaded if self.detail.is_empty() => "Loaded".to_string(),
            AssetStatus::Loaded => format!("Loaded ({})", self.detail),
            AssetStatus::Error(err) => format!("Error: {}", err),
        }
    }

    pub fn status_color(&self) -> egui::Color32 {
        match &self.status {
            AssetStatus::NotLoaded => egui::Color32::GRAY,
            AssetStatus::Loading => egui::Color32::YELLOW,
            AssetStatus::Loaded => egui::Color32::GREEN,
            AssetStatus::Error(_) => egui::Color32::RED,
        }
    }
}

/// Per-asset load bookkeeping for the status window.
pub struct AssetManager {
    pub assets: Vec<AssetInfo>,
    directory: PathBuf,
}

impl AssetManager {
    pub fn new(directory: &Path) -> Self {
        Self {
            assets: AssetKind::ALL.iter().map(|&kind| AssetInfo::new(kind)).collect(),
            directory: directory.to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn get_mut(&mut self, kind: AssetKind) -> Option<&mut AssetInfo> {
        self.assets.iter_mut().find(|a| a.kind == kind)
    }

    /// Returns false if the asset is already loading, so callers don't spawn twice.
    pub fn mark_loading(&mut self, kind: AssetKind) -> bool {
        match self.get_mut(kind) {
            Some(info) if info.status != AssetStatus::Loading => {
                info.status = AssetStatus::Loading;
                info.detail.clear();
                true
            }
            _ => false,
        }
    }

    pub fn mark_loaded(&mut self, kind: AssetKind, detail: String) {
        if let Some(info) = self.get_mut(kind) {
            info.status = AssetStatus::Loaded;
            info.detail = detail;
        }
    }

    pub fn mark_error(&mut self, kind: AssetKind, error: String) {
        if let Some(info) = self.get_mut(kind) {
            info.status = AssetStatus::Error(error);
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.assets.iter().filter(|a| a.is_loaded()).count()
    }

    pub fn loading_count(&self) -> usize {
        self.assets
            .iter()
            .filter(|a| a.status == AssetStatus::Loading)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.assets.iter().filter(|a| a.has_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_every_asset_kind() {
        let manager = AssetManager::new(Path::new("assets"));
        assert_eq!(manager.assets.len(), AssetKind::ALL.len());
        assert_eq!(manager.directory(), Path::new("assets"));
        assert!(
            manager
                .assets
                .iter()
                .all(|a| a.status == AssetStatus::NotLoaded)
        );
    }

    fn info(manager: &AssetManager, kind: AssetKind) -> &AssetInfo {
        manager.assets.iter().find(|a| a.kind == kind).unwrap()
    }

    #[test]
    fn loading_then_loaded() {
        let mut manager = AssetManager::new(Path::new("assets"));
        assert!(manager.mark_loading(AssetKind::CupModel));
        assert!(!manager.mark_loading(AssetKind::CupModel));
        assert_eq!(manager.loading_count(), 1);

        manager.mark_loaded(AssetKind::CupModel, "120 triangles".to_string());
        let cup = info(&manager, AssetKind::CupModel);
        assert!(cup.is_loaded());
        assert_eq!(cup.status_text(), "Loaded (120 triangles)");
        assert_eq!(manager.loaded_count(), 1);
        assert_eq!(manager.loading_count(), 0);
    }

    #[test]
    fn errors_can_be_retried() {
        let mut manager = AssetManager::new(Path::new("assets"));
        manager.mark_loading(AssetKind::Environment);
        manager.mark_error(AssetKind::Environment, "missing".to_string());
        assert_eq!(manager.error_count(), 1);
        assert_eq!(
            info(&manager, AssetKind::Environment).status_text(),
            "Error: missing"
        );

        assert!(manager.mark_loading(AssetKind::Environment));
        assert_eq!(manager.error_count(), 0);
    }
}
