use std::path::Path;

use log::{info, warn};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

pub const PRESETS_FILE: &str = "presets.json";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("unknown camera preset '{0}'")]
    Unknown(String),
    #[error("duplicate camera preset '{0}'")]
    Duplicate(String),
}

/// Camera position plus the point the view settles on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub camera_position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Preset {
    pub fn position(&self) -> glm::Vec3 {
        glm::make_vec3(&self.camera_position)
    }

    pub fn look_at(&self) -> glm::Vec3 {
        glm::make_vec3(&self.look_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub preset: Preset,
}

impl PresetEntry {
    pub fn new(id: &str, label: &str, camera_position: [f32; 3], look_at: [f32; 3]) -> Self {
        Self {
            id: id.to_string(),
            label: Some(label.to_string()),
            preset: Preset {
                camera_position,
                look_at,
            },
        }
    }

    /// Button caption; falls back to the id.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Ordered, read-only preset lookup. Ids are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTable {
    entries: Vec<PresetEntry>,
}

impl PresetTable {
    pub fn new(entries: Vec<PresetEntry>) -> Result<Self, PresetError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.id == entry.id) {
                return Err(PresetError::Duplicate(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        Self {
            entries: vec![
                PresetEntry::new("left", "<", [-2.0, 1.5, 2.0], [-0.1, 0.5, -0.1]),
                PresetEntry::new("right", ">", [2.0, 1.5, 2.0], [0.1, 0.5, -0.1]),
            ],
        }
    }

    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let entries: Vec<PresetEntry> = serde_json::from_str(text)?;
        Ok(Self::new(entries)?)
    }

    /// `presets.json` from the asset directory if present and valid, otherwise
    /// the built-in pair.
    pub fn load_or_builtin(asset_dir: &Path) -> Self {
        let path = asset_dir.join(PRESETS_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return Self::builtin(),
        };
        match Self::from_json(&text) {
            Ok(table) => {
                info!("Loaded {} camera presets from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.preset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_and_values() {
        let table = PresetTable::builtin();
        let ids: Vec<&str> = table.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["left", "right"]);

        let right = table.get("right").unwrap();
        assert_eq!(right.camera_position, [2.0, 1.5, 2.0]);
        assert_eq!(right.look_at, [0.1, 0.5, -0.1]);
        assert_eq!(table.get("left").unwrap().camera_position, [-2.0, 1.5, 2.0]);
        assert!(table.get("top").is_none());
    }

    #[test]
    fn labels_fall_back_to_id() {
        let table = PresetTable::builtin();
        assert_eq!(table.iter().next().unwrap().label(), "<");

        let json = r#"[{"id": "front", "camera_position": [0, 1, 4], "look_at": [0, 0.5, 0]}]"#;
        let table = PresetTable::from_json(json).unwrap();
        assert_eq!(table.iter().next().unwrap().label(), "front");
    }

    #[test]
    fn json_keeps_file_order() {
        let json = r#"[
            {"id": "b", "camera_position": [1, 1, 1], "look_at": [0, 0, 0]},
            {"id": "a", "label": "A", "camera_position": [2, 2, 2], "look_at": [0, 1, 0]}
        ]"#;
        let table = PresetTable::from_json(json).unwrap();
        let ids: Vec<&str> = table.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(table.get("a").unwrap().look_at(), glm::vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let entries = vec![
            PresetEntry::new("left", "<", [0.0; 3], [0.0; 3]),
            PresetEntry::new("left", "<<", [1.0; 3], [0.0; 3]),
        ];
        assert_eq!(
            PresetTable::new(entries),
            Err(PresetError::Duplicate("left".to_string()))
        );
    }

    #[test]
    fn missing_file_uses_builtin() {
        let table = PresetTable::load_or_builtin(Path::new("/nonexistent/cafevis"));
        assert_eq!(table, PresetTable::builtin());
    }
}
