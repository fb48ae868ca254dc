use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::CONFY_APP_NAME;
use crate::scene::light::parse_hex_color;

fn load_section<T: Serialize + DeserializeOwned + Default>(name: &str) -> T {
    match confy::load(CONFY_APP_NAME, name) {
        Ok(section) => section,
        Err(e) => {
            warn!("Using default {} settings: {}", name, e);
            T::default()
        }
    }
}

fn store_section<T: Serialize>(name: &str, section: &T) {
    if let Err(e) = confy::store(CONFY_APP_NAME, name, section) {
        warn!("Failed to save {} settings: {}", name, e);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CupSettings {
    pub distortion: f32,
    pub color: [f32; 3],
    pub thickness: f32,
    pub anisotropy: f32,
    pub transmission: f32,
    pub chromatic_aberration: f32,
}

impl Default for CupSettings {
    fn default() -> Self {
        Self {
            distortion: 0.6,
            color: parse_hex_color("#d1d1d1").unwrap_or([0.82, 0.82, 0.82]),
            thickness: 0.7,
            anisotropy: 1.0,
            transmission: 1.0,
            chromatic_aberration: 0.03,
        }
    }
}

impl CupSettings {
    pub fn load() -> Self {
        load_section("cup")
    }

    pub fn save(&self) {
        store_section("cup", self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorSettings {
    pub strength: f32,
    pub blur: [f32; 2],
    pub distortion: f32,
}

impl Default for FloorSettings {
    fn default() -> Self {
        Self {
            strength: 1.0,
            blur: [400.0, 400.0],
            distortion: 0.1,
        }
    }
}

impl FloorSettings {
    pub fn load() -> Self {
        load_section("floor")
    }

    pub fn save(&self) {
        store_section("floor", self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub env_intensity: f32,
    pub blur: f32,
    pub bg_intensity: f32,
    pub rotation: f32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            env_intensity: 1.0,
            blur: 0.0,
            bg_intensity: 0.35,
            rotation: -1.23,
        }
    }
}

impl EnvironmentSettings {
    pub fn load() -> Self {
        load_section("environment")
    }

    pub fn save(&self) {
        store_section("environment", self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub spot_light_color1: [f32; 3],
    pub intensity1: f32,
    pub angle1: f32,
    pub spot_light_color2: [f32; 3],
    pub intensity2: f32,
    pub angle2: f32,
    pub ambient_light_intensity: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            spot_light_color1: parse_hex_color("#ffffffff").unwrap_or([1.0, 1.0, 1.0]),
            intensity1: 5.0,
            angle1: std::f32::consts::FRAC_PI_3,
            spot_light_color2: parse_hex_color("#ffefe9").unwrap_or([1.0, 1.0, 1.0]),
            intensity2: 40.0,
            angle2: 0.3,
            ambient_light_intensity: 1.0,
        }
    }
}

impl LightSettings {
    pub fn load() -> Self {
        load_section("light")
    }

    pub fn save(&self) {
        store_section("light", self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub opacity: f32,
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            opacity: 0.1,
            luminance_threshold: 0.0,
            luminance_smoothing: 0.9,
        }
    }
}

impl BloomSettings {
    pub fn load() -> Self {
        load_section("bloom")
    }

    pub fn save(&self) {
        store_section("bloom", self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMappingSettings {
    pub middle_grey: f32,
    pub max_luminance: f32,
    pub avg_luminance: f32,
}

impl Default for ToneMappingSettings {
    fn default() -> Self {
        Self {
            middle_grey: 0.8,
            max_luminance: 16.0,
            avg_luminance: 1.0,
        }
    }
}

impl ToneMappingSettings {
    pub fn load() -> Self {
        load_section("tone_mapping")
    }

    pub fn save(&self) {
        store_section("tone_mapping", self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub show_cup: bool,
    pub show_floor: bool,
    pub show_environment: bool,
    pub show_light: bool,
    pub show_bloom: bool,
    pub show_tone_mapping: bool,
    pub show_assets: bool,
    pub show_stats: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_cup: false,
            show_floor: false,
            show_environment: false,
            show_light: false,
            show_bloom: false,
            show_tone_mapping: false,
            show_assets: false,
            show_stats: true,
        }
    }
}

impl UiSettings {
    pub fn load() -> Self {
        load_section("ui")
    }

    pub fn save(&self) {
        store_section("ui", self);
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub cup: CupSettings,
    pub floor: FloorSettings,
    pub environment: EnvironmentSettings,
    pub light: LightSettings,
    pub bloom: BloomSettings,
    pub tone_mapping: ToneMappingSettings,
    pub ui: UiSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            cup: CupSettings::load(),
            floor: FloorSettings::load(),
            environment: EnvironmentSettings::load(),
            light: LightSettings::load(),
            bloom: BloomSettings::load(),
            tone_mapping: ToneMappingSettings::load(),
            ui: UiSettings::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_values() {
        let settings = Settings::default();
        assert_eq!(settings.cup.distortion, 0.6);
        assert!((settings.cup.color[0] - 209.0 / 255.0).abs() < 1e-6);
        assert_eq!(settings.floor.blur, [400.0, 400.0]);
        assert_eq!(settings.environment.rotation, -1.23);
        assert_eq!(settings.light.spot_light_color1, [1.0, 1.0, 1.0]);
        assert!((settings.light.spot_light_color2[1] - 239.0 / 255.0).abs() < 1e-6);
        assert_eq!(settings.light.intensity2, 40.0);
        assert_eq!(settings.bloom.opacity, 0.1);
        assert_eq!(settings.tone_mapping.max_luminance, 16.0);
        assert!(settings.ui.show_stats);
    }

    #[test]
    fn sections_round_trip_through_serde() {
        let light = LightSettings {
            intensity1: 12.5,
            ..Default::default()
        };
        let text = serde_json::to_string(&light).unwrap();
        let parsed: LightSettings = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, light);
    }

    #[test]
    fn partial_section_fills_defaults() {
        let parsed: EnvironmentSettings = serde_json::from_str(r#"{"blur": 0.4}"#).unwrap();
        assert_eq!(parsed.blur, 0.4);
        assert_eq!(parsed.bg_intensity, 0.35);
        assert_eq!(parsed.env_intensity, 1.0);
    }
}
