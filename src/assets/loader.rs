use std::path::{Path, PathBuf};

use log::{error, info};
use tokio::sync::mpsc::UnboundedSender;

use super::environment::{EnvironmentMap, decode_hdr};
use crate::error::SceneError;
use crate::scene::model::{ModelAsset, TextureImage, load_gltf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    MachineModel,
    CupModel,
    Environment,
    DistortionMap,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::MachineModel,
        AssetKind::CupModel,
        AssetKind::Environment,
        AssetKind::DistortionMap,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetKind::MachineModel => "coffemachine.gltf",
            AssetKind::CupModel => "cup.gltf",
            AssetKind::Environment => "poly_haven_studio_2k.hdr",
            AssetKind::DistortionMap => "distort.png",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::MachineModel => "Coffee machine",
            AssetKind::CupModel => "Cup",
            AssetKind::Environment => "Environment",
            AssetKind::DistortionMap => "Floor distortion",
        }
    }
}

pub enum AssetPayload {
    Model(ModelAsset),
    Environment(EnvironmentMap),
    Image(TextureImage),
}

pub enum AssetLoadResult {
    Success { kind: AssetKind, payload: AssetPayload },
    Error { kind: AssetKind, error: String },
}

async fn read_file(path: &Path) -> Result<Vec<u8>, SceneError> {
    tokio::fs::read(path).await.map_err(|e| {
        SceneError::new("asset-read")
            .with_arg("path", path.display())
            .push_std(e)
    })
}

pub fn decode_rgba8(bytes: &[u8]) -> Result<TextureImage, SceneError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    Ok(TextureImage {
        width: image.width(),
        height: image.height(),
        pixels: image.into_raw(),
    })
}

/// Read and decode one asset. Decoding runs on the blocking pool.
pub async fn load_asset(kind: AssetKind, dir: &Path) -> Result<AssetPayload, SceneError> {
    let path = dir.join(kind.file_name());
    match kind {
        AssetKind::MachineModel | AssetKind::CupModel => {
            let model = tokio::task::spawn_blocking(move || load_gltf(&path)).await??;
            Ok(AssetPayload::Model(model))
        }
        AssetKind::Environment => {
            let bytes = read_file(&path).await?;
            let env = tokio::task::spawn_blocking(move || decode_hdr(&bytes)).await??;
            Ok(AssetPayload::Environment(env))
        }
        AssetKind::DistortionMap => {
            let bytes = read_file(&path).await?;
            let image = tokio::task::spawn_blocking(move || decode_rgba8(&bytes)).await??;
            Ok(AssetPayload::Image(image))
        }
    }
}

/// Load `kind` in the background and report through `sender`.
pub fn spawn_load(
    runtime: &tokio::runtime::Handle,
    kind: AssetKind,
    dir: PathBuf,
    sender: UnboundedSender<AssetLoadResult>,
) {
    runtime.spawn(async move {
        info!("Loading {} from {}", kind.label(), dir.join(kind.file_name()).display());
        let result = match load_asset(kind, &dir).await {
            Ok(payload) => AssetLoadResult::Success { kind, payload },
            Err(e) => {
                let e = SceneError::new("asset-load")
                    .with_arg("asset", kind.label())
                    .push_scene(e);
                error!("{e}");
                AssetLoadResult::Error {
                    kind,
                    error: e.to_string(),
                }
            }
        };
        // The receiver only goes away when the window is closing.
        let _ = sender.send(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = AssetKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), AssetKind::ALL.len());
    }

    #[test]
    fn decodes_png_to_rgba() {
        let source = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        source.write_to(&mut bytes, image::ImageFormat::Png).unwrap();

        let decoded = decode_rgba8(bytes.get_ref()).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.pixels[0..4], &[10, 20, 30, 255]);
    }

    #[tokio::test]
    async fn missing_asset_is_an_error() {
        let result = load_asset(AssetKind::DistortionMap, Path::new("/nonexistent/cafevis")).await;
        let err = result.err().unwrap();
        assert_eq!(err.key, "asset-read");
    }

    #[tokio::test]
    async fn spawned_load_reports_failure() {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        spawn_load(
            &tokio::runtime::Handle::current(),
            AssetKind::Environment,
            PathBuf::from("/nonexistent/cafevis"),
            sender,
        );
        match receiver.recv().await {
            Some(AssetLoadResult::Error { kind, error }) => {
                assert_eq!(kind, AssetKind::Environment);
                assert!(error.starts_with("asset-load(asset=Environment): asset-read("));
            }
            _ => panic!("expected an error result"),
        }
    }
}
