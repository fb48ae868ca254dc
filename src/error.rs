use std::{collections::BTreeMap, fmt, io, sync::Arc};

use crate::camera::PresetError;

#[derive(Debug, Clone)]
pub struct SceneError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<SceneCause>,
}

#[derive(Debug, Clone)]
pub enum SceneCause {
    Scene(Box<SceneError>),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

impl SceneError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn push_scene(mut self, cause: SceneError) -> Self {
        self.causes.push(SceneCause::Scene(Box::new(cause)));
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(SceneCause::Std(Arc::new(cause)));
        self
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")?;
        for cause in &self.causes {
            match cause {
                SceneCause::Scene(e) => write!(f, ": {e}")?,
                SceneCause::Std(e) => write!(f, ": {e}")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            SceneCause::Scene(e) => Some(e.as_ref() as &dyn std::error::Error),
            SceneCause::Std(e) => Some(e.as_ref() as &(dyn std::error::Error + 'static)),
        })
    }
}

impl From<io::Error> for SceneError {
    fn from(err: io::Error) -> Self {
        SceneError::new("io-error").push_std(err)
    }
}

impl From<image::ImageError> for SceneError {
    fn from(err: image::ImageError) -> Self {
        SceneError::new("image-error").push_std(err)
    }
}

impl From<gltf::Error> for SceneError {
    fn from(err: gltf::Error) -> Self {
        SceneError::new("gltf-error").push_std(err)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::new("json-error").push_std(err)
    }
}

impl From<tokio::task::JoinError> for SceneError {
    fn from(err: tokio::task::JoinError) -> Self {
        SceneError::new("task-join-error").push_std(err)
    }
}

impl From<PresetError> for SceneError {
    fn from(err: PresetError) -> Self {
        SceneError::new("preset-error").push_std(err)
    }
}

impl From<wgpu::CreateSurfaceError> for SceneError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        SceneError::new("wgpu::CreateSurfaceError").push_std(err)
    }
}

impl From<wgpu::RequestAdapterError> for SceneError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        SceneError::new("wgpu::RequestAdapterError").push_std(err)
    }
}

impl From<wgpu::RequestDeviceError> for SceneError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        SceneError::new("wgpu::RequestDeviceError").push_std(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_args_and_causes() {
        let err = SceneError::new("gltf-import")
            .with_arg("path", "assets/cup.gltf")
            .push_std(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let text = err.to_string();
        assert!(text.starts_with("gltf-import(path=assets/cup.gltf)"));
        assert!(text.ends_with(": missing"));
    }

    #[test]
    fn source_prefers_first_cause() {
        let inner = SceneError::new("inner");
        let err = SceneError::new("outer").push_scene(inner);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("inner()"));
    }

    #[test]
    fn preset_error_converts() {
        let err: SceneError = PresetError::Unknown("middle".to_string()).into();
        assert_eq!(err.key, "preset-error");
        assert!(err.to_string().contains("middle"));
    }
}
