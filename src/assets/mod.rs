pub mod environment;
pub mod loader;
pub mod manager;

pub use environment::EnvironmentMap;
pub use loader::{AssetKind, AssetLoadResult, AssetPayload, spawn_load};
pub use manager::AssetManager;
