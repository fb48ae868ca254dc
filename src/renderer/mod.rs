pub mod environment;
pub mod render;
#[allow(clippy::module_inception)]
pub mod renderer;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use renderer::{ModelSlot, Renderer};
