pub mod orbit;
pub mod preset;
pub mod state;
pub mod transition;

pub use orbit::OrbitControls;
pub use preset::{PresetError, PresetTable};
pub use state::CameraState;
pub use transition::{CameraTransition, TransitionPhase};
