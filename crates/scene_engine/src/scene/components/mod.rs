//! Built-in components

mod behaviours;
mod camera;
mod light;
mod mesh_renderer;

pub use behaviours::{Mover, Spinner};
pub use camera::Camera;
pub use light::{Light, LightKind};
pub use mesh_renderer::MeshRenderer;
