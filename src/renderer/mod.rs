//! WebGPU rendering module
//!
//! The scene is built as screen-space triangles plus text labels; the
//! pipeline maps pixels to NDC and draws everything in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Frame, build};
pub use vertex::Vertex;
