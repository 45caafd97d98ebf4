//! Error types

use thiserror::Error;

/// Errors raised when constructing or reconfiguring game objects, loading
/// settings or bringing up the GPU
#[derive(Debug, Error)]
pub enum GameError {
    #[error("radius {0} out of range [1, 1000]")]
    InvalidRadius(f32),

    #[error("{what} dimensions {width}x{height} out of range [1, {max}]")]
    InvalidDimensions {
        what: &'static str,
        width: f32,
        height: f32,
        max: f32,
    },

    #[error("{what} speed {speed} out of range [1, {max}]")]
    InvalidSpeed {
        what: &'static str,
        speed: f32,
        max: f32,
    },

    #[error("scale {0} out of range [0.1, 10]")]
    InvalidScale(f32),

    #[error("explosion duration {0} out of range [0.1, 10]")]
    InvalidDuration(f32),

    #[error("explosion max radius {0} out of range [1, 1000]")]
    InvalidExplosionRadius(f32),

    #[error("particle count {0} out of range [5, 100]")]
    InvalidParticleCount(usize),

    #[error("explosion capacity {0} out of range [1, 500]")]
    InvalidCapacity(usize),

    #[error("graphics device unavailable: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface has no format supported by the adapter")]
    UnsupportedSurface,

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
