//! Error types for scene configuration and loading.

use thiserror::Error;

/// A render pass was configured with values it cannot run with.
///
/// Returned before any pixel is written, so a failed pass never leaves a
/// partially updated buffer behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("max_steps must be at least 1")]
    MaxSteps,

    #[error("max_distance must be positive and finite, got {0}")]
    MaxDistance(f32),

    #[error("surface_distance must be positive and finite, got {0}")]
    SurfaceDistance(f32),

    #[error("normal_epsilon must be positive and finite, got {0}")]
    NormalEpsilon(f32),

    #[error("fog_exponent must be positive and finite, got {0}")]
    FogExponent(f32),

    #[error("shadow_attenuation must lie in [0, 1], got {0}")]
    ShadowAttenuation(f32),

    #[error("step_falloff must lie in [0, 1], got {0}")]
    StepFalloff(f32),

    #[error("chunk_size must be at least 1")]
    ChunkSize,

    #[error("{0} color has non-finite components")]
    NonFiniteColor(&'static str),

    #[error("Shape transform {index} referenced but only {available} provided")]
    MissingTransform { index: usize, available: usize },

    #[error("{0} transform is not finite or not invertible")]
    DegenerateTransform(String),

    #[error("Invalid {shape}: {reason}")]
    InvalidShape {
        shape: &'static str,
        reason: &'static str,
    },
}

/// Result type for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;
