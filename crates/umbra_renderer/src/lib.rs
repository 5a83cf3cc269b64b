//! Umbra renderer - CPU sphere tracing
//!
//! Renders signed distance field scenes into RGBA8 buffers:
//! - Exact primitive distances and smooth boolean combinators
//! - Sphere tracing with step and distance limits
//! - Lambert lighting with one shadow ray, step falloff and distance fog
//! - Deterministic per-pixel parallel dispatch on rayon

mod camera;
mod field;
mod renderer;
mod shading;
mod tracer;

pub mod sdf;

pub use camera::Camera;
pub use field::{DistanceField, SceneField};
pub use renderer::{color_to_rgba, render, render_image, render_in_pool, ImageBuffer, RenderStats, Rgba8};
pub use shading::{estimate_normal, fog_factor, lambert, shade, shadow, step_attenuation, ShadingSettings};
pub use tracer::{march, March, TraceSettings};

/// Re-export common types from the scene and math crates
pub use umbra_core::{Color, ConfigError, ConfigResult, FrameTransforms, RenderParams, SdfNode};
pub use umbra_math::{Ray, Vec3};
