//! Umbra Core - Scene description for signed distance field rendering.
//!
//! This crate provides:
//!
//! - **Scene tree**: `SdfNode`, `Shape`, `BlendOp` describing how primitives combine
//! - **Per-frame poses**: `Transform`, `FrameTransforms`
//! - **Settings**: `RenderParams` with validation
//! - **Animation**: closed-form orbit/bob/spin behaviours
//! - **Loading**: JSON scene files and built-in presets
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scene.json")?;
//! let frame = scene.frame_at(1.5);
//! println!("{} shapes at t=1.5", frame.shapes.len());
//! ```

pub mod animation;
pub mod error;
pub mod params;
pub mod presets;
pub mod scene;
pub mod tree;

// Re-export commonly used types
pub use animation::{animate, Animation, Space, Target};
pub use error::{ConfigError, ConfigResult, SceneError, SceneResult};
pub use params::{check_target, pixel_count, Color, RenderParams, MAX_PIXELS};
pub use scene::{FrameTransforms, SceneDescription, Transform};
pub use tree::{BlendOp, SdfNode, Shape};
